use core::marker::PhantomData;

use atat::AtatCmd;
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{with_timeout, Instant, Timer};

use super::state::{JobState, State};
use crate::command::network_service::responses::{OperatorList, ParseReport};
use crate::command::network_service::GetOperatorList;
use crate::config::CellularConfig;
use crate::report::{report_operators, Reporter, SCAN_CANCELLED, SCAN_TIMED_OUT};

/// How a scan job ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanOutcome {
    /// At least one operator was found.
    Completed(ParseReport),
    /// The response held no usable operator.
    NoOperators(ParseReport),
    /// No response within `SCAN_TIMEOUT`.
    Timeout,
    Cancelled,
}

/// Background runner for the scan job.
///
/// You must call `.run()` in a background task, or drive
/// [`poll_tick`](Self::poll_tick) from an existing loop, for scans to complete.
pub struct Runner<'d, M: RawMutex, R: Reporter, C: CellularConfig> {
    state: &'d State<M>,
    reporter: R,
    _config: PhantomData<C>,
}

impl<'d, M: RawMutex, R: Reporter, C: CellularConfig> Runner<'d, M, R, C> {
    pub(crate) fn new(state: &'d State<M>, reporter: R) -> Self {
        Self {
            state,
            reporter,
            _config: PhantomData,
        }
    }

    pub fn job_state(&self) -> JobState {
        self.state.job_state()
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Advances the scan job by one step.
    ///
    /// Returns `None` right away when no scan is outstanding, or once the scan
    /// it waited on was finished elsewhere. Otherwise waits, at most until the
    /// scan deadline, for the response, then parses and reports it. The scan
    /// is finished whenever this returns `Some`.
    pub async fn poll_tick(&mut self) -> Option<ScanOutcome> {
        loop {
            let job = self.state.outstanding()?;

            if self.state.take_cancel_request(job.generation) {
                if let Some(outcome) = self.abort(job.generation, ScanOutcome::Cancelled) {
                    return Some(outcome);
                }
                continue;
            }

            let state = self.state;
            let remaining = job.deadline.saturating_duration_since(Instant::now());

            let response = with_timeout(remaining, state.response.wait());
            let outcome = match select(response, state.wake.wait()).await {
                Either::First(Ok((generation, raw))) => self.complete(generation, &raw),
                Either::First(Err(_)) => self.abort(job.generation, ScanOutcome::Timeout),
                // Cancelled, or finished by someone else
                Either::Second(()) => None,
            };
            if outcome.is_some() {
                return outcome;
            }
        }
    }

    /// Ticks the job every `POLL_INTERVAL` until shutdown is requested.
    pub async fn run(&mut self) {
        loop {
            if let Some(outcome) = self.poll_tick().await {
                debug!("Scan job finished: {:?}", outcome);
            }

            if self.state.is_shutdown() {
                info!("Scan runner shut down");
                return;
            }

            // Cut short by cancel or shutdown
            let _ = select(Timer::after(C::POLL_INTERVAL), self.state.wake.wait()).await;
        }
    }

    fn complete(&mut self, generation: u32, raw: &str) -> Option<ScanOutcome> {
        let OperatorList { operators, report } = GetOperatorList
            .parse(Ok(raw.as_bytes()))
            .unwrap_or_default();

        // Trailing mode/format lists count as discarded groups on every scan
        if report.malformed > 0 || (report.accepted == 0 && report.groups > 0) {
            warn!(
                "Operator list degraded: {} groups, {} discarded, {} malformed",
                report.groups,
                report.discarded,
                report.malformed
            );
        }
        if report.dropped > 0 {
            warn!("Operator list full, dropped {} operators", report.dropped);
        }

        let outcome = if operators.is_empty() {
            ScanOutcome::NoOperators(report)
        } else {
            ScanOutcome::Completed(report)
        };

        let published = operators.clone();
        if !self.state.finish(generation, Some(published)) {
            warn!("Dropping operator list of finished scan {}", generation);
            return None;
        }

        info!("Operator scan found {} operators", report.accepted);
        report_operators(&mut self.reporter, &operators);
        Some(outcome)
    }

    fn abort(&mut self, generation: u32, outcome: ScanOutcome) -> Option<ScanOutcome> {
        if !self.state.finish(generation, None) {
            return None;
        }

        match outcome {
            ScanOutcome::Timeout => {
                warn!("Timed out waiting for the operator list");
                self.reporter.report(SCAN_TIMED_OUT);
            }
            _ => {
                info!("Operator scan cancelled");
                self.reporter.report(SCAN_CANCELLED);
            }
        }
        Some(outcome)
    }
}
