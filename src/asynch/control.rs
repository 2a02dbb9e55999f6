use core::marker::PhantomData;

use atat::AtatCmd;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{with_timeout, Duration, Instant, Timer};

use super::state::{JobState, State};
use crate::command::mobile_control::{types::Functionality, SetModuleFunctionality};
use crate::command::network_service::{GetOperatorList, SetOperatorSelection};
use crate::command::psn::GetPDPContextState;
use crate::command::Raw;
use crate::config::{CellularConfig, AT_CMD_BUF_LEN};
use crate::error::{Error, TransportError};
use crate::registry::PlmnRegistry;
use crate::report::{Reporter, NO_OPERATORS, OPERATORS_HEADER};
use crate::transport::{AtTransport, ResponseBuf};

/// Command side of the driver, used by a shell or application task.
pub struct Control<'d, M: RawMutex, T: AtTransport, C: CellularConfig> {
    state: &'d State<M>,
    transport: T,
    _config: PhantomData<C>,
}

impl<'d, M: RawMutex, T: AtTransport, C: CellularConfig> Control<'d, M, T, C> {
    pub(crate) fn new(state: &'d State<M>, transport: T) -> Self {
        Self {
            state,
            transport,
            _config: PhantomData,
        }
    }

    pub fn job_state(&self) -> JobState {
        self.state.job_state()
    }

    /// Operators found by the last completed scan.
    pub fn operators(&self) -> PlmnRegistry {
        self.state.operators()
    }

    /// Starts an operator scan.
    ///
    /// Switches the modem to full functionality and hands `AT+COPS=?` to the
    /// transport. The result is reported by the [`Runner`](super::runner::Runner)
    /// once the response arrives, or when `SCAN_TIMEOUT` expires.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyInProgress`] if a scan is outstanding, without touching
    /// it. Transport errors leave the job `Idle`. [`Error::Cancelled`] if the
    /// scan was cancelled before `AT+COPS=?` was sent.
    pub async fn start_scan(&mut self) -> Result<(), Error> {
        let generation = self.state.begin_scan(Instant::now() + C::SCAN_TIMEOUT)?;

        if let Err(e) = self.request_operator_list(generation).await {
            error!("Cannot start operator scan: {:?}", e);
            self.state.finish(generation, None);
            return Err(e);
        }

        info!(
            "Operator scan started, result within {} seconds",
            C::SCAN_TIMEOUT.as_secs()
        );
        Ok(())
    }

    async fn request_operator_list(&mut self, generation: u32) -> Result<(), Error> {
        self.send(&SetModuleFunctionality {
            fun: Functionality::Full,
        })
        .await?;

        if !self.state.is_current(generation) {
            return Err(Error::Cancelled);
        }

        let mut buf = [0; GetOperatorList::MAX_LEN];
        let len = GetOperatorList.write(&mut buf);
        match self.transport.send_async(&buf[..len]) {
            // Already queued by the modem, the completion still follows
            Ok(()) | Err(TransportError::InProgress) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Aborts the outstanding scan. Returns `false` if there is none.
    pub fn cancel_scan(&self) -> bool {
        self.state.request_cancel()
    }

    /// Aborts the outstanding scan, stops the runner and rejects further scans.
    pub fn shutdown(&self) {
        info!("Shutting down scan job");
        self.state.request_shutdown();
    }

    /// Queries `+CGACT?` for the default context.
    ///
    /// Any failure to query counts as not active.
    pub async fn is_default_pdn_active(&mut self) -> bool {
        match self.send(&GetPDPContextState).await {
            Ok(contexts) => contexts.iter().any(|c| c.is_active(C::DEFAULT_CONTEXT_ID)),
            Err(e) => {
                error!("Cannot get PDP contexts activation states, err: {:?}", e);
                false
            }
        }
    }

    /// Registers on every operator of the last scan in turn and reports the
    /// modem's view of the cell.
    pub async fn analyze<R: Reporter>(&mut self, reporter: &mut R) -> Result<(), Error> {
        if self.job_state() != JobState::Idle {
            return Err(Error::AlreadyInProgress);
        }

        self.ensure_network(reporter).await?;

        let operators = self.operators();
        if operators.is_empty() {
            reporter.report(NO_OPERATORS);
        } else {
            reporter.report(OPERATORS_HEADER);
            for op in &operators {
                reporter.report_fmt(format_args!("Active PLMN {}", op.plmn));
                self.send(&SetOperatorSelection::manual(op.plmn))
                    .await
                    .inspect_err(|e| {
                        reporter.report_fmt(format_args!(
                            "Can't query the command to switch PLMN: {:?}",
                            e
                        ))
                    })?;
                reporter.report("Response: OK");

                reporter.report_fmt(format_args!("Monitor the status for PLMN {}", op.plmn));
                let resp = self.monitor_once(reporter).await?;
                reporter.report_fmt(format_args!("Response: {}", resp.as_str()));

                Timer::after(C::ANALYZE_DWELL_TIME).await;
            }
        }

        reporter.report("Done");
        Ok(())
    }

    /// Reports the modem's view of the current cell.
    pub async fn monitor<R: Reporter>(&mut self, reporter: &mut R) -> Result<ResponseBuf, Error> {
        self.ensure_network(reporter).await?;

        let resp = self.monitor_once(reporter).await?;
        reporter.report_fmt(format_args!("Response {}", resp.as_str()));
        Ok(resp)
    }

    async fn monitor_once<R: Reporter>(&mut self, reporter: &mut R) -> Result<ResponseBuf, Error> {
        let resp = match Raw::new(C::MONITOR_COMMAND) {
            Ok(cmd) => self.send(&cmd).await,
            Err(e) => Err(e),
        };
        resp.map(|r| r.0).inspect_err(|e| {
            reporter.report_fmt(format_args!("Can't query the monitor command: {:?}", e))
        })
    }

    /// Switches the modem on and waits for it to attach, unless the default
    /// context is already up.
    async fn ensure_network<R: Reporter>(&mut self, reporter: &mut R) -> Result<(), Error> {
        if self.is_default_pdn_active().await {
            return Ok(());
        }

        reporter.report("Enable modem");
        self.send(&SetModuleFunctionality {
            fun: Functionality::Full,
        })
        .await
        .inspect_err(|e| reporter.report_fmt(format_args!("AT+CFUN failed: {:?}", e)))?;

        reporter.report_fmt(format_args!(
            "Wait {} seconds after initializing network",
            C::NETWORK_SETTLE_TIME.as_secs()
        ));
        Timer::after(C::NETWORK_SETTLE_TIME).await;
        Ok(())
    }

    /// Send an AT command to the modem and wait for the response, bounded by
    /// the command's own timeout.
    pub async fn send<Cmd: AtatCmd>(&mut self, cmd: &Cmd) -> Result<Cmd::Response, Error> {
        let mut buf = [0; AT_CMD_BUF_LEN];
        if Cmd::MAX_LEN > buf.len() {
            return Err(Error::Overflow);
        }
        let len = cmd.write(&mut buf);
        let line = &buf[..len];
        if let Ok(text) = core::str::from_utf8(line) {
            trace!("Sending {}", text.trim_end());
        }

        let timeout = Duration::from_millis(Cmd::MAX_TIMEOUT_MS.into());
        let resp = with_timeout(timeout, self.transport.send(line)).await??;
        Ok(cmd.parse(Ok(resp.as_bytes()))?)
    }
}

#[cfg(test)]
mod test {
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    use super::*;
    use crate::test_helpers::{init_logger, CollectingReporter, MockTransport, TestConfig};

    const PDN_ACTIVE: &str = "+CGACT: 0,1";
    const MONITOR_RESPONSE: &str = "%XMONITOR: 1,\"EDAV\",\"EDAV\",\"26201\"";

    type TestControl<'d> = Control<'d, NoopRawMutex, &'d MockTransport, TestConfig>;

    /// A control whose last scan found 26201 and 31000.
    fn scanned<'d>(state: &'d State<NoopRawMutex>, transport: &'d MockTransport) -> TestControl<'d> {
        let (mut control, mut runner, responder) =
            super::super::new(state, transport, CollectingReporter::default(), TestConfig);
        block_on(control.start_scan()).unwrap();
        responder.on_response_ready(r#"+COPS: (1,"A","B","26201",7),(2,"C","D","31000",7)"#);
        block_on(runner.poll_tick());
        control
    }

    #[test]
    fn default_pdn_active() {
        let state = State::new();
        let transport = MockTransport::new();
        transport.respond("AT+CGACT?", Ok(PDN_ACTIVE));
        let mut control: TestControl = Control::new(&state, &transport);

        assert!(block_on(control.is_default_pdn_active()));
        assert_eq!(transport.sent(), ["AT+CGACT?"]);
    }

    #[test]
    fn default_pdn_deactivated() {
        let state = State::new();
        let transport = MockTransport::new();
        transport.respond("AT+CGACT?", Ok("+CGACT: 0,0"));
        let mut control: TestControl = Control::new(&state, &transport);

        assert!(!block_on(control.is_default_pdn_active()));
    }

    #[test]
    fn pdn_query_failure_counts_as_inactive() {
        let state = State::new();
        let transport = MockTransport::new();
        transport.respond("AT+CGACT?", Err(TransportError::Io));
        let mut control: TestControl = Control::new(&state, &transport);

        assert!(!block_on(control.is_default_pdn_active()));
    }

    #[test]
    fn analyze_without_operators() {
        init_logger();
        let state = State::new();
        let transport = MockTransport::new();
        transport.respond("AT+CGACT?", Ok(PDN_ACTIVE));
        let mut control: TestControl = Control::new(&state, &transport);
        let mut reporter = CollectingReporter::default();

        block_on(control.analyze(&mut reporter)).unwrap();
        assert_eq!(reporter.lines, [NO_OPERATORS, "Done"]);
        assert_eq!(transport.sent(), ["AT+CGACT?"]);
    }

    #[test]
    fn analyze_enables_modem_first() {
        let state = State::new();
        let transport = MockTransport::new();
        let mut control: TestControl = Control::new(&state, &transport);
        let mut reporter = CollectingReporter::default();

        block_on(control.analyze(&mut reporter)).unwrap();
        assert_eq!(
            reporter.lines,
            [
                "Enable modem",
                "Wait 0 seconds after initializing network",
                NO_OPERATORS,
                "Done"
            ]
        );
        assert_eq!(transport.sent(), ["AT+CGACT?", "AT+CFUN=1"]);
    }

    #[test]
    fn analyze_walks_scanned_operators() {
        init_logger();
        let state = State::new();
        let transport = MockTransport::new();
        transport.respond("AT+CGACT?", Ok(PDN_ACTIVE));
        transport.respond("AT%XMONITOR", Ok(MONITOR_RESPONSE));
        let mut control = scanned(&state, &transport);
        let mut reporter = CollectingReporter::default();

        block_on(control.analyze(&mut reporter)).unwrap();
        assert_eq!(
            reporter.lines,
            [
                OPERATORS_HEADER,
                "Active PLMN 26201",
                "Response: OK",
                "Monitor the status for PLMN 26201",
                "Response: %XMONITOR: 1,\"EDAV\",\"EDAV\",\"26201\"",
                "Active PLMN 31000",
                "Response: OK",
                "Monitor the status for PLMN 31000",
                "Response: %XMONITOR: 1,\"EDAV\",\"EDAV\",\"26201\"",
                "Done",
            ]
        );

        let sent = transport.sent();
        assert_eq!(
            sent[sent.len() - 4..],
            [
                "AT+COPS=1,2,\"26201\"",
                "AT%XMONITOR",
                "AT+COPS=1,2,\"31000\"",
                "AT%XMONITOR"
            ]
        );
    }

    #[test]
    fn analyze_stops_on_failed_switch() {
        let state = State::new();
        let transport = MockTransport::new();
        transport.respond("AT+CGACT?", Ok(PDN_ACTIVE));
        transport.respond("AT+COPS=1,2,\"26201\"", Err(TransportError::Busy));
        let mut control = scanned(&state, &transport);
        let mut reporter = CollectingReporter::default();

        assert_eq!(
            block_on(control.analyze(&mut reporter)),
            Err(Error::Transport(TransportError::Busy))
        );
        assert_eq!(
            reporter.lines.last().map(|l| l.as_str()),
            Some("Can't query the command to switch PLMN: Transport(Busy)")
        );
    }

    #[test]
    fn analyze_is_rejected_during_scan() {
        let state = State::new();
        let transport = MockTransport::new();
        let mut control: TestControl = Control::new(&state, &transport);
        block_on(control.start_scan()).unwrap();

        let mut reporter = CollectingReporter::default();
        assert_eq!(
            block_on(control.analyze(&mut reporter)),
            Err(Error::AlreadyInProgress)
        );
        assert!(reporter.lines.is_empty());
    }

    #[test]
    fn monitor_reports_response() {
        let state = State::new();
        let transport = MockTransport::new();
        transport.respond("AT+CGACT?", Ok(PDN_ACTIVE));
        transport.respond("AT%XMONITOR", Ok(MONITOR_RESPONSE));
        let mut control: TestControl = Control::new(&state, &transport);
        let mut reporter = CollectingReporter::default();

        let resp = block_on(control.monitor(&mut reporter)).unwrap();
        assert_eq!(resp.as_str(), MONITOR_RESPONSE);
        assert_eq!(
            reporter.lines,
            ["Response %XMONITOR: 1,\"EDAV\",\"EDAV\",\"26201\""]
        );
    }

    #[test]
    fn monitor_failure_is_reported() {
        let state = State::new();
        let transport = MockTransport::new();
        transport.respond("AT+CGACT?", Ok(PDN_ACTIVE));
        transport.respond("AT%XMONITOR", Err(TransportError::Code(-1)));
        let mut control: TestControl = Control::new(&state, &transport);
        let mut reporter = CollectingReporter::default();

        assert!(block_on(control.monitor(&mut reporter)).is_err());
        assert_eq!(
            reporter.lines,
            ["Can't query the monitor command: Transport(Code(-1))"]
        );
    }
}
