use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::Instant;

use crate::error::Error;
use crate::registry::PlmnRegistry;
use crate::transport::{response_from, ResponseBuf};

/// Progress of the operator scan job.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JobState {
    /// No scan outstanding.
    Idle,
    /// `+COPS=?` handed to the modem, response not yet delivered.
    AwaitingResponse,
    /// Response delivered, not yet consumed by the runner.
    Ready,
}

/// State shared between [`Control`](super::control::Control),
/// [`Runner`](super::runner::Runner) and the transport's
/// [`Responder`](super::Responder).
///
/// The response travels from the transport to the runner through `response`;
/// parsing and registry updates happen on the runner only.
pub struct State<M: RawMutex> {
    shared: Mutex<M, RefCell<Shared>>,
    /// Response text, tagged with the generation of the scan it answers.
    pub(crate) response: Signal<M, (u32, ResponseBuf)>,
    pub(crate) wake: Signal<M, ()>,
}

struct Shared {
    job: JobState,
    /// Bumped by every scan, so a stale timeout can never finish a newer one.
    generation: u32,
    deadline: Instant,
    cancel_requested: bool,
    shutdown: bool,
    /// Operators of the last completed scan.
    operators: PlmnRegistry,
}

/// The outstanding scan, as seen by the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Job {
    pub generation: u32,
    pub deadline: Instant,
}

impl<M: RawMutex> Default for State<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> State<M> {
    pub const fn new() -> Self {
        Self {
            shared: Mutex::new(RefCell::new(Shared {
                job: JobState::Idle,
                generation: 0,
                deadline: Instant::from_ticks(0),
                cancel_requested: false,
                shutdown: false,
                operators: PlmnRegistry::new(),
            })),
            response: Signal::new(),
            wake: Signal::new(),
        }
    }

    pub fn job_state(&self) -> JobState {
        self.shared.lock(|s| s.borrow().job)
    }

    /// The outstanding scan, `None` when `Idle`.
    pub(crate) fn outstanding(&self) -> Option<Job> {
        self.shared.lock(|s| {
            let s = s.borrow();
            (s.job != JobState::Idle).then_some(Job {
                generation: s.generation,
                deadline: s.deadline,
            })
        })
    }

    pub(crate) fn is_current(&self, generation: u32) -> bool {
        self.outstanding()
            .is_some_and(|job| job.generation == generation)
    }

    pub(crate) fn is_shutdown(&self) -> bool {
        self.shared.lock(|s| s.borrow().shutdown)
    }

    pub(crate) fn operators(&self) -> PlmnRegistry {
        self.shared.lock(|s| s.borrow().operators.clone())
    }

    /// `Idle -> AwaitingResponse`, returns the generation of the new scan.
    ///
    /// Must happen before the command reaches the transport, so the
    /// completion always finds the job awaiting it.
    pub(crate) fn begin_scan(&self, deadline: Instant) -> Result<u32, Error> {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            if s.shutdown {
                return Err(Error::ShutDown);
            }
            if s.job != JobState::Idle {
                return Err(Error::AlreadyInProgress);
            }

            s.job = JobState::AwaitingResponse;
            s.generation = s.generation.wrapping_add(1);
            s.deadline = deadline;
            s.cancel_requested = false;
            s.operators.clear();
            // Leftovers of a scan that timed out or was cancelled
            self.response.reset();
            debug!("Scan job {}: Idle -> AwaitingResponse", s.generation);
            Ok(s.generation)
        })
    }

    /// `AwaitingResponse -> Ready`. Responses for a job that is not awaiting
    /// one are dropped.
    pub(crate) fn deliver(&self, raw: &str) -> bool {
        let (buf, truncated) = response_from(raw);
        if truncated {
            warn!("Operator list response truncated to {} bytes", buf.len());
        }

        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            if s.job != JobState::AwaitingResponse {
                warn!("Dropping response, scan job is {:?}", s.job);
                return false;
            }
            s.job = JobState::Ready;
            self.response.signal((s.generation, buf));
            debug!("Scan job {}: AwaitingResponse -> Ready", s.generation);
            true
        })
    }

    /// Back to `Idle`, if scan `generation` is still outstanding. `operators`
    /// replaces the published scan result if given.
    ///
    /// Wakes the runner, which may be waiting on this scan.
    pub(crate) fn finish(&self, generation: u32, operators: Option<PlmnRegistry>) -> bool {
        let finished = self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            if s.job == JobState::Idle || s.generation != generation {
                debug!("Scan job {} already finished", generation);
                return false;
            }

            debug!("Scan job {}: {:?} -> Idle", generation, s.job);
            s.job = JobState::Idle;
            s.cancel_requested = false;
            if let Some(operators) = operators {
                s.operators = operators;
            }
            true
        });
        if finished {
            self.wake.signal(());
        }
        finished
    }

    pub(crate) fn request_cancel(&self) -> bool {
        let requested = self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            if s.job == JobState::Idle {
                return false;
            }
            s.cancel_requested = true;
            true
        });
        if requested {
            self.wake.signal(());
        }
        requested
    }

    /// Consumes a pending cancel request of scan `generation`.
    pub(crate) fn take_cancel_request(&self, generation: u32) -> bool {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            if s.job == JobState::Idle || s.generation != generation {
                return false;
            }
            let requested = s.cancel_requested;
            s.cancel_requested = false;
            requested
        })
    }

    pub(crate) fn request_shutdown(&self) {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            s.shutdown = true;
            s.cancel_requested = s.job != JobState::Idle;
        });
        self.wake.signal(());
    }
}
