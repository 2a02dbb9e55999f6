pub mod control;
pub mod runner;
pub mod state;

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::config::CellularConfig;
use crate::report::Reporter;
use crate::transport::AtTransport;
use control::Control;
use runner::Runner;
use state::State;

/// Handle for the transport's completion path.
///
/// Cheap to copy. With a `RawMutex` such as `CriticalSectionRawMutex` it can
/// be used from another task, thread or interrupt than the
/// [`Control`] and [`Runner`].
pub struct Responder<'d, M: RawMutex> {
    state: &'d State<M>,
}

impl<M: RawMutex> Clone for Responder<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: RawMutex> Copy for Responder<'_, M> {}

impl<'d, M: RawMutex> Responder<'d, M> {
    /// Delivers the response to the outstanding `+COPS=?`.
    ///
    /// Returns `false` and drops `raw` if no scan is awaiting a response.
    pub fn on_response_ready(&self, raw: &str) -> bool {
        self.state.deliver(raw)
    }
}

pub fn new<'d, M: RawMutex, T: AtTransport, R: Reporter, C: CellularConfig>(
    state: &'d State<M>,
    transport: T,
    reporter: R,
    _config: C,
) -> (Control<'d, M, T, C>, Runner<'d, M, R, C>, Responder<'d, M>) {
    (
        Control::new(state, transport),
        Runner::new(state, reporter),
        Responder { state },
    )
}
