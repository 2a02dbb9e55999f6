#![cfg_attr(not(test), no_std)]
//! Operator (PLMN) scanning for AT command driven cellular modems.
//!
//! A scan is started from [`Control`](asynch::control::Control), which hands
//! `AT+COPS=?` to the transport. The transport delivers the response through
//! a [`Responder`](asynch::Responder), and the [`Runner`](asynch::runner::Runner)
//! parses it into a [`PlmnRegistry`] and reports the result.

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod asynch;
pub mod command;
pub mod config;
pub mod error;
pub mod registry;
pub mod report;
pub mod transport;

#[cfg(test)]
mod test_helpers;

pub use asynch::state::{JobState, State};
pub use config::{CellularConfig, DefaultConfig};
pub use error::{Error, TransportError};
pub use registry::{OperatorRecord, PlmnId, PlmnRegistry};
pub use report::{LogReporter, Reporter};
pub use transport::{AtTransport, ResponseBuf};
