/// Failure reported by the underlying AT command transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// The transport cannot accept another command right now.
    Busy,
    /// The modem already has this command queued. The completion will still
    /// be delivered.
    InProgress,
    Io,
    /// The response did not fit the receive buffer.
    Overflow,
    /// Vendor specific error code.
    Code(i32),
}

#[derive(Debug, PartialEq)]
#[non_exhaustive]
pub enum Error {
    // Job errors
    AlreadyInProgress,
    Timeout,
    Cancelled,
    ShutDown,

    // Command line did not fit `AT_CMD_BUF_LEN`
    Overflow,

    Transport(TransportError),

    Atat(atat::Error),
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter<'_>) {
        match self {
            Self::AlreadyInProgress => defmt::write!(f, "AlreadyInProgress"),
            Self::Timeout => defmt::write!(f, "Timeout"),
            Self::Cancelled => defmt::write!(f, "Cancelled"),
            Self::ShutDown => defmt::write!(f, "ShutDown"),
            Self::Overflow => defmt::write!(f, "Overflow"),
            Self::Transport(e) => defmt::write!(f, "Transport({:?})", e),
            Self::Atat(e) => defmt::write!(f, "Atat({:?})", e),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

impl From<embassy_time::TimeoutError> for Error {
    fn from(_: embassy_time::TimeoutError) -> Self {
        Self::Timeout
    }
}

impl From<atat::Error> for Error {
    fn from(e: atat::Error) -> Self {
        Self::Atat(e)
    }
}
