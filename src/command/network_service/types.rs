//! Argument and parameter types used by Network service Commands and Responses
use atat::atat_derive::AtatEnum;

/// Is used to chose whether the network selection is automatically done by the
/// MT or is forced by this command to the operator <oper> given in the format
/// <format>
#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatorSelectionMode {
    /// • 0: automatic (<oper> field is ignored)
    Automatic = 0,
    /// • 1: manual
    Manual = 1,
    /// • 2: deregister from network
    Deregister = 2,
    /// • 3: set only <format>
    FormatOnly = 3,
    /// • 4: manual/automatic
    ManualAutomatic = 4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatorFormat {
    Long = 0,
    Short = 1,
    Numeric = 2,
}

/// <stat> of an entry in the `+COPS=?` operator list.
///
/// Values outside the 3GPP range are reported by some modems; they map to
/// [`OperatorStatus::Unknown`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum OperatorStatus {
    /// • 0: unknown
    #[default]
    Unknown = 0,
    /// • 1: available
    Available = 1,
    /// • 2: current
    Current = 2,
    /// • 3: forbidden
    Forbidden = 3,
}

impl From<u8> for OperatorStatus {
    fn from(v: u8) -> Self {
        match v {
            1 => Self::Available,
            2 => Self::Current,
            3 => Self::Forbidden,
            _ => Self::Unknown,
        }
    }
}
