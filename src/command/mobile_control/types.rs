//! Argument and parameter types used by Mobile equipment control and status Commands
use atat::atat_derive::AtatEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Functionality {
    /// 0: Sets the MT to minimum functionality (disable both transmit and receive RF
    /// circuits by deactivating both CS and PS services)
    Minimum = 0,
    /// 1: sets the MT to full functionality, e.g. from airplane mode or minimum
    /// functionality
    Full = 1,
    /// 4: Disables both transmit and receive RF circuits by deactivating both CS and PS
    /// services and sets the MT into airplane mode
    AirplaneMode = 4,
}
