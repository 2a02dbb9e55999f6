//! Argument and parameter types used by Packet Switched Data Services Commands and Responses
use atat::atat_derive::AtatEnum;
use serde::{Deserialize, Serialize};

/// Local PDP context identifier <cid>.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ContextId(pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PDPContextStatus {
    /// • 0: deactivated
    Deactivated = 0,
    /// • 1: activated
    Activated = 1,
}
