//! ### 5 - Mobile equipment control and status

pub mod types;

use atat::atat_derive::AtatCmd;
use types::Functionality;

use super::NoResponse;

/// 5.2 Set module functionality +CFUN
///
/// Selects the level of functionality in the MT. Switching to full
/// functionality starts network registration, which the operator list
/// command needs on most modems.
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+CFUN", NoResponse, attempts = 1, timeout_ms = 180000)]
pub struct SetModuleFunctionality {
    #[at_arg(position = 0)]
    pub fun: Functionality,
}
