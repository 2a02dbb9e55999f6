//! ### 7 - Network service

pub mod responses;
pub mod types;

use core::fmt::Write;

use atat::atat_derive::AtatCmd;
use atat::{AtatCmd, InternalError};
use heapless::String;
use responses::{parse_operator_list, OperatorList};
use types::{OperatorFormat, OperatorSelectionMode};

use super::{utf8_prefix, NoResponse};
use crate::registry::PlmnId;

/// 7.5 Operator selection +COPS, test command
///
/// Triggers a full network search and returns the list of operators present
/// in the network. The search can take minutes, so this command is normally
/// issued asynchronously.
///
/// The list is parsed leniently, see [`parse_operator_list`]: parsing never
/// fails on malformed content.
#[derive(Debug, Clone, Copy)]
pub struct GetOperatorList;

impl GetOperatorList {
    const LINE: &'static [u8] = b"AT+COPS=?\r\n";
}

impl AtatCmd for GetOperatorList {
    type Response = OperatorList;

    const MAX_LEN: usize = Self::LINE.len();
    const MAX_TIMEOUT_MS: u32 = 300_000;

    fn write(&self, buf: &mut [u8]) -> usize {
        buf[..Self::LINE.len()].copy_from_slice(Self::LINE);
        Self::LINE.len()
    }

    fn parse(&self, resp: Result<&[u8], InternalError>) -> Result<Self::Response, atat::Error> {
        let mut list = OperatorList::default();
        list.report = parse_operator_list(utf8_prefix(resp?), &mut list.operators);
        Ok(list)
    }
}

/// 7.5 Operator selection +COPS
///
/// With `mode` manual and `format` numeric, forces registration to the PLMN
/// given in `oper`.
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+COPS", NoResponse, attempts = 1, timeout_ms = 180000)]
pub struct SetOperatorSelection {
    #[at_arg(position = 0)]
    pub mode: OperatorSelectionMode,
    #[at_arg(position = 1)]
    pub format: OperatorFormat,
    #[at_arg(position = 2)]
    pub oper: String<8>,
}

impl SetOperatorSelection {
    pub fn manual(plmn: PlmnId) -> Self {
        let mut oper = String::new();
        // Cannot fail, a 24 bit identity has at most 8 digits
        let _ = write!(oper, "{}", plmn);
        Self {
            mode: OperatorSelectionMode::Manual,
            format: OperatorFormat::Numeric,
            oper,
        }
    }
}
