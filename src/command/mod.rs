//! AT commands used to scan, select and monitor operators.
//!
//! Commands are grouped following the chapters of 3GPP TS 27.007, the same
//! grouping most modem AT manuals use.

pub mod mobile_control;
pub mod network_service;
pub mod psn;

use atat::atat_derive::AtatResp;
use atat::{AtatCmd, AtatResp, InternalError};

use crate::config::AT_CMD_BUF_LEN;
use crate::error::Error;
use crate::transport::{response_from, ResponseBuf};

#[derive(Debug, Clone, AtatResp)]
pub struct NoResponse;

/// Free form command line, for vendor specific commands.
///
/// The response information text is returned as is.
#[derive(Debug, Clone, Copy)]
pub struct Raw<'a>(&'a str);

impl<'a> Raw<'a> {
    /// `line` is the full command, e.g. `AT%XMONITOR`, without terminator.
    pub fn new(line: &'a str) -> Result<Self, Error> {
        if line.len() + 2 > AT_CMD_BUF_LEN {
            return Err(Error::Overflow);
        }
        Ok(Self(line))
    }
}

/// Unparsed information text of a [`Raw`] command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse(pub ResponseBuf);

impl AtatResp for RawResponse {}

impl AtatCmd for Raw<'_> {
    type Response = RawResponse;

    const MAX_LEN: usize = AT_CMD_BUF_LEN;

    fn write(&self, buf: &mut [u8]) -> usize {
        let len = self.0.len();
        buf[..len].copy_from_slice(self.0.as_bytes());
        buf[len..len + 2].copy_from_slice(b"\r\n");
        len + 2
    }

    fn parse(&self, resp: Result<&[u8], InternalError>) -> Result<Self::Response, atat::Error> {
        let resp = resp?;
        Ok(RawResponse(response_from(utf8_prefix(resp)).0))
    }
}

/// The longest valid UTF-8 prefix of `bytes`.
pub(crate) fn utf8_prefix(bytes: &[u8]) -> &str {
    match core::str::from_utf8(bytes) {
        Ok(s) => s,
        // Cannot fail, the prefix is valid by definition
        Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default(),
    }
}
