//! Responses for Packet Switched Data Services Commands
use atat::atat_derive::AtatResp;

use super::types::{ContextId, PDPContextStatus};

/// 18.14 PDP context activate or deactivate +CGACT
#[derive(Debug, Clone, PartialEq, Eq, AtatResp)]
pub struct PDPContextState {
    #[at_arg(position = 0)]
    pub cid: ContextId,
    #[at_arg(position = 1)]
    pub status: PDPContextStatus,
}

impl PDPContextState {
    pub fn is_active(&self, cid: ContextId) -> bool {
        self.cid == cid && self.status == PDPContextStatus::Activated
    }
}
