//! ### 18 - Packet Switched Data Services Commands
//!
//! Only the context activation state is needed here, to tell whether the
//! modem already has a data path up before selecting operators manually.

pub mod responses;
pub mod types;

use atat::atat_derive::AtatCmd;
use responses::PDPContextState;

/// 18.14 Read PDP context state +CGACT
///
/// Returns one `+CGACT: <cid>,<status>` line per defined context.
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+CGACT?", heapless::Vec<PDPContextState, 7>, attempts = 1, timeout_ms = 150000)]
pub struct GetPDPContextState;

#[cfg(test)]
mod test {
    use atat::AtatCmd;

    use super::types::{ContextId, PDPContextStatus};
    use super::*;

    #[test]
    fn read_command() {
        let mut buf = [0; 16];
        let len = GetPDPContextState.write(&mut buf);
        assert_eq!(&buf[..len], b"AT+CGACT?\r\n");
    }

    #[test]
    fn default_context_active() {
        let states = GetPDPContextState
            .parse(Ok(b"+CGACT: 0,1".as_slice()))
            .unwrap();
        assert_eq!(
            states.as_slice(),
            [PDPContextState {
                cid: ContextId(0),
                status: PDPContextStatus::Activated,
            }]
        );
        assert!(states[0].is_active(ContextId(0)));
        assert!(!states[0].is_active(ContextId(1)));
    }

    #[test]
    fn context_deactivated() {
        let states = GetPDPContextState
            .parse(Ok(b"+CGACT: 0,0".as_slice()))
            .unwrap();
        assert!(!states.iter().any(|s| s.is_active(ContextId(0))));
    }
}
