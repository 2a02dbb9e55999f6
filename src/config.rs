use embassy_time::Duration;

use crate::command::psn::types::ContextId;

/// Maximum number of operators kept from a single `+COPS=?` scan.
pub const MAX_PLMN_LIST_CNT: usize = 32;

/// Capacity of a raw AT response, including the information text.
pub const AT_CMD_RESP_BUF_LEN: usize = 1024;

/// Capacity of a single formatted AT command line.
pub const AT_CMD_BUF_LEN: usize = 64;

pub trait CellularConfig {
    /// Upper bound for an operator scan, measured from the moment the scan
    /// is started. Network search on LTE-M/NB-IoT can take minutes.
    const SCAN_TIMEOUT: Duration = Duration::from_secs(5 * 60);

    /// Idle sleep of the background runner between two ticks.
    const POLL_INTERVAL: Duration = Duration::from_millis(1000);

    /// Time to let the modem attach after switching it to full functionality.
    const NETWORK_SETTLE_TIME: Duration = Duration::from_secs(10);

    /// Pause between two PLMNs while analyzing.
    const ANALYZE_DWELL_TIME: Duration = Duration::from_secs(5);

    const DEFAULT_CONTEXT_ID: ContextId = ContextId(0);

    /// Vendor specific cell monitor command.
    const MONITOR_COMMAND: &'static str = "AT%XMONITOR";
}

pub struct DefaultConfig;

impl CellularConfig for DefaultConfig {}
