//! User facing rendering of scan results.

use core::fmt::{self, Write};

use heapless::String;

use crate::config::AT_CMD_RESP_BUF_LEN;
use crate::registry::PlmnRegistry;

pub const NO_OPERATORS: &str = "No PLMN is available here";
pub const OPERATORS_HEADER: &str = "List PLMN available as below:";
pub const SCAN_TIMED_OUT: &str = "PLMN scan timed out";
pub const SCAN_CANCELLED: &str = "PLMN scan cancelled";

/// Long enough for a prefix plus a full AT response.
const REPORT_LINE_LEN: usize = AT_CMD_RESP_BUF_LEN + 64;

/// Display sink for scan results, e.g. a shell or a console UART.
pub trait Reporter {
    fn report(&mut self, line: &str);

    /// Formats a line and reports it. Overlong lines are cut.
    fn report_fmt(&mut self, args: fmt::Arguments<'_>) {
        let mut line = String::<REPORT_LINE_LEN>::new();
        let _ = Truncating(&mut line).write_fmt(args);
        self.report(&line);
    }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, line: &str) {
        R::report(self, line)
    }
}

/// Reports through the crate log backend at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&mut self, line: &str) {
        info!("{}", line);
    }
}

/// Lists the operators of a scan, or [`NO_OPERATORS`] if there are none.
pub fn report_operators<R: Reporter + ?Sized, const N: usize>(
    reporter: &mut R,
    registry: &PlmnRegistry<N>,
) {
    if registry.is_empty() {
        reporter.report(NO_OPERATORS);
        return;
    }

    reporter.report(OPERATORS_HEADER);
    for (i, op) in registry.iter().enumerate() {
        reporter.report_fmt(format_args!("PLMN {} {} {}", i, op.status as u8, op.plmn));
    }
}

/// Writer that keeps as much as fits instead of failing the whole write.
struct Truncating<'a, const N: usize>(&'a mut String<N>);

impl<const N: usize> Write for Truncating<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                return Err(fmt::Error);
            }
        }
        Ok(())
    }
}
