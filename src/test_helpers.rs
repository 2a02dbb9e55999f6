use std::cell::{Cell, RefCell};
use std::string::{String, ToString};
use std::sync::Once;
use std::vec::Vec;

use embassy_time::{Duration, Timer};

use crate::config::CellularConfig;
use crate::error::TransportError;
use crate::report::Reporter;
use crate::transport::{response_from, AtTransport, ResponseBuf};

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("trace"))
            .is_test(true)
            .try_init();
    });
}

/// Short timings so the tests run in milliseconds.
pub struct TestConfig;

impl CellularConfig for TestConfig {
    const SCAN_TIMEOUT: Duration = Duration::from_millis(50);
    const POLL_INTERVAL: Duration = Duration::from_millis(5);
    const NETWORK_SETTLE_TIME: Duration = Duration::from_millis(1);
    const ANALYZE_DWELL_TIME: Duration = Duration::from_millis(1);
}

#[derive(Debug, Default)]
pub struct CollectingReporter {
    pub lines: Vec<String>,
}

impl Reporter for CollectingReporter {
    fn report(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

/// Records every command line and answers from a script. The latest
/// scripted answer for a command wins. Unscripted commands get an empty
/// information text.
#[derive(Default)]
pub struct MockTransport {
    sent: RefCell<Vec<String>>,
    script: RefCell<Vec<Scripted>>,
    async_result: Cell<Option<TransportError>>,
}

struct Scripted {
    command: String,
    delay: Duration,
    response: Result<String, TransportError>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, command: &str, response: Result<&str, TransportError>) {
        self.respond_after(command, Duration::from_ticks(0), response);
    }

    /// Like [`respond`](Self::respond), but the answer takes `delay`.
    pub fn respond_after(
        &self,
        command: &str,
        delay: Duration,
        response: Result<&str, TransportError>,
    ) {
        self.script.borrow_mut().push(Scripted {
            command: command.to_string(),
            delay,
            response: response.map(ToString::to_string),
        });
    }

    /// Makes every `send_async` fail with `err`.
    pub fn fail_async(&self, err: TransportError) {
        self.async_result.set(Some(err));
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.borrow().clone()
    }

    fn record(&self, command: &[u8]) -> String {
        let line = String::from_utf8_lossy(command).trim_end().to_string();
        self.sent.borrow_mut().push(line.clone());
        line
    }
}

impl AtTransport for &MockTransport {
    fn send_async(&mut self, command: &[u8]) -> Result<(), TransportError> {
        self.record(command);
        match self.async_result.get() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn send(&mut self, command: &[u8]) -> Result<ResponseBuf, TransportError> {
        let line = self.record(command);
        let (delay, response) = match self.script.borrow().iter().rev().find(|s| s.command == line) {
            Some(s) => (s.delay, s.response.clone()),
            None => (Duration::from_ticks(0), Ok(String::new())),
        };
        if delay > Duration::from_ticks(0) {
            Timer::after(delay).await;
        }
        response.map(|text| response_from(&text).0)
    }
}
