use heapless::String;

use crate::config::AT_CMD_RESP_BUF_LEN;
use crate::error::TransportError;

/// AT response information text.
pub type ResponseBuf = String<AT_CMD_RESP_BUF_LEN>;

/// The AT command channel to the modem.
///
/// Commands are passed as written by [`atat::AtatCmd::write`], terminator
/// included.
#[allow(async_fn_in_trait)]
pub trait AtTransport {
    /// Hands `command` to the modem and returns without waiting for the
    /// response.
    ///
    /// On `Ok`, the transport must deliver the complete response exactly once
    /// through the [`Responder`](crate::asynch::Responder) it was wired to,
    /// from whatever context its completion runs in.
    fn send_async(&mut self, command: &[u8]) -> Result<(), TransportError>;

    /// Sends `command` and waits for the response.
    ///
    /// Returns the information text without echo and final result code. An
    /// `ERROR` final result code is an `Err`.
    async fn send(&mut self, command: &[u8]) -> Result<ResponseBuf, TransportError>;
}

impl<T: AtTransport + ?Sized> AtTransport for &mut T {
    fn send_async(&mut self, command: &[u8]) -> Result<(), TransportError> {
        T::send_async(self, command)
    }

    async fn send(&mut self, command: &[u8]) -> Result<ResponseBuf, TransportError> {
        T::send(self, command).await
    }
}

/// Copies `text` into a [`ResponseBuf`], cutting it at the last character
/// that fits.
pub(crate) fn response_from(text: &str) -> (ResponseBuf, bool) {
    let mut buf = ResponseBuf::new();
    let mut end = text.len().min(AT_CMD_RESP_BUF_LEN);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    // Cannot fail, `end` is within capacity.
    let _ = buf.push_str(&text[..end]);
    (buf, end < text.len())
}
