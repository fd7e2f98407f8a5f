//! Abstract byte transport to the module's UART.

use crate::error::{Error, Result};
use crate::protocol::{Command, Response};

pub use self::serial::{SerialModePins, SerialTransport};

mod serial;

/// Abstraction of the transport layer.
/// Usually a serial port, or a scripted mock in tests.
pub trait Transport {
    /// Write raw bytes, returning how many were accepted.
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Read whatever response bytes are available within the transport's
    /// timeout. An empty `Vec` means the module never answered; the timeout
    /// policy belongs to the transport, not to callers.
    fn read_available(&mut self) -> Result<Vec<u8>>;

    /// Encode and send one command, then read back and decode the response.
    fn transfer(&mut self, cmd: Command) -> Result<Response> {
        let req = cmd.into_raw()?;
        log::debug!("=> {}", hex::encode(&req));
        let written = self.write(&req)?;
        if written != req.len() {
            return Err(Error::TransportWriteFailed(std::io::Error::new(
                std::io::ErrorKind::WriteZero,
                format!("short write: {written} of {} bytes", req.len()),
            )));
        }

        let raw = self.read_available()?;
        log::debug!("<= {}", hex::encode(&raw));
        Response::from_raw(&raw)
    }
}
