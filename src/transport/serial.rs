//! Serial transportation.
//!
//! Drives the module's UART through the `serialport` crate. The M0/M1
//! mode-select lines are driven through the adapter's RTS and DTR outputs,
//! which is how the common E22 USB test boards wire them.

use std::{io::Read, io::Write, time::Duration};

use serialport::SerialPort;

use crate::error::{Error, Result};
use crate::mode::{ModePin, ModePins};

use super::Transport;

const SERIAL_TIMEOUT_MS: u64 = 1000;

pub struct SerialTransport {
    serial_port: Box<dyn SerialPort>,
}

impl SerialTransport {
    pub fn scan_ports() -> Result<Vec<String>> {
        let ports = serialport::available_ports()?;
        Ok(ports.into_iter().map(|p| p.port_name).collect())
    }

    pub fn open(port: &str, baud: u32) -> Result<Self> {
        log::info!("Opening serial port \"{}\" @ {} baud", port, baud);
        let port = serialport::new(port, baud)
            .timeout(Duration::from_millis(SERIAL_TIMEOUT_MS))
            .open()?;
        Ok(SerialTransport { serial_port: port })
    }

    pub fn open_nth(nth: usize, baud: u32) -> Result<Self> {
        let ports = serialport::available_ports()?;
        match ports.get(nth) {
            Some(port) => Self::open(&port.port_name, baud),
            None => Err(no_ports_found()),
        }
    }

    pub fn open_any(baud: u32) -> Result<Self> {
        Self::open_nth(0, baud)
    }

    /// Open a port and split off a second handle for the mode lines.
    ///
    /// Both handles refer to the same underlying device: the transport owns
    /// the data path, the pins own the RTS/DTR modem-control outputs.
    pub fn open_with_mode_pins(port: &str, baud: u32) -> Result<(SerialTransport, SerialModePins)> {
        let transport = Self::open(port, baud)?;
        let pins = SerialModePins {
            serial_port: transport.serial_port.try_clone()?,
        };
        Ok((transport, pins))
    }
}

fn no_ports_found() -> Error {
    Error::Serial(serialport::Error::new(
        serialport::ErrorKind::NoDevice,
        "no serial ports found",
    ))
}

impl Transport for SerialTransport {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        let n = self
            .serial_port
            .write(data)
            .map_err(Error::TransportWriteFailed)?;
        self.serial_port
            .flush()
            .map_err(Error::TransportWriteFailed)?;
        Ok(n)
    }

    fn read_available(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut chunk = [0u8; 32];
        // Response frames are short and arrive in one burst: block once for
        // the first chunk, then drain whatever the port has buffered. A pure
        // timeout maps to an empty response, which the driver reports as the
        // device not responding; there is no retry loop here.
        loop {
            match self.serial_port.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => out.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => break,
                Err(e) => return Err(Error::TransportReadFailed(e)),
            }
            let buffered = self
                .serial_port
                .bytes_to_read()
                .map_err(|e| Error::TransportReadFailed(e.into()))?;
            if buffered == 0 {
                break;
            }
        }
        Ok(out)
    }
}

/// M0/M1 driven through the serial adapter's RTS and DTR outputs.
pub struct SerialModePins {
    serial_port: Box<dyn SerialPort>,
}

impl ModePins for SerialModePins {
    fn set_level(&mut self, pin: ModePin, high: bool) -> Result<()> {
        let result = match pin {
            ModePin::M0 => self.serial_port.write_request_to_send(high),
            ModePin::M1 => self.serial_port.write_data_terminal_ready(high),
        };
        result.map_err(|e| Error::GpioWriteFailed(e.into()))
    }
}
