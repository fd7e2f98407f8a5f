//! Module configuration logic.
//!
//! Every register operation runs the same gated sequence: enter
//! configuration mode, exchange one command frame, leave configuration mode.
//! The device must never be abandoned in configuration mode, so the exit
//! transition is attempted on every path, including failures.

use crate::constants::MAX_CHANNEL;
use crate::device::RadioConfig;
use crate::error::{Error, Result};
use crate::mode::{Mode, ModeController, ModePins};
use crate::protocol::Command;
use crate::registers::Register;
use crate::transport::{SerialModePins, SerialTransport, Transport};

/// Driver for one E22 module.
///
/// Owns the transport and the mode lines exclusively; operations take
/// `&mut self` and run to completion, so no second operation can start while
/// the module is mid-sequence. Callers needing cross-thread sharing must wrap
/// the driver in their own mutual exclusion.
pub struct E22<T: Transport, P: ModePins> {
    transport: T,
    modes: ModeController<P>,
    config: RadioConfig,
}

impl E22<SerialTransport, SerialModePins> {
    /// Open a serial port and drive the mode lines through its RTS/DTR
    /// outputs.
    pub fn new_from_serial(port: &str, baud: u32) -> Result<Self> {
        let (transport, pins) = SerialTransport::open_with_mode_pins(port, baud)?;
        Ok(Self::new(transport, pins))
    }
}

impl<T: Transport, P: ModePins> E22<T, P> {
    /// A driver with factory-default [`RadioConfig`], assuming the module
    /// currently sits in normal mode.
    pub fn new(transport: T, pins: P) -> Self {
        Self::with_controller(transport, ModeController::new(pins))
    }

    /// Inject a pre-built mode controller, e.g. one with a shortened settling
    /// delay for tests.
    pub fn with_controller(transport: T, modes: ModeController<P>) -> Self {
        E22 {
            transport,
            modes,
            config: RadioConfig::default(),
        }
    }

    /// The locally stored working configuration.
    pub fn config(&self) -> &RadioConfig {
        &self.config
    }

    pub fn current_mode(&self) -> Mode {
        self.modes.current_mode()
    }

    /// Select an operating mode directly (normal, WOR, deep sleep).
    pub fn set_mode(&mut self, mode: Mode) -> Result<()> {
        self.modes.transition(mode)
    }

    /// Run `op` with the module held in configuration mode, restoring normal
    /// mode on every exit path.
    ///
    /// A restore failure after a successful op propagates; a restore failure
    /// after a failed op is logged as secondary and never masks the original
    /// error.
    fn with_configuration<R>(&mut self, op: impl FnOnce(&mut T) -> Result<R>) -> Result<R> {
        self.modes.transition(Mode::Configuration)?;
        let result = op(&mut self.transport);
        match self.modes.transition(Mode::Normal) {
            Ok(()) => result,
            Err(restore_err) => match result {
                Ok(_) => Err(restore_err),
                Err(original) => {
                    log::warn!(
                        "failed to restore normal mode after error: {}",
                        restore_err
                    );
                    Err(original)
                }
            },
        }
    }

    /// Store and persist a full working configuration: the REG0..REG3 block
    /// is written in one frame, with the channel byte in the middle.
    pub fn set_config(&mut self, reg0: u8, reg1: u8, reg3: u8, channel: u8) -> Result<()> {
        if channel > MAX_CHANNEL {
            return Err(Error::ChannelOutOfRange(channel));
        }
        self.config = RadioConfig {
            reg0,
            reg1,
            channel,
            reg3,
        };
        self.apply_config()
    }

    /// Re-send the locally stored configuration to the device.
    pub fn apply_config(&mut self) -> Result<()> {
        let words = self.config.words();
        self.with_configuration(|t| {
            t.transfer(Command::set_register(Register::Reg0, words.to_vec()))
        })?;
        log::info!("module configured: {}", self.config);
        Ok(())
    }

    /// Persistently select an RF channel.
    pub fn set_channel(&mut self, channel: u8) -> Result<()> {
        self.write_channel(channel, false)
    }

    /// Select an RF channel without wearing flash; reverts on power-down.
    pub fn set_channel_volatile(&mut self, channel: u8) -> Result<()> {
        self.write_channel(channel, true)
    }

    fn write_channel(&mut self, channel: u8, volatile: bool) -> Result<()> {
        if channel > MAX_CHANNEL {
            return Err(Error::ChannelOutOfRange(channel));
        }
        let cmd = if volatile {
            Command::set_volatile(Register::Channel, vec![channel])
        } else {
            Command::set_register(Register::Channel, vec![channel])
        };
        self.with_configuration(|t| t.transfer(cmd))?;
        self.config.channel = channel;
        log::info!("channel set to {}", channel);
        Ok(())
    }

    pub fn read_channel(&mut self) -> Result<u8> {
        self.read_single(Register::Channel)
    }

    pub fn read_product_id(&mut self) -> Result<u8> {
        self.read_single(Register::ProductId)
    }

    /// Check whether a module answers on this port.
    pub fn probe(&mut self) -> Result<bool> {
        match self.read_product_id() {
            Ok(pid) => {
                log::info!("module present, product id 0x{:02x}", pid);
                Ok(true)
            }
            Err(Error::DeviceNotResponding) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub fn get_net_id(&mut self) -> Result<u8> {
        self.read_single(Register::NetId)
    }

    pub fn set_net_id(&mut self, id: u8) -> Result<()> {
        self.with_configuration(|t| t.transfer(Command::set_register(Register::NetId, vec![id])))?;
        Ok(())
    }

    /// The 16-bit module address, read as the ADDR_H/ADDR_L pair.
    pub fn get_address(&mut self) -> Result<u16> {
        let resp =
            self.with_configuration(|t| t.transfer(Command::read_register(Register::AddrH, 2)))?;
        let bytes = resp.registers();
        if bytes.len() < 2 {
            return Err(Error::DeviceNotResponding);
        }
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Write the 16-bit module address, big-endian over ADDR_H/ADDR_L.
    pub fn set_address(&mut self, address: u16) -> Result<()> {
        let bytes = address.to_be_bytes();
        self.with_configuration(|t| {
            t.transfer(Command::set_register(Register::AddrH, bytes.to_vec()))
        })?;
        Ok(())
    }

    /// Read a block of `len` registers starting at a named register.
    pub fn read_register(&mut self, register: Register, len: usize) -> Result<Vec<u8>> {
        let resp =
            self.with_configuration(|t| t.transfer(Command::read_register(register, len)))?;
        Ok(resp.registers().to_vec())
    }

    /// Write a block of raw bytes starting at a named register.
    pub fn write_register(&mut self, register: Register, values: &[u8]) -> Result<()> {
        self.with_configuration(|t| {
            t.transfer(Command::set_register(register, values.to_vec()))
        })?;
        Ok(())
    }

    fn read_single(&mut self, register: Register) -> Result<u8> {
        let resp =
            self.with_configuration(|t| t.transfer(Command::read_register(register, 1)))?;
        Ok(resp.registers()[0])
    }
}
