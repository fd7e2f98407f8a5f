//! The underlying binary command protocol of the E22 register file.
//!
//! Every command frame is a three-field header `[opcode, start address,
//! length]`, followed by the payload for the set-register opcodes. The body
//! length is always explicit; nothing is delimiter-based. The module answers
//! with the raw register bytes, no header.

use std::fmt;

use crate::constants::{MAX_PAYLOAD_SIZE, commands};
use crate::error::{Error, Result};
use crate::registers::Register;

/// A register-file command.
///
/// Built fresh per operation and consumed by [`Command::into_raw`]; never
/// persisted. These frames are only honored while the module sits in
/// configuration mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Write a contiguous block of registers, persisted across power cycles.
    SetRegister { start: Register, values: Vec<u8> },
    /// Read a contiguous block of registers.
    ReadRegister { start: Register, len: usize },
    /// Write a contiguous block of registers, lost on power-down.
    SetVolatile { start: Register, values: Vec<u8> },
}

impl Command {
    pub fn set_register(start: Register, values: Vec<u8>) -> Self {
        Command::SetRegister { start, values }
    }

    pub fn read_register(start: Register, len: usize) -> Self {
        Command::ReadRegister { start, len }
    }

    pub fn set_volatile(start: Register, values: Vec<u8>) -> Self {
        Command::SetVolatile { start, values }
    }

    pub const fn opcode(&self) -> u8 {
        match self {
            Command::SetRegister { .. } => commands::SET_REG,
            Command::ReadRegister { .. } => commands::READ_REG,
            Command::SetVolatile { .. } => commands::SET_TEMP,
        }
    }

    /// Encode to wire bytes.
    ///
    /// Rejects anything the one-byte length field cannot represent rather
    /// than silently truncating.
    pub fn into_raw(self) -> Result<Vec<u8>> {
        let opcode = self.opcode();
        match self {
            Command::SetRegister { start, values } | Command::SetVolatile { start, values } => {
                if values.is_empty() {
                    return Err(Error::InvalidLength(0));
                }
                if values.len() > MAX_PAYLOAD_SIZE {
                    return Err(Error::PayloadTooLarge(values.len()));
                }
                let mut buf = Vec::with_capacity(3 + values.len());
                buf.push(opcode);
                buf.push(start.addr());
                buf.push(values.len() as u8);
                buf.extend(values);
                Ok(buf)
            }
            Command::ReadRegister { start, len } => {
                if len == 0 || len > MAX_PAYLOAD_SIZE {
                    return Err(Error::InvalidLength(len));
                }
                Ok(vec![opcode, start.addr(), len as u8])
            }
        }
    }
}

/// Response to a command: the raw register bytes echoed back by the module.
#[derive(Clone, PartialEq, Eq)]
pub struct Response {
    registers: Vec<u8>,
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Response[{}]", hex::encode(&self.registers))
    }
}

impl Response {
    /// Decode a raw response. An empty read means the module never answered,
    /// which is surfaced as [`Error::DeviceNotResponding`], never treated as
    /// success.
    pub fn from_raw(raw: &[u8]) -> Result<Self> {
        if raw.is_empty() {
            return Err(Error::DeviceNotResponding);
        }
        Ok(Response {
            registers: raw.to_vec(),
        })
    }

    /// The register-value bytes, in address order. Never empty.
    pub fn registers(&self) -> &[u8] {
        &self.registers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_register_framing() {
        let raw = Command::set_register(Register::Reg0, vec![0x62, 0x00, 0x05, 0x03])
            .into_raw()
            .unwrap();
        assert_eq!(raw, vec![0xc0, 0x03, 0x04, 0x62, 0x00, 0x05, 0x03]);
    }

    #[test]
    fn set_volatile_uses_temp_opcode() {
        let raw = Command::set_volatile(Register::Channel, vec![7])
            .into_raw()
            .unwrap();
        assert_eq!(raw, vec![0xc2, 0x05, 0x01, 0x07]);
    }

    #[test]
    fn read_register_framing() {
        let raw = Command::read_register(Register::ProductId, 1)
            .into_raw()
            .unwrap();
        assert_eq!(raw, vec![0xc1, 0x09, 0x01]);
    }

    #[test]
    fn max_payload_is_accepted() {
        let raw = Command::set_register(Register::AddrH, vec![0xaa; 255])
            .into_raw()
            .unwrap();
        assert_eq!(raw.len(), 3 + 255);
        assert_eq!(raw[2], 255);
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let err = Command::set_register(Register::AddrH, vec![0xaa; 256])
            .into_raw()
            .unwrap_err();
        assert!(matches!(err, Error::PayloadTooLarge(256)));
    }

    #[test]
    fn empty_set_register_is_rejected() {
        let err = Command::set_register(Register::Reg0, vec![])
            .into_raw()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidLength(0)));
    }

    #[test]
    fn empty_set_volatile_is_rejected() {
        let err = Command::set_volatile(Register::Channel, vec![])
            .into_raw()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidLength(0)));
    }

    #[test]
    fn zero_length_read_is_rejected() {
        let err = Command::read_register(Register::NetId, 0)
            .into_raw()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidLength(0)));
    }

    #[test]
    fn oversized_read_is_rejected() {
        let err = Command::read_register(Register::AddrH, 256)
            .into_raw()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidLength(256)));
    }

    #[test]
    fn empty_response_is_not_success() {
        assert!(matches!(
            Response::from_raw(&[]),
            Err(Error::DeviceNotResponding)
        ));
    }

    #[test]
    fn response_debug_is_hex() {
        let resp = Response::from_raw(&[0x22, 0x0f]).unwrap();
        assert_eq!(format!("{resp:?}"), "Response[220f]");
    }
}
