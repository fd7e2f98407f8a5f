//! The module's register map: named registers and their bit-field encodings.
//!
//! REG0, REG1 and REG3 are bitfields; each sub-field occupies a fixed,
//! non-overlapping bit range and the pre-shifted patterns below combine with
//! bitwise OR. REG2 has no sub-fields, it is the raw channel index.

use crate::constants::regs;
use crate::error::{Error, Result};

/// A named configuration register of the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    AddrH,
    AddrL,
    NetId,
    Reg0,
    Reg1,
    /// REG2, the RF channel index.
    Channel,
    Reg3,
    CryptH,
    CryptL,
    ProductId,
}

impl Register {
    /// Wire address of this register.
    pub const fn addr(self) -> u8 {
        match self {
            Register::AddrH => regs::ADDR_H,
            Register::AddrL => regs::ADDR_L,
            Register::NetId => regs::NET_ID,
            Register::Reg0 => regs::REG0,
            Register::Reg1 => regs::REG1,
            Register::Channel => regs::REG2,
            Register::Reg3 => regs::REG3,
            Register::CryptH => regs::CRYPT_H,
            Register::CryptL => regs::CRYPT_L,
            Register::ProductId => regs::PID,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Register::AddrH => "addr-h",
            Register::AddrL => "addr-l",
            Register::NetId => "net-id",
            Register::Reg0 => "reg0",
            Register::Reg1 => "reg1",
            Register::Channel => "channel",
            Register::Reg3 => "reg3",
            Register::CryptH => "crypt-h",
            Register::CryptL => "crypt-l",
            Register::ProductId => "pid",
        }
    }

    /// Look a register up by name, as used on the command line.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "addr-h" => Ok(Register::AddrH),
            "addr-l" => Ok(Register::AddrL),
            "net-id" => Ok(Register::NetId),
            "reg0" => Ok(Register::Reg0),
            "reg1" => Ok(Register::Reg1),
            "reg2" | "channel" => Ok(Register::Channel),
            "reg3" => Ok(Register::Reg3),
            "crypt-h" => Ok(Register::CryptH),
            "crypt-l" => Ok(Register::CryptL),
            "pid" | "product-id" => Ok(Register::ProductId),
            _ => Err(Error::UnknownRegister(name.to_string())),
        }
    }
}

/// UART baud rate, REG0 bits 7..5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UartBaud {
    B1200,
    B2400,
    B4800,
    #[default]
    B9600,
    B19200,
    B38400,
    B57600,
    B115200,
}

impl UartBaud {
    pub const MASK: u8 = 0xe0;

    pub const fn bits(self) -> u8 {
        match self {
            UartBaud::B1200 => 0x00,
            UartBaud::B2400 => 0x20,
            UartBaud::B4800 => 0x40,
            UartBaud::B9600 => 0x60,
            UartBaud::B19200 => 0x80,
            UartBaud::B38400 => 0xa0,
            UartBaud::B57600 => 0xc0,
            UartBaud::B115200 => 0xe0,
        }
    }
}

/// UART parity, REG0 bits 4..3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parity {
    #[default]
    N8N1,
    N8O1,
    N8E1,
}

impl Parity {
    pub const MASK: u8 = 0x18;

    pub const fn bits(self) -> u8 {
        match self {
            Parity::N8N1 => 0x00,
            Parity::N8O1 => 0x08,
            Parity::N8E1 => 0x10,
        }
    }
}

/// Air data rate, REG0 bits 2..0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AirDataRate {
    R300,
    R1200,
    #[default]
    R2400,
    R4800,
    R9600,
    R19200,
    R38400,
    R62500,
}

impl AirDataRate {
    pub const MASK: u8 = 0x07;

    pub const fn bits(self) -> u8 {
        match self {
            AirDataRate::R300 => 0x00,
            AirDataRate::R1200 => 0x01,
            AirDataRate::R2400 => 0x02,
            AirDataRate::R4800 => 0x03,
            AirDataRate::R9600 => 0x04,
            AirDataRate::R19200 => 0x05,
            AirDataRate::R38400 => 0x06,
            AirDataRate::R62500 => 0x07,
        }
    }
}

/// Maximum packet length, REG1 bits 7..6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PacketLength {
    #[default]
    L240,
    L128,
    L64,
    L32,
}

impl PacketLength {
    pub const MASK: u8 = 0xc0;

    pub const fn bits(self) -> u8 {
        match self {
            PacketLength::L240 => 0x00,
            PacketLength::L128 => 0x40,
            PacketLength::L64 => 0x80,
            PacketLength::L32 => 0xc0,
        }
    }
}

/// Transmit power, REG1 bits 1..0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TxPower {
    #[default]
    P30dBm,
    P27dBm,
    P24dBm,
    P21dBm,
}

impl TxPower {
    pub const MASK: u8 = 0x03;

    pub const fn bits(self) -> u8 {
        match self {
            TxPower::P30dBm => 0x00,
            TxPower::P27dBm => 0x01,
            TxPower::P24dBm => 0x02,
            TxPower::P21dBm => 0x03,
        }
    }
}

/// Fixed-point vs transparent transmission, REG3 bit 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransmissionMode {
    #[default]
    Transparent,
    FixedPoint,
}

impl TransmissionMode {
    pub const MASK: u8 = 0x40;

    pub const fn bits(self) -> u8 {
        match self {
            TransmissionMode::Transparent => 0x00,
            TransmissionMode::FixedPoint => 0x40,
        }
    }
}

/// WOR role, REG3 bit 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorRole {
    #[default]
    Receiver,
    Transmitter,
}

impl WorRole {
    pub const MASK: u8 = 0x08;

    pub const fn bits(self) -> u8 {
        match self {
            WorRole::Receiver => 0x00,
            WorRole::Transmitter => 0x08,
        }
    }
}

/// WOR wake cycle, REG3 bits 2..0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorPeriod {
    Ms500,
    Ms1000,
    Ms1500,
    #[default]
    Ms2000,
    Ms2500,
    Ms3000,
    Ms3500,
    Ms4000,
}

impl WorPeriod {
    pub const MASK: u8 = 0x07;

    pub const fn bits(self) -> u8 {
        match self {
            WorPeriod::Ms500 => 0x00,
            WorPeriod::Ms1000 => 0x01,
            WorPeriod::Ms1500 => 0x02,
            WorPeriod::Ms2000 => 0x03,
            WorPeriod::Ms2500 => 0x04,
            WorPeriod::Ms3000 => 0x05,
            WorPeriod::Ms3500 => 0x06,
            WorPeriod::Ms4000 => 0x07,
        }
    }
}

/// Single-bit enables, pre-shifted.
pub mod flags {
    /// REG1 bit 5, RSSI ambient noise measurement.
    pub const RSSI_AMBIENT: u8 = 0x20;
    /// REG3 bit 7, append an RSSI byte to received frames.
    pub const RSSI_BYTE: u8 = 0x80;
    /// REG3 bit 5, repeater function.
    pub const REPEATER: u8 = 0x20;
    /// REG3 bit 4, listen-before-talk.
    pub const LBT: u8 = 0x10;
}

/// One named sub-field of a bitfield register.
struct FieldSpec {
    name: &'static str,
    offset: u8,
    width: u8,
    /// Symbolic values and their pre-shifted bit patterns.
    values: &'static [(&'static str, u8)],
}

const REG0_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "baud",
        offset: 5,
        width: 3,
        values: &[
            ("1200", 0x00),
            ("2400", 0x20),
            ("4800", 0x40),
            ("9600", 0x60),
            ("19200", 0x80),
            ("38400", 0xa0),
            ("57600", 0xc0),
            ("115200", 0xe0),
        ],
    },
    FieldSpec {
        name: "parity",
        offset: 3,
        width: 2,
        values: &[("8n1", 0x00), ("8o1", 0x08), ("8e1", 0x10)],
    },
    FieldSpec {
        name: "air-rate",
        offset: 0,
        width: 3,
        values: &[
            ("0.3k", 0x00),
            ("1.2k", 0x01),
            ("2.4k", 0x02),
            ("4.8k", 0x03),
            ("9.6k", 0x04),
            ("19.2k", 0x05),
            ("38.4k", 0x06),
            ("62.5k", 0x07),
        ],
    },
];

const REG1_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "packet-len",
        offset: 6,
        width: 2,
        values: &[("240", 0x00), ("128", 0x40), ("64", 0x80), ("32", 0xc0)],
    },
    FieldSpec {
        name: "rssi-ambient",
        offset: 5,
        width: 1,
        values: &[("off", 0x00), ("on", 0x20)],
    },
    FieldSpec {
        name: "tx-power",
        offset: 0,
        width: 2,
        values: &[("30", 0x00), ("27", 0x01), ("24", 0x02), ("21", 0x03)],
    },
];

const REG3_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "rssi-byte",
        offset: 7,
        width: 1,
        values: &[("off", 0x00), ("on", 0x80)],
    },
    FieldSpec {
        name: "tx-mode",
        offset: 6,
        width: 1,
        values: &[("transparent", 0x00), ("fixed", 0x40)],
    },
    FieldSpec {
        name: "repeater",
        offset: 5,
        width: 1,
        values: &[("off", 0x00), ("on", 0x20)],
    },
    FieldSpec {
        name: "lbt",
        offset: 4,
        width: 1,
        values: &[("off", 0x00), ("on", 0x10)],
    },
    FieldSpec {
        name: "wor-role",
        offset: 3,
        width: 1,
        values: &[("rx", 0x00), ("tx", 0x08)],
    },
    FieldSpec {
        name: "wor-period",
        offset: 0,
        width: 3,
        values: &[
            ("500", 0x00),
            ("1000", 0x01),
            ("1500", 0x02),
            ("2000", 0x03),
            ("2500", 0x04),
            ("3000", 0x05),
            ("3500", 0x06),
            ("4000", 0x07),
        ],
    },
];

fn fields_of(register: Register) -> &'static [FieldSpec] {
    match register {
        Register::Reg0 => REG0_FIELDS,
        Register::Reg1 => REG1_FIELDS,
        Register::Reg3 => REG3_FIELDS,
        _ => &[],
    }
}

fn field_spec(register: Register, field: &str) -> Result<&'static FieldSpec> {
    fields_of(register)
        .iter()
        .find(|f| f.name == field)
        .ok_or_else(|| Error::UnknownField {
            register: register.name(),
            field: field.to_string(),
        })
}

/// Bit position of a named field as `(offset, width)`.
pub fn field_mask(register: Register, field: &str) -> Result<(u8, u8)> {
    let spec = field_spec(register, field)?;
    Ok((spec.offset, spec.width))
}

/// Pre-shifted bit pattern for a symbolic field value, ready to OR into the
/// register byte.
pub fn encode_field(register: Register, field: &str, value: &str) -> Result<u8> {
    let spec = field_spec(register, field)?;
    spec.values
        .iter()
        .find(|(name, _)| *name == value)
        .map(|&(_, bits)| bits)
        .ok_or_else(|| Error::InvalidFieldValue {
            field: field.to_string(),
            value: value.to_string(),
        })
}

/// Raw (shifted-down) value of a named field within a register byte.
pub fn extract_field(register: Register, field: &str, byte: u8) -> Result<u8> {
    let spec = field_spec(register, field)?;
    Ok((byte >> spec.offset) & ((1 << spec.width) - 1))
}

/// Symbolic value of a named field within a register byte.
pub fn decode_field(register: Register, field: &str, byte: u8) -> Result<&'static str> {
    let spec = field_spec(register, field)?;
    let mask = (((1u16 << spec.width) - 1) as u8) << spec.offset;
    let bits = byte & mask;
    spec.values
        .iter()
        .find(|&&(_, pattern)| pattern == bits)
        .map(|&(name, _)| name)
        .ok_or_else(|| Error::InvalidFieldValue {
            field: field.to_string(),
            value: format!("0x{byte:02x}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_addresses() {
        assert_eq!(Register::AddrH.addr(), 0x00);
        assert_eq!(Register::Channel.addr(), 0x05);
        assert_eq!(Register::ProductId.addr(), 0x09);
    }

    #[test]
    fn from_name_accepts_aliases() {
        assert_eq!(Register::from_name("reg2").unwrap(), Register::Channel);
        assert_eq!(
            Register::from_name("Product-Id").unwrap(),
            Register::ProductId
        );
    }

    #[test]
    fn from_name_rejects_unknown() {
        assert!(matches!(
            Register::from_name("reg9"),
            Err(Error::UnknownRegister(_))
        ));
    }

    #[test]
    fn field_mask_positions() {
        assert_eq!(field_mask(Register::Reg0, "baud").unwrap(), (5, 3));
        assert_eq!(field_mask(Register::Reg1, "rssi-ambient").unwrap(), (5, 1));
        assert_eq!(field_mask(Register::Reg3, "wor-period").unwrap(), (0, 3));
    }

    #[test]
    fn field_mask_unknown_field() {
        assert!(matches!(
            field_mask(Register::Reg1, "wor-period"),
            Err(Error::UnknownField { .. })
        ));
    }

    #[test]
    fn encode_field_rejects_bad_value() {
        assert!(matches!(
            encode_field(Register::Reg0, "baud", "9601"),
            Err(Error::InvalidFieldValue { .. })
        ));
    }

    #[test]
    fn all_documented_fields_round_trip() {
        for register in [Register::Reg0, Register::Reg1, Register::Reg3] {
            for spec in fields_of(register) {
                for &(symbol, _) in spec.values {
                    let byte = encode_field(register, spec.name, symbol).unwrap();
                    assert_eq!(
                        decode_field(register, spec.name, byte).unwrap(),
                        symbol,
                        "{} {} {}",
                        register.name(),
                        spec.name,
                        symbol
                    );
                    assert_eq!(
                        extract_field(register, spec.name, byte).unwrap(),
                        byte >> spec.offset
                    );
                }
            }
        }
    }

    #[test]
    fn combined_fields_extract_independently() {
        let byte = encode_field(Register::Reg0, "baud", "115200").unwrap()
            | encode_field(Register::Reg0, "parity", "8e1").unwrap()
            | encode_field(Register::Reg0, "air-rate", "62.5k").unwrap();
        assert_eq!(decode_field(Register::Reg0, "baud", byte).unwrap(), "115200");
        assert_eq!(decode_field(Register::Reg0, "parity", byte).unwrap(), "8e1");
        assert_eq!(
            decode_field(Register::Reg0, "air-rate", byte).unwrap(),
            "62.5k"
        );
    }

    #[test]
    fn fields_never_overlap() {
        for register in [Register::Reg0, Register::Reg1, Register::Reg3] {
            let specs = fields_of(register);
            for (i, a) in specs.iter().enumerate() {
                let mask_a = (((1u16 << a.width) - 1) as u8) << a.offset;
                for b in &specs[i + 1..] {
                    let mask_b = (((1u16 << b.width) - 1) as u8) << b.offset;
                    assert_eq!(mask_a & mask_b, 0, "{} overlaps {}", a.name, b.name);
                }
            }
        }
    }

    #[test]
    fn typed_enums_match_field_tables() {
        assert_eq!(
            UartBaud::B9600.bits(),
            encode_field(Register::Reg0, "baud", "9600").unwrap()
        );
        assert_eq!(
            TxPower::P21dBm.bits(),
            encode_field(Register::Reg1, "tx-power", "21").unwrap()
        );
        assert_eq!(
            WorPeriod::Ms2000.bits(),
            encode_field(Register::Reg3, "wor-period", "2000").unwrap()
        );
    }
}
