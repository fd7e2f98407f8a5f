//! The module's working configuration: REG0, REG1, channel and REG3.

use std::fmt;

use crate::error::{Error, Result};
use crate::registers::{
    AirDataRate, PacketLength, Parity, Register, TransmissionMode, TxPower, UartBaud, WorPeriod,
    WorRole, decode_field, encode_field, field_mask, flags,
};

/// In-memory image of the four registers that make up the module's working
/// configuration. Written to the device as one contiguous block starting at
/// REG0.
///
/// Lives as long as the driver; mutated only through the typed setters or by
/// the driver after a successful device write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioConfig {
    pub reg0: u8,
    pub reg1: u8,
    pub channel: u8,
    pub reg3: u8,
}

impl Default for RadioConfig {
    /// Factory defaults: 9600 8N1 at 2.4k air rate (0x62), 240-byte packets
    /// at 30 dBm (0x00), channel 0, WOR receiver on a 2000 ms cycle (0x03).
    fn default() -> Self {
        RadioConfig {
            reg0: UartBaud::B9600.bits() | Parity::N8N1.bits() | AirDataRate::R2400.bits(),
            reg1: PacketLength::L240.bits() | TxPower::P30dBm.bits(),
            channel: 0,
            reg3: WorRole::Receiver.bits() | WorPeriod::Ms2000.bits(),
        }
    }
}

impl RadioConfig {
    /// The block written at REG0: `[reg0, reg1, channel, reg3]`.
    pub fn words(&self) -> [u8; 4] {
        [self.reg0, self.reg1, self.channel, self.reg3]
    }

    pub fn set_uart(&mut self, baud: UartBaud, parity: Parity) {
        self.reg0 &= !(UartBaud::MASK | Parity::MASK);
        self.reg0 |= baud.bits() | parity.bits();
    }

    pub fn set_air_data_rate(&mut self, rate: AirDataRate) {
        self.reg0 = (self.reg0 & !AirDataRate::MASK) | rate.bits();
    }

    pub fn set_packet_length(&mut self, len: PacketLength) {
        self.reg1 = (self.reg1 & !PacketLength::MASK) | len.bits();
    }

    pub fn set_tx_power(&mut self, power: TxPower) {
        self.reg1 = (self.reg1 & !TxPower::MASK) | power.bits();
    }

    pub fn set_rssi_ambient(&mut self, enabled: bool) {
        self.reg1 &= !flags::RSSI_AMBIENT;
        if enabled {
            self.reg1 |= flags::RSSI_AMBIENT;
        }
    }

    pub fn set_rssi_byte(&mut self, enabled: bool) {
        self.reg3 &= !flags::RSSI_BYTE;
        if enabled {
            self.reg3 |= flags::RSSI_BYTE;
        }
    }

    pub fn set_transmission_mode(&mut self, mode: TransmissionMode) {
        self.reg3 = (self.reg3 & !TransmissionMode::MASK) | mode.bits();
    }

    pub fn set_repeater(&mut self, enabled: bool) {
        self.reg3 &= !flags::REPEATER;
        if enabled {
            self.reg3 |= flags::REPEATER;
        }
    }

    pub fn set_lbt(&mut self, enabled: bool) {
        self.reg3 &= !flags::LBT;
        if enabled {
            self.reg3 |= flags::LBT;
        }
    }

    pub fn set_wor(&mut self, role: WorRole, period: WorPeriod) {
        self.reg3 &= !(WorRole::MASK | WorPeriod::MASK);
        self.reg3 |= role.bits() | period.bits();
    }

    /// Set a named bit-field symbolically, e.g. `("baud", "9600")` or
    /// `("tx-power", "21")`. Field names are unique across REG0/REG1/REG3,
    /// so the field name alone picks the register.
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<()> {
        for register in [Register::Reg0, Register::Reg1, Register::Reg3] {
            let bits = match encode_field(register, field, value) {
                Ok(bits) => bits,
                Err(Error::UnknownField { .. }) => continue,
                Err(e) => return Err(e),
            };
            let (offset, width) = field_mask(register, field)?;
            let mask = (((1u16 << width) - 1) as u8) << offset;
            let byte = match register {
                Register::Reg0 => &mut self.reg0,
                Register::Reg1 => &mut self.reg1,
                _ => &mut self.reg3,
            };
            *byte = (*byte & !mask) | bits;
            return Ok(());
        }
        Err(Error::UnknownField {
            register: "reg0/reg1/reg3",
            field: field.to_string(),
        })
    }
}

impl fmt::Display for RadioConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = |reg, name, byte| decode_field(reg, name, byte).unwrap_or("?");
        write!(
            f,
            "baud={} parity={} air-rate={} packet-len={} tx-power={}dBm channel={} tx-mode={} wor={}/{}ms",
            field(Register::Reg0, "baud", self.reg0),
            field(Register::Reg0, "parity", self.reg0),
            field(Register::Reg0, "air-rate", self.reg0),
            field(Register::Reg1, "packet-len", self.reg1),
            field(Register::Reg1, "tx-power", self.reg1),
            self.channel,
            field(Register::Reg3, "tx-mode", self.reg3),
            field(Register::Reg3, "wor-role", self.reg3),
            field(Register::Reg3, "wor-period", self.reg3),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_defaults() {
        let config = RadioConfig::default();
        assert_eq!(config.reg0, 0x62);
        assert_eq!(config.reg1, 0x00);
        assert_eq!(config.channel, 0);
        assert_eq!(config.reg3, 0x03);
    }

    #[test]
    fn words_order_is_reg0_reg1_channel_reg3() {
        let config = RadioConfig {
            reg0: 0x62,
            reg1: 0x20,
            channel: 42,
            reg3: 0x83,
        };
        assert_eq!(config.words(), [0x62, 0x20, 42, 0x83]);
    }

    #[test]
    fn setters_touch_only_their_bits() {
        let mut config = RadioConfig::default();
        config.set_uart(UartBaud::B115200, Parity::N8E1);
        assert_eq!(config.reg0, 0xe0 | 0x10 | 0x02);

        config.set_air_data_rate(AirDataRate::R62500);
        assert_eq!(config.reg0, 0xe0 | 0x10 | 0x07);

        config.set_tx_power(TxPower::P21dBm);
        config.set_rssi_ambient(true);
        assert_eq!(config.reg1, 0x20 | 0x03);
        config.set_rssi_ambient(false);
        assert_eq!(config.reg1, 0x03);

        config.set_wor(WorRole::Transmitter, WorPeriod::Ms500);
        config.set_lbt(true);
        assert_eq!(config.reg3, 0x10 | 0x08);
    }

    #[test]
    fn set_field_picks_the_register_by_field_name() {
        let mut config = RadioConfig::default();
        config.set_field("baud", "115200").unwrap();
        assert_eq!(config.reg0, 0xe0 | 0x02);
        config.set_field("tx-power", "21").unwrap();
        assert_eq!(config.reg1, 0x03);
        config.set_field("wor-period", "500").unwrap();
        assert_eq!(config.reg3, 0x00);
    }

    #[test]
    fn set_field_rejects_unknown_field() {
        let mut config = RadioConfig::default();
        assert!(matches!(
            config.set_field("bandwidth", "125"),
            Err(Error::UnknownField { .. })
        ));
        assert_eq!(config, RadioConfig::default());
    }

    #[test]
    fn set_field_rejects_bad_value_for_known_field() {
        let mut config = RadioConfig::default();
        assert!(matches!(
            config.set_field("baud", "9601"),
            Err(Error::InvalidFieldValue { .. })
        ));
        assert_eq!(config, RadioConfig::default());
    }

    #[test]
    fn display_names_default_fields() {
        let rendered = RadioConfig::default().to_string();
        assert!(rendered.contains("baud=9600"));
        assert!(rendered.contains("air-rate=2.4k"));
        assert!(rendered.contains("wor=rx/2000ms"));
    }
}
