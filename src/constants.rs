
/// Settling time after driving M0/M1 before the module honors UART traffic.
pub const MODE_SETTLING_DELAY_MS: u64 = 10;

/// Maximum payload of a single set-register frame (the length field is one byte).
pub const MAX_PAYLOAD_SIZE: usize = 0xff;

/// Highest valid RF channel index.
pub const MAX_CHANNEL: u8 = 83;

pub mod commands {
    pub const SET_REG: u8 = 0xc0;
    pub const READ_REG: u8 = 0xc1;
    pub const SET_TEMP: u8 = 0xc2;
    pub const WRLSS_CFG: u8 = 0xcf;
    pub const WRONG_FRMT: u8 = 0xff;
}

pub mod regs {
    pub const ADDR_H: u8 = 0x00;
    pub const ADDR_L: u8 = 0x01;
    pub const NET_ID: u8 = 0x02;
    pub const REG0: u8 = 0x03;
    pub const REG1: u8 = 0x04;
    pub const REG2: u8 = 0x05;
    pub const REG3: u8 = 0x06;
    pub const CRYPT_H: u8 = 0x07;
    pub const CRYPT_L: u8 = 0x08;
    pub const PID: u8 = 0x09;
}
