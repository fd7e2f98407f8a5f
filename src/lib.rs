//! EBYTE E22 LoRa module configuration protocol implementation.
//!
//! The module's register file is only reachable while the two mode-select
//! lines place it in configuration mode, with a settling delay around every
//! transition. [`E22`] sequences that for each register operation; the other
//! modules are the pieces it is built from.

pub mod constants;
pub mod device;
pub mod driver;
pub mod error;
pub mod mode;
pub mod protocol;
pub mod registers;
pub mod transport;

pub use self::device::RadioConfig;
pub use self::driver::E22;
pub use self::error::{Error, Result};
pub use self::mode::{Mode, ModeController, ModePin, ModePins};
pub use self::protocol::{Command, Response};
pub use self::registers::Register;
pub use self::transport::Transport;
