//! Error types for the E22 driver.
//!
//! All fallible operations return [`Result<T>`], which uses [`Error`] as the
//! error type. Pin-control, transport, and protocol failures are all captured
//! here so callers can match on the exact failure mode.

/// The error type for all E22 driver operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Driving one of the M0/M1 mode-select lines failed.
    ///
    /// The in-memory mode is left unchanged when this occurs; the transition
    /// is either fully applied (levels driven, settling delay elapsed) or not
    /// applied at all.
    #[error("mode pin write failed: {0}")]
    GpioWriteFailed(#[source] std::io::Error),

    /// Writing a command frame to the UART failed, or the write was short.
    #[error("transport write failed: {0}")]
    TransportWriteFailed(#[source] std::io::Error),

    /// Reading the response bytes from the UART failed.
    #[error("transport read failed: {0}")]
    TransportReadFailed(#[source] std::io::Error),

    /// The module returned no bytes at all.
    ///
    /// This typically means the module is not powered, the wrong port was
    /// selected, or the mode lines are not actually wired.
    #[error("device not responding")]
    DeviceNotResponding,

    /// A zero-length read or write, or a read length that does not fit the
    /// one-byte length field.
    #[error("invalid frame length: {0}")]
    InvalidLength(usize),

    /// A set-register payload that does not fit the one-byte length field.
    #[error("payload of {0} bytes exceeds the 255 byte frame limit")]
    PayloadTooLarge(usize),

    /// RF channel outside the module's 0-83 range.
    #[error("channel {0} out of range (0-83)")]
    ChannelOutOfRange(u8),

    /// A register name that is not in the register map.
    #[error("unknown register: {0:?}")]
    UnknownRegister(String),

    /// A field name the addressed register does not have.
    #[error("register {register} has no field {field:?}")]
    UnknownField {
        register: &'static str,
        field: String,
    },

    /// A symbolic value outside the field's enumerated domain.
    #[error("{value:?} is not a valid {field} setting")]
    InvalidFieldValue { field: String, value: String },

    /// An underlying serial port error (open, scan, clone).
    #[error("serial port: {0}")]
    Serial(#[from] serialport::Error),
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_channel_out_of_range() {
        let e = Error::ChannelOutOfRange(84);
        assert_eq!(e.to_string(), "channel 84 out of range (0-83)");
    }

    #[test]
    fn display_unknown_field() {
        let e = Error::UnknownField {
            register: "reg1",
            field: "wor-period".into(),
        };
        assert_eq!(e.to_string(), "register reg1 has no field \"wor-period\"");
    }

    #[test]
    fn display_device_not_responding() {
        assert_eq!(
            Error::DeviceNotResponding.to_string(),
            "device not responding"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
