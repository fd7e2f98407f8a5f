//! Operating-mode selection through the M0/M1 lines.
//!
//! The module samples its two mode-select lines continuously; register
//! traffic is only honored in [`Mode::Configuration`]. Every transition needs
//! a settling delay before the UART may be used again, so the controller
//! blocks until the module is actually in the target mode.

use std::{thread, time::Duration};

use crate::constants::MODE_SETTLING_DELAY_MS;
use crate::error::Result;

/// Operating mode of the module. Exactly one is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Transparent UART-to-RF operation.
    #[default]
    Normal,
    /// Wake-on-radio operation.
    WakeOnRadio,
    /// Register file accessible over the UART.
    Configuration,
    /// Lowest power state, UART ignored.
    DeepSleep,
}

impl Mode {
    /// The `(M0, M1)` line levels selecting this mode.
    pub const fn pin_levels(self) -> (bool, bool) {
        match self {
            Mode::Normal => (false, false),
            Mode::WakeOnRadio => (true, false),
            Mode::Configuration => (false, true),
            Mode::DeepSleep => (true, true),
        }
    }
}

/// One of the two mode-select lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModePin {
    M0,
    M1,
}

/// Digital output collaborator driving the mode-select lines.
pub trait ModePins {
    fn set_level(&mut self, pin: ModePin, high: bool) -> Result<()>;
}

/// Owns the mode state and the pin collaborator.
///
/// The stored mode is only ever written by [`transition`](Self::transition),
/// after the levels have been driven and the settling delay has elapsed, so
/// it cannot diverge from the physical lines.
pub struct ModeController<P> {
    pins: P,
    mode: Mode,
    settling: Duration,
}

impl<P: ModePins> ModeController<P> {
    /// A controller assuming the lines currently select [`Mode::Normal`].
    pub fn new(pins: P) -> Self {
        Self::with_settling_delay(pins, Duration::from_millis(MODE_SETTLING_DELAY_MS))
    }

    /// Override the settling delay. Intended for tests; real modules need
    /// the full interval.
    pub fn with_settling_delay(pins: P, settling: Duration) -> Self {
        ModeController {
            pins,
            mode: Mode::Normal,
            settling,
        }
    }

    pub fn current_mode(&self) -> Mode {
        self.mode
    }

    /// Drive both lines to select `target`, then block for the settling
    /// interval. The stored mode is updated only after the delay completes;
    /// on a pin failure it is left unchanged.
    ///
    /// Any mode is reachable from any mode. Callers are responsible for
    /// sequencing register I/O only while in [`Mode::Configuration`].
    pub fn transition(&mut self, target: Mode) -> Result<()> {
        let (m0, m1) = target.pin_levels();
        self.pins.set_level(ModePin::M0, m0)?;
        self.pins.set_level(ModePin::M1, m1)?;
        thread::sleep(self.settling);
        log::debug!("mode {:?} -> {:?}", self.mode, target);
        self.mode = target;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct RecordingPins {
        writes: Vec<(ModePin, bool)>,
        fail: bool,
    }

    impl RecordingPins {
        fn new() -> Self {
            RecordingPins {
                writes: Vec::new(),
                fail: false,
            }
        }
    }

    impl ModePins for &mut RecordingPins {
        fn set_level(&mut self, pin: ModePin, high: bool) -> Result<()> {
            if self.fail {
                return Err(Error::GpioWriteFailed(std::io::Error::other("pin stuck")));
            }
            self.writes.push((pin, high));
            Ok(())
        }
    }

    #[test]
    fn pin_level_table() {
        assert_eq!(Mode::Normal.pin_levels(), (false, false));
        assert_eq!(Mode::WakeOnRadio.pin_levels(), (true, false));
        assert_eq!(Mode::Configuration.pin_levels(), (false, true));
        assert_eq!(Mode::DeepSleep.pin_levels(), (true, true));
    }

    #[test]
    fn transition_drives_both_lines_then_updates_mode() {
        let mut pins = RecordingPins::new();
        let mut ctrl = ModeController::with_settling_delay(&mut pins, Duration::ZERO);
        ctrl.transition(Mode::Configuration).unwrap();
        assert_eq!(ctrl.current_mode(), Mode::Configuration);
        drop(ctrl);
        assert_eq!(pins.writes, vec![(ModePin::M0, false), (ModePin::M1, true)]);
    }

    #[test]
    fn failed_transition_leaves_mode_unchanged() {
        let mut pins = RecordingPins::new();
        pins.fail = true;
        let mut ctrl = ModeController::with_settling_delay(&mut pins, Duration::ZERO);
        let err = ctrl.transition(Mode::DeepSleep).unwrap_err();
        assert!(matches!(err, Error::GpioWriteFailed(_)));
        assert_eq!(ctrl.current_mode(), Mode::Normal);
    }
}
