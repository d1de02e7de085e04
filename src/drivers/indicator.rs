//! Alert indicator driver.
//!
//! Produces the LED command stream from a single input bit: `should_flash`.
//! While flashing, the on/off phase is derived from elapsed wall time rather
//! than tick count, so the cadence self-corrects after scheduling jitter and
//! drifts by at most one polling period from the ideal schedule. When the
//! alert clears, a single `Off` is emitted — not one per tick.

/// Output command for the indicator LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorCommand {
    Off,
    On,
    Toggle,
}

/// Flash-phase state for the alert LED.
pub struct IndicatorDriver {
    flash_interval_ms: u64,
    led_on: bool,
    last_toggle_ms: u64,
}

impl IndicatorDriver {
    pub fn new(flash_interval_ms: u64) -> Self {
        Self {
            flash_interval_ms,
            led_on: false,
            last_toggle_ms: 0,
        }
    }

    /// Advance the driver; call once per control tick at any cadence.
    ///
    /// Returns the command to apply, or `None` when the output is already
    /// correct for the current phase.
    pub fn update(&mut self, should_flash: bool, now_ms: u64) -> Option<IndicatorCommand> {
        if !should_flash {
            if self.led_on {
                self.led_on = false;
                return Some(IndicatorCommand::Off);
            }
            return None;
        }

        if now_ms.saturating_sub(self.last_toggle_ms) >= self.flash_interval_ms {
            self.last_toggle_ms = now_ms;
            self.led_on = !self.led_on;
            return Some(IndicatorCommand::Toggle);
        }

        None
    }

    /// Whether the LED is currently lit (valid after [`update`](Self::update)).
    pub fn is_on(&self) -> bool {
        self.led_on
    }
}
