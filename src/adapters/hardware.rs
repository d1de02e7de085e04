//! Panel hardware adapter — bridges the button and LED pins to the domain
//! port traits.
//!
//! Generic over `embedded-hal` digital pins, so the same adapter drives an
//! ESP-IDF `PinDriver` on the device and an in-memory pin in tests. This is
//! the only module that touches pin levels; polarity lives here too:
//!
//! - the button is a momentary switch to ground with a pull-up, so the pin
//!   reads **low while pressed**;
//! - the LED is wired to the supply rail, so driving the pin **low turns it
//!   on**.

use embedded_hal::digital::{InputPin, OutputPin};
use log::warn;

use crate::app::ports::{ButtonPort, IndicatorPort};

/// Pin polarity of the button/LED panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelPolarity {
    /// Button reads low while pressed (pull-up wiring).
    pub button_active_low: bool,
    /// LED lights when the pin is driven low (supply-rail wiring).
    pub led_active_low: bool,
}

impl Default for PanelPolarity {
    fn default() -> Self {
        // The reference hardware: pull-up button, supply-rail LED.
        Self {
            button_active_low: true,
            led_active_low: true,
        }
    }
}

/// Concrete adapter combining the two panel pins behind port traits.
pub struct PanelAdapter<B, L> {
    button: B,
    led: L,
    polarity: PanelPolarity,
}

impl<B: InputPin, L: OutputPin> PanelAdapter<B, L> {
    pub fn new(button: B, led: L, polarity: PanelPolarity) -> Self {
        Self {
            button,
            led,
            polarity,
        }
    }
}

impl<B: InputPin, L: OutputPin> ButtonPort for PanelAdapter<B, L> {
    fn is_pressed(&mut self) -> bool {
        match self.button.is_low() {
            Ok(low) => low == self.polarity.button_active_low,
            Err(e) => {
                warn!("button read failed: {:?}", e);
                false
            }
        }
    }
}

impl<B: InputPin, L: OutputPin> IndicatorPort for PanelAdapter<B, L> {
    fn set_indicator(&mut self, on: bool) {
        let drive_low = on == self.polarity.led_active_low;
        let result = if drive_low {
            self.led.set_low()
        } else {
            self.led.set_high()
        };
        if let Err(e) = result {
            warn!("indicator write failed: {:?}", e);
        }
    }
}
