use ufmt::uWrite;

use crate::errors::Fault;
use crate::pinout::is_pin_in_gpio;
use crate::probe::BoardPin;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LedColor {
    Red,
    Green,
    Blue,
}

impl LedColor {
    pub fn name(self) -> &'static str {
        match self {
            LedColor::Red => "red",
            LedColor::Green => "green",
            LedColor::Blue => "blue",
        }
    }
}

/// Single-colour LED on a GPIO pin.
///
/// Pins outside the GPIO table are rejected: the error is logged, the pin is
/// never switched to output and every later call is a no-op.
pub struct Led<P: BoardPin> {
    pin: P,
    color: LedColor,
    configured: bool,
    is_on: bool,
    last_toggle_ms: u32,
}

impl<P: BoardPin> Led<P> {
    pub fn new<W: uWrite>(mut pin: P, color: LedColor, serial: &mut W) -> Self {
        let configured = is_pin_in_gpio(pin.number());
        if configured {
            pin.set_output(false);
        } else {
            log_error!(
                serial,
                "{:?}: pin {} is not in the GPIO table, {} LED left unconfigured",
                Fault::UnrecognizedPin,
                pin.number(),
                color.name()
            );
        }
        Led {
            pin,
            color,
            configured,
            is_on: false,
            last_toggle_ms: 0,
        }
    }

    pub fn set(&mut self, on: bool) {
        if !self.configured {
            return;
        }
        self.pin.set_output(on);
        self.is_on = on;
    }

    #[inline]
    pub fn on(&mut self) {
        self.set(true);
    }

    #[inline]
    pub fn off(&mut self) {
        self.set(false);
    }

    pub fn toggle(&mut self) {
        self.set(!self.is_on);
    }

    /// Toggles once `period_ms` has elapsed since the last toggle. `now_ms`
    /// is a free-running millisecond counter and may wrap.
    pub fn toggle_every(&mut self, now_ms: u32, period_ms: u32) {
        if now_ms.wrapping_sub(self.last_toggle_ms) >= period_ms {
            self.toggle();
            self.last_toggle_ms = now_ms;
        }
    }

    #[inline]
    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    pub fn color(&self) -> LedColor {
        self.color
    }

    pub fn free(self) -> P {
        self.pin
    }
}
