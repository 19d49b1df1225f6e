//! Debounced push button
//!
//! Buttons are wired to ground with the internal pull-up enabled, so a low
//! level means pressed.

use embassy_rp::gpio::Input;

/// Settle time before a level change is believed
const DEBOUNCE_MS: u64 = 20;

/// Debounced edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum Edge {
    Pressed,
    Released,
}

pub struct Button<'d> {
    pin: Input<'d>,
    pressed: bool,
    raw: bool,
    changed_at: u64,
}

impl<'d> Button<'d> {
    pub fn new(pin: Input<'d>) -> Self {
        let raw = pin.is_low();
        Self {
            pin,
            pressed: raw,
            raw,
            changed_at: 0,
        }
    }

    /// Debounced level
    pub fn is_held(&self) -> bool {
        self.pressed
    }

    /// Sample the pin at `now_ms`
    pub fn poll(&mut self, now_ms: u64) -> Option<Edge> {
        let raw = self.pin.is_low();
        if raw != self.raw {
            self.raw = raw;
            self.changed_at = now_ms;
            return None;
        }

        if raw == self.pressed || now_ms.saturating_sub(self.changed_at) < DEBOUNCE_MS {
            return None;
        }

        self.pressed = raw;
        Some(if raw { Edge::Pressed } else { Edge::Released })
    }
}
