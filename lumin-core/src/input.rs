//! Local input events
//!
//! The firmware reads the encoder and buttons; this module only turns raw
//! detents and button releases into the events the menu understands.

use crate::config::BridgeConfig;

/// Encoder rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    pub fn is_clockwise(self) -> bool {
        matches!(self, Direction::Clockwise)
    }
}

/// Classified user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    /// One detent with the encoder button released
    TurnStep(Direction),
    /// A burst of detents with the encoder button held
    FastTurn,
    /// Encoder button released without a fast turn
    Click,
    /// Mode button released
    ButtonPress,
}

/// Detent classifier
///
/// Detents turned with the encoder button held are counted inside a
/// trailing window; enough of them in time yield one [`InputEvent::FastTurn`].
/// Timestamps are free-running milliseconds and may wrap.
#[derive(Debug, Clone)]
pub struct TurnClassifier {
    steps: u8,
    window_ms: u32,
    count: u8,
    window_start: u32,
    fast_fired: bool,
}

impl TurnClassifier {
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            steps: config.fast_turn_steps.max(1),
            window_ms: config.fast_turn_window_ms,
            count: 0,
            window_start: 0,
            fast_fired: false,
        }
    }

    /// Classify one detent
    ///
    /// `held` is the encoder button level at the time of the detent.
    pub fn on_detent(&mut self, direction: Direction, held: bool, now_ms: u32) -> Option<InputEvent> {
        if !held {
            self.count = 0;
            return Some(InputEvent::TurnStep(direction));
        }

        if self.count == 0 || now_ms.wrapping_sub(self.window_start) > self.window_ms {
            self.window_start = now_ms;
            self.count = 0;
        }
        self.count += 1;

        if self.count >= self.steps {
            self.count = 0;
            self.fast_fired = true;
            Some(InputEvent::FastTurn)
        } else {
            None
        }
    }

    /// Classify an encoder button release
    pub fn on_release(&mut self) -> Option<InputEvent> {
        self.count = 0;
        if core::mem::replace(&mut self.fast_fired, false) {
            None
        } else {
            Some(InputEvent::Click)
        }
    }
}
