//! Runtime configuration
//!
//! Compile-time defaults; there is no persisted configuration. Everything
//! that is not listed here is a protocol constant in `lumin-protocol`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default value change per encoder detent
pub const DEFAULT_VALUE_STEP: u8 = 5;

/// Default held detents that make a fast turn
pub const DEFAULT_FAST_TURN_STEPS: u8 = 2;

/// Default window for counting held detents
pub const DEFAULT_FAST_TURN_WINDOW_MS: u32 = 300;

/// Bridge behavior knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BridgeConfig {
    /// Value change applied per encoder detent
    pub value_step: u8,
    /// Detents turned with the encoder button held that advance to the next device
    pub fast_turn_steps: u8,
    /// Window in which those detents must land
    pub fast_turn_window_ms: u32,
}

impl BridgeConfig {
    /// Configuration with the default values
    pub const fn new() -> Self {
        Self {
            value_step: DEFAULT_VALUE_STEP,
            fast_turn_steps: DEFAULT_FAST_TURN_STEPS,
            fast_turn_window_ms: DEFAULT_FAST_TURN_WINDOW_MS,
        }
    }

    /// Signed value delta for one detent
    pub fn step_delta(&self, clockwise: bool) -> i16 {
        let step = i16::from(self.value_step.max(1));
        if clockwise {
            step
        } else {
            -step
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.value_step, 5);
        assert_eq!(config.fast_turn_steps, 2);
        assert_eq!(config.fast_turn_window_ms, 300);
    }

    #[test]
    fn test_step_delta_never_zero() {
        let config = BridgeConfig {
            value_step: 0,
            ..BridgeConfig::new()
        };
        assert_eq!(config.step_delta(true), 1);
        assert_eq!(config.step_delta(false), -1);
    }
}
