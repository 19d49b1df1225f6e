//! Board-agnostic core logic for the Lumin Bridge firmware
//!
//! Everything that does not touch real hardware lives here:
//!
//! - Device matrix, menu cursor and mute memory
//! - Packet dispatch from the host
//! - Menu navigation driven by the encoder and button
//! - Value reports back to the host
//! - Serial link handling (handshake, then framed packets)
//! - Input classification and the cooperative bridge loop body

#![no_std]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to every module
mod fmt;

pub mod bridge;
pub mod config;
pub mod dispatch;
pub mod emitter;
pub mod input;
pub mod link;
pub mod menu;
pub mod state;
pub mod traits;

pub use bridge::Bridge;
pub use config::BridgeConfig;
pub use dispatch::{dispatch, Dispatch, Ignored, SyncSummary};
pub use input::{Direction, InputEvent, TurnClassifier};
pub use link::SerialLink;
pub use menu::MenuNavigator;
pub use state::{BridgeState, DeviceMatrix, Upsert};
