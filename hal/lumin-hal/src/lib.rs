//! Lumin Bridge Hardware Abstraction Layer
//!
//! Transport traits shared by the protocol core and the board firmware.
//! The core never touches a peripheral directly; it only sees a byte
//! source and a byte sink.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  lumin-core (link, dispatcher, menu)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  lumin-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  lumin-firmware (embassy-rp UART)       │
//! └─────────────────────────────────────────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod uart;

pub use uart::{SerialRx, SerialTx, UartConfig};
