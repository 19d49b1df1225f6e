//! Display side of Lumin Bridge
//!
//! This crate provides:
//! - `DisplayBackend` trait for the panel driver
//! - `Screen`, a small character buffer with one status icon
//! - `compose`, which lays a `MenuSnapshot` out on a `Screen`
//! - `ScreenRenderer`, the `RenderSink` the firmware hands to the bridge
//!
//! The firmware owns the actual panel driver and implements
//! `DisplayBackend` for it; nothing here touches hardware.

#![no_std]

pub mod backend;
pub mod screen;
pub mod view;

pub use backend::{DisplayBackend, DisplayError};
pub use screen::{Screen, LINE_LEN, SCREEN_COLS, SCREEN_ROWS};
pub use view::{compose, compose_splash, ScreenRenderer, SPLASH_TEXT};
