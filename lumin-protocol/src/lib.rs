//! Lumin Bridge serial protocol
//!
//! This crate defines the link between the host process (which owns the
//! real device list) and the encoder firmware (which caches it).
//!
//! # Protocol Overview
//!
//! The link starts in text mode. The host sends the handshake phrase
//! `HELLO_LUMIN`; the firmware answers `LUMIN_ACK` and only then starts
//! honoring binary frames:
//! ```text
//! ┌────────┬────────┬──────┬──────────────┐
//! │ MARKER │ LENGTH │ TAG  │ BODY         │
//! │ 0xAA   │ 1B     │ 1B   │ 0–249B       │
//! └────────┴────────┴──────┴──────────────┘
//!            \_______ LENGTH bytes ______/
//! ```
//!
//! There is no checksum and no acknowledgement. A corrupted frame costs at
//! most itself: the decoder always falls back to hunting for the next
//! marker byte.

#![no_std]
#![deny(unsafe_code)]

pub mod device;
pub mod frame;
pub mod handshake;
pub mod packets;

pub use device::{
    Device, DeviceCategory, RecordError, CATEGORY_COUNT, DEVICE_RECORD_SIZE, MAX_DEVICES_PER_CATEGORY,
    MAX_NAME_LEN, MAX_VALUE,
};
pub use frame::{Frame, FrameDecoder, FrameError, FRAME_START, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use handshake::{Handshake, ACK_LINE, HANDSHAKE_PHRASE};
pub use packets::{
    DeviceRecords, Packet, PacketError, PacketType, ValueReport, MAX_SYNC_RECORDS,
    VALUE_REPORT_FRAME_SIZE,
};
