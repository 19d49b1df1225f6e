//! Packet types carried inside frames
//!
//! Packet direction:
//! - Host → Firmware: ResetDeviceMatrix, FullSync, DeltaUpdate
//! - Firmware → Host: ValueReport
//!
//! Parsing reads every field from its declared offset and validates it;
//! no payload is ever cast to a structure.

use crate::device::{
    Device, DeviceCategory, RecordError, DEVICE_RECORD_SIZE, MAX_VALUE,
};
use crate::frame::{Frame, FrameError, FRAME_START, MAX_PAYLOAD_SIZE};
use heapless::Vec;

// Packet tags: Host → Firmware
pub const TAG_RESET_DEVICE_MATRIX: u8 = 0x00;
pub const TAG_FULL_SYNC: u8 = 0x01;
pub const TAG_DELTA_UPDATE: u8 = 0x02;

// Packet tags: Firmware → Host
pub const TAG_VALUE_REPORT: u8 = 0x10;

/// Bytes in front of the device list of a FullSync
const FULL_SYNC_HEADER: usize = 2;

/// Most device records a single FullSync frame can carry
pub const MAX_SYNC_RECORDS: usize = (MAX_PAYLOAD_SIZE - FULL_SYNC_HEADER) / DEVICE_RECORD_SIZE;

/// Size of a ValueReport payload
pub const VALUE_REPORT_SIZE: usize = 4;

/// Size of a framed ValueReport on the wire
pub const VALUE_REPORT_FRAME_SIZE: usize = 2 + VALUE_REPORT_SIZE;

/// Known packet tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketType {
    /// Clear the whole matrix
    ResetDeviceMatrix,
    /// Replace the whole matrix
    FullSync,
    /// Upsert a single device
    DeltaUpdate,
    /// Locally changed value
    ValueReport,
}

impl PacketType {
    /// Parse a tag byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            TAG_RESET_DEVICE_MATRIX => Some(PacketType::ResetDeviceMatrix),
            TAG_FULL_SYNC => Some(PacketType::FullSync),
            TAG_DELTA_UPDATE => Some(PacketType::DeltaUpdate),
            TAG_VALUE_REPORT => Some(PacketType::ValueReport),
            _ => None,
        }
    }

    /// Convert to tag byte
    pub fn to_byte(self) -> u8 {
        match self {
            PacketType::ResetDeviceMatrix => TAG_RESET_DEVICE_MATRIX,
            PacketType::FullSync => TAG_FULL_SYNC,
            PacketType::DeltaUpdate => TAG_DELTA_UPDATE,
            PacketType::ValueReport => TAG_VALUE_REPORT,
        }
    }
}

/// Errors raised while interpreting a frame payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketError {
    /// Zero-length payload, no tag to dispatch on
    Empty,
    /// Tag byte is not a known packet type
    UnknownTag(u8),
    /// Payload shorter than the packet layout requires
    Truncated(PacketType),
    /// Category byte outside the known set
    InvalidCategory(u8),
}

impl From<RecordError> for PacketError {
    fn from(e: RecordError) -> Self {
        match e {
            RecordError::Truncated => PacketError::Truncated(PacketType::DeltaUpdate),
            RecordError::UnknownCategory(byte) => PacketError::InvalidCategory(byte),
        }
    }
}

/// Firmware-originated value change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ValueReport {
    /// Device id within its category
    pub id: u8,
    /// New value (0-100)
    pub value: u8,
    /// Device category
    pub category: DeviceCategory,
}

impl ValueReport {
    /// Report for the current state of `device`
    pub fn for_device(device: &Device) -> Self {
        Self {
            id: device.id,
            value: device.value,
            category: device.category,
        }
    }

    /// Payload bytes: `[tag, id, value, category]`
    pub fn to_bytes(&self) -> [u8; VALUE_REPORT_SIZE] {
        [
            TAG_VALUE_REPORT,
            self.id,
            self.value,
            self.category.to_byte(),
        ]
    }

    /// Complete wire bytes: marker, length and payload
    pub fn encode_frame(&self) -> [u8; VALUE_REPORT_FRAME_SIZE] {
        let mut frame = [0u8; VALUE_REPORT_FRAME_SIZE];
        frame[0] = FRAME_START;
        frame[1] = VALUE_REPORT_SIZE as u8;
        frame[2..].copy_from_slice(&self.to_bytes());
        frame
    }

    /// Encode this report into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        Frame::new(&self.to_bytes())
    }
}

/// Borrowed view over the device records of a FullSync payload
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceRecords<'a> {
    records: &'a [u8],
    declared: u8,
}

impl<'a> DeviceRecords<'a> {
    /// Device count claimed by the sender
    pub fn declared_count(&self) -> u8 {
        self.declared
    }

    /// Records actually present and about to be yielded
    pub fn len(&self) -> usize {
        (self.records.len() / DEVICE_RECORD_SIZE).min(self.declared as usize)
    }

    /// True if no records will be yielded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The sender claimed more records than the payload carries
    pub fn is_truncated(&self) -> bool {
        self.len() < self.declared as usize
    }

    /// Iterate the records in packet order
    pub fn iter(&self) -> impl Iterator<Item = Result<Device, RecordError>> + 'a {
        self.records
            .chunks_exact(DEVICE_RECORD_SIZE)
            .take(self.declared as usize)
            .map(Device::decode)
    }
}

/// A decoded packet
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Packet<'a> {
    /// Clear every category
    ResetDeviceMatrix,
    /// Authoritative replacement of the matrix
    FullSync(DeviceRecords<'a>),
    /// Upsert of one device
    DeltaUpdate(Device),
    /// Value change (normally firmware → host only)
    ValueReport(ValueReport),
}

impl<'a> Packet<'a> {
    /// Parse a packet from a frame payload
    pub fn parse(payload: &'a [u8]) -> Result<Self, PacketError> {
        let (&tag, body) = payload.split_first().ok_or(PacketError::Empty)?;
        let packet_type = PacketType::from_byte(tag).ok_or(PacketError::UnknownTag(tag))?;

        match packet_type {
            PacketType::ResetDeviceMatrix => Ok(Packet::ResetDeviceMatrix),
            PacketType::FullSync => {
                let (&declared, records) = body
                    .split_first()
                    .ok_or(PacketError::Truncated(PacketType::FullSync))?;
                Ok(Packet::FullSync(DeviceRecords { records, declared }))
            }
            PacketType::DeltaUpdate => Ok(Packet::DeltaUpdate(Device::decode(body)?)),
            PacketType::ValueReport => {
                if body.len() < VALUE_REPORT_SIZE - 1 {
                    return Err(PacketError::Truncated(PacketType::ValueReport));
                }
                let category = DeviceCategory::from_byte(body[2])
                    .ok_or(PacketError::InvalidCategory(body[2]))?;
                Ok(Packet::ValueReport(ValueReport {
                    id: body[0],
                    value: body[1].min(MAX_VALUE),
                    category,
                }))
            }
        }
    }

    /// Tag of this packet
    pub fn packet_type(&self) -> PacketType {
        match self {
            Packet::ResetDeviceMatrix => PacketType::ResetDeviceMatrix,
            Packet::FullSync(_) => PacketType::FullSync,
            Packet::DeltaUpdate(_) => PacketType::DeltaUpdate,
            Packet::ValueReport(_) => PacketType::ValueReport,
        }
    }

    /// Build a ResetDeviceMatrix frame
    pub fn reset_frame() -> Frame {
        let mut payload = Vec::new();
        // Cannot fail: capacity is well above one byte
        let _ = payload.push(TAG_RESET_DEVICE_MATRIX);
        Frame { payload }
    }

    /// Build a FullSync frame listing `devices` in order
    ///
    /// Fails with [`FrameError::PayloadTooLarge`] if more than
    /// [`MAX_SYNC_RECORDS`] devices are given.
    pub fn full_sync_frame(devices: &[Device]) -> Result<Frame, FrameError> {
        if devices.len() > MAX_SYNC_RECORDS {
            return Err(FrameError::PayloadTooLarge);
        }

        let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
        payload
            .extend_from_slice(&[TAG_FULL_SYNC, devices.len() as u8])
            .map_err(|_| FrameError::PayloadTooLarge)?;
        for device in devices {
            payload
                .extend_from_slice(&device.encode())
                .map_err(|_| FrameError::PayloadTooLarge)?;
        }
        Ok(Frame { payload })
    }

    /// Build a DeltaUpdate frame for `device`
    pub fn delta_update_frame(device: &Device) -> Result<Frame, FrameError> {
        let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
        payload
            .push(TAG_DELTA_UPDATE)
            .map_err(|_| FrameError::PayloadTooLarge)?;
        payload
            .extend_from_slice(&device.encode())
            .map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Frame { payload })
    }
}
