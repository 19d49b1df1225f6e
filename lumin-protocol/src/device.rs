//! Device records as they travel over the wire
//!
//! A record is a fixed 35-byte block:
//! ```text
//! ┌──────────────────────┬────┬───────┬──────────┐
//! │ NAME (NUL-padded)    │ ID │ VALUE │ CATEGORY │
//! │ 32B                  │ 1B │ 1B    │ 1B       │
//! └──────────────────────┴────┴───────┴──────────┘
//! ```
//! Every field is read from its declared offset and validated on its own;
//! nothing is reinterpreted in place.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Size of the NUL-padded name buffer on the wire
pub const NAME_FIELD_SIZE: usize = 32;

/// Maximum visible name length (one byte is reserved for the terminator)
pub const MAX_NAME_LEN: usize = NAME_FIELD_SIZE - 1;

/// Size of one encoded device record
pub const DEVICE_RECORD_SIZE: usize = NAME_FIELD_SIZE + 3;

/// Devices each category can hold
pub const MAX_DEVICES_PER_CATEGORY: usize = 8;

/// Number of device categories
pub const CATEGORY_COUNT: usize = 2;

/// Upper bound of a device value
pub const MAX_VALUE: u8 = 100;

const ID_OFFSET: usize = NAME_FIELD_SIZE;
const VALUE_OFFSET: usize = NAME_FIELD_SIZE + 1;
const CATEGORY_OFFSET: usize = NAME_FIELD_SIZE + 2;

/// Why a device record could not be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordError {
    /// Fewer than [`DEVICE_RECORD_SIZE`] bytes available
    Truncated,
    /// Category byte outside the known set
    UnknownCategory(u8),
}

/// Device category; each one has its own menu and slot table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DeviceCategory {
    /// Audio outputs
    #[default]
    Volume,
    /// Monitors
    Brightness,
}

impl DeviceCategory {
    /// All categories in menu order
    pub const ALL: [DeviceCategory; CATEGORY_COUNT] =
        [DeviceCategory::Volume, DeviceCategory::Brightness];

    /// Parse a category from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(DeviceCategory::Volume),
            1 => Some(DeviceCategory::Brightness),
            _ => None,
        }
    }

    /// Convert to wire byte
    pub fn to_byte(self) -> u8 {
        match self {
            DeviceCategory::Volume => 0,
            DeviceCategory::Brightness => 1,
        }
    }

    /// Row index into per-category tables
    pub const fn index(self) -> usize {
        match self {
            DeviceCategory::Volume => 0,
            DeviceCategory::Brightness => 1,
        }
    }

    /// The category after this one, wrapping around
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % CATEGORY_COUNT]
    }

    /// Menu title
    pub fn label(self) -> &'static str {
        match self {
            DeviceCategory::Volume => "Volume",
            DeviceCategory::Brightness => "Brightness",
        }
    }
}

/// One controllable endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Device {
    /// Display name
    pub name: String<MAX_NAME_LEN>,
    /// Identifier, unique within its category only
    pub id: u8,
    /// Current value (0-100)
    pub value: u8,
    /// Category the device belongs to
    pub category: DeviceCategory,
}

impl Device {
    /// Create a device, truncating the name and clamping the value
    pub fn new(name: &str, id: u8, value: u8, category: DeviceCategory) -> Self {
        Self {
            name: truncate_name(name.as_bytes()),
            id,
            value: value.min(MAX_VALUE),
            category,
        }
    }

    /// Decode a record from the first [`DEVICE_RECORD_SIZE`] bytes of `bytes`
    ///
    /// The name stops at the first NUL; values above [`MAX_VALUE`] are clamped.
    pub fn decode(bytes: &[u8]) -> Result<Self, RecordError> {
        if bytes.len() < DEVICE_RECORD_SIZE {
            return Err(RecordError::Truncated);
        }

        let category_byte = bytes[CATEGORY_OFFSET];
        let category = DeviceCategory::from_byte(category_byte)
            .ok_or(RecordError::UnknownCategory(category_byte))?;

        let name_field = &bytes[..MAX_NAME_LEN];
        let name_len = name_field
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(MAX_NAME_LEN);

        Ok(Self {
            name: truncate_name(&name_field[..name_len]),
            id: bytes[ID_OFFSET],
            value: bytes[VALUE_OFFSET].min(MAX_VALUE),
            category,
        })
    }

    /// Encode this device as a wire record
    pub fn encode(&self) -> [u8; DEVICE_RECORD_SIZE] {
        let mut record = [0u8; DEVICE_RECORD_SIZE];
        let name = self.name.as_bytes();
        record[..name.len()].copy_from_slice(name);
        record[ID_OFFSET] = self.id;
        record[VALUE_OFFSET] = self.value;
        record[CATEGORY_OFFSET] = self.category.to_byte();
        record
    }
}

/// Longest valid UTF-8 prefix of `bytes` that fits the name buffer
fn truncate_name(bytes: &[u8]) -> String<MAX_NAME_LEN> {
    let bytes = &bytes[..bytes.len().min(MAX_NAME_LEN)];
    let text = match core::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or(""),
    };

    let mut name = String::new();
    // Cannot fail: text is at most MAX_NAME_LEN bytes
    let _ = name.push_str(text);
    name
}
