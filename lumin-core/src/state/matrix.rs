//! Device matrix: one fixed-capacity row of devices per category
//!
//! A row's length is the category's populated count. Slots past it do not
//! exist as far as callers are concerned, so stale entries can never be
//! read back.

use heapless::Vec;
use lumin_protocol::{Device, DeviceCategory, CATEGORY_COUNT, MAX_DEVICES_PER_CATEGORY};

/// Outcome of an upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Upsert {
    /// A device with the same id was overwritten in place
    Updated(usize),
    /// The device was appended to a free slot
    Inserted(usize),
    /// Unknown id and the row is full
    Dropped,
}

/// Local cache of host devices, grouped by category
#[derive(Debug, Clone)]
pub struct DeviceMatrix {
    rows: [Vec<Device, MAX_DEVICES_PER_CATEGORY>; CATEGORY_COUNT],
}

impl Default for DeviceMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceMatrix {
    /// Create an empty matrix
    pub fn new() -> Self {
        Self {
            rows: core::array::from_fn(|_| Vec::new()),
        }
    }

    /// Drop every device in every category
    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.clear();
        }
    }

    /// Populated slots in `category`
    pub fn count(&self, category: DeviceCategory) -> usize {
        self.rows[category.index()].len()
    }

    /// Populated devices of `category` in slot order
    pub fn devices(&self, category: DeviceCategory) -> &[Device] {
        &self.rows[category.index()]
    }

    /// Total devices across all categories
    pub fn total(&self) -> usize {
        self.rows.iter().map(|row| row.len()).sum()
    }

    /// True if no category holds a device
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Device at `slot`, if populated
    pub fn get(&self, category: DeviceCategory, slot: usize) -> Option<&Device> {
        self.rows[category.index()].get(slot)
    }

    /// Mutable device at `slot`, if populated
    pub fn get_mut(&mut self, category: DeviceCategory, slot: usize) -> Option<&mut Device> {
        self.rows[category.index()].get_mut(slot)
    }

    /// Slot holding `id` in `category`
    pub fn find(&self, category: DeviceCategory, id: u8) -> Option<usize> {
        self.rows[category.index()]
            .iter()
            .position(|device| device.id == id)
    }

    /// Append `device` to the next free slot of its category
    ///
    /// Hands the device back if the row is already full.
    pub fn push(&mut self, device: Device) -> Result<usize, Device> {
        let row = &mut self.rows[device.category.index()];
        row.push(device)?;
        Ok(row.len() - 1)
    }

    /// Overwrite the device with the same id, or append it
    pub fn upsert(&mut self, device: Device) -> Upsert {
        if let Some(slot) = self.find(device.category, device.id) {
            let index = device.category.index();
            self.rows[index][slot] = device;
            return Upsert::Updated(slot);
        }

        match self.push(device) {
            Ok(slot) => Upsert::Inserted(slot),
            Err(_) => Upsert::Dropped,
        }
    }
}
