//! Menu cursor and mute memory

use lumin_protocol::{DeviceCategory, CATEGORY_COUNT, MAX_DEVICES_PER_CATEGORY};

/// Active category plus one cursor per category
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Selection {
    active: DeviceCategory,
    selected: [usize; CATEGORY_COUNT],
}

impl Selection {
    /// First category, every cursor at slot 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Category shown in the menu
    pub fn active(&self) -> DeviceCategory {
        self.active
    }

    /// Cursor of `category`
    pub fn selected(&self, category: DeviceCategory) -> usize {
        self.selected[category.index()]
    }

    pub(crate) fn set_active(&mut self, category: DeviceCategory) {
        self.active = category;
    }

    pub(crate) fn set_selected(&mut self, category: DeviceCategory, slot: usize) {
        self.selected[category.index()] = slot;
    }

    /// Zero every cursor, keeping the active category
    pub(crate) fn reset_cursors(&mut self) {
        self.selected = [0; CATEGORY_COUNT];
    }
}

/// Value each slot had before it was muted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuteShadow {
    prior: [[u8; MAX_DEVICES_PER_CATEGORY]; CATEGORY_COUNT],
}

impl Default for MuteShadow {
    fn default() -> Self {
        Self::new()
    }
}

impl MuteShadow {
    /// Nothing remembered
    pub const fn new() -> Self {
        Self {
            prior: [[0; MAX_DEVICES_PER_CATEGORY]; CATEGORY_COUNT],
        }
    }

    /// Remembered value for a slot
    pub fn get(&self, category: DeviceCategory, slot: usize) -> u8 {
        self.prior[category.index()]
            .get(slot)
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn set(&mut self, category: DeviceCategory, slot: usize, value: u8) {
        if let Some(prior) = self.prior[category.index()].get_mut(slot) {
            *prior = value;
        }
    }

    /// Remembered value for a slot, leaving zero behind
    pub(crate) fn take(&mut self, category: DeviceCategory, slot: usize) -> u8 {
        self.prior[category.index()]
            .get_mut(slot)
            .map(core::mem::take)
            .unwrap_or(0)
    }

    pub(crate) fn clear(&mut self) {
        self.prior = [[0; MAX_DEVICES_PER_CATEGORY]; CATEGORY_COUNT];
    }
}
