//! Process-wide bridge state
//!
//! One [`BridgeState`] is built at startup and lives for the whole run. The
//! packet dispatcher (host-driven) and the menu navigator (user-driven) both
//! mutate it, always from the main loop.

pub mod matrix;
pub mod selection;

pub use matrix::{DeviceMatrix, Upsert};
pub use selection::{MuteShadow, Selection};

use lumin_protocol::{Device, DeviceCategory};

use crate::menu::MenuNavigator;
use crate::traits::MenuSnapshot;

/// Device cache, menu cursor and mute memory
#[derive(Debug, Clone)]
pub struct BridgeState {
    pub(crate) matrix: DeviceMatrix,
    pub(crate) selection: Selection,
    pub(crate) shadow: MuteShadow,
    redraw: bool,
}

impl Default for BridgeState {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgeState {
    /// Empty cache with a redraw already pending for the first frame
    pub fn new() -> Self {
        Self {
            matrix: DeviceMatrix::new(),
            selection: Selection::new(),
            shadow: MuteShadow::new(),
            redraw: true,
        }
    }

    /// Cached devices
    pub fn matrix(&self) -> &DeviceMatrix {
        &self.matrix
    }

    /// Menu cursor
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Mute memory
    pub fn shadow(&self) -> &MuteShadow {
        &self.shadow
    }

    /// Category shown in the menu
    pub fn active_category(&self) -> DeviceCategory {
        self.selection.active()
    }

    /// Cursor of the active category, if it has any device
    pub fn selected_slot(&self) -> Option<usize> {
        let category = self.selection.active();
        let slot = self.selection.selected(category);
        (slot < self.matrix.count(category)).then_some(slot)
    }

    /// Device under the cursor
    pub fn selected_device(&self) -> Option<&Device> {
        let slot = self.selected_slot()?;
        self.matrix.get(self.selection.active(), slot)
    }

    pub(crate) fn selected_device_mut(&mut self) -> Option<(usize, &mut Device)> {
        let slot = self.selected_slot()?;
        let category = self.selection.active();
        self.matrix.get_mut(category, slot).map(|device| (slot, device))
    }

    /// Ask for the display to be refreshed
    pub fn request_redraw(&mut self) {
        self.redraw = true;
    }

    /// True if a redraw was requested and not yet taken
    pub fn redraw_pending(&self) -> bool {
        self.redraw
    }

    /// Consume the pending redraw request
    pub fn take_redraw(&mut self) -> bool {
        core::mem::replace(&mut self.redraw, false)
    }

    /// Forget every device, cursor position and muted value
    ///
    /// The active category is kept. Idempotent.
    pub fn reset(&mut self) {
        self.matrix.clear();
        self.selection.reset_cursors();
        self.shadow.clear();
        self.request_redraw();
    }

    /// What the display should show right now
    pub fn snapshot(&self) -> MenuSnapshot<'_> {
        let category = self.selection.active();
        let count = self.matrix.count(category);
        let device = self.selected_device();
        MenuSnapshot {
            category,
            device,
            position: device.map_or(0, |_| self.selection.selected(category) + 1),
            count,
        }
    }

    /// Local-input mutation surface
    pub fn navigator(&mut self) -> MenuNavigator<'_> {
        MenuNavigator::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> BridgeState {
        let mut state = BridgeState::new();
        state
            .matrix
            .push(Device::new("Realtek Audio", 0, 45, DeviceCategory::Volume))
            .unwrap();
        state
            .matrix
            .push(Device::new("USB DAC", 1, 60, DeviceCategory::Volume))
            .unwrap();
        state
    }

    #[test]
    fn test_new_state_wants_first_draw() {
        let mut state = BridgeState::new();
        assert!(state.take_redraw());
        assert!(!state.take_redraw());
    }

    #[test]
    fn test_selected_device_empty_category() {
        let state = BridgeState::new();
        assert_eq!(state.selected_slot(), None);
        assert!(state.selected_device().is_none());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut state = populated();
        state.selection.set_selected(DeviceCategory::Volume, 1);
        state.shadow.set(DeviceCategory::Volume, 1, 60);
        state.take_redraw();

        state.reset();
        assert!(state.matrix().is_empty());
        assert_eq!(state.selection().selected(DeviceCategory::Volume), 0);
        assert_eq!(state.shadow().get(DeviceCategory::Volume, 1), 0);
        assert!(state.redraw_pending());

        // Idempotent
        state.reset();
        assert!(state.matrix().is_empty());
    }

    #[test]
    fn test_snapshot_position() {
        let mut state = populated();
        state.selection.set_selected(DeviceCategory::Volume, 1);
        let snapshot = state.snapshot();
        assert_eq!(snapshot.category, DeviceCategory::Volume);
        assert_eq!(snapshot.position, 2);
        assert_eq!(snapshot.count, 2);
        assert_eq!(snapshot.device.map(|d| d.name.as_str()), Some("USB DAC"));
    }

    #[test]
    fn test_snapshot_without_devices() {
        let state = BridgeState::new();
        let snapshot = state.snapshot();
        assert!(snapshot.device.is_none());
        assert_eq!(snapshot.position, 0);
        assert_eq!(snapshot.count, 0);
    }
}
