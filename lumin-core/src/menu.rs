//! Menu navigator
//!
//! The mutation surface for local input. Every operation is total: an empty
//! category turns value edits and device cycling into no-ops instead of
//! indexing past the populated slots.

use lumin_protocol::{ValueReport, MAX_VALUE};

use crate::state::BridgeState;

/// Borrowed handle that applies user actions to the bridge state
pub struct MenuNavigator<'a> {
    state: &'a mut BridgeState,
}

impl<'a> MenuNavigator<'a> {
    pub(crate) fn new(state: &'a mut BridgeState) -> Self {
        Self { state }
    }

    /// Advance to the next category, wrapping around
    pub fn select_next_category(&mut self) {
        let next = self.state.selection.active().next();
        self.state.selection.set_active(next);
        debug!("Menu: {:?}", next);
        self.state.request_redraw();
    }

    /// Advance the cursor of the active category, wrapping around
    ///
    /// Returns `false` (and does nothing) if the category is empty.
    pub fn select_next_device(&mut self) -> bool {
        let category = self.state.selection.active();
        let count = self.state.matrix.count(category);
        if count == 0 {
            return false;
        }

        let next = (self.state.selection.selected(category) + 1) % count;
        self.state.selection.set_selected(category, next);
        debug!("Device {} of {}", next + 1, count);
        self.state.request_redraw();
        true
    }

    /// Add `delta` to the selected device's value, clamped to 0-100
    ///
    /// Returns whether the value actually changed.
    pub fn adjust_value(&mut self, delta: i16) -> bool {
        let Some((_, device)) = self.state.selected_device_mut() else {
            return false;
        };

        let old = device.value;
        let new = i16::from(old)
            .saturating_add(delta)
            .clamp(0, i16::from(MAX_VALUE)) as u8;
        if new == old {
            return false;
        }

        device.value = new;
        trace!("Value {} -> {}", old, new);
        self.state.request_redraw();
        true
    }

    /// Mute the selected device, or restore the value it had before
    ///
    /// Returns the report to send upstream, or `None` if the category is
    /// empty.
    pub fn toggle_mute(&mut self) -> Option<ValueReport> {
        let category = self.state.selection.active();
        let slot = self.state.selected_slot()?;

        let state = &mut *self.state;
        let device = state.matrix.get_mut(category, slot)?;
        if device.value != 0 {
            state.shadow.set(category, slot, device.value);
            device.value = 0;
        } else {
            device.value = state.shadow.take(category, slot);
        }

        let report = ValueReport::for_device(device);
        debug!("Mute toggled, value now {}", report.value);
        state.request_redraw();
        Some(report)
    }
}
