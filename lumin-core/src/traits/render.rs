//! Render sink for the display collaborator

use lumin_protocol::{Device, DeviceCategory};

/// Category artwork picked from the current value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Icon {
    /// Speaker with sound waves
    Volume,
    /// Crossed-out speaker
    VolumeMuted,
    /// Full sun
    Brightness,
    /// Hollow sun
    BrightnessOff,
}

/// Read-only view of the menu at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuSnapshot<'a> {
    /// Active category
    pub category: DeviceCategory,
    /// Device under the cursor, `None` if the category is empty
    pub device: Option<&'a Device>,
    /// 1-based cursor position, 0 when there is no device
    pub position: usize,
    /// Devices in the active category
    pub count: usize,
}

impl MenuSnapshot<'_> {
    /// Artwork for the active category
    pub fn icon(&self) -> Icon {
        let silent = self.device.map_or(true, |device| device.value == 0);
        match (self.category, silent) {
            (DeviceCategory::Volume, false) => Icon::Volume,
            (DeviceCategory::Volume, true) => Icon::VolumeMuted,
            (DeviceCategory::Brightness, false) => Icon::Brightness,
            (DeviceCategory::Brightness, true) => Icon::BrightnessOff,
        }
    }
}

/// Display collaborator
///
/// Only invoked when a redraw was requested. Implementations must treat
/// the snapshot as read-only input and draw nothing else.
pub trait RenderSink {
    /// Error type for render operations
    type Error;

    /// Draw the menu
    fn render(&mut self, snapshot: &MenuSnapshot<'_>) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(category: DeviceCategory, device: Option<&Device>) -> MenuSnapshot<'_> {
        MenuSnapshot {
            category,
            device,
            position: device.map_or(0, |_| 1),
            count: device.map_or(0, |_| 1),
        }
    }

    #[test]
    fn test_icon_follows_value() {
        let loud = Device::new("DAC", 0, 40, DeviceCategory::Volume);
        let muted = Device::new("DAC", 0, 0, DeviceCategory::Volume);
        assert_eq!(snapshot(DeviceCategory::Volume, Some(&loud)).icon(), Icon::Volume);
        assert_eq!(snapshot(DeviceCategory::Volume, Some(&muted)).icon(), Icon::VolumeMuted);

        let lit = Device::new("Monitor", 0, 80, DeviceCategory::Brightness);
        assert_eq!(snapshot(DeviceCategory::Brightness, Some(&lit)).icon(), Icon::Brightness);
    }

    #[test]
    fn test_icon_without_device() {
        assert_eq!(snapshot(DeviceCategory::Brightness, None).icon(), Icon::BrightnessOff);
    }
}
