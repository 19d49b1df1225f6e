//! Menu screen layout

use core::fmt::Write;

use heapless::String;
use lumin_core::traits::{MenuSnapshot, RenderSink};

use crate::backend::{DisplayBackend, DisplayError};
use crate::screen::{Screen, LINE_LEN};

/// Text shown while the bridge starts
pub const SPLASH_TEXT: &str = "LUMIN BRIDGE";

/// Lay out `snapshot` on `screen`
///
/// ```text
/// Menu: Volume        [icon]
/// Device 1/2:
/// Speakers
/// Value: 45 %
/// ```
pub fn compose(snapshot: &MenuSnapshot<'_>, screen: &mut Screen) {
    screen.clear();

    let mut line: String<LINE_LEN> = String::new();
    // Lines are sized so these never overflow; a cut line is still fine
    let _ = write!(line, "Menu: {}", snapshot.category.label());
    screen.set_line(0, &line);

    line.clear();
    let _ = write!(line, "Device {}/{}:", snapshot.position, snapshot.count);
    screen.set_line(1, &line);

    match snapshot.device {
        Some(device) => {
            screen.set_line(2, &device.name);
            line.clear();
            let _ = write!(line, "Value: {} %", device.value);
            screen.set_line(3, &line);
        }
        None => screen.set_line(2, "No devices"),
    }

    screen.set_icon(Some(snapshot.icon()));
}

/// Lay out the startup splash on `screen`
pub fn compose_splash(screen: &mut Screen) {
    screen.clear();
    let mut line: String<LINE_LEN> = String::new();
    let pad = (LINE_LEN - SPLASH_TEXT.len()) / 2;
    for _ in 0..pad {
        let _ = line.push(' ');
    }
    let _ = line.push_str(SPLASH_TEXT);
    screen.set_line(1, &line);
}

/// Render sink that draws the menu through a [`DisplayBackend`]
pub struct ScreenRenderer<B> {
    backend: B,
    screen: Screen,
}

impl<B: DisplayBackend> ScreenRenderer<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            screen: Screen::new(),
        }
    }

    /// Draw the splash screen
    pub fn splash(&mut self) -> Result<(), DisplayError> {
        compose_splash(&mut self.screen);
        self.screen.draw(&mut self.backend)
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: DisplayBackend> RenderSink for ScreenRenderer<B> {
    type Error = DisplayError;

    fn render(&mut self, snapshot: &MenuSnapshot<'_>) -> Result<(), DisplayError> {
        compose(snapshot, &mut self.screen);
        self.screen.draw(&mut self.backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumin_core::traits::Icon;
    use lumin_protocol::{Device, DeviceCategory};

    #[derive(Default)]
    struct Recorder {
        text: heapless::Vec<(u8, String<LINE_LEN>), 8>,
        icon: Option<Icon>,
        flushes: usize,
    }

    impl DisplayBackend for Recorder {
        fn clear(&mut self) -> Result<(), DisplayError> {
            self.text.clear();
            self.icon = None;
            Ok(())
        }

        fn draw_text(&mut self, row: u8, _col: u8, text: &str) -> Result<(), DisplayError> {
            let line = String::try_from(text).map_err(|_| DisplayError::InvalidCoordinates)?;
            self.text
                .push((row, line))
                .map_err(|_| DisplayError::InvalidCoordinates)
        }

        fn draw_icon(&mut self, icon: Icon) -> Result<(), DisplayError> {
            self.icon = Some(icon);
            Ok(())
        }

        fn flush(&mut self) -> Result<(), DisplayError> {
            self.flushes += 1;
            Ok(())
        }

        fn dimensions(&self) -> (u8, u8) {
            (21, 4)
        }
    }

    struct Offline;

    impl DisplayBackend for Offline {
        fn clear(&mut self) -> Result<(), DisplayError> {
            Err(DisplayError::Communication)
        }

        fn draw_text(&mut self, _: u8, _: u8, _: &str) -> Result<(), DisplayError> {
            Err(DisplayError::Communication)
        }

        fn draw_icon(&mut self, _: Icon) -> Result<(), DisplayError> {
            Err(DisplayError::Communication)
        }

        fn flush(&mut self) -> Result<(), DisplayError> {
            Err(DisplayError::Communication)
        }

        fn dimensions(&self) -> (u8, u8) {
            (21, 4)
        }
    }

    #[test]
    fn test_compose_device() {
        let device = Device::new("Speakers", 1, 45, DeviceCategory::Volume);
        let snapshot = MenuSnapshot {
            category: DeviceCategory::Volume,
            device: Some(&device),
            position: 1,
            count: 2,
        };
        let mut screen = Screen::new();
        compose(&snapshot, &mut screen);

        let lines: heapless::Vec<&str, 4> = screen.lines().collect();
        assert_eq!(&lines[..], &["Menu: Volume", "Device 1/2:", "Speakers", "Value: 45 %"]);
        assert_eq!(screen.icon(), Some(Icon::Volume));
    }

    #[test]
    fn test_compose_empty_category() {
        let snapshot = MenuSnapshot {
            category: DeviceCategory::Brightness,
            device: None,
            position: 0,
            count: 0,
        };
        let mut screen = Screen::new();
        compose(&snapshot, &mut screen);

        assert_eq!(screen.get_line(0), Some("Menu: Brightness"));
        assert_eq!(screen.get_line(1), Some("Device 0/0:"));
        assert_eq!(screen.get_line(2), Some("No devices"));
        assert_eq!(screen.get_line(3), Some(""));
        assert_eq!(screen.icon(), Some(Icon::BrightnessOff));
    }

    #[test]
    fn test_splash_is_centered() {
        let mut screen = Screen::new();
        compose_splash(&mut screen);
        assert_eq!(screen.get_line(1), Some("    LUMIN BRIDGE"));
    }

    #[test]
    fn test_renderer_draws_and_flushes() {
        let device = Device::new("Monitor", 3, 0, DeviceCategory::Brightness);
        let snapshot = MenuSnapshot {
            category: DeviceCategory::Brightness,
            device: Some(&device),
            position: 1,
            count: 1,
        };
        let mut renderer = ScreenRenderer::new(Recorder::default());
        renderer.render(&snapshot).unwrap();

        let backend = renderer.backend_mut();
        assert_eq!(backend.flushes, 1);
        assert_eq!(backend.icon, Some(Icon::BrightnessOff));
        assert_eq!(backend.text.len(), 4);
        assert_eq!(backend.text[3].1.as_str(), "Value: 0 %");
        assert!(!renderer.screen().is_dirty());
    }

    #[test]
    fn test_renderer_reports_bus_errors() {
        let mut renderer = ScreenRenderer::new(Offline);
        assert_eq!(renderer.splash(), Err(DisplayError::Communication));
        assert!(renderer.screen().is_dirty());
    }
}
