//! Screen buffer
//!
//! Four text rows on a 128x64 panel with a 6x10 font, plus one status icon.

use heapless::String;
use lumin_core::traits::Icon;

use crate::backend::{DisplayBackend, DisplayError};

/// Number of character rows
pub const SCREEN_ROWS: usize = 4;

/// Number of character columns
pub const SCREEN_COLS: usize = 21;

/// Maximum bytes per line
pub const LINE_LEN: usize = SCREEN_COLS;

/// Character screen with a status icon
#[derive(Clone)]
pub struct Screen {
    lines: [String<LINE_LEN>; SCREEN_ROWS],
    icon: Option<Icon>,
    dirty: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    /// Create a new empty screen
    pub fn new() -> Self {
        Self {
            lines: core::array::from_fn(|_| String::new()),
            icon: None,
            dirty: true,
        }
    }

    /// Clear text and icon
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
        self.icon = None;
        self.dirty = true;
    }

    /// Set the content of a specific row
    ///
    /// Text longer than a line is cut at the last character that fits.
    pub fn set_line(&mut self, row: usize, text: &str) {
        let Some(line) = self.lines.get_mut(row) else {
            return;
        };
        line.clear();
        for c in text.chars() {
            if line.push(c).is_err() {
                break;
            }
        }
        self.dirty = true;
    }

    /// Get the content of a specific row
    pub fn get_line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(|s| s.as_str())
    }

    pub fn set_icon(&mut self, icon: Option<Icon>) {
        self.icon = icon;
        self.dirty = true;
    }

    pub fn icon(&self) -> Option<Icon> {
        self.icon
    }

    /// Check if screen needs redrawing
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark screen as clean (after rendering)
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Get all lines as an iterator
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|s| s.as_str())
    }

    /// Draw the whole screen to `backend` and flush it
    pub fn draw<B: DisplayBackend>(&mut self, backend: &mut B) -> Result<(), DisplayError> {
        backend.clear()?;
        for (row, line) in self.lines.iter().enumerate() {
            if !line.is_empty() {
                backend.draw_text(row as u8, 0, line)?;
            }
        }
        if let Some(icon) = self.icon {
            backend.draw_icon(icon)?;
        }
        backend.flush()?;
        self.dirty = false;
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Screen {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Screen[");
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "{}", line.as_str());
        }
        defmt::write!(f, "]");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_line_is_cut() {
        let mut screen = Screen::new();
        screen.set_line(0, "abcdefghijklmnopqrstuvwxyz");
        assert_eq!(screen.get_line(0), Some("abcdefghijklmnopqrstu"));
    }

    #[test]
    fn test_cut_respects_char_boundaries() {
        let mut screen = Screen::new();
        // 10 two-byte characters plus one more do not fit in 21 bytes
        screen.set_line(1, "ééééééééééé");
        assert_eq!(screen.get_line(1), Some("éééééééééé"));
    }

    #[test]
    fn test_out_of_range_row_ignored() {
        let mut screen = Screen::new();
        screen.mark_clean();
        screen.set_line(SCREEN_ROWS, "nope");
        assert!(!screen.is_dirty());
    }

    #[test]
    fn test_clear() {
        let mut screen = Screen::new();
        screen.set_line(2, "x");
        screen.set_icon(Some(Icon::Volume));
        screen.clear();
        assert!(screen.lines().all(str::is_empty));
        assert_eq!(screen.icon(), None);
    }
}
