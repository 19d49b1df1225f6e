//! Display backend trait

use lumin_core::traits::Icon;

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus error talking to the panel
    Communication,
    /// Row or column outside the panel
    InvalidCoordinates,
    /// Panel not initialized
    NotInitialized,
}

/// Display backend trait
///
/// Text is addressed in character cells. Implementations draw into their
/// own buffer and push it to the panel on [`flush`](Self::flush).
pub trait DisplayBackend {
    /// Clear the entire display
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Draw text at the specified row and column
    ///
    /// - `row`: Row number (0-based)
    /// - `col`: Column number in characters (0-based)
    /// - `text`: Text to display, clipped at the right edge
    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError>;

    /// Draw the status icon in the top-right corner
    fn draw_icon(&mut self, icon: Icon) -> Result<(), DisplayError>;

    /// Flush buffered content to the display
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// Get the display dimensions
    ///
    /// Returns (columns, rows) in character units
    fn dimensions(&self) -> (u8, u8);
}

impl<T: DisplayBackend + ?Sized> DisplayBackend for &mut T {
    fn clear(&mut self) -> Result<(), DisplayError> {
        (**self).clear()
    }

    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
        (**self).draw_text(row, col, text)
    }

    fn draw_icon(&mut self, icon: Icon) -> Result<(), DisplayError> {
        (**self).draw_icon(icon)
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        (**self).flush()
    }

    fn dimensions(&self) -> (u8, u8) {
        (**self).dimensions()
    }
}
