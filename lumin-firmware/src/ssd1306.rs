//! SSD1306 OLED display driver
//!
//! Driver for 128x64 SSD1306 panels over blocking I2C. Drawing goes into a
//! page-organized frame buffer through `embedded-graphics`; `flush` pushes
//! the whole buffer in one transfer per page.

use core::convert::Infallible;

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use embedded_hal::i2c::I2c;
use lumin_core::traits::Icon;
use lumin_display::{DisplayBackend, DisplayError, SCREEN_COLS, SCREEN_ROWS};

/// SSD1306 I2C address
const SSD1306_ADDR: u8 = 0x3C;

/// Display dimensions
const WIDTH: usize = 128;
const HEIGHT: usize = 64;
const PAGES: usize = HEIGHT / 8;

/// Character cell
const CHAR_WIDTH: i32 = 6;
const ROW_HEIGHT: i32 = 16;

/// Status icon position (top-right corner)
const ICON_X: usize = WIDTH - 8;
const ICON_Y: usize = 0;

/// SSD1306 commands
#[allow(dead_code)]
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_MEMORY_MODE: u8 = 0x20;
    pub const SET_COLUMN_ADDR: u8 = 0x21;
    pub const SET_PAGE_ADDR: u8 = 0x22;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

/// 8x8 icons, one byte per row, MSB on the left
mod glyph {
    pub const SPEAKER: [u8; 8] = [0x08, 0x18, 0xFA, 0xF9, 0xF9, 0xFA, 0x18, 0x08];
    pub const SPEAKER_MUTED: [u8; 8] = [0x08, 0x18, 0xF9, 0xFA, 0xFC, 0xFA, 0x19, 0x08];
    pub const SUN: [u8; 8] = [0x91, 0x42, 0x18, 0x3D, 0xBC, 0x18, 0x42, 0x89];
    pub const SUN_OFF: [u8; 8] = [0x00, 0x18, 0x24, 0x42, 0x42, 0x24, 0x18, 0x00];
}

/// SSD1306 OLED driver
pub struct Ssd1306<I2C> {
    i2c: I2C,
    /// Frame buffer (1 bit per pixel, organized as pages)
    buffer: [[u8; WIDTH]; PAGES],
    ready: bool,
}

impl<I2C: I2c> Ssd1306<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            buffer: [[0; WIDTH]; PAGES],
            ready: false,
        }
    }

    /// Run the power-up sequence
    pub fn init(&mut self) -> Result<(), DisplayError> {
        let init_cmds: &[u8] = &[
            cmd::DISPLAY_OFF,
            cmd::SET_CLOCK_DIV,
            0x80,
            cmd::SET_MUX_RATIO,
            0x3F,
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::SET_CHARGE_PUMP,
            0x14,
            cmd::SET_MEMORY_MODE,
            0x00, // Horizontal addressing
            cmd::SET_SEG_REMAP,
            cmd::SET_COM_SCAN_DEC,
            cmd::SET_COM_PINS,
            0x12,
            cmd::SET_CONTRAST,
            0xCF,
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::SET_NORMAL,
            cmd::DISPLAY_ON,
        ];

        for &c in init_cmds {
            self.command(c)?;
        }
        self.ready = true;
        Ok(())
    }

    fn command(&mut self, cmd: u8) -> Result<(), DisplayError> {
        self.i2c
            .write(SSD1306_ADDR, &[0x00, cmd])
            .map_err(|_| DisplayError::Communication)
    }

    fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        if x >= WIDTH || y >= HEIGHT {
            return;
        }
        let bit = 1 << (y % 8);
        let cell = &mut self.buffer[y / 8][x];
        if on {
            *cell |= bit;
        } else {
            *cell &= !bit;
        }
    }

    fn blit(&mut self, x: usize, y: usize, rows: &[u8; 8]) {
        for (dy, row) in rows.iter().enumerate() {
            for dx in 0..8 {
                self.set_pixel(x + dx, y + dy, row & (0x80 >> dx) != 0);
            }
        }
    }
}

impl<I2C> OriginDimensions for Ssd1306<I2C> {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl<I2C: I2c> DrawTarget for Ssd1306<I2C> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<P>(&mut self, pixels: P) -> Result<(), Infallible>
    where
        P: IntoIterator<Item = Pixel<BinaryColor>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) {
                self.set_pixel(x, y, color.is_on());
            }
        }
        Ok(())
    }
}

impl<I2C: I2c> DisplayBackend for Ssd1306<I2C> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        for page in self.buffer.iter_mut() {
            page.fill(0);
        }
        Ok(())
    }

    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
        if usize::from(row) >= SCREEN_ROWS || usize::from(col) >= SCREEN_COLS {
            return Err(DisplayError::InvalidCoordinates);
        }

        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        let origin = Point::new(i32::from(col) * CHAR_WIDTH, i32::from(row) * ROW_HEIGHT);
        // Drawing into RAM cannot fail
        let _ = Text::with_baseline(text, origin, style, Baseline::Top).draw(self);
        Ok(())
    }

    fn draw_icon(&mut self, icon: Icon) -> Result<(), DisplayError> {
        let rows = match icon {
            Icon::Volume => &glyph::SPEAKER,
            Icon::VolumeMuted => &glyph::SPEAKER_MUTED,
            Icon::Brightness => &glyph::SUN,
            Icon::BrightnessOff => &glyph::SUN_OFF,
        };
        self.blit(ICON_X, ICON_Y, rows);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        if !self.ready {
            return Err(DisplayError::NotInitialized);
        }

        self.command(cmd::SET_COLUMN_ADDR)?;
        self.command(0)?;
        self.command((WIDTH - 1) as u8)?;
        self.command(cmd::SET_PAGE_ADDR)?;
        self.command(0)?;
        self.command((PAGES - 1) as u8)?;

        for page in 0..PAGES {
            let mut data = [0u8; WIDTH + 1];
            data[0] = 0x40; // Data mode
            data[1..].copy_from_slice(&self.buffer[page]);
            self.i2c
                .write(SSD1306_ADDR, &data)
                .map_err(|_| DisplayError::Communication)?;
        }

        Ok(())
    }

    fn dimensions(&self) -> (u8, u8) {
        (SCREEN_COLS as u8, SCREEN_ROWS as u8)
    }
}
