//! Test fixtures: small font blobs and a controller model

use core::convert::Infallible;

use glyphpage_hal::{DisplayBus, WriteMode};
use heapless::Vec;

use crate::config::DeviceGeometry;
use crate::display::TextDisplay;
use crate::ssd1306 as cmd;

/// Columns of controller RAM (SH1106 has the most)
pub const RAM_COLUMNS: usize = 132;

pub mod fonts {
    /// Format 5, proportional, height 10, 'A'..='C' with widths 2, 3, 1
    pub const PROPORTIONAL: &[u8] = &[
        0x00, 0x05, 3, 10, b'A', 3, // header
        2, 3, 1, // widths
        0x81, 0x42, 0x03, 0x03, // 'A'
        0xFF, 0x01, 0xFF, 0x03, 0x02, 0x01, // 'B'
        0xAA, 0x03, // 'C'
    ];

    /// Format 4, proportional with a padded UTF-8 section: U+4E2D and U+00E9
    pub const UTF8_PROPORTIONAL: &[u8] = &[
        0x00, 0x04, 3, 8, b'A', 1, // header
        0x00, 0x0C, // UTF-8 header at 12
        3, // width of 'A'
        0x7E, 0x11, 0x7E, // 'A'
        0x00, 0x02, // padding
        0, // glyph width, unused
        0x00, 0x02, // 2 glyphs
        0x4E, 0x2D, 3, 0x00, 0x1B, // U+4E2D, width 3 at 27
        0x00, 0xE9, 2, 0x00, 0x1E, // U+00E9, width 2 at 30
        0x11, 0x7F, 0x11, // U+4E2D
        0x38, 0x55, // U+00E9
    ];

    /// Format 3, fixed width 4 with 3-byte keys and addresses: U+1F600
    pub const UTF8_FIXED: &[u8] = &[
        0x00, 0x03, 4, 8, b'A', 1, // header
        0x00, 0x0C, // UTF-8 header at 12
        0x7E, 0x11, 0x11, 0x7E, // 'A'
        0x00, 0x0D, // fixed width, 3-byte keys, 24-bit addresses
        4, // glyph width
        0x00, 0x01, // 1 glyph
        0x01, 0xF6, 0x00, 0x00, 0x00, 0x17, // U+1F600 at 23
        0x0F, 0x0F, 0xF0, 0xF0,
    ];
}

/// Page-mode controller model
///
/// Decodes column, page and start-line commands and stores data bytes in
/// a RAM image so tests can inspect what would be on the glass.
pub struct MockBus {
    pub ram: [[u8; RAM_COLUMNS]; 8],
    pub col: u8,
    pub page: u8,
    pub start_line: u8,
    pub contrast: u8,
    /// Every command byte, truncated once full
    pub commands: Vec<u8, 2048>,
    pending_arg: Option<u8>,
}

impl MockBus {
    pub fn new() -> Self {
        Self {
            ram: [[0; RAM_COLUMNS]; 8],
            col: 0,
            page: 0,
            start_line: 0,
            contrast: 0,
            commands: Vec::new(),
            pending_arg: None,
        }
    }

    /// RAM image of one page
    pub fn page(&self, page: usize) -> &[u8; RAM_COLUMNS] {
        &self.ram[page]
    }

    fn command(&mut self, c: u8) {
        let _ = self.commands.push(c);
        if let Some(op) = self.pending_arg.take() {
            if op == cmd::SET_CONTRAST {
                self.contrast = c;
            }
            return;
        }
        if cmd::takes_argument(c) {
            self.pending_arg = Some(c);
            return;
        }
        match c {
            0x00..=0x0F => self.col = (self.col & 0xF0) | c,
            0x10..=0x1F => self.col = (self.col & 0x0F) | ((c & 0x0F) << 4),
            0x40..=0x7F => self.start_line = c & 0x3F,
            0xB0..=0xB7 => self.page = c & 0x07,
            _ => {}
        }
    }
}

impl DisplayBus for MockBus {
    type Error = Infallible;

    fn write_byte(&mut self, value: u8, mode: WriteMode) -> Result<(), Infallible> {
        if mode.is_data() {
            if let Some(cell) = self.ram[self.page as usize].get_mut(self.col as usize) {
                *cell = value;
            }
            self.col = self.col.wrapping_add(1);
        } else {
            self.command(value);
        }
        Ok(())
    }
}

/// Display over a fresh [`MockBus`] with no init sequence or column offset
pub fn display(width: u8, height: u8) -> TextDisplay<'static, MockBus> {
    TextDisplay::new(MockBus::new(), DeviceGeometry::bare(width, height, 0))
}
