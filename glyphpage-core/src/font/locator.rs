//! Glyph lookup
//!
//! Resolves a character code or codepoint to a glyph width and the
//! address of its bitmap. Fixed fonts index directly, proportional fonts
//! sum the widths of every preceding character, and the UTF-8 section is
//! searched linearly by exact key match.

use super::source::FontSource;
use super::Font;

/// Location and shape of one glyph bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Glyph {
    /// Width in pixels, unmagnified
    pub width: u8,
    /// Display pages covered, unmagnified
    pub rows: u8,
    /// Offset of the bitmap from the start of the font, `None` for blanks
    pub data: Option<usize>,
    /// Right shift applied to the last page when height is not a multiple of 8
    pub shift: u8,
    /// Blank columns after the glyph
    pub padding: u8,
}

impl Glyph {
    /// A glyph with no bitmap that draws `width` blank columns
    pub const fn blank(width: u8, rows: u8, padding: u8) -> Self {
        Self {
            width,
            rows,
            data: None,
            shift: 0,
            padding,
        }
    }

    /// Columns consumed when drawn at `mag` magnification
    pub const fn advance(&self, mag: u8) -> u8 {
        self.width.saturating_mul(mag).saturating_add(self.padding)
    }

    /// Bitmap byte for column `col` of page `row`
    pub fn column<S: FontSource + ?Sized>(&self, source: &S, col: u8, row: u8) -> u8 {
        match self.data {
            Some(base) => {
                source.read_u8(base + col as usize + row as usize * self.width as usize)
            }
            None => 0,
        }
    }
}

/// Shift aligning the remainder bits of the last page to the top
const fn partial_row_shift(height: u8) -> u8 {
    if height & 7 != 0 {
        8 - (height & 7)
    } else {
        0
    }
}

impl<'a, S: FontSource + ?Sized> Font<'a, S> {
    /// Width of an ASCII-section character, unmagnified
    ///
    /// Returns 0 for codes outside `[first, first + count)`.
    pub fn char_width(&self, code: u8) -> u8 {
        if !self.contains(code) {
            return 0;
        }
        if self.format.proportional {
            let index = (code - self.first_char) as usize;
            self.source.read_u8(self.format.table_offset() + index)
        } else {
            self.max_width
        }
    }

    /// Locate an ASCII-section glyph
    pub fn glyph(&self, code: u8) -> Option<Glyph> {
        if !self.contains(code) {
            return None;
        }
        let index = (code - self.first_char) as usize;
        let rows = self.rows();
        let table = self.format.table_offset();

        let glyph = if self.format.proportional {
            // Widths of every preceding character, data follows the width table
            let mut prefix: u16 = 0;
            for i in 0..index {
                prefix = prefix.wrapping_add(self.source.read_u8(table + i) as u16);
            }
            Glyph {
                width: self.source.read_u8(table + index),
                rows,
                data: Some(table + self.char_count as usize + rows as usize * prefix as usize),
                shift: partial_row_shift(self.height),
                padding: self.format.letter_spacing,
            }
        } else {
            Glyph {
                width: self.max_width,
                rows,
                data: Some(table + rows as usize * self.max_width as usize * index),
                shift: 0,
                padding: self.format.letter_spacing,
            }
        };
        Some(glyph)
    }

    /// Blank glyph used to draw a space the font does not contain
    pub fn space_glyph(&self) -> Glyph {
        Glyph::blank(self.max_width, self.rows(), self.format.letter_spacing)
    }

    /// Locate a glyph in the UTF-8 section
    ///
    /// Records are scanned in table order and the first matching key wins.
    /// `None` means the codepoint is not in the font.
    pub fn utf8_glyph(&self, codepoint: u32) -> Option<Glyph> {
        let header = self.utf8?;
        let settings = header.settings;
        let record_len = settings.record_len();

        for i in 0..header.glyph_count as usize {
            let record = header.record_offset(i);
            let key = if settings.extension_planes {
                self.source.read_u24(record)
            } else {
                self.source.read_u16(record) as u32
            };
            if key != codepoint {
                continue;
            }

            let width = if settings.fixed_width {
                header.glyph_width
            } else {
                self.source.read_u8(record + settings.key_len())
            };
            let address = if settings.wide_addresses {
                self.source.read_u24(record + record_len - 3) as usize
            } else {
                self.source.read_u16(record + record_len - 2) as usize
            };
            let shift = if settings.fixed_width {
                0
            } else {
                partial_row_shift(self.height)
            };
            return Some(Glyph {
                width,
                rows: self.rows(),
                data: Some(address),
                shift,
                padding: header.spacing(),
            });
        }
        None
    }

    /// Width of a UTF-8 section glyph, 0 if absent
    pub fn utf8_width(&self, codepoint: u32) -> u8 {
        self.utf8_glyph(codepoint).map_or(0, |g| g.width)
    }
}
