//! Font header layout
//!
//! ```text
//! offset  field
//! 0-1     format code (big-endian)
//! 2       maximum glyph width
//! 3       glyph height in pixels
//! 4       first character code
//! 5       character count
//! 6-7     UTF-8 sub-header offset (formats 2-4 only)
//! 6 or 8  width table (proportional) or glyph data (fixed)
//! ```
//!
//! UTF-8 sub-header, relative to its own offset:
//!
//! ```text
//! 0-1     settings flags
//! 2       glyph width for fixed-width sections
//! 3-4     glyph count
//! 5..     glyph records: key (2|3) [width (1)] address (2|3)
//! ```

use super::source::FontSource;
use crate::error::FontError;

/// Format code field
pub const FONT_FORMAT: usize = 0;
/// Maximum character width
pub const FONT_WIDTH: usize = 2;
/// Font height in pixels
pub const FONT_HEIGHT: usize = 3;
/// Code of the first character
pub const FONT_FIRST_CHAR: usize = 4;
/// Number of characters
pub const FONT_CHAR_COUNT: usize = 5;
/// Start of the width table for fonts without a UTF-8 section
pub const FONT_WIDTH_TABLE: usize = 6;
/// Position of the UTF-8 sub-header pointer
pub const FONT_UTF8_HEADER_POS: usize = 6;
/// Extra header bytes carried by UTF-8 capable fonts
pub const FONT_UTF8_EXTRA_HEADER_LEN: usize = 2;

/// Settings flags within the UTF-8 sub-header
pub const UTF8_SETTINGS: usize = 0;
/// Fixed glyph width within the UTF-8 sub-header
pub const UTF8_GLYPH_WIDTH: usize = 2;
/// Glyph count within the UTF-8 sub-header
pub const UTF8_CHAR_COUNT: usize = 3;
/// First glyph record within the UTF-8 sub-header
pub const UTF8_GLYPH_TABLE: usize = 5;

const FLAG_FIXED_WIDTH: u16 = 1 << 0;
const FLAG_PADDING: u16 = 1 << 1;
const FLAG_EXTENSION_PLANES: u16 = 1 << 2;
const FLAG_WIDE_ADDRESSES: u16 = 1 << 3;

/// Decoded format code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FontFormat {
    /// Raw code from the header
    pub code: u16,
    /// Per-character widths instead of one fixed width
    pub proportional: bool,
    /// A UTF-8 sub-header follows the fixed header
    pub utf8: bool,
    /// Blank columns after each ASCII glyph
    pub letter_spacing: u8,
}

impl FontFormat {
    /// Decode a header format code
    ///
    /// Codes 0 and 1 are fixed width, 2 and 3 add a UTF-8 section, 4 is
    /// proportional with a UTF-8 section. Anything larger is a legacy
    /// proportional font whose field held a byte length.
    pub const fn from_code(code: u16) -> Self {
        Self {
            code,
            proportional: code > 3,
            utf8: code > 1 && code < 5,
            letter_spacing: if code == 1 || code == 3 { 0 } else { 1 },
        }
    }

    /// Offset of the width table, or of glyph data for fixed fonts
    pub const fn table_offset(&self) -> usize {
        if self.utf8 {
            FONT_WIDTH_TABLE + FONT_UTF8_EXTRA_HEADER_LEN
        } else {
            FONT_WIDTH_TABLE
        }
    }
}

/// UTF-8 section settings flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Utf8Settings {
    /// All glyphs share the sub-header width, records carry no width byte
    pub fixed_width: bool,
    /// One blank column after each glyph
    pub padding: bool,
    /// Codepoint keys are 3 bytes instead of 2
    pub extension_planes: bool,
    /// Glyph data addresses are 3 bytes instead of 2
    pub wide_addresses: bool,
}

impl Utf8Settings {
    /// Decode the settings word
    pub const fn from_bits(bits: u16) -> Self {
        Self {
            fixed_width: bits & FLAG_FIXED_WIDTH != 0,
            padding: bits & FLAG_PADDING != 0,
            extension_planes: bits & FLAG_EXTENSION_PLANES != 0,
            wide_addresses: bits & FLAG_WIDE_ADDRESSES != 0,
        }
    }

    /// Bytes per codepoint key
    pub const fn key_len(&self) -> usize {
        if self.extension_planes {
            3
        } else {
            2
        }
    }

    /// Bytes per glyph data address
    pub const fn addr_len(&self) -> usize {
        if self.wide_addresses {
            3
        } else {
            2
        }
    }

    /// Bytes per glyph record
    pub const fn record_len(&self) -> usize {
        self.key_len() + if self.fixed_width { 0 } else { 1 } + self.addr_len()
    }
}

/// Decoded UTF-8 sub-header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Utf8Header {
    /// Offset of the sub-header from the start of the font
    pub offset: usize,
    /// Record layout and padding flags
    pub settings: Utf8Settings,
    /// Width shared by all glyphs when `settings.fixed_width` is set
    pub glyph_width: u8,
    /// Number of glyph records
    pub glyph_count: u16,
}

impl Utf8Header {
    /// Read the sub-header pointed to by the main header
    pub fn read<S: FontSource + ?Sized>(source: &S) -> Result<Self, FontError> {
        if source.len() < FONT_UTF8_HEADER_POS + 2 {
            return Err(FontError::Truncated);
        }
        let offset = source.read_u16(FONT_UTF8_HEADER_POS) as usize;
        if offset + UTF8_GLYPH_TABLE > source.len() {
            return Err(FontError::Utf8HeaderOutOfRange);
        }
        Ok(Self {
            offset,
            settings: Utf8Settings::from_bits(source.read_u16(offset + UTF8_SETTINGS)),
            glyph_width: source.read_u8(offset + UTF8_GLYPH_WIDTH),
            glyph_count: source.read_u16(offset + UTF8_CHAR_COUNT),
        })
    }

    /// Offset of glyph record `index`
    pub const fn record_offset(&self, index: usize) -> usize {
        self.offset + UTF8_GLYPH_TABLE + index * self.settings.record_len()
    }

    /// Blank columns after each UTF-8 glyph
    pub const fn spacing(&self) -> u8 {
        if self.settings.padding {
            1
        } else {
            0
        }
    }
}
