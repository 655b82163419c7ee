//! Binary font tables
//!
//! A [`Font`] is a borrowed, read-only view of a font blob with its header
//! decoded once at bind time. Glyph lookup lives in [`locator`].

pub mod header;
pub mod locator;
pub mod source;
pub mod system5x7;

use core::fmt;

pub use header::{FontFormat, Utf8Header, Utf8Settings};
pub use locator::Glyph;
pub use source::FontSource;
pub use system5x7::SYSTEM_5X7;

use crate::error::FontError;
use header::{FONT_CHAR_COUNT, FONT_FIRST_CHAR, FONT_FORMAT, FONT_HEIGHT, FONT_WIDTH};

/// Size of the fixed header every font carries
pub const FONT_HEADER_LEN: usize = 6;

/// A bound font table
pub struct Font<'a, S: FontSource + ?Sized = [u8]> {
    source: &'a S,
    format: FontFormat,
    max_width: u8,
    height: u8,
    first_char: u8,
    char_count: u8,
    utf8: Option<Utf8Header>,
}

impl<'a, S: FontSource + ?Sized> Clone for Font<'a, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, S: FontSource + ?Sized> Copy for Font<'a, S> {}

impl<'a, S: FontSource + ?Sized> fmt::Debug for Font<'a, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("format", &self.format)
            .field("max_width", &self.max_width)
            .field("height", &self.height)
            .field("first_char", &self.first_char)
            .field("char_count", &self.char_count)
            .field("utf8", &self.utf8)
            .finish()
    }
}

impl<'a, S: FontSource + ?Sized> Font<'a, S> {
    /// Bind a font blob, decoding its header and UTF-8 sub-header
    pub fn new(source: &'a S) -> Result<Self, FontError> {
        if source.len() < FONT_HEADER_LEN {
            return Err(FontError::Truncated);
        }
        let format = FontFormat::from_code(source.read_u16(FONT_FORMAT));
        let utf8 = if format.utf8 {
            Some(Utf8Header::read(source)?)
        } else {
            None
        };
        let font = Self {
            source,
            format,
            max_width: source.read_u8(FONT_WIDTH),
            height: source.read_u8(FONT_HEIGHT),
            first_char: source.read_u8(FONT_FIRST_CHAR),
            char_count: source.read_u8(FONT_CHAR_COUNT),
            utf8,
        };
        debug!(
            "font bound: format {=u16} {=u8}x{=u8}",
            format.code,
            font.max_width,
            font.height
        );
        Ok(font)
    }

    /// Underlying storage
    pub fn source(&self) -> &'a S {
        self.source
    }

    /// Decoded format code
    pub fn format(&self) -> FontFormat {
        self.format
    }

    /// Maximum glyph width in pixels, unmagnified
    pub fn max_width(&self) -> u8 {
        self.max_width
    }

    /// Glyph height in pixels, unmagnified
    pub fn height(&self) -> u8 {
        self.height
    }

    /// Display pages covered by one glyph, unmagnified
    pub fn rows(&self) -> u8 {
        ((self.height as u16 + 7) / 8) as u8
    }

    /// Code of the first character in the ASCII section
    pub fn first_char(&self) -> u8 {
        self.first_char
    }

    /// Number of characters in the ASCII section
    pub fn char_count(&self) -> u8 {
        self.char_count
    }

    /// Blank columns drawn after each ASCII glyph
    pub fn letter_spacing(&self) -> u8 {
        self.format.letter_spacing
    }

    /// True if the font has a UTF-8 glyph section
    pub fn supports_utf8(&self) -> bool {
        self.utf8.is_some()
    }

    /// Decoded UTF-8 sub-header, if any
    pub fn utf8_header(&self) -> Option<Utf8Header> {
        self.utf8
    }

    /// Number of glyphs in the UTF-8 section
    pub fn utf8_char_count(&self) -> u16 {
        self.utf8.map_or(0, |h| h.glyph_count)
    }

    /// Blank columns drawn after each UTF-8 glyph
    pub fn utf8_spacing(&self) -> u8 {
        self.utf8.map_or(0, |h| h.spacing())
    }

    /// True if `code` falls in `[first, first + count)`
    pub fn contains(&self, code: u8) -> bool {
        let code = code as u16;
        let first = self.first_char as u16;
        code >= first && code < first + self.char_count as u16
    }
}
