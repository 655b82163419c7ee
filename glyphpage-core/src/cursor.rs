//! Cursor and line engine
//!
//! Tracks the text position in (column, page) units and computes where a
//! line feed lands. The computation is pure: when the display scrolls
//! instead of moving the cursor, the result carries a [`ScrollHint`] for
//! the display layer to apply to the controller.

use crate::config::ScrollMode;

/// Display RAM holds 8 pages regardless of the visible height
pub const RAM_PAGES: u8 = 8;

/// Controller start-line register range
pub const START_LINE_MASK: u8 = 0x3F;

/// Hardware scroll update requested by a line feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScrollHint {
    /// New RAM page mapped to logical row 0
    pub page_offset: u8,
    /// Start line to program now, `None` when the application scrolls
    pub start_line: Option<u8>,
}

/// Outcome of a line feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineAdvance {
    /// Page the cursor moves to
    pub row: u8,
    /// Present when RAM was rotated instead of advancing past the bottom
    pub scroll: Option<ScrollHint>,
}

/// Text cursor and scroll registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cursor {
    /// Column in pixels
    pub col: u8,
    /// Logical page
    pub row: u8,
    /// RAM page shown as logical page 0
    pub page_offset: u8,
    /// Controller start line
    pub start_line: u8,
    /// Line feed behaviour on the last page
    pub scroll_mode: ScrollMode,
}

impl Cursor {
    /// Cursor at the origin with scrolling disabled
    pub const fn new() -> Self {
        Self {
            col: 0,
            row: 0,
            page_offset: 0,
            start_line: 0,
            scroll_mode: ScrollMode::Off,
        }
    }

    /// RAM page backing logical `row`
    pub const fn ram_page(&self, row: u8) -> u8 {
        row.wrapping_add(self.page_offset) & (RAM_PAGES - 1)
    }

    /// Where a line feed lands for a font `font_rows` pages tall
    ///
    /// Without scrolling, or when the next line fits, the row simply
    /// advances; a row past the last page is left for the caller to
    /// reject. With scrolling, an overflowing line rotates the page
    /// offset by the overflow and pins the cursor to the last line.
    pub fn line_feed(&self, font_rows: u8, display_rows: u8) -> LineAdvance {
        let next = self.row.saturating_add(font_rows);
        let delta = next as i16 + font_rows as i16 - display_rows as i16;

        if !self.scroll_mode.is_enabled() || delta <= 0 {
            return LineAdvance {
                row: next,
                scroll: None,
            };
        }

        let page_offset = (self.page_offset as i16 + delta) as u8 & (RAM_PAGES - 1);
        let start_line = match self.scroll_mode {
            ScrollMode::Auto => Some((8 * page_offset) & START_LINE_MASK),
            _ => None,
        };
        LineAdvance {
            row: display_rows.saturating_sub(font_rows),
            scroll: Some(ScrollHint {
                page_offset,
                start_line,
            }),
        }
    }

    /// True if the start line matches the page offset
    pub const fn is_synced(&self) -> bool {
        self.start_line == (8 * self.page_offset) & START_LINE_MASK
    }
}
