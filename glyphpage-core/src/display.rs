//! Text display
//!
//! [`TextDisplay`] owns a [`DisplayBus`] and turns a byte stream into
//! glyph writes: ASCII bytes index the font directly, bytes above 127 go
//! through a per-display UTF-8 accumulator when the font has a UTF-8
//! section. Control characters move the cursor.

use core::fmt;

use glyphpage_hal::{DisplayBus, WriteMode};

use crate::config::{DeviceGeometry, DisplaySettings, ScrollMode};
use crate::cursor::{Cursor, RAM_PAGES, START_LINE_MASK};
use crate::error::Error;
use crate::font::{Font, FontSource, Glyph};
use crate::raster::{self, RasterTarget};
use crate::ssd1306 as cmd;
use crate::utf8::{Utf8Accumulator, Utf8Step};

/// Glyph scaling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Magnification {
    #[default]
    Normal,
    /// Every pixel drawn as a 2x2 block
    Double,
}

impl Magnification {
    /// Integer scale factor
    pub const fn factor(self) -> u8 {
        match self {
            Magnification::Normal => 1,
            Magnification::Double => 2,
        }
    }
}

/// What one input byte turns into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolved {
    Draw(Glyph),
    CarriageReturn,
    LineFeed,
    /// Part of an unfinished UTF-8 sequence
    Pending,
    /// Malformed UTF-8, byte dropped
    Invalid,
    /// Not in the font
    Missing,
}

/// Resolve one input byte against `font`
///
/// `letter_spacing` overrides the padding of ASCII-section glyphs.
pub(crate) fn resolve_byte<S: FontSource + ?Sized>(
    font: &Font<'_, S>,
    utf8: &mut Utf8Accumulator,
    byte: u8,
    letter_spacing: u8,
    nonfont_space: bool,
) -> Resolved {
    if byte > 127 && font.supports_utf8() {
        return match utf8.feed(byte) {
            Utf8Step::NeedMore => Resolved::Pending,
            Utf8Step::Invalid => Resolved::Invalid,
            Utf8Step::Complete(codepoint) => match font.utf8_glyph(codepoint) {
                Some(glyph) => Resolved::Draw(glyph),
                None => Resolved::Missing,
            },
        };
    }

    // Any plain byte breaks an unfinished sequence
    utf8.reset();
    match byte {
        b'\r' => Resolved::CarriageReturn,
        b'\n' => Resolved::LineFeed,
        _ => {
            let glyph = if font.contains(byte) {
                font.glyph(byte)
            } else if nonfont_space && byte == b' ' {
                Some(font.space_glyph())
            } else {
                None
            };
            match glyph {
                Some(glyph) => Resolved::Draw(Glyph {
                    padding: letter_spacing,
                    ..glyph
                }),
                None => Resolved::Missing,
            }
        }
    }
}

/// Text renderer for one page-addressed display
pub struct TextDisplay<'a, B, S: FontSource + ?Sized = [u8]> {
    bus: B,
    geometry: DeviceGeometry,
    /// Writes at or past this column are dropped
    width: u8,
    cursor: Cursor,
    font: Option<Font<'a, S>>,
    mag: Magnification,
    letter_spacing: u8,
    invert_mask: u8,
    /// Columns to discard before drawing resumes
    skip: u8,
    nonfont_space: bool,
    utf8: Utf8Accumulator,
}

impl<'a, B, S> TextDisplay<'a, B, S>
where
    B: DisplayBus,
    S: FontSource + ?Sized,
{
    /// Create a display without touching the controller
    pub fn new(bus: B, geometry: DeviceGeometry) -> Self {
        Self {
            bus,
            geometry,
            width: geometry.width,
            cursor: Cursor::new(),
            font: None,
            mag: Magnification::Normal,
            letter_spacing: 0,
            invert_mask: 0,
            skip: 0,
            nonfont_space: true,
            utf8: Utf8Accumulator::new(),
        }
    }

    /// Send the geometry's init sequence, apply `settings` and clear
    pub fn init(&mut self, settings: DisplaySettings) -> Result<(), Error<B::Error>> {
        self.cursor = Cursor::new();
        self.width = self.geometry.width;
        self.bus
            .write_commands(self.geometry.init_commands)
            .map_err(Error::Bus)?;

        if let Some(contrast) = settings.contrast {
            self.set_contrast(contrast)?;
        }
        if settings.inverted {
            self.invert_display(true)?;
        }
        if settings.remapped {
            self.display_remap(true)?;
        }
        self.cursor.scroll_mode = settings.scroll_mode;
        self.nonfont_space = settings.nonfont_space;
        debug!(
            "display init {=u8}x{=u8}",
            self.geometry.width,
            self.geometry.height
        );
        self.clear()
    }

    /// Give back the bus
    pub fn release(self) -> B {
        self.bus
    }

    /// Direct access to the bus
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Deliver batched data bytes
    pub fn flush(&mut self) -> Result<(), Error<B::Error>> {
        self.bus.flush().map_err(Error::Bus)
    }

    /// Send one controller command byte
    pub fn write_command(&mut self, c: u8) -> Result<(), Error<B::Error>> {
        self.bus.write_byte(c, WriteMode::Command).map_err(Error::Bus)
    }

    // --- geometry and cursor ---

    pub fn geometry(&self) -> &DeviceGeometry {
        &self.geometry
    }

    /// Width in pixels
    pub fn display_width(&self) -> u8 {
        self.geometry.width
    }

    /// Height in pixels
    pub fn display_height(&self) -> u8 {
        self.geometry.height
    }

    /// Height in pages
    pub fn display_rows(&self) -> u8 {
        self.geometry.rows()
    }

    pub fn col(&self) -> u8 {
        self.cursor.col
    }

    pub fn row(&self) -> u8 {
        self.cursor.row
    }

    /// Snapshot of the cursor and scroll registers
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Move to a column, ignored past the right edge
    pub fn set_col(&mut self, col: u8) -> Result<(), Error<B::Error>> {
        if col < self.width {
            self.cursor.col = col;
            let hw = col.wrapping_add(self.geometry.col_offset);
            self.write_command(cmd::SET_LOW_COLUMN | (hw & 0x0F))?;
            self.write_command(cmd::SET_HIGH_COLUMN | (hw >> 4))?;
        }
        Ok(())
    }

    /// Move to a page, ignored past the last page
    pub fn set_row(&mut self, row: u8) -> Result<(), Error<B::Error>> {
        if row < self.display_rows() {
            self.cursor.row = row;
            self.write_command(cmd::SET_PAGE_ADDR | self.cursor.ram_page(row))?;
        }
        Ok(())
    }

    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Error<B::Error>> {
        self.set_col(col)?;
        self.set_row(row)
    }

    /// Move to the top-left corner
    pub fn home(&mut self) -> Result<(), Error<B::Error>> {
        self.set_cursor(0, 0)
    }

    /// Discard the next `count` drawn columns without moving the cursor
    pub fn skip_columns(&mut self, count: u8) {
        self.skip = count;
    }

    // --- font ---

    /// Bind a font, resetting letter spacing to the font's default
    pub fn set_font(&mut self, font: Font<'a, S>) {
        self.letter_spacing = font.letter_spacing();
        self.font = Some(font);
        self.utf8.reset();
    }

    /// Unbind the font, all writes become no-ops
    pub fn clear_font(&mut self) {
        self.font = None;
        self.utf8.reset();
    }

    pub fn font(&self) -> Option<&Font<'a, S>> {
        self.font.as_ref()
    }

    pub fn set_magnification(&mut self, mag: Magnification) {
        self.mag = mag;
    }

    pub fn magnification(&self) -> Magnification {
        self.mag
    }

    /// Override the blank columns after ASCII glyphs
    pub fn set_letter_spacing(&mut self, spacing: u8) {
        self.letter_spacing = spacing;
    }

    pub fn letter_spacing(&self) -> u8 {
        self.letter_spacing
    }

    /// Draw a blank glyph for `' '` when the font lacks one
    pub fn set_nonfont_space(&mut self, enabled: bool) {
        self.nonfont_space = enabled;
    }

    /// Glyph width in pixels including magnification
    pub fn font_width(&self) -> u8 {
        self.font
            .map_or(0, |f| f.max_width().saturating_mul(self.mag.factor()))
    }

    /// Glyph height in pixels including magnification
    pub fn font_height(&self) -> u8 {
        self.font
            .map_or(0, |f| f.height().saturating_mul(self.mag.factor()))
    }

    /// Pages covered by one line of text including magnification
    pub fn font_rows(&self) -> u8 {
        self.font
            .map_or(0, |f| f.rows().saturating_mul(self.mag.factor()))
    }

    pub fn font_first_char(&self) -> u8 {
        self.font.map_or(0, |f| f.first_char())
    }

    pub fn font_char_count(&self) -> u8 {
        self.font.map_or(0, |f| f.char_count())
    }

    pub fn font_supports_utf8(&self) -> bool {
        self.font.is_some_and(|f| f.supports_utf8())
    }

    pub fn font_utf8_char_count(&self) -> u16 {
        self.font.map_or(0, |f| f.utf8_char_count())
    }

    /// Width of an ASCII-section character including magnification
    ///
    /// 0 when no font is bound or the code is outside the font.
    pub fn char_width(&self, code: u8) -> u8 {
        self.font
            .map_or(0, |f| f.char_width(code).saturating_mul(self.mag.factor()))
    }

    /// Width of a UTF-8 section glyph including magnification
    pub fn utf8_char_width(&self, codepoint: u32) -> u8 {
        self.font
            .map_or(0, |f| f.utf8_width(codepoint).saturating_mul(self.mag.factor()))
    }

    /// Columns `ch` occupies when written, spacing included
    pub fn char_advance(&self, ch: char) -> u8 {
        let Some(font) = self.font else {
            return 0;
        };
        let mut utf8 = Utf8Accumulator::new();
        let mut buf = [0u8; 4];
        let mut advance = 0;
        for &byte in ch.encode_utf8(&mut buf).as_bytes() {
            let resolved = resolve_byte(
                &font,
                &mut utf8,
                byte,
                self.letter_spacing,
                self.nonfont_space,
            );
            if let Resolved::Draw(glyph) = resolved {
                advance = glyph.advance(self.mag.factor());
            }
        }
        advance
    }

    /// Width of `n` fixed-width characters with spacing
    pub fn field_width(&self, n: u8) -> usize {
        n as usize * (self.font_width() as usize + self.letter_spacing as usize)
    }

    /// Columns `text` occupies when written
    ///
    /// Characters missing from the font contribute nothing.
    pub fn str_width(&self, text: &str) -> usize {
        let Some(font) = self.font else {
            return 0;
        };
        let mut utf8 = Utf8Accumulator::new();
        text.bytes()
            .map(|byte| {
                match resolve_byte(
                    &font,
                    &mut utf8,
                    byte,
                    self.letter_spacing,
                    self.nonfont_space,
                ) {
                    Resolved::Draw(glyph) => glyph.advance(self.mag.factor()) as usize,
                    _ => 0,
                }
            })
            .sum()
    }

    // --- writing ---

    /// Write one byte of text
    ///
    /// Returns 1 when the byte was consumed (drawn, cursor control, or
    /// part of a UTF-8 sequence) and 0 when no font is bound or the
    /// character is not in the font. Malformed UTF-8 is consumed and
    /// dropped.
    pub fn write_byte(&mut self, byte: u8) -> Result<usize, Error<B::Error>> {
        let Some(font) = self.font else {
            return Ok(0);
        };
        let resolved = resolve_byte(
            &font,
            &mut self.utf8,
            byte,
            self.letter_spacing,
            self.nonfont_space,
        );
        match resolved {
            Resolved::Draw(glyph) => {
                raster::draw_glyph(self, font.source(), &glyph, self.mag.factor())?;
                Ok(1)
            }
            Resolved::CarriageReturn => {
                self.set_col(0)?;
                Ok(1)
            }
            Resolved::LineFeed => {
                self.line_feed(&font)?;
                Ok(1)
            }
            Resolved::Pending => Ok(1),
            Resolved::Invalid => {
                trace!("dropped malformed utf-8 byte {=u8:x}", byte);
                Ok(1)
            }
            Resolved::Missing => Ok(0),
        }
    }

    /// Write every byte of `text`, returning how many were consumed
    pub fn write_text(&mut self, text: &str) -> Result<usize, Error<B::Error>> {
        let mut written = 0;
        for byte in text.bytes() {
            written += self.write_byte(byte)?;
        }
        Ok(written)
    }

    fn line_feed(&mut self, font: &Font<'a, S>) -> Result<(), Error<B::Error>> {
        self.set_col(0)?;
        let font_rows = font.rows().saturating_mul(self.mag.factor());
        let advance = self.cursor.line_feed(font_rows, self.display_rows());
        match advance.scroll {
            None => self.set_row(advance.row),
            Some(hint) => {
                self.cursor.page_offset = hint.page_offset;
                self.cursor.row = advance.row;
                // Blank the recycled line, this also repositions the cursor
                self.clear_to_eol()?;
                if let Some(line) = hint.start_line {
                    self.set_start_line(line)?;
                }
                Ok(())
            }
        }
    }

    /// Write one RAM byte immediately at the cursor
    pub fn write_ram(&mut self, value: u8) -> Result<(), Error<B::Error>> {
        if self.cursor.col < self.width {
            self.bus
                .write_byte(value ^ self.invert_mask, WriteMode::DataImmediate)
                .map_err(Error::Bus)?;
            self.cursor.col += 1;
        }
        Ok(())
    }

    /// Write one RAM byte at the cursor, honouring pending skips
    pub fn write_ram_buffered(&mut self, value: u8) -> Result<(), Error<B::Error>> {
        if self.skip > 0 {
            self.skip -= 1;
        } else if self.cursor.col < self.width {
            self.bus
                .write_byte(value ^ self.invert_mask, WriteMode::DataBuffered)
                .map_err(Error::Bus)?;
            self.cursor.col += 1;
        }
        Ok(())
    }

    // --- fill and clear ---

    /// Fill columns `c0..=c1` of pages `r0..=r1` with `filler`
    ///
    /// Cancels pending skips and leaves the cursor at `(c0, r0)`.
    pub fn fill_region(
        &mut self,
        c0: u8,
        c1: u8,
        r0: u8,
        r1: u8,
        filler: u8,
    ) -> Result<(), Error<B::Error>> {
        self.skip = 0;
        let r1 = r1.min(self.display_rows().saturating_sub(1));
        for r in r0..=r1 {
            self.set_cursor(c0, r)?;
            for _ in c0..=c1 {
                self.write_ram_buffered(filler)?;
            }
        }
        self.set_cursor(c0, r0)
    }

    /// Blank a region
    pub fn clear_region(&mut self, c0: u8, c1: u8, r0: u8, r1: u8) -> Result<(), Error<B::Error>> {
        self.fill_region(c0, c1, r0, r1, 0)
    }

    /// Blank the whole display and reset scrolling
    pub fn clear(&mut self) -> Result<(), Error<B::Error>> {
        self.reset_scroll()?;
        let (c1, r1) = self.last_cell();
        self.fill_region(0, c1, 0, r1, 0)
    }

    /// Light the whole display and reset scrolling
    pub fn fill(&mut self) -> Result<(), Error<B::Error>> {
        self.reset_scroll()?;
        let (c1, r1) = self.last_cell();
        self.fill_region(0, c1, 0, r1, 0xFF)
    }

    /// Blank from the cursor to the right edge for one line of text
    pub fn clear_to_eol(&mut self) -> Result<(), Error<B::Error>> {
        self.fill_line_from_cursor(0)
    }

    /// Light from the cursor to the right edge for one line of text
    pub fn fill_to_eol(&mut self) -> Result<(), Error<B::Error>> {
        self.fill_line_from_cursor(0xFF)
    }

    /// Blank a field `n` fixed-width characters wide
    pub fn clear_field(&mut self, col: u8, row: u8, n: u8) -> Result<(), Error<B::Error>> {
        let width = self.field_width(n);
        if width == 0 {
            return Ok(());
        }
        let c1 = (col as usize + width - 1).min(u8::MAX as usize) as u8;
        let r1 = row.saturating_add(self.font_rows().saturating_sub(1));
        self.clear_region(col, c1, row, r1)
    }

    fn fill_line_from_cursor(&mut self, filler: u8) -> Result<(), Error<B::Error>> {
        let (col, row) = (self.cursor.col, self.cursor.row);
        let c1 = self.width.saturating_sub(1);
        let r1 = row.saturating_add(self.font_rows().saturating_sub(1));
        self.fill_region(col, c1, row, r1, filler)
    }

    fn last_cell(&self) -> (u8, u8) {
        (
            self.width.saturating_sub(1),
            self.display_rows().saturating_sub(1),
        )
    }

    // --- controller settings ---

    /// Draw light-on-dark or dark-on-light text
    pub fn set_invert_mode(&mut self, inverted: bool) {
        self.invert_mask = if inverted { 0xFF } else { 0 };
    }

    pub fn invert_mode(&self) -> bool {
        self.invert_mask != 0
    }

    /// Invert the whole panel in hardware
    pub fn invert_display(&mut self, inverted: bool) -> Result<(), Error<B::Error>> {
        self.write_command(if inverted {
            cmd::SET_INVERSE
        } else {
            cmd::SET_NORMAL
        })
    }

    pub fn set_contrast(&mut self, value: u8) -> Result<(), Error<B::Error>> {
        self.write_command(cmd::SET_CONTRAST)?;
        self.write_command(value)
    }

    /// Rotate the panel 180 degrees relative to the init sequence
    pub fn display_remap(&mut self, remapped: bool) -> Result<(), Error<B::Error>> {
        if remapped {
            self.write_command(cmd::SET_SEG_REMAP)?;
            self.write_command(cmd::SET_COM_SCAN_INC)
        } else {
            self.write_command(cmd::SET_SEG_REMAP | 0x01)?;
            self.write_command(cmd::SET_COM_SCAN_DEC)
        }
    }

    // --- scrolling ---

    pub fn set_scroll_mode(&mut self, mode: ScrollMode) {
        self.cursor.scroll_mode = mode;
    }

    pub fn scroll_mode(&self) -> ScrollMode {
        self.cursor.scroll_mode
    }

    /// Program the controller's display start line (0-63)
    pub fn set_start_line(&mut self, line: u8) -> Result<(), Error<B::Error>> {
        self.cursor.start_line = line & START_LINE_MASK;
        self.write_command(cmd::SET_START_LINE | self.cursor.start_line)
    }

    pub fn start_line(&self) -> u8 {
        self.cursor.start_line
    }

    /// Map RAM page `page` to logical row 0
    pub fn set_page_offset(&mut self, page: u8) -> Result<(), Error<B::Error>> {
        self.cursor.page_offset = page & (RAM_PAGES - 1);
        self.set_row(self.cursor.row)
    }

    pub fn page_offset(&self) -> u8 {
        self.cursor.page_offset
    }

    /// Move the visible window by `lines` pixel rows
    pub fn scroll_display(&mut self, lines: i8) -> Result<(), Error<B::Error>> {
        self.set_start_line(self.cursor.start_line.wrapping_add(lines as u8))
    }

    /// Move the logical-to-RAM page mapping by `rows` pages
    pub fn scroll_memory(&mut self, rows: i8) -> Result<(), Error<B::Error>> {
        self.set_page_offset(self.cursor.page_offset.wrapping_add(rows as u8))
    }

    /// True once the visible window matches the page mapping
    pub fn scroll_is_synced(&self) -> bool {
        self.cursor.is_synced()
    }

    fn reset_scroll(&mut self) -> Result<(), Error<B::Error>> {
        self.cursor.page_offset = 0;
        self.set_start_line(0)
    }

    // --- used by the ticker ---

    /// Swap the active font and scaling, returning what was there
    pub(crate) fn swap_text_state(
        &mut self,
        font: Option<Font<'a, S>>,
        mag: Magnification,
        letter_spacing: u8,
    ) -> (Option<Font<'a, S>>, Magnification, u8) {
        let saved = (self.font, self.mag, self.letter_spacing);
        self.utf8.reset();
        self.font = font;
        self.mag = mag;
        self.letter_spacing = letter_spacing;
        saved
    }

    /// Narrow the writable width, returning the previous width
    pub(crate) fn swap_width(&mut self, width: u8) -> u8 {
        core::mem::replace(&mut self.width, width)
    }
}

impl<'a, B, S> RasterTarget for TextDisplay<'a, B, S>
where
    B: DisplayBus,
    S: FontSource + ?Sized,
{
    type Error = Error<B::Error>;

    fn cursor(&self) -> (u8, u8) {
        (self.cursor.col, self.cursor.row)
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Self::Error> {
        TextDisplay::set_cursor(self, col, row)
    }

    fn set_row(&mut self, row: u8) -> Result<(), Self::Error> {
        TextDisplay::set_row(self, row)
    }

    fn skip_columns(&mut self, count: u8) {
        self.skip = count;
    }

    fn pending_skip(&self) -> u8 {
        self.skip
    }

    fn put_column(&mut self, bits: u8) -> Result<(), Self::Error> {
        self.write_ram_buffered(bits)
    }
}

impl<'a, B, S> fmt::Write for TextDisplay<'a, B, S>
where
    B: DisplayBus,
    S: FontSource + ?Sized,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_text(s).map(|_| ()).map_err(|_| fmt::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::SYSTEM_5X7;
    use crate::testing::fonts::{PROPORTIONAL, UTF8_FIXED, UTF8_PROPORTIONAL};
    use crate::testing::{display, MockBus};
    use core::fmt::Write;

    fn system_display(width: u8, height: u8) -> TextDisplay<'static, MockBus> {
        let mut d = display(width, height);
        d.set_font(Font::new(SYSTEM_5X7).unwrap());
        d
    }

    #[test]
    fn test_no_font_writes_nothing() {
        let mut d = display(128, 64);
        assert_eq!(d.write_byte(b'A').unwrap(), 0);
        assert_eq!(d.char_width(b'A'), 0);
        assert_eq!(d.str_width("abc"), 0);
        assert_eq!(d.col(), 0);
    }

    #[test]
    fn test_write_ascii_glyph() {
        let mut d = system_display(128, 64);
        assert_eq!(d.write_byte(b'A').unwrap(), 1);
        assert_eq!(d.col(), 6);
        let bus = d.release();
        assert_eq!(&bus.page(0)[..6], &[0x7E, 0x11, 0x11, 0x11, 0x7E, 0x00]);
    }

    #[test]
    fn test_out_of_range_leaves_cursor() {
        let mut d = system_display(128, 64);
        d.set_col(10).unwrap();
        assert_eq!(d.write_byte(0x1F).unwrap(), 0);
        assert_eq!(d.write_byte(0x80).unwrap(), 0);
        assert_eq!(d.col(), 10);
    }

    #[test]
    fn test_nonfont_space_fallback() {
        let data: &[u8] = &[0, 0, 3, 8, b'A', 1, 0xFF, 0xFF, 0xFF];
        let mut d = display(128, 64);
        d.set_font(Font::new(data).unwrap());
        assert_eq!(d.write_byte(b' ').unwrap(), 1);
        assert_eq!(d.col(), 4);

        d.set_nonfont_space(false);
        assert_eq!(d.write_byte(b' ').unwrap(), 0);
        assert_eq!(d.col(), 4);
    }

    #[test]
    fn test_set_col_and_row_clip() {
        let mut d = system_display(128, 32);
        d.set_cursor(127, 3).unwrap();
        d.set_col(128).unwrap();
        d.set_row(4).unwrap();
        assert_eq!((d.col(), d.row()), (127, 3));
    }

    #[test]
    fn test_carriage_return_and_line_feed() {
        let mut d = system_display(128, 64);
        d.write_text("AB\rC").unwrap();
        assert_eq!((d.col(), d.row()), (6, 0));

        d.write_text("\nD").unwrap();
        assert_eq!((d.col(), d.row()), (6, 1));
    }

    #[test]
    fn test_line_feed_stops_at_last_row() {
        let mut d = system_display(128, 16);
        d.write_text("\n\n\n").unwrap();
        assert_eq!(d.row(), 1);
    }

    #[test]
    fn test_auto_scroll_rotates_ram() {
        let mut d = system_display(128, 64);
        d.set_scroll_mode(ScrollMode::Auto);
        for _ in 0..8 {
            d.write_byte(b'\n').unwrap();
        }
        // Seven feeds reach the last row, the eighth scrolls
        assert_eq!(d.row(), 7);
        assert_eq!(d.page_offset(), 1);
        assert_eq!(d.start_line(), 8);
        assert!(d.scroll_is_synced());
        assert_eq!(d.release().start_line, 8);
    }

    #[test]
    fn test_app_scroll_waits_for_application() {
        let mut d = system_display(128, 64);
        d.set_scroll_mode(ScrollMode::App);
        d.set_cursor(0, 7).unwrap();
        d.write_byte(b'\n').unwrap();
        assert_eq!(d.page_offset(), 1);
        assert!(!d.scroll_is_synced());

        d.scroll_display(8).unwrap();
        assert!(d.scroll_is_synced());
    }

    #[test]
    fn test_scrolled_writes_land_on_rotated_page() {
        let mut d = system_display(128, 64);
        d.set_page_offset(3).unwrap();
        d.set_cursor(0, 6).unwrap();
        d.write_byte(b'A').unwrap();
        let bus = d.release();
        // Logical row 6 + offset 3 wraps to RAM page 1
        assert_eq!(bus.page(1)[0], 0x7E);
    }

    #[test]
    fn test_magnified_glyph() {
        let mut d = system_display(128, 64);
        d.set_magnification(Magnification::Double);
        assert_eq!(d.char_width(b'A'), 10);
        assert_eq!(d.font_rows(), 2);
        d.write_byte(b'-').unwrap();
        // '-' is 0x08 in every column: low nibble on page 0, high on page 1
        assert_eq!(d.col(), 11);
        let bus = d.release();
        assert_eq!(&bus.page(0)[..4], &[0xC0, 0xC0, 0xC0, 0xC0]);
        assert_eq!(&bus.page(1)[..4], &[0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_invert_mode_flips_bits() {
        let mut d = system_display(128, 64);
        d.set_invert_mode(true);
        d.write_byte(b' ').unwrap();
        let bus = d.release();
        assert_eq!(&bus.page(0)[..6], &[0xFF; 6]);
    }

    #[test]
    fn test_proportional_draw_consumes_width() {
        let mut d = display(128, 64);
        d.set_font(Font::new(PROPORTIONAL).unwrap());
        for (code, width) in [(b'A', 2u8), (b'B', 3), (b'C', 1)] {
            let before = d.col();
            d.write_byte(code).unwrap();
            assert_eq!(d.col() - before, width + 1);
            assert_eq!(d.row(), 0);
        }
        let bus = d.release();
        assert_eq!(
            &bus.page(0)[..8],
            &[0x81, 0x42, 0x00, 0xFF, 0x01, 0xFF, 0x00, 0xAA]
        );
        // Height 10 keeps only the top 2 bits of the last page
        assert!(bus.page(1)[..8].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_utf8_glyph_written() {
        let mut d = display(128, 64);
        d.set_font(Font::new(UTF8_PROPORTIONAL).unwrap());
        assert_eq!(d.write_text("中").unwrap(), 3);
        assert_eq!(d.col(), 4);
        let bus = d.release();
        assert_eq!(&bus.page(0)[..4], &[0x11, 0x7F, 0x11, 0x00]);
    }

    #[test]
    fn test_utf8_missing_glyph_advances_nothing() {
        let mut d = display(128, 64);
        d.set_font(Font::new(UTF8_PROPORTIONAL).unwrap());
        assert_eq!(d.write_byte(0xE4).unwrap(), 1);
        assert_eq!(d.write_byte(0xB8).unwrap(), 1);
        assert_eq!(d.write_byte(0xAE).unwrap(), 0);
        assert_eq!(d.col(), 0);
    }

    #[test]
    fn test_malformed_utf8_continues() {
        let mut d = display(128, 64);
        d.set_font(Font::new(UTF8_PROPORTIONAL).unwrap());
        assert_eq!(d.write_byte(0xA9).unwrap(), 1);
        assert_eq!(d.col(), 0);
        d.write_text("é").unwrap();
        assert_eq!(d.col(), 3);
    }

    #[test]
    fn test_ascii_interrupts_utf8_sequence() {
        let mut d = display(128, 64);
        d.set_font(Font::new(UTF8_PROPORTIONAL).unwrap());
        d.write_byte(0xC3).unwrap();
        d.write_byte(b'A').unwrap();
        assert_eq!(d.col(), 4);
        // Continuation after the interruption is orphaned
        d.write_byte(0xA9).unwrap();
        assert_eq!(d.col(), 4);
    }

    #[test]
    fn test_str_width_mixed() {
        let mut d = display(128, 64);
        d.set_font(Font::new(UTF8_PROPORTIONAL).unwrap());
        // 'A' 3+1, '中' 3+1, 'é' 2+1, '?' missing
        assert_eq!(d.str_width("A中é?"), 11);
        assert_eq!(d.char_advance('中'), 4);
        assert_eq!(d.utf8_char_width(0x4E2D), 3);

        d.set_magnification(Magnification::Double);
        assert_eq!(d.str_width("A中"), 14);
    }

    #[test]
    fn test_utf8_fixed_font_has_no_letter_spacing() {
        let mut d = display(128, 64);
        d.set_font(Font::new(UTF8_FIXED).unwrap());
        assert_eq!(d.letter_spacing(), 0);
        assert_eq!(d.str_width("A\u{1F600}"), 8);
    }

    #[test]
    fn test_clear_field_and_eol() {
        let mut d = system_display(128, 64);
        d.fill().unwrap();
        d.clear_field(0, 0, 2).unwrap();
        d.set_cursor(120, 1).unwrap();
        d.clear_to_eol().unwrap();
        assert_eq!(d.cursor().col, 120);
        let bus = d.release();
        assert!(bus.page(0)[..12].iter().all(|&b| b == 0));
        assert_eq!(bus.page(0)[12], 0xFF);
        assert!(bus.page(1)[120..128].iter().all(|&b| b == 0));
        assert_eq!(bus.page(1)[119], 0xFF);
    }

    #[test]
    fn test_init_sends_sequence_and_settings() {
        let mut d: TextDisplay<'static, MockBus> =
            TextDisplay::new(MockBus::new(), crate::config::ADAFRUIT_128X32);
        let settings = DisplaySettings {
            contrast: Some(0x20),
            scroll_mode: ScrollMode::Auto,
            ..DisplaySettings::default()
        };
        d.init(settings).unwrap();
        assert_eq!(d.scroll_mode(), ScrollMode::Auto);
        let bus = d.release();
        assert!(bus.commands.starts_with(crate::config::ADAFRUIT_128X32.init_commands));
        assert_eq!(bus.contrast, 0x20);
    }

    #[test]
    fn test_column_offset_applied() {
        let mut d: TextDisplay<'static, MockBus> =
            TextDisplay::new(MockBus::new(), DeviceGeometry::bare(128, 64, 2));
        d.set_font(Font::new(SYSTEM_5X7).unwrap());
        d.set_cursor(0, 0).unwrap();
        d.write_byte(b'A').unwrap();
        let bus = d.release();
        assert_eq!(bus.page(0)[0], 0);
        assert_eq!(bus.page(0)[2], 0x7E);
    }

    #[test]
    fn test_fmt_write() {
        let mut d = system_display(128, 64);
        write!(d, "{}", 42).unwrap();
        assert_eq!(d.col(), 12);
    }
}
