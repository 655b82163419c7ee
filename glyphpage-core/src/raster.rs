//! Glyph rasterizer
//!
//! Streams a glyph's column bytes to a [`RasterTarget`], one display page
//! at a time. At 2x magnification every page is drawn in two passes: the
//! first expands the low nibble of each byte, the second the high nibble,
//! and every expanded byte is written twice to double the width.

use crate::font::{FontSource, Glyph};

/// Nibble to byte expansion that doubles every bit
///
/// `0b0110` becomes `0b0011_1100`.
pub const SCALED_NIBBLE: [u8; 16] = [
    0x00, 0x03, 0x0C, 0x0F, 0x30, 0x33, 0x3C, 0x3F, 0xC0, 0xC3, 0xCC, 0xCF, 0xF0, 0xF3, 0xFC, 0xFF,
];

/// Expand the low four bits of `nibble` to a byte
pub const fn expand_nibble(nibble: u8) -> u8 {
    SCALED_NIBBLE[(nibble & 0x0F) as usize]
}

/// Cursor-addressed column sink the rasterizer draws into
pub trait RasterTarget {
    type Error;

    /// Current (column, page)
    fn cursor(&self) -> (u8, u8);

    /// Move to a column and page
    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Self::Error>;

    /// Move to a page, keeping the column
    fn set_row(&mut self, row: u8) -> Result<(), Self::Error>;

    /// Discard the next `count` columns instead of drawing them
    fn skip_columns(&mut self, count: u8);

    /// Columns still pending from the last [`skip_columns`]
    ///
    /// [`skip_columns`]: RasterTarget::skip_columns
    fn pending_skip(&self) -> u8;

    /// Draw one column byte at the cursor and advance
    fn put_column(&mut self, bits: u8) -> Result<(), Self::Error>;
}

/// Draw `glyph` at the target's cursor
///
/// `mag` must be 1 or 2. The skip count pending on entry is re-applied at
/// the start of every pass so each page is clipped identically. On return
/// the cursor is back on the starting page, after the last drawn column.
pub fn draw_glyph<S, T>(target: &mut T, source: &S, glyph: &Glyph, mag: u8) -> Result<(), T::Error>
where
    S: FontSource + ?Sized,
    T: RasterTarget,
{
    let (start_col, start_row) = target.cursor();
    let skip = target.pending_skip();

    for r in 0..glyph.rows {
        for m in 0..mag {
            target.skip_columns(skip);
            if r > 0 || m > 0 {
                let (_, row) = target.cursor();
                target.set_cursor(start_col, row.saturating_add(1))?;
            }
            for c in 0..glyph.width {
                let mut bits = glyph.column(source, c, r);
                if glyph.shift != 0 && r + 1 == glyph.rows {
                    bits >>= glyph.shift;
                }
                if mag == 2 {
                    let nibble = if m > 0 { bits >> 4 } else { bits & 0x0F };
                    bits = expand_nibble(nibble);
                    target.put_column(bits)?;
                }
                target.put_column(bits)?;
            }
            for _ in 0..glyph.padding {
                target.put_column(0)?;
            }
        }
    }
    target.set_row(start_row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use heapless::Vec;
    use proptest::prelude::*;

    /// Records columns per page without any display semantics
    struct Recorder {
        col: u8,
        row: u8,
        skip: u8,
        columns: Vec<(u8, u8, u8), 64>,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                col: 0,
                row: 0,
                skip: 0,
                columns: Vec::new(),
            }
        }

        fn page(&self, row: u8) -> Vec<u8, 32> {
            self.columns
                .iter()
                .filter(|(_, r, _)| *r == row)
                .map(|(_, _, b)| *b)
                .collect()
        }
    }

    impl RasterTarget for Recorder {
        type Error = Infallible;

        fn cursor(&self) -> (u8, u8) {
            (self.col, self.row)
        }

        fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Infallible> {
            self.col = col;
            self.row = row;
            Ok(())
        }

        fn set_row(&mut self, row: u8) -> Result<(), Infallible> {
            self.row = row;
            Ok(())
        }

        fn skip_columns(&mut self, count: u8) {
            self.skip = count;
        }

        fn pending_skip(&self) -> u8 {
            self.skip
        }

        fn put_column(&mut self, bits: u8) -> Result<(), Infallible> {
            if self.skip > 0 {
                self.skip -= 1;
            } else {
                self.columns.push((self.col, self.row, bits)).unwrap();
                self.col += 1;
            }
            Ok(())
        }
    }

    const TWO_ROW: &[u8] = &[0x81, 0x42, 0x03, 0x03];

    fn two_row_glyph(shift: u8) -> Glyph {
        Glyph {
            width: 2,
            rows: 2,
            data: Some(0),
            shift,
            padding: 1,
        }
    }

    #[test]
    fn test_nibble_expansion() {
        assert_eq!(expand_nibble(0b0110), 0b0011_1100);
        assert_eq!(expand_nibble(0b1111), 0xFF);
        assert_eq!(expand_nibble(0), 0);
        assert_eq!(expand_nibble(0b1000), 0xC0);
    }

    #[test]
    fn test_draws_rows_with_padding() {
        let mut target = Recorder::new();
        draw_glyph(&mut target, TWO_ROW, &two_row_glyph(0), 1).unwrap();

        assert_eq!(target.page(0).as_slice(), &[0x81, 0x42, 0x00]);
        assert_eq!(target.page(1).as_slice(), &[0x03, 0x03, 0x00]);
        // Back on the first page, after the glyph
        assert_eq!(target.cursor(), (3, 0));
    }

    #[test]
    fn test_partial_row_shift_only_on_last_row() {
        let mut target = Recorder::new();
        draw_glyph(&mut target, TWO_ROW, &two_row_glyph(6), 1).unwrap();

        assert_eq!(target.page(0).as_slice(), &[0x81, 0x42, 0x00]);
        assert_eq!(target.page(1).as_slice(), &[0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_magnified_passes() {
        let data: &[u8] = &[0x6F];
        let glyph = Glyph {
            width: 1,
            rows: 1,
            data: Some(0),
            shift: 0,
            padding: 0,
        };
        let mut target = Recorder::new();
        draw_glyph(&mut target, data, &glyph, 2).unwrap();

        // Low nibble 0xF on the first page, high nibble 0x6 below it
        assert_eq!(target.page(0).as_slice(), &[0xFF, 0xFF]);
        assert_eq!(target.page(1).as_slice(), &[0x3C, 0x3C]);
        assert_eq!(target.cursor(), (2, 0));
    }

    #[test]
    fn test_skip_clips_every_pass() {
        let mut target = Recorder::new();
        target.skip_columns(1);
        draw_glyph(&mut target, TWO_ROW, &two_row_glyph(0), 1).unwrap();

        assert_eq!(target.page(0).as_slice(), &[0x42, 0x00]);
        assert_eq!(target.page(1).as_slice(), &[0x03, 0x00]);
        assert_eq!(target.cursor(), (2, 0));
    }

    #[test]
    fn test_blank_glyph_draws_zeros() {
        let mut target = Recorder::new();
        draw_glyph(&mut target, TWO_ROW, &Glyph::blank(3, 1, 1), 1).unwrap();
        assert_eq!(target.page(0).as_slice(), &[0, 0, 0, 0]);
    }

    proptest! {
        #[test]
        fn prop_expansion_doubles_bits(nibble in 0u8..16) {
            let expanded = expand_nibble(nibble);
            for bit in 0..4 {
                let set = nibble & (1 << bit) != 0;
                prop_assert_eq!(expanded & (1 << (2 * bit)) != 0, set);
                prop_assert_eq!(expanded & (1 << (2 * bit + 1)) != 0, set);
            }
        }
    }
}
