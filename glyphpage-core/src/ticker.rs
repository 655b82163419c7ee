//! Scrolling marquee
//!
//! A [`TickerState`] holds a window on one text row and a short queue of
//! borrowed strings. Every [`TextDisplay::ticker_tick`] redraws the window
//! one pixel further along: the text slides left until it reaches the
//! window's left edge, then its leading columns are skipped one at a time
//! until the first character has scrolled out and is dropped.

use glyphpage_hal::DisplayBus;
use heapless::Vec;

use crate::display::{Magnification, TextDisplay};
use crate::error::{Error, TickerError};
use crate::font::{Font, FontSource};

/// Maximum number of queued strings
pub const TICKER_QUEUE_DIM: usize = 6;

/// One marquee window and its queued text
#[derive(Debug)]
pub struct TickerState<'a, S: FontSource + ?Sized = [u8]> {
    font: Option<Font<'a, S>>,
    row: u8,
    mag2x: bool,
    begin_col: u8,
    end_col: u8,
    queue: Vec<&'a str, TICKER_QUEUE_DIM>,
    /// Window must be cleared before the next draw
    init: bool,
    /// Column the queue head is drawn at
    col: u8,
    /// Leading columns of the queue head already scrolled out
    skip: u8,
}

impl<'a, S: FontSource + ?Sized> TickerState<'a, S> {
    /// Window `begin_col..=end_col` on page `row`, empty queue
    ///
    /// `end_col` must already be within the display, see
    /// [`TextDisplay::ticker_init`].
    pub(crate) fn new(font: Option<Font<'a, S>>, row: u8, mag2x: bool, begin_col: u8, end_col: u8) -> Self {
        Self {
            font,
            row,
            mag2x,
            begin_col,
            end_col,
            queue: Vec::new(),
            init: false,
            col: end_col,
            skip: 0,
        }
    }

    /// Queue `text` behind anything already scrolling
    ///
    /// The first string queued on an empty ticker primes the window so
    /// the next tick starts from a cleared field at the right edge.
    pub fn push(&mut self, text: &'a str) -> Result<(), TickerError> {
        let was_empty = self.queue.is_empty();
        if self.queue.push(text).is_err() {
            warn!("ticker queue full");
            return Err(TickerError::QueueFull);
        }
        if was_empty {
            self.init = true;
        }
        Ok(())
    }

    /// Drop all queued text and re-prime the window
    pub fn clear(&mut self) {
        self.queue.clear();
        self.init = true;
    }

    /// Number of queued strings, including the one scrolling
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Replace the font, `None` makes ticks fail
    pub fn set_font(&mut self, font: Option<Font<'a, S>>) {
        self.font = font;
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    /// First and last column of the window
    pub fn window(&self) -> (u8, u8) {
        (self.begin_col, self.end_col)
    }

    fn magnification(&self) -> Magnification {
        if self.mag2x {
            Magnification::Double
        } else {
            Magnification::Normal
        }
    }
}

impl<'a, B, S> TextDisplay<'a, B, S>
where
    B: DisplayBus,
    S: FontSource + ?Sized,
{
    /// Create a ticker on this display
    ///
    /// `end_col` is clamped to the last visible column.
    pub fn ticker_init(
        &self,
        font: Option<Font<'a, S>>,
        row: u8,
        mag2x: bool,
        begin_col: u8,
        end_col: u8,
    ) -> TickerState<'a, S> {
        let end_col = end_col.min(self.display_width().saturating_sub(1));
        TickerState::new(font, row, mag2x, begin_col, end_col)
    }

    /// Advance `state` by one pixel and redraw its window
    ///
    /// Returns the number of strings still queued; 0 means idle. The
    /// display's own font, magnification, letter spacing and width are
    /// restored before returning.
    pub fn ticker_tick(&mut self, state: &mut TickerState<'a, S>) -> Result<usize, Error<B::Error>> {
        let font = state.font.ok_or(Error::NoFont)?;
        if state.queue.is_empty() {
            return Ok(0);
        }

        let saved = self.swap_text_state(Some(font), state.magnification(), font.letter_spacing());
        let saved_width = self.swap_width(state.end_col.saturating_add(1));

        let result = self.draw_ticker(state);

        self.swap_width(saved_width);
        self.skip_columns(0);
        let (font, mag, letter_spacing) = saved;
        self.swap_text_state(font, mag, letter_spacing);
        result
    }

    fn draw_ticker(&mut self, state: &mut TickerState<'a, S>) -> Result<usize, Error<B::Error>> {
        let last_row = state
            .row
            .saturating_add(self.font_rows().saturating_sub(1));

        if state.init {
            self.clear_region(state.begin_col, state.end_col, state.row, last_row)?;
            state.col = state.end_col;
            state.skip = 0;
            state.init = false;
            trace!("ticker primed at row {=u8}", state.row);
        }

        self.skip_columns(state.skip);
        self.set_cursor(state.col, state.row)?;
        'queue: for text in state.queue.iter() {
            for byte in text.bytes() {
                if self.col() > state.end_col {
                    break 'queue;
                }
                self.write_byte(byte)?;
            }
        }
        if self.col() <= state.end_col {
            let col = self.col();
            self.clear_region(col, state.end_col, state.row, last_row)?;
        }

        if state.queue.len() == 1 && state.queue[0].is_empty() {
            state.queue.clear();
            debug!("ticker idle");
            return Ok(0);
        }

        if state.col > state.begin_col {
            state.col -= 1;
        } else {
            state.skip += 1;
            let head = state.queue[0];
            match head.chars().next() {
                Some(ch) => {
                    if state.skip >= self.char_advance(ch) {
                        state.skip = 0;
                        let rest = &head[ch.len_utf8()..];
                        if rest.is_empty() && state.queue.len() > 1 {
                            state.queue.remove(0);
                        } else {
                            state.queue[0] = rest;
                        }
                    }
                }
                None => {
                    // Exhausted head with more text behind it
                    state.skip = 0;
                    state.queue.remove(0);
                }
            }
        }
        Ok(state.queue.len())
    }
}
