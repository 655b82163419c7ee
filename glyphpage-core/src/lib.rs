//! Text rendering core for page-addressed monochrome OLED displays
//!
//! This crate contains everything between a stream of text bytes and the
//! display write primitive:
//!
//! - Binary font table decoding and glyph lookup (ASCII and UTF-8)
//! - Byte-at-a-time UTF-8 reassembly
//! - Glyph rasterizing with 2x magnification and partial-row alignment
//! - Cursor tracking, line feeds and hardware page scrolling
//! - Scrolling marquee (ticker) animation driven by explicit ticks
//! - Device geometry presets and display settings

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod config;
pub mod cursor;
pub mod display;
pub mod error;
pub mod font;
pub mod raster;
pub mod ssd1306;
pub mod ticker;
pub mod utf8;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types
pub use config::{DeviceGeometry, DisplaySettings, ScrollMode};
pub use cursor::{Cursor, LineAdvance, ScrollHint};
pub use display::{Magnification, TextDisplay};
pub use error::{Error, FontError, TickerError};
pub use font::{Font, FontSource, Glyph};
pub use ticker::{TickerState, TICKER_QUEUE_DIM};
pub use utf8::{Utf8Accumulator, Utf8Step};
