//! Display settings
//!
//! Runtime options applied by `TextDisplay::init` after the geometry's
//! command sequence.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a line feed past the last page is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScrollMode {
    /// The cursor stays on the last line
    #[default]
    Off,
    /// RAM is rotated and the start line follows immediately
    Auto,
    /// RAM is rotated, the application moves the start line itself
    App,
}

impl ScrollMode {
    /// True if line feeds rotate display RAM
    pub const fn is_enabled(self) -> bool {
        !matches!(self, ScrollMode::Off)
    }
}

/// Display settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplaySettings {
    /// Line feed behaviour on the last page
    pub scroll_mode: ScrollMode,
    /// Draw a blank glyph for `' '` when the font lacks one
    pub nonfont_space: bool,
    /// Contrast override, `None` keeps the init sequence value
    pub contrast: Option<u8>,
    /// Hardware-inverted output
    pub inverted: bool,
    /// Rotate the panel 180 degrees
    pub remapped: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            scroll_mode: ScrollMode::Off,
            nonfont_space: true,
            contrast: None,
            inverted: false,
            remapped: false,
        }
    }
}
