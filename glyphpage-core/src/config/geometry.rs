//! Device geometry descriptors
//!
//! A geometry pairs panel dimensions with the controller command bytes
//! that bring it up in page addressing mode.

use crate::ssd1306 as cmd;

/// Panel dimensions and initialization sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceGeometry {
    /// Visible width in pixels
    pub width: u8,
    /// Visible height in pixels
    pub height: u8,
    /// Column of controller RAM mapped to the first visible pixel
    pub col_offset: u8,
    /// Command bytes sent by `TextDisplay::init`
    pub init_commands: &'static [u8],
}

impl DeviceGeometry {
    /// Display pages of 8 pixel rows
    pub const fn rows(&self) -> u8 {
        self.height / 8
    }

    /// Geometry without an init sequence, for already configured panels
    pub const fn bare(width: u8, height: u8, col_offset: u8) -> Self {
        Self {
            width,
            height,
            col_offset,
            init_commands: &[],
        }
    }
}

const ADAFRUIT_128X64_INIT: &[u8] = &[
    cmd::DISPLAY_OFF,
    cmd::SET_CLOCK_DIV,
    0x80, // Suggested ratio
    cmd::SET_MUX_RATIO,
    0x3F, // 64 lines
    cmd::SET_DISPLAY_OFFSET,
    0x00,
    cmd::SET_START_LINE,
    cmd::SET_CHARGE_PUMP,
    0x14, // Internal VCC
    cmd::SET_MEMORY_MODE,
    0x02, // Page mode
    cmd::SET_SEG_REMAP | 0x01,
    cmd::SET_COM_SCAN_DEC,
    cmd::SET_COM_PINS,
    0x12, // Alternative COM config
    cmd::SET_CONTRAST,
    0x7F,
    cmd::SET_PRECHARGE,
    0xF1,
    cmd::SET_VCOM_DETECT,
    0x40,
    cmd::DISPLAY_ALL_ON_RESUME,
    cmd::SET_NORMAL,
    cmd::DISPLAY_ON,
];

const ADAFRUIT_128X32_INIT: &[u8] = &[
    cmd::DISPLAY_OFF,
    cmd::SET_CLOCK_DIV,
    0x80,
    cmd::SET_MUX_RATIO,
    0x1F, // 32 lines
    cmd::SET_DISPLAY_OFFSET,
    0x00,
    cmd::SET_START_LINE,
    cmd::SET_CHARGE_PUMP,
    0x14,
    cmd::SET_MEMORY_MODE,
    0x02,
    cmd::SET_SEG_REMAP | 0x01,
    cmd::SET_COM_SCAN_DEC,
    cmd::SET_COM_PINS,
    0x02, // Sequential COM config
    cmd::SET_CONTRAST,
    0x8F,
    cmd::SET_PRECHARGE,
    0xF1,
    cmd::SET_VCOM_DETECT,
    0x40,
    cmd::DISPLAY_ALL_ON_RESUME,
    cmd::SET_NORMAL,
    cmd::DISPLAY_ON,
];

const SH1106_128X64_INIT: &[u8] = &[
    cmd::DISPLAY_OFF,
    cmd::SET_CLOCK_DIV,
    0x80, // Default clock
    cmd::SET_MUX_RATIO,
    0x3F, // 64 lines
    cmd::SET_DISPLAY_OFFSET,
    0x00,
    cmd::SET_START_LINE,
    cmd::SET_CHARGE_PUMP,
    0x14,                      // Enable charge pump
    cmd::SET_SEG_REMAP | 0x01, // Flip horizontally
    cmd::SET_COM_SCAN_DEC,     // Flip vertically
    cmd::SET_COM_PINS,
    0x12,
    cmd::SET_CONTRAST,
    0xCF, // High contrast
    cmd::SET_PRECHARGE,
    0xF1,
    cmd::SET_VCOM_DETECT,
    0x40,
    cmd::SET_NORMAL,
    cmd::DISPLAY_ON,
];

const MICRO_OLED_64X48_INIT: &[u8] = &[
    cmd::DISPLAY_OFF,
    cmd::SET_CLOCK_DIV,
    0x80,
    cmd::SET_MUX_RATIO,
    0x2F, // 48 lines
    cmd::SET_DISPLAY_OFFSET,
    0x00,
    cmd::SET_START_LINE,
    cmd::SET_CHARGE_PUMP,
    0x14,
    cmd::SET_MEMORY_MODE,
    0x02,
    cmd::SET_SEG_REMAP | 0x01,
    cmd::SET_COM_SCAN_DEC,
    cmd::SET_COM_PINS,
    0x12,
    cmd::SET_CONTRAST,
    0x8F,
    cmd::SET_PRECHARGE,
    0xF1,
    cmd::SET_VCOM_DETECT,
    0x40,
    cmd::DISPLAY_ALL_ON_RESUME,
    cmd::SET_NORMAL,
    cmd::DISPLAY_ON,
];

/// SSD1306 128x64 module
pub const ADAFRUIT_128X64: DeviceGeometry = DeviceGeometry {
    width: 128,
    height: 64,
    col_offset: 0,
    init_commands: ADAFRUIT_128X64_INIT,
};

/// SSD1306 128x32 module
pub const ADAFRUIT_128X32: DeviceGeometry = DeviceGeometry {
    width: 128,
    height: 32,
    col_offset: 0,
    init_commands: ADAFRUIT_128X32_INIT,
};

/// SH1106 128x64 module, 132-column RAM centred on the glass
pub const SH1106_128X64: DeviceGeometry = DeviceGeometry {
    width: 128,
    height: 64,
    col_offset: 2,
    init_commands: SH1106_128X64_INIT,
};

/// SSD1306 64x48 module
pub const MICRO_OLED_64X48: DeviceGeometry = DeviceGeometry {
    width: 64,
    height: 48,
    col_offset: 32,
    init_commands: MICRO_OLED_64X48_INIT,
};
