//! SSD1306 / SH1106 command bytes
//!
//! Only the commands the text engine and the geometry presets use.

/// Display off (sleep)
pub const DISPLAY_OFF: u8 = 0xAE;
/// Display on
pub const DISPLAY_ON: u8 = 0xAF;
/// Contrast, followed by one value byte
pub const SET_CONTRAST: u8 = 0x81;
/// Resume RAM-driven output
pub const DISPLAY_ALL_ON_RESUME: u8 = 0xA4;
/// Non-inverted output
pub const SET_NORMAL: u8 = 0xA6;
/// Inverted output
pub const SET_INVERSE: u8 = 0xA7;
/// Display offset, followed by one value byte
pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
/// COM pin configuration, followed by one value byte
pub const SET_COM_PINS: u8 = 0xDA;
/// VCOMH deselect level, followed by one value byte
pub const SET_VCOM_DETECT: u8 = 0xDB;
/// Clock divide ratio, followed by one value byte
pub const SET_CLOCK_DIV: u8 = 0xD5;
/// Pre-charge period, followed by one value byte
pub const SET_PRECHARGE: u8 = 0xD9;
/// Multiplex ratio, followed by one value byte
pub const SET_MUX_RATIO: u8 = 0xA8;
/// Low nibble of the column address, OR the nibble in
pub const SET_LOW_COLUMN: u8 = 0x00;
/// High nibble of the column address, OR the nibble in
pub const SET_HIGH_COLUMN: u8 = 0x10;
/// Memory addressing mode, followed by one value byte
pub const SET_MEMORY_MODE: u8 = 0x20;
/// Page address for page addressing mode, OR the page in
pub const SET_PAGE_ADDR: u8 = 0xB0;
/// Display start line, OR the line (0-63) in
pub const SET_START_LINE: u8 = 0x40;
/// Segment remap, OR 1 to map column 127 to SEG0
pub const SET_SEG_REMAP: u8 = 0xA0;
/// COM scan from COM0 upward
pub const SET_COM_SCAN_INC: u8 = 0xC0;
/// COM scan from COM[N-1] downward
pub const SET_COM_SCAN_DEC: u8 = 0xC8;
/// Charge pump, followed by one value byte
pub const SET_CHARGE_PUMP: u8 = 0x8D;

/// True for commands that take one argument byte
pub const fn takes_argument(cmd: u8) -> bool {
    matches!(
        cmd,
        SET_CONTRAST
            | SET_DISPLAY_OFFSET
            | SET_COM_PINS
            | SET_VCOM_DETECT
            | SET_CLOCK_DIV
            | SET_PRECHARGE
            | SET_MUX_RATIO
            | SET_MEMORY_MODE
            | SET_CHARGE_PUMP
    )
}
