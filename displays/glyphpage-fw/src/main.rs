//! Glyphpage demo firmware
//!
//! Drives a 128x64 OLED on I2C1 (PB6=SCL, PB7=SDA) of an STM32F042K6: a
//! title line, a status line rewritten once a second, and a marquee on
//! the bottom row.

#![no_std]
#![no_main]

use core::fmt::Write;

use defmt::{debug, error, info, warn, Debug2Format};
use embassy_executor::Spawner;
use embassy_stm32::i2c::{self, I2c};
use embassy_time::{Duration, Instant, Ticker};
use glyphpage_core::config::SH1106_128X64;
use glyphpage_core::font::SYSTEM_5X7;
use glyphpage_core::{DisplaySettings, Font, ScrollMode, TextDisplay};
use glyphpage_hal::{I2cConfig, I2cDisplayBus};
use {defmt_rtt as _, panic_probe as _};

/// Marquee frame period
const TICK_MS: u64 = 30;

/// Bottom text row
const TICKER_ROW: u8 = 7;

const MESSAGES: [&str; 3] = [
    "glyphpage ticker demo  ",
    "5x7 system font, 1 px per tick  ",
    "line feeds scroll RAM pages  ",
];

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("glyphpage demo starting");

    let p = embassy_stm32::init(Default::default());

    let mut i2c_config = i2c::Config::default();
    i2c_config.timeout = Duration::from_millis(100);
    let i2c = I2c::new_blocking(p.I2C1, p.PB6, p.PB7, i2c_config);

    let bus = I2cDisplayBus::new(i2c, I2cConfig::PRIMARY);
    let mut display = TextDisplay::new(bus, SH1106_128X64);
    let settings = DisplaySettings {
        scroll_mode: ScrollMode::Off,
        ..DisplaySettings::default()
    };
    if let Err(e) = display.init(settings) {
        error!("display init failed: {:?}", Debug2Format(&e));
        return;
    }

    let font = match Font::new(SYSTEM_5X7) {
        Ok(font) => font,
        Err(e) => {
            error!("font rejected: {:?}", e);
            return;
        }
    };
    display.set_font(font);
    display.home().ok();
    display.write_text("glyphpage v0.1").ok();
    info!("OLED initialized");

    let mut ticker = display.ticker_init(Some(font), TICKER_ROW, false, 0, 127);
    for message in MESSAGES {
        ticker.push(message).ok();
    }

    let mut frame = Ticker::every(Duration::from_millis(TICK_MS));
    let mut last_status = 0;
    loop {
        frame.next().await;

        match display.ticker_tick(&mut ticker) {
            Ok(0) => {
                debug!("marquee finished, restarting");
                for message in MESSAGES {
                    ticker.push(message).ok();
                }
            }
            Ok(_) => {}
            Err(e) => warn!("ticker tick failed: {:?}", Debug2Format(&e)),
        }

        let secs = Instant::now().as_secs();
        if secs != last_status {
            last_status = secs;
            display.set_cursor(0, 2).ok();
            write!(display, "uptime {}s", secs).ok();
            display.clear_to_eol().ok();
        }
    }
}
