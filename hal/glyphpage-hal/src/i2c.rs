//! I2C display transport
//!
//! Wraps any `embedded-hal` 1.0 I2C master and speaks the SSD1306/SH1106
//! control-byte framing: every transaction starts with `0x00` (command)
//! or `0x40` (display RAM data).

use embedded_hal::i2c::I2c;
use heapless::Vec;

use crate::bus::{DisplayBus, WriteMode};

/// Control byte preceding a command
pub const CONTROL_COMMAND: u8 = 0x00;

/// Control byte preceding display RAM data
pub const CONTROL_DATA: u8 = 0x40;

/// Default controller address (SA0 low)
pub const ADDRESS_PRIMARY: u8 = 0x3C;

/// Alternate controller address (SA0 high)
pub const ADDRESS_ALTERNATE: u8 = 0x3D;

/// Maximum data bytes sent in one batched transaction
pub const BATCH_LEN: usize = 16;

const BATCH_CAPACITY: usize = BATCH_LEN + 1;

/// I2C transport configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// 7-bit controller address
    pub address: u8,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            address: ADDRESS_PRIMARY,
        }
    }
}

impl I2cConfig {
    /// Controller strapped to 0x3C
    pub const PRIMARY: Self = Self {
        address: ADDRESS_PRIMARY,
    };

    /// Controller strapped to 0x3D
    pub const ALTERNATE: Self = Self {
        address: ADDRESS_ALTERNATE,
    };
}

/// Display transport over an I2C master
///
/// `DataBuffered` bytes are collected into one transaction of up to
/// [`BATCH_LEN`] bytes. Commands and immediate data close the batch first.
pub struct I2cDisplayBus<I2C> {
    i2c: I2C,
    config: I2cConfig,
    /// Pending transaction, control byte included
    pending: Vec<u8, BATCH_CAPACITY>,
}

impl<I2C: I2c> I2cDisplayBus<I2C> {
    /// Create a transport for the controller at `config.address`
    pub fn new(i2c: I2C, config: I2cConfig) -> Self {
        Self {
            i2c,
            config,
            pending: Vec::new(),
        }
    }

    /// Release the underlying I2C master
    ///
    /// Batched bytes that were never flushed are dropped.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Number of data bytes waiting to be sent
    pub fn pending_len(&self) -> usize {
        self.pending.len().saturating_sub(1)
    }

    fn push_data(&mut self, value: u8) -> Result<(), I2C::Error> {
        if self.pending.is_empty() {
            // Capacity is at least two, both pushes fit
            let _ = self.pending.push(CONTROL_DATA);
        }
        let _ = self.pending.push(value);
        if self.pending.is_full() {
            self.send_pending()?;
        }
        Ok(())
    }

    fn send_pending(&mut self) -> Result<(), I2C::Error> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let result = self.i2c.write(self.config.address, &self.pending);
        self.pending.clear();
        result
    }
}

impl<I2C: I2c> DisplayBus for I2cDisplayBus<I2C> {
    type Error = I2C::Error;

    fn write_byte(&mut self, value: u8, mode: WriteMode) -> Result<(), Self::Error> {
        match mode {
            WriteMode::Command => {
                self.send_pending()?;
                self.i2c.write(self.config.address, &[CONTROL_COMMAND, value])
            }
            WriteMode::DataImmediate => {
                self.push_data(value)?;
                self.send_pending()
            }
            WriteMode::DataBuffered => self.push_data(value),
        }
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.send_pending()
    }
}
