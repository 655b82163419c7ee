//! Display write primitive
//!
//! Every byte the text engine sends to a controller goes through
//! [`DisplayBus::write_byte`].

/// How a byte should be delivered to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WriteMode {
    /// Controller command byte, always flushed
    Command,
    /// Display RAM byte, flushed immediately
    DataImmediate,
    /// Display RAM byte that may be batched until the next flush boundary
    DataBuffered,
}

impl WriteMode {
    /// True for the two RAM write modes
    pub const fn is_data(self) -> bool {
        !matches!(self, WriteMode::Command)
    }
}

/// Byte-wide display transport
///
/// Implementations may hold `DataBuffered` bytes back, but must deliver
/// them before any `Command` or `DataImmediate` byte and on [`flush`].
///
/// [`flush`]: DisplayBus::flush
pub trait DisplayBus {
    /// Error type for transport failures
    type Error;

    /// Write one byte in the given mode
    fn write_byte(&mut self, value: u8, mode: WriteMode) -> Result<(), Self::Error>;

    /// Deliver any batched data bytes
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Write a sequence of command bytes
    fn write_commands(&mut self, commands: &[u8]) -> Result<(), Self::Error> {
        for &c in commands {
            self.write_byte(c, WriteMode::Command)?;
        }
        Ok(())
    }
}

impl<T: DisplayBus + ?Sized> DisplayBus for &mut T {
    type Error = T::Error;

    fn write_byte(&mut self, value: u8, mode: WriteMode) -> Result<(), Self::Error> {
        (**self).write_byte(value, mode)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        (**self).flush()
    }
}
