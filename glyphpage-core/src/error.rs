//! Error types
//!
//! Rendering failures are local: out-of-range characters and malformed
//! UTF-8 are reported through return values, never as errors. Only a
//! missing font on the ticker path and transport failures surface here.

/// Errors from display operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The display transport rejected a write
    Bus(E),
    /// The operation needs a font and none is bound
    NoFont,
}

/// Errors from binding a font blob
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontError {
    /// Blob is shorter than the fixed header
    Truncated,
    /// UTF-8 sub-header offset points past the end of the blob
    Utf8HeaderOutOfRange,
}

/// Errors from feeding the ticker queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickerError {
    /// Queue already holds the maximum number of strings
    QueueFull,
}
