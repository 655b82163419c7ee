//! Glyphpage Hardware Abstraction Layer
//!
//! This crate defines the single point of contact between the text engine
//! and a display controller: a byte-wide write primitive tagged with a
//! [`WriteMode`]. Transports implement [`DisplayBus`] for whatever bus
//! connects them to the panel.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  glyphpage-core (fonts, cursor, ticker) │
//! └─────────────────────────────────────────┘
//!                     │ write_byte(value, mode)
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  glyphpage-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  I2cDisplayBus<embedded_hal::i2c::I2c>  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`bus::DisplayBus`] - Command/data byte writes with optional batching

#![no_std]
#![deny(unsafe_code)]

pub mod bus;
pub mod i2c;

// Re-export key types at crate root for convenience
pub use bus::{DisplayBus, WriteMode};
pub use i2c::{I2cConfig, I2cDisplayBus};
