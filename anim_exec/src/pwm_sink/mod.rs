//! # PWM Sink Module
//!
//! This module provides the boundary between the playback core and the
//! hardware: a sink which accepts "set channel X to pulse width Y" writes.
//! The core never talks to the bus directly, which keeps it deterministic
//! and testable off the robot.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// [`PwmSink`] implementation for the PCA9685 16 channel servo driver board.
pub mod pca9685;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::trace;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Trait to provide a unified API for writing pulse widths to servo driver
/// boards.
pub trait PwmSink {
    /// Set the pulse width of a channel.
    ///
    /// ## Arguments
    /// - `channel` - The driver channel to set
    /// - `pulse` - The pulse width count to set. Values beyond the driver's
    ///   counter range will be rejected.
    fn set_pwm(&mut self, channel: u8, pulse: u16) -> Result<(), PwmSinkError>;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Sink which traces writes instead of driving hardware.
///
/// Used on hosts without the I2C bus, and in tests.
#[derive(Default)]
pub struct LogSink;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors which can occur in a [`PwmSink`]
#[derive(thiserror::Error, Debug)]
pub enum PwmSinkError {
    #[error("An I2C error occured")]
    I2c,

    #[error("Pulse width is outside the driver's counter range")]
    InvalidPulse,

    #[error("Channel {0} is not provided by the driver")]
    InvalidChannel(u8),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl PwmSink for LogSink {
    fn set_pwm(&mut self, channel: u8, pulse: u16) -> Result<(), PwmSinkError> {
        trace!("CH{}: pulse width {}", channel, pulse);
        Ok(())
    }
}
