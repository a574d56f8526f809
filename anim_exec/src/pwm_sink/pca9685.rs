//! [`PwmSink`] implementation for the PCA9685 driver

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use embedded_hal::blocking::i2c::{Write, WriteRead};
use pwm_pca9685::{Channel, Pca9685};

use super::{PwmSink, PwmSinkError};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// The highest count the board's PWM counter reaches.
const MAX_PWM: u16 = 4096;

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<I2C, E> PwmSink for Pca9685<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
{
    fn set_pwm(&mut self, channel: u8, pulse: u16) -> Result<(), PwmSinkError> {
        if pulse > MAX_PWM {
            return Err(PwmSinkError::InvalidPulse);
        }

        let channel = match channel_from_u8(channel) {
            Some(c) => c,
            None => return Err(PwmSinkError::InvalidChannel(channel)),
        };

        // The pulse goes high at count 0 and low at the demanded count
        self.set_channel_on(channel, 0).map_err(map_driver_error)?;
        self.set_channel_off(channel, pulse).map_err(map_driver_error)?;

        Ok(())
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn map_driver_error<E>(error: pwm_pca9685::Error<E>) -> PwmSinkError {
    match error {
        pwm_pca9685::Error::I2C(_) => PwmSinkError::I2c,
        pwm_pca9685::Error::InvalidInputData => PwmSinkError::InvalidPulse,
    }
}

fn channel_from_u8(channel: u8) -> Option<Channel> {
    match channel {
        0 => Some(Channel::C0),
        1 => Some(Channel::C1),
        2 => Some(Channel::C2),
        3 => Some(Channel::C3),
        4 => Some(Channel::C4),
        5 => Some(Channel::C5),
        6 => Some(Channel::C6),
        7 => Some(Channel::C7),
        8 => Some(Channel::C8),
        9 => Some(Channel::C9),
        10 => Some(Channel::C10),
        11 => Some(Channel::C11),
        12 => Some(Channel::C12),
        13 => Some(Channel::C13),
        14 => Some(Channel::C14),
        15 => Some(Channel::C15),
        _ => None,
    }
}
