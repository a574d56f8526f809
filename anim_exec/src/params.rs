//! # Animatronic Executable Parameters

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Clone, Default)]
pub struct AnimExecParams {
    /// Name of the device profile parameter file to load, relative to the
    /// params directory. Swapping this swaps the whole physical build.
    pub device_profile: String,

    /// Period of the control cycle.
    ///
    /// Units: milliseconds
    pub cycle_period_ms: u64,

    /// Half period of the sweep self-test (time from 0 degrees to the domain
    /// maximum).
    ///
    /// Units: milliseconds
    pub sweep_half_period_ms: u32,

    /// I2C address of the PWM driver board.
    pub i2c_address: u8,

    /// Prescale value setting the driver's PWM frequency.
    pub pwm_prescale: u8,
}
