//! Servo calibration module
//!
//! Converts joint angles into servo-safe PWM pulse widths using per-servo
//! calibrated ranges. Ranges may be inverted (pulse width decreasing with
//! increasing angle) depending on how the servo is mounted.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod map;
mod profiles;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use map::*;
pub use profiles::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// The number of joint servos on the animatronic.
pub const NUM_SERVOS: usize = 4;

/// The number of channels provided by the PWM driver board.
pub const NUM_DRIVER_CHANNELS: u8 = 16;

/// The highest pulse width count the PWM driver can produce.
pub const MAX_DRIVER_PWM: i32 = 4096;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur when building a servo calibration.
#[derive(Debug, thiserror::Error)]
pub enum ServoCalError {
    #[error("Profile for {0:?} is invalid: {1}")]
    InvalidProfile(ServoId, String),

    #[error("Servo channels must be unique, channel {0} is assigned more than once")]
    DuplicateChannel(u8),

    #[error("The maximum joint angle must be positive, got {0}")]
    InvalidDomain(i32),
}
