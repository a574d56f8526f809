//! Servo identities and calibration profiles

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use super::NUM_SERVOS;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Identities of the four joint servos.
///
/// The discriminant doubles as the index into fixed-size per-servo arrays.
#[derive(Serialize, Deserialize, Debug, Hash, Eq, PartialEq, Copy, Clone)]
pub enum ServoId {
    RightElbow = 0,
    RightShoulder = 1,
    LeftShoulder = 2,
    LeftElbow = 3,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Calibrated PWM range for a single servo.
///
/// `pwm_at_zero_deg` and `pwm_at_max_deg` are the hardware-verified pulse
/// width counts at the ends of the angle domain. Either endpoint may be the
/// larger one, a servo with `pwm_at_zero_deg > pwm_at_max_deg` is mounted
/// inverted.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy)]
pub struct ServoProfile {
    /// Hardware channel on the PWM driver board
    pub channel: u8,

    /// Pulse width count commanding 0 degrees
    pub pwm_at_zero_deg: i32,

    /// Pulse width count commanding the domain maximum angle
    pub pwm_at_max_deg: i32,
}

/// The full set of calibration profiles for one physical build.
///
/// Deserialised from the device profile parameter file, one table per servo.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy)]
pub struct ServoProfileSet {
    pub right_elbow: ServoProfile,
    pub right_shoulder: ServoProfile,
    pub left_shoulder: ServoProfile,
    pub left_elbow: ServoProfile,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ServoId {
    /// All servo identities in array-index order.
    pub const ALL: [ServoId; NUM_SERVOS] = [
        ServoId::RightElbow,
        ServoId::RightShoulder,
        ServoId::LeftShoulder,
        ServoId::LeftElbow,
    ];

    /// The index of this servo into per-servo arrays.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl ServoProfileSet {
    /// Get the profile for a given servo identity.
    pub fn get(&self, id: ServoId) -> &ServoProfile {
        match id {
            ServoId::RightElbow => &self.right_elbow,
            ServoId::RightShoulder => &self.right_shoulder,
            ServoId::LeftShoulder => &self.left_shoulder,
            ServoId::LeftElbow => &self.left_elbow,
        }
    }

    /// The profiles as an array in [`ServoId`] index order.
    pub fn as_array(&self) -> [ServoProfile; NUM_SERVOS] {
        [
            self.right_elbow,
            self.right_shoulder,
            self.left_shoulder,
            self.left_elbow,
        ]
    }
}
