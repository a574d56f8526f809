//! Angle to PWM mapping over a set of calibrated servo profiles

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use super::{
    ServoCalError, ServoId, ServoProfile, ServoProfileSet, MAX_DRIVER_PWM, NUM_DRIVER_CHANNELS,
    NUM_SERVOS,
};
use util::maths;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Calibrated angle to PWM mapper for one physical build.
///
/// Purely functional once constructed: the profile set and angle domain are
/// immutable and every mapping operation is deterministic. Out-of-range
/// inputs are clamped rather than rejected, the output is guaranteed to lie
/// within the safe pulse width envelope of the addressed servo.
#[derive(Debug, Clone, Copy)]
pub struct ServoCal {
    profiles: [ServoProfile; NUM_SERVOS],

    /// Highest commandable joint angle. The domain is `[0, max_angle_deg]`.
    max_angle_deg: i32,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ServoCal {
    /// Build a calibration from a profile set, validating it.
    ///
    /// Validation rejects out-of-range pulse widths, channels beyond the
    /// driver board's range, duplicate channel assignments and non-positive
    /// angle domains. A profile set which fails here is a configuration
    /// defect and must not reach the hardware.
    pub fn new(set: &ServoProfileSet, max_angle_deg: i32) -> Result<Self, ServoCalError> {
        if max_angle_deg <= 0 {
            return Err(ServoCalError::InvalidDomain(max_angle_deg));
        }

        for &id in ServoId::ALL.iter() {
            let p = set.get(id);

            if p.channel >= NUM_DRIVER_CHANNELS {
                return Err(ServoCalError::InvalidProfile(
                    id,
                    format!("channel {} exceeds the driver's channel count", p.channel),
                ));
            }

            for &pwm in [p.pwm_at_zero_deg, p.pwm_at_max_deg].iter() {
                if pwm < 0 || pwm > MAX_DRIVER_PWM {
                    return Err(ServoCalError::InvalidProfile(
                        id,
                        format!("pulse width {} is outside the driver's counter range", pwm),
                    ));
                }
            }
        }

        // Channels must be unique across the set
        for (i, &a) in ServoId::ALL.iter().enumerate() {
            for &b in ServoId::ALL[i + 1..].iter() {
                if set.get(a).channel == set.get(b).channel {
                    return Err(ServoCalError::DuplicateChannel(set.get(a).channel));
                }
            }
        }

        Ok(Self {
            profiles: set.as_array(),
            max_angle_deg,
        })
    }

    /// Convert a joint angle into a PWM pulse width for the given servo.
    ///
    /// The angle is clamped to the domain before mapping. The final clamp
    /// uses the order-normalised envelope so that inverted profiles clamp
    /// correctly, the result never leaves the servo's safe envelope whatever
    /// the input.
    pub fn angle_to_pwm(&self, angle_deg: i32, id: ServoId) -> i32 {
        let angle = maths::clamp(angle_deg, 0, self.max_angle_deg);

        let profile = &self.profiles[id.index()];

        let pwm = maths::lin_map(
            (0, self.max_angle_deg),
            (profile.pwm_at_zero_deg, profile.pwm_at_max_deg),
            angle,
        );

        let (env_min, env_max) = self.envelope(id);

        maths::clamp(pwm, env_min, env_max)
    }

    /// True iff the given pulse width lies inside the servo's safe envelope.
    pub fn is_pwm_safe(&self, pwm: i32, id: ServoId) -> bool {
        let (env_min, env_max) = self.envelope(id);
        pwm >= env_min && pwm <= env_max
    }

    /// True iff the angle lies inside the device's angle domain.
    pub fn is_angle_valid(&self, angle_deg: i32) -> bool {
        angle_deg >= 0 && angle_deg <= self.max_angle_deg
    }

    /// The hardware channel assigned to the given servo.
    pub fn channel(&self, id: ServoId) -> u8 {
        self.profiles[id.index()].channel
    }

    /// The highest commandable joint angle.
    pub fn max_angle_deg(&self) -> i32 {
        self.max_angle_deg
    }

    /// The safe pulse width envelope for a servo, normalised so that the
    /// lower bound comes first regardless of inversion.
    fn envelope(&self, id: ServoId) -> (i32, i32) {
        let profile = &self.profiles[id.index()];
        if profile.pwm_at_zero_deg <= profile.pwm_at_max_deg {
            (profile.pwm_at_zero_deg, profile.pwm_at_max_deg)
        } else {
            (profile.pwm_at_max_deg, profile.pwm_at_zero_deg)
        }
    }
}
