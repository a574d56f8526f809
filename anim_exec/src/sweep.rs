//! Servo sweep self-test
//!
//! The sweep is not a separate mode with its own mapping logic: it is an
//! ordinary ping-pong animation generated at runtime and played through the
//! same player and calibration as everything else.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use crate::anim_player::{Animation, Keyframe};
use crate::servo_cal::NUM_SERVOS;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Name of the generated sweep animation.
pub const SWEEP_ANIM_NAME: &str = "Sweep Self Test";

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Build the sweep self-test animation for a device.
///
/// A looping three-keyframe ping-pong: all joints ramp from 0 degrees up to
/// the domain maximum over `half_period_ms`, then back down. One loop
/// exercises the full travel of every servo.
pub fn sweep_animation(max_angle_deg: i32, half_period_ms: u32) -> Animation {
    Animation {
        name: SWEEP_ANIM_NAME.into(),
        duration_ms: half_period_ms * 2,
        looping: true,
        keyframes: vec![
            Keyframe {
                time_ms: 0,
                angles_deg: [0; NUM_SERVOS],
            },
            Keyframe {
                time_ms: half_period_ms,
                angles_deg: [max_angle_deg; NUM_SERVOS],
            },
            Keyframe {
                time_ms: half_period_ms * 2,
                angles_deg: [0; NUM_SERVOS],
            },
        ],
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sweep_animation_shape() {
        let anim = sweep_animation(90, 3000);

        assert_eq!(anim.name, SWEEP_ANIM_NAME);
        assert_eq!(anim.duration_ms, 6000);
        assert!(anim.looping);
        assert_eq!(anim.keyframes.len(), 3);
        assert!(anim.validate(90).is_ok());
    }

    #[test]
    fn test_sweep_is_symmetric() {
        let anim = sweep_animation(90, 3000);

        // Same pose at equal distances either side of the peak
        assert_eq!(anim.pose_at(1000), anim.pose_at(5000));
        assert_eq!(anim.pose_at(3000), [90; 4]);
        assert_eq!(anim.pose_at(0), [0; 4]);
        assert_eq!(anim.pose_at(6000), [0; 4]);
    }

    #[test]
    fn test_sweep_full_domain_variant() {
        let anim = sweep_animation(180, 1000);

        assert_eq!(anim.pose_at(1000), [180; 4]);
        assert!(anim.validate(180).is_ok());
    }
}
