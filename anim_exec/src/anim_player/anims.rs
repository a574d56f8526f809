//! Animation and keyframe data structures

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use super::AnimPlayerError;
use crate::servo_cal::NUM_SERVOS;
use util::maths;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A timestamped target pose for all four joints.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct Keyframe {
    /// Offset from the start of the animation.
    ///
    /// Units: milliseconds
    pub time_ms: u32,

    /// Target joint angles in [`crate::servo_cal::ServoId`] index order.
    ///
    /// Units: degrees
    pub angles_deg: [i32; NUM_SERVOS],
}

/// A named, immutable sequence of keyframes.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Animation {
    /// Human readable name, also used for selection.
    pub name: String,

    /// Total duration of one pass through the animation.
    ///
    /// Units: milliseconds
    pub duration_ms: u32,

    /// Whether playback wraps around at the end of the animation.
    #[serde(rename = "loop")]
    pub looping: bool,

    /// Keyframes ordered by ascending time offset.
    pub keyframes: Vec<Keyframe>,
}

/// The fixed, indexed collection of animations for one device.
#[derive(Debug, Default, Clone)]
pub struct AnimLibrary {
    animations: Vec<Animation>,

    default_idx: usize,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Animation {
    /// Check the animation's structural invariants.
    ///
    /// A failure here is a configuration defect, the playback engine assumes
    /// a validated library and never re-checks these at runtime.
    pub fn validate(&self, max_angle_deg: i32) -> Result<(), AnimPlayerError> {
        if self.keyframes.is_empty() {
            return Err(AnimPlayerError::InvalidLibrary(format!(
                "animation {:?} has no keyframes",
                self.name
            )));
        }

        if self.duration_ms == 0 {
            return Err(AnimPlayerError::InvalidLibrary(format!(
                "animation {:?} has zero duration",
                self.name
            )));
        }

        let mut prev_time_ms = 0;
        for keyframe in self.keyframes.iter() {
            if keyframe.time_ms < prev_time_ms {
                return Err(AnimPlayerError::InvalidLibrary(format!(
                    "animation {:?} has a keyframe at {} ms after one at {} ms",
                    self.name, keyframe.time_ms, prev_time_ms
                )));
            }
            prev_time_ms = keyframe.time_ms;

            for &angle in keyframe.angles_deg.iter() {
                if angle < 0 || angle > max_angle_deg {
                    return Err(AnimPlayerError::InvalidLibrary(format!(
                        "animation {:?} commands {} degrees, outside [0, {}]",
                        self.name, angle, max_angle_deg
                    )));
                }
            }
        }

        if prev_time_ms > self.duration_ms {
            return Err(AnimPlayerError::InvalidLibrary(format!(
                "animation {:?} has a keyframe at {} ms beyond its {} ms duration",
                self.name, prev_time_ms, self.duration_ms
            )));
        }

        Ok(())
    }

    /// Interpolate the pose at the given elapsed time.
    ///
    /// Before the first keyframe the first pose is returned unmodified, at or
    /// after the last keyframe the last pose is returned unmodified (this
    /// covers the finished state and loop wrap edges). Adjacent keyframes
    /// sharing a timestamp interpolate with fraction zero. Angles are rounded
    /// to the nearest whole degree.
    pub fn pose_at(&self, elapsed_ms: u32) -> [i32; NUM_SERVOS] {
        let first = match self.keyframes.first() {
            Some(k) => k,
            None => return [0; NUM_SERVOS],
        };

        if elapsed_ms <= first.time_ms {
            return first.angles_deg;
        }

        for pair in self.keyframes.windows(2) {
            let (k0, k1) = (&pair[0], &pair[1]);

            if elapsed_ms < k0.time_ms || elapsed_ms > k1.time_ms {
                continue;
            }

            // Degenerate pair, use the earlier keyframe's pose
            let span_ms = k1.time_ms - k0.time_ms;
            if span_ms == 0 {
                return k0.angles_deg;
            }

            let dt = (elapsed_ms - k0.time_ms) as i64;

            let mut pose = [0; NUM_SERVOS];
            for (i, angle) in pose.iter_mut().enumerate() {
                let delta = (k1.angles_deg[i] - k0.angles_deg[i]) as i64;
                *angle = k0.angles_deg[i]
                    + maths::div_to_nearest(dt * delta, span_ms as i64) as i32;
            }
            return pose;
        }

        // At or beyond the last keyframe
        self.keyframes[self.keyframes.len() - 1].angles_deg
    }
}

impl AnimLibrary {
    /// Build a library from a validated set of animations.
    pub fn new(
        animations: Vec<Animation>,
        default_idx: usize,
        max_angle_deg: i32,
    ) -> Result<Self, AnimPlayerError> {
        if animations.is_empty() {
            return Err(AnimPlayerError::InvalidLibrary(
                "the library contains no animations".into(),
            ));
        }

        for anim in animations.iter() {
            anim.validate(max_angle_deg)?;
        }

        if default_idx >= animations.len() {
            return Err(AnimPlayerError::InvalidLibrary(format!(
                "default animation index {} is out of bounds ({} animations)",
                default_idx,
                animations.len()
            )));
        }

        Ok(Self {
            animations,
            default_idx,
        })
    }

    /// Get an animation by index.
    pub fn get(&self, idx: usize) -> Option<&Animation> {
        self.animations.get(idx)
    }

    /// Find an animation's index by name (ASCII case insensitive).
    pub fn find(&self, name: &str) -> Option<usize> {
        self.animations
            .iter()
            .position(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Append a validated animation, returning its index.
    pub fn push(
        &mut self,
        anim: Animation,
        max_angle_deg: i32,
    ) -> Result<usize, AnimPlayerError> {
        anim.validate(max_angle_deg)?;
        self.animations.push(anim);
        Ok(self.animations.len() - 1)
    }

    /// Index of the default (resting) animation.
    pub fn default_idx(&self) -> usize {
        self.default_idx
    }

    /// Number of animations in the library.
    pub fn len(&self) -> usize {
        self.animations.len()
    }

    /// True if the library holds no animations.
    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn ramp() -> Animation {
        Animation {
            name: "Ramp".into(),
            duration_ms: 1000,
            looping: false,
            keyframes: vec![
                Keyframe {
                    time_ms: 0,
                    angles_deg: [10, 10, 10, 10],
                },
                Keyframe {
                    time_ms: 1000,
                    angles_deg: [50, 50, 50, 50],
                },
            ],
        }
    }

    #[test]
    fn test_pose_at_keyframe_boundaries_is_exact() {
        let anim = ramp();

        assert_eq!(anim.pose_at(0), [10; 4]);
        assert_eq!(anim.pose_at(1000), [50; 4]);
    }

    #[test]
    fn test_pose_at_interpolates_linearly() {
        let anim = ramp();

        assert_eq!(anim.pose_at(500), [30; 4]);
        assert_eq!(anim.pose_at(250), [20; 4]);
        assert_eq!(anim.pose_at(750), [40; 4]);
    }

    #[test]
    fn test_pose_at_rounds_to_nearest_degree() {
        let mut anim = ramp();
        anim.keyframes[1].angles_deg = [11, 11, 11, 11];

        // 600/1000 of a 1 degree delta rounds up
        assert_eq!(anim.pose_at(600), [11; 4]);
        // 400/1000 rounds down
        assert_eq!(anim.pose_at(400), [10; 4]);
    }

    #[test]
    fn test_pose_at_outside_keyframe_range() {
        let mut anim = ramp();
        anim.keyframes[0].time_ms = 100;
        anim.keyframes[1].time_ms = 900;

        // Before the first keyframe, hold the first pose
        assert_eq!(anim.pose_at(0), [10; 4]);
        assert_eq!(anim.pose_at(99), [10; 4]);

        // At or after the last, hold the last pose
        assert_eq!(anim.pose_at(900), [50; 4]);
        assert_eq!(anim.pose_at(5000), [50; 4]);
    }

    #[test]
    fn test_pose_at_degenerate_pair() {
        let anim = Animation {
            name: "Step".into(),
            duration_ms: 1000,
            looping: false,
            keyframes: vec![
                Keyframe {
                    time_ms: 0,
                    angles_deg: [0; 4],
                },
                Keyframe {
                    time_ms: 500,
                    angles_deg: [20; 4],
                },
                Keyframe {
                    time_ms: 500,
                    angles_deg: [80; 4],
                },
                Keyframe {
                    time_ms: 1000,
                    angles_deg: [80; 4],
                },
            ],
        };

        // No division by zero, and a deterministic pose at the shared stamp
        assert_eq!(anim.pose_at(500), [20; 4]);
        assert_eq!(anim.pose_at(750), [80; 4]);
    }

    #[test]
    fn test_validate_accepts_good_animation() {
        assert!(ramp().validate(90).is_ok());
    }

    #[test]
    fn test_validate_rejects_defects() {
        // Empty keyframes
        let mut anim = ramp();
        anim.keyframes.clear();
        assert!(anim.validate(90).is_err());

        // Zero duration
        let mut anim = ramp();
        anim.duration_ms = 0;
        assert!(anim.validate(90).is_err());

        // Decreasing offsets
        let mut anim = ramp();
        anim.keyframes[0].time_ms = 2000;
        assert!(anim.validate(90).is_err());

        // Keyframe beyond duration
        let mut anim = ramp();
        anim.duration_ms = 500;
        assert!(anim.validate(90).is_err());

        // Angle outside the domain
        let mut anim = ramp();
        anim.keyframes[1].angles_deg[2] = 120;
        assert!(anim.validate(90).is_err());
    }

    #[test]
    fn test_library_selection() {
        let mut still = ramp();
        still.name = "Resting".into();

        let lib = AnimLibrary::new(vec![still, ramp()], 0, 90).unwrap();

        assert_eq!(lib.len(), 2);
        assert_eq!(lib.find("Resting"), Some(0));
        assert_eq!(lib.find("resting"), Some(0));
        assert_eq!(lib.find("Ramp"), Some(1));
        assert_eq!(lib.find("unknown"), None);
        assert!(lib.get(0).is_some());
        assert!(lib.get(2).is_none());
    }

    #[test]
    fn test_library_rejects_bad_default() {
        assert!(AnimLibrary::new(vec![ramp()], 1, 90).is_err());
        assert!(AnimLibrary::new(vec![], 0, 90).is_err());
    }
}
