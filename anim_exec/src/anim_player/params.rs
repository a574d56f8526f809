//! Device profile parameters for the animation player
//!
//! One parameter file per physical build, holding the servo calibration and
//! the animation library. Swapping the file swaps the whole device profile
//! without touching code.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use super::Animation;
use crate::servo_cal::ServoProfileSet;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the animation player.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Params {
    /// Highest commandable joint angle for this build. The angle domain is
    /// `[0, max_angle_deg]`.
    ///
    /// Units: degrees
    pub max_angle_deg: i32,

    /// Index into `animations` of the default (resting) animation, played
    /// when nothing has been selected or a selection fails.
    pub default_animation: usize,

    /// Per-servo calibration profiles.
    pub servos: ServoProfileSet,

    /// The animation library.
    pub animations: Vec<Animation>,
}
