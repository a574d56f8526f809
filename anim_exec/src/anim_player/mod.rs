//! Animation playback module
//!
//! Holds the library of named keyframe animations and the playback state
//! machine. Each processing cycle the player advances its elapsed time,
//! interpolates the four joint angles for the current instant and converts
//! them into calibrated PWM demands through [`crate::servo_cal`].

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod anims;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use anims::*;
pub use params::*;
pub use state::*;

use crate::servo_cal::ServoCalError;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during AnimPlayer operation.
#[derive(Debug, thiserror::Error)]
pub enum AnimPlayerError {
    #[error("Could not load the device profile parameters: {0}")]
    ParamLoadError(#[from] util::params::LoadError),

    #[error("No animation matching {0:?} exists in the library")]
    InvalidSelection(String),

    #[error("The animation library is invalid: {0}")]
    InvalidLibrary(String),

    #[error(transparent)]
    CalError(#[from] ServoCalError),

    #[error("Could not initialise the status report archive: {0}")]
    ArchiveInitError(String),

    #[error("The player has not been initialised")]
    NotInitialised,
}
