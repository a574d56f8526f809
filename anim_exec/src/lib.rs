//! # Animatronic Control Library
//!
//! Core library for the hatchling animatronic: converts time-indexed keyframe
//! animations into calibrated PWM pulse widths for the four leg servos
//! (shoulder and elbow on each of two legs).
//!
//! The library is split into two core modules and their supporting cast:
//! - [`servo_cal`] - per-servo angle to PWM calibration mapping
//! - [`anim_player`] - keyframe interpolation and playback state machine
//! - [`sweep`] - self-test animation generator, played through [`anim_player`]
//! - [`pwm_sink`] - hardware sink abstraction for the PWM driver board

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Keyframe animation playback engine.
pub mod anim_player;

/// Parameters for the animatronic executable.
pub mod params;

/// Sink abstraction used to write PWM values to the driver board.
pub mod pwm_sink;

/// Per-servo angle to PWM calibration.
pub mod servo_cal;

/// Servo sweep self-test animation.
pub mod sweep;
