//! Utility maths functions
//!
//! All mapping on this project is done in integer arithmetic since the servo
//! driver counts whole PWM ticks and the pose data is whole degrees.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::{PrimInt, Signed};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Map a value from one range into another using integer-proportional
/// interpolation.
///
/// The multiplication is performed before the division so that narrow source
/// ranges do not collapse the result to zero. The target range may be
/// inverted (`target_range.1 < target_range.0`), which is why a signed type
/// is required.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: PrimInt + Signed,
{
    target_range.0
        + ((value - source_range.0) * (target_range.1 - target_range.0)
            / (source_range.1 - source_range.0))
}

/// Constrain a value to the range `[min, max]`.
pub fn clamp<T>(value: T, min: T, max: T) -> T
where
    T: PrimInt,
{
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Divide `num` by `den`, rounding to the nearest integer.
///
/// `den` must be positive. Halves round away from zero.
pub fn div_to_nearest(num: i64, den: i64) -> i64 {
    if num >= 0 {
        (num + den / 2) / den
    } else {
        -((-num + den / 2) / den)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lin_map() {
        // Normal target range
        assert_eq!(lin_map((0, 90), (150, 330), 0), 150);
        assert_eq!(lin_map((0, 90), (150, 330), 45), 240);
        assert_eq!(lin_map((0, 90), (150, 330), 90), 330);

        // Inverted target range
        assert_eq!(lin_map((0, 90), (440, 300), 0), 440);
        assert_eq!(lin_map((0, 90), (440, 300), 45), 370);
        assert_eq!(lin_map((0, 90), (440, 300), 90), 300);

        // Multiplication before division keeps narrow sources exact
        assert_eq!(lin_map((0, 180), (150, 600), 180), 600);
        assert_eq!(lin_map((0, 180), (150, 600), 90), 375);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(-10, 0, 90), 0);
        assert_eq!(clamp(45, 0, 90), 45);
        assert_eq!(clamp(200, 0, 90), 90);
    }

    #[test]
    fn test_div_to_nearest() {
        assert_eq!(div_to_nearest(20000, 1000), 20);
        assert_eq!(div_to_nearest(5, 10), 1);
        assert_eq!(div_to_nearest(4, 10), 0);
        assert_eq!(div_to_nearest(-5, 10), -1);
        assert_eq!(div_to_nearest(-4, 10), 0);
        assert_eq!(div_to_nearest(0, 7), 0);
    }
}
