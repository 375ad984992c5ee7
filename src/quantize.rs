//! Millimeter⇄integer quantization.
//!
//! All geometry internal to the packer is strictly integer; this is the
//! single choke point where floating-point millimeter values cross into
//! (and back out of) that integer world, so there is exactly one
//! rounding policy in the whole crate.

use crate::error::{PackError, Result};

/// Converts between millimeter floats and a fixed integer scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantizer {
    scale: i64,
}

impl Quantizer {
    /// Creates a quantizer for the given scale (units per millimeter).
    ///
    /// Fails with `Validation` if `scale <= 0`.
    pub fn new(scale: i64) -> Result<Self> {
        if scale <= 0 {
            return Err(PackError::validation("unit_scale must be positive"));
        }
        Ok(Quantizer { scale })
    }

    /// The configured scale.
    pub fn scale(&self) -> i64 {
        self.scale
    }

    /// Converts a millimeter value to the internal integer unit,
    /// rounding half away from zero.
    pub fn to_int(&self, mm: f64) -> i64 {
        round_half_away_from_zero(mm * self.scale as f64) as i64
    }

    /// Converts an internal integer unit back to millimeters.
    pub fn to_mm(&self, value: i64) -> f64 {
        value as f64 / self.scale as f64
    }
}

fn round_half_away_from_zero(x: f64) -> f64 {
    if x >= 0.0 {
        (x + 0.5).floor()
    } else {
        (x - 0.5).ceil()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_nonpositive_scale() {
        assert!(Quantizer::new(0).is_err());
        assert!(Quantizer::new(-1).is_err());
    }

    #[test]
    fn round_trips_whole_millimeters() {
        let q = Quantizer::new(100).unwrap();
        assert_eq!(q.to_int(40.0), 4000);
        assert_eq!(q.to_mm(4000), 40.0);
    }

    #[test]
    fn rounds_half_away_from_zero() {
        let q = Quantizer::new(1).unwrap();
        assert_eq!(q.to_int(2.5), 3);
        assert_eq!(q.to_int(-2.5), -3);
        assert_eq!(q.to_int(2.4), 2);
    }

    #[test]
    fn fractional_scale_resolution() {
        // scale=100 means 0.01mm resolution.
        let q = Quantizer::new(100).unwrap();
        assert_eq!(q.to_int(12.345), 1235); // 1234.5 rounds away from zero to 1235
    }
}
