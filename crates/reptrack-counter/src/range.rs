//! Angle to completion percentage mapping.
//!
//! The mapping is inverted: the contracted angle maps to 100% and the
//! extended angle to 0%, so a percentage near 100 means the limb is fully
//! flexed.

use reptrack_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Calibration pair for one limb, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCalibration")]
pub struct Calibration {
    angle_low: f64,
    angle_high: f64,
}

impl Calibration {
    /// `angle_low` is the contracted angle, `angle_high` the extended one.
    pub fn new(angle_low: f64, angle_high: f64) -> Result<Self> {
        if !angle_low.is_finite() || !angle_high.is_finite() || angle_low >= angle_high {
            return Err(Error::InvalidCalibration {
                low: angle_low,
                high: angle_high,
            });
        }
        Ok(Self {
            angle_low,
            angle_high,
        })
    }

    pub fn angle_low(&self) -> f64 {
        self.angle_low
    }

    pub fn angle_high(&self) -> f64 {
        self.angle_high
    }

    /// Completion percentage in `[0, 100]` for a finite angle.
    ///
    /// Angles outside the calibration range clamp to the nearest end.
    /// A non-finite angle yields `NaN`.
    pub fn percentage(&self, angle: f64) -> f64 {
        if !angle.is_finite() {
            return f64::NAN;
        }
        let span = self.angle_high - self.angle_low;
        let t = ((angle - self.angle_low) / span).clamp(0.0, 1.0);
        100.0 * (1.0 - t)
    }
}

#[derive(Deserialize)]
struct RawCalibration {
    angle_low: f64,
    angle_high: f64,
}

impl TryFrom<RawCalibration> for Calibration {
    type Error = Error;

    fn try_from(raw: RawCalibration) -> Result<Self> {
        Self::new(raw.angle_low, raw.angle_high)
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            angle_low: 35.0,
            angle_high: 165.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverted_endpoints() {
        let cal = Calibration::default();
        assert_eq!(cal.percentage(35.0), 100.0);
        assert_eq!(cal.percentage(165.0), 0.0);
    }

    #[test]
    fn test_midrange() {
        let cal = Calibration::default();
        let per = cal.percentage(100.0);
        assert!((per - 50.0).abs() < 1e-9);

        let per = cal.percentage(95.0);
        assert!((per - 53.846_153_846).abs() < 1e-6);
    }

    #[test]
    fn test_clamping() {
        let cal = Calibration::default();
        for angle in [-720.0, -1.0, 0.0, 10.0, 34.9, 165.1, 180.0, 359.0, 1e9] {
            let per = cal.percentage(angle);
            assert!((0.0..=100.0).contains(&per), "angle {angle} gave {per}");
        }
        assert_eq!(cal.percentage(0.0), 100.0);
        assert_eq!(cal.percentage(180.0), 0.0);
    }

    #[test]
    fn test_non_finite_angle() {
        let cal = Calibration::default();
        assert!(cal.percentage(f64::NAN).is_nan());
        assert!(cal.percentage(f64::INFINITY).is_nan());
    }

    #[test]
    fn test_invalid_calibration() {
        assert!(matches!(
            Calibration::new(90.0, 90.0),
            Err(Error::InvalidCalibration { .. })
        ));
        assert!(Calibration::new(165.0, 35.0).is_err());
        assert!(Calibration::new(f64::NAN, 35.0).is_err());
        assert!(Calibration::new(35.0, f64::INFINITY).is_err());
        assert!(Calibration::new(40.0, 160.0).is_ok());
    }

    #[test]
    fn test_deserialize_validates() {
        let cal: Calibration =
            serde_json::from_str(r#"{"angle_low": 30.0, "angle_high": 170.0}"#).unwrap();
        assert_eq!(cal.angle_low(), 30.0);

        let bad = serde_json::from_str::<Calibration>(r#"{"angle_low": 90.0, "angle_high": 90.0}"#);
        assert!(bad.is_err());
    }
}
