//! Integer display values for the rendering layer.

use std::fmt;

use reptrack_counter::{FrameResult, LimbId, LimbReading};
use serde::{Deserialize, Serialize};

const COLD: [u8; 3] = [255, 0, 0];
const HOT: [u8; 3] = [0, 255, 0];

/// Progress bar colour, blending red at 0% into green at 100%
pub fn progress_color(percentage: u8) -> [u8; 3] {
    let t = f64::from(percentage.min(100)) / 100.0;
    let mut color = [0u8; 3];
    for (channel, (cold, hot)) in color.iter_mut().zip(COLD.iter().zip(HOT.iter())) {
        let value = f64::from(*cold) + t * (f64::from(*hot) - f64::from(*cold));
        *channel = value as u8;
    }
    color
}

/// One limb's values as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayReading {
    pub limb: LimbId,
    /// Completion percentage, truncated
    pub percentage: u8,
    /// Completed repetitions; a pending half does not show
    pub reps: u32,
    pub color: [u8; 3],
}

impl DisplayReading {
    pub fn new(limb: LimbId, reading: &LimbReading) -> Self {
        // NaN casts to 0
        let percentage = reading.percentage.clamp(0.0, 100.0) as u8;
        Self {
            limb,
            percentage,
            reps: reading.count.max(0.0) as u32,
            color: progress_color(percentage),
        }
    }

    /// Display values for every limb in a frame result
    pub fn from_result(result: &FrameResult) -> Vec<Self> {
        result
            .readings
            .iter()
            .map(|(limb, reading)| Self::new(*limb, reading))
            .collect()
    }

    pub fn color_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.color[0], self.color[1], self.color[2])
    }
}

impl fmt::Display for DisplayReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} reps ({}%)", self.limb, self.reps, self.percentage)
    }
}

/// Single text line for a whole frame
pub fn format_frame(result: &FrameResult) -> String {
    DisplayReading::from_result(result)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use reptrack_core::Timestamp;
    use reptrack_counter::{Direction, ReadingStatus};
    use std::collections::BTreeMap;

    fn reading(percentage: f64, count: f64) -> LimbReading {
        LimbReading {
            percentage,
            count,
            direction: Direction::AwaitingTop,
            angle: None,
            status: ReadingStatus::Tracked,
            transition: None,
        }
    }

    #[test]
    fn test_truncation() {
        let display = DisplayReading::new(LimbId::Right, &reading(54.6, 1.5));
        assert_eq!(display.percentage, 54);
        assert_eq!(display.reps, 1);
        assert_eq!(display.to_string(), "Right Arm: 1 reps (54%)");
    }

    #[test]
    fn test_non_finite_percentage() {
        let display = DisplayReading::new(LimbId::Left, &reading(f64::NAN, 0.5));
        assert_eq!(display.percentage, 0);
        assert_eq!(display.reps, 0);
    }

    #[test]
    fn test_progress_color() {
        assert_eq!(progress_color(0), [255, 0, 0]);
        assert_eq!(progress_color(100), [0, 255, 0]);
        assert_eq!(progress_color(50), [127, 127, 0]);
        assert_eq!(progress_color(200), [0, 255, 0]);
    }

    #[test]
    fn test_color_hex() {
        let display = DisplayReading::new(LimbId::Left, &reading(100.0, 0.0));
        assert_eq!(display.color_hex(), "#00ff00");
    }

    #[test]
    fn test_format_frame() {
        let mut readings = BTreeMap::new();
        readings.insert(LimbId::Right, reading(0.0, 3.0));
        readings.insert(LimbId::Left, reading(100.0, 2.5));
        let result = FrameResult {
            timestamp: Timestamp::from_nanos(0),
            readings,
        };

        assert_eq!(
            format_frame(&result),
            "Left Arm: 2 reps (100%) | Right Arm: 3 reps (0%)"
        );
    }
}
