//! Tracked limb definitions.

use std::fmt;

use reptrack_core::PoseLandmark;
use serde::{Deserialize, Serialize};

use crate::range::Calibration;

/// Identifier of a tracked limb
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LimbId {
    Left,
    Right,
}

impl LimbId {
    pub fn label(self) -> &'static str {
        match self {
            LimbId::Left => "Left Arm",
            LimbId::Right => "Right Arm",
        }
    }
}

impl fmt::Display for LimbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The three landmarks defining a limb angle, plus its calibration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LimbSpec {
    pub id: LimbId,
    pub shoulder: PoseLandmark,
    /// Vertex of the measured angle
    pub elbow: PoseLandmark,
    pub wrist: PoseLandmark,
    pub calibration: Calibration,
}

impl LimbSpec {
    pub fn left_arm() -> Self {
        Self {
            id: LimbId::Left,
            shoulder: PoseLandmark::LeftShoulder,
            elbow: PoseLandmark::LeftElbow,
            wrist: PoseLandmark::LeftWrist,
            calibration: Calibration::default(),
        }
    }

    pub fn right_arm() -> Self {
        Self {
            id: LimbId::Right,
            shoulder: PoseLandmark::RightShoulder,
            elbow: PoseLandmark::RightElbow,
            wrist: PoseLandmark::RightWrist,
            calibration: Calibration::default(),
        }
    }

    pub fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = calibration;
        self
    }

    /// Landmarks in angle order: shoulder, elbow (vertex), wrist
    pub fn landmarks(&self) -> [PoseLandmark; 3] {
        [self.shoulder, self.elbow, self.wrist]
    }
}
