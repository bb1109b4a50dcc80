//! Per-frame orchestration: landmarks -> angle -> percentage -> rep count,
//! once per configured limb.

use std::collections::BTreeMap;

use reptrack_core::{joint_angle, Error, LandmarkFrame, PoseLandmark, Position2D, Result, Timestamp};
use serde::{Deserialize, Serialize};

use crate::limb::{LimbId, LimbSpec};
use crate::rep::{Direction, RepStateMachine, Thresholds, Transition};

/// Frame processor configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Extremes that count as a half repetition
    pub thresholds: Thresholds,
    /// Landmarks with a known visibility below this are treated as missing
    pub min_visibility: Option<f32>,
}

/// What a single frame tells us about one limb
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LimbObservation {
    /// All three landmarks present and usable
    Complete { angle: f64, percentage: f64 },
    /// A required landmark is absent or not visible enough
    Missing { landmark: PoseLandmark },
    /// A required landmark has non-finite coordinates
    Malformed { landmark: PoseLandmark },
}

/// Position of one landmark, or the observation explaining why it is unusable
fn locate(
    frame: &LandmarkFrame,
    landmark: PoseLandmark,
    min_visibility: Option<f32>,
) -> std::result::Result<Position2D, LimbObservation> {
    let Some(detection) = frame.get(landmark) else {
        return Err(LimbObservation::Missing { landmark });
    };
    if let Some(min) = min_visibility {
        if !detection.is_visible(min) {
            return Err(LimbObservation::Missing { landmark });
        }
    }
    if !detection.position.is_finite() {
        return Err(LimbObservation::Malformed { landmark });
    }
    Ok(detection.position)
}

/// Shoulder, elbow and wrist positions, checked in that order
fn locate_limb(
    spec: &LimbSpec,
    frame: &LandmarkFrame,
    min_visibility: Option<f32>,
) -> std::result::Result<[Position2D; 3], LimbObservation> {
    Ok([
        locate(frame, spec.shoulder, min_visibility)?,
        locate(frame, spec.elbow, min_visibility)?,
        locate(frame, spec.wrist, min_visibility)?,
    ])
}

/// Classify a limb's inputs for one frame.
pub fn observe(spec: &LimbSpec, frame: &LandmarkFrame, min_visibility: Option<f32>) -> LimbObservation {
    let [shoulder, elbow, wrist] = match locate_limb(spec, frame, min_visibility) {
        Ok(positions) => positions,
        Err(observation) => return observation,
    };

    let angle = joint_angle(&shoulder, &elbow, &wrist);
    if !angle.is_finite() {
        return LimbObservation::Malformed { landmark: spec.elbow };
    }

    LimbObservation::Complete {
        angle,
        percentage: spec.calibration.percentage(angle),
    }
}

/// How a limb's reading was obtained for a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadingStatus {
    /// Updated from this frame's landmarks
    Tracked,
    /// Carried forward; the landmark was absent
    Missing(PoseLandmark),
    /// Carried forward; the landmark had unusable coordinates
    Malformed(PoseLandmark),
}

/// Per-limb output for display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LimbReading {
    /// Completion percentage in `[0, 100]`
    pub percentage: f64,
    /// Repetition count, a multiple of 0.5
    pub count: f64,
    pub direction: Direction,
    /// Last measured joint angle in degrees
    pub angle: Option<f64>,
    pub status: ReadingStatus,
    /// Transition fired by this frame, if any
    pub transition: Option<Transition>,
}

/// Readings for every configured limb after one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    pub timestamp: Timestamp,
    pub readings: BTreeMap<LimbId, LimbReading>,
}

impl FrameResult {
    pub fn get(&self, limb: LimbId) -> Option<&LimbReading> {
        self.readings.get(&limb)
    }
}

#[derive(Debug, Clone)]
struct LimbTracker {
    spec: LimbSpec,
    machine: RepStateMachine,
    percentage: f64,
    angle: Option<f64>,
    last_reading: Option<LimbReading>,
}

impl LimbTracker {
    fn new(spec: LimbSpec, thresholds: Thresholds) -> Self {
        Self {
            spec,
            machine: RepStateMachine::new(thresholds),
            percentage: 0.0,
            angle: None,
            last_reading: None,
        }
    }

    fn step(&mut self, frame: &LandmarkFrame, min_visibility: Option<f32>) -> LimbReading {
        let (status, transition) = match observe(&self.spec, frame, min_visibility) {
            LimbObservation::Complete { angle, percentage } => {
                self.angle = Some(angle);
                self.percentage = percentage;
                let transition = self.machine.update(percentage);
                if let Some(transition) = transition {
                    tracing::debug!(
                        limb = %self.spec.id,
                        ?transition,
                        count = self.machine.count(),
                        "Half repetition"
                    );
                }
                (ReadingStatus::Tracked, transition)
            }
            LimbObservation::Missing { landmark } => {
                tracing::trace!(limb = %self.spec.id, ?landmark, "Landmark missing, carrying state");
                (ReadingStatus::Missing(landmark), None)
            }
            LimbObservation::Malformed { landmark } => {
                tracing::trace!(limb = %self.spec.id, ?landmark, "Malformed landmark, carrying state");
                (ReadingStatus::Malformed(landmark), None)
            }
        };

        let reading = LimbReading {
            percentage: self.percentage,
            count: self.machine.count(),
            direction: self.machine.direction(),
            angle: self.angle,
            status,
            transition,
        };
        self.last_reading = Some(reading);
        reading
    }

    fn reset(&mut self) {
        self.machine.reset();
        self.percentage = 0.0;
        self.angle = None;
        self.last_reading = None;
    }
}

/// Drives one rep state machine per configured limb
#[derive(Debug, Clone)]
pub struct FrameProcessor {
    config: ProcessorConfig,
    trackers: Vec<LimbTracker>,
}

impl FrameProcessor {
    pub fn new(limbs: Vec<LimbSpec>, config: ProcessorConfig) -> Result<Self> {
        if limbs.is_empty() {
            return Err(Error::Config("at least one limb must be configured".to_string()));
        }

        let mut trackers: Vec<LimbTracker> = Vec::with_capacity(limbs.len());
        for spec in limbs {
            if trackers.iter().any(|t| t.spec.id == spec.id) {
                return Err(Error::DuplicateLimb(spec.id.to_string()));
            }
            trackers.push(LimbTracker::new(spec, config.thresholds));
        }

        Ok(Self { config, trackers })
    }

    /// Left and right arm with the default calibration and thresholds
    pub fn with_default_arms() -> Self {
        let config = ProcessorConfig::default();
        Self {
            config,
            trackers: vec![
                LimbTracker::new(LimbSpec::left_arm(), config.thresholds),
                LimbTracker::new(LimbSpec::right_arm(), config.thresholds),
            ],
        }
    }

    /// Process one frame. Frames must arrive in chronological order.
    pub fn process(&mut self, frame: &LandmarkFrame) -> FrameResult {
        let min_visibility = self.config.min_visibility;
        let readings = self
            .trackers
            .iter_mut()
            .map(|tracker| (tracker.spec.id, tracker.step(frame, min_visibility)))
            .collect();

        FrameResult {
            timestamp: frame.timestamp,
            readings,
        }
    }

    /// Return every limb to zero reps, awaiting the top.
    pub fn reset(&mut self) {
        for tracker in &mut self.trackers {
            tracker.reset();
        }
    }

    /// Most recent reading for a limb since the last reset
    pub fn reading(&self, limb: LimbId) -> Option<&LimbReading> {
        self.trackers
            .iter()
            .find(|t| t.spec.id == limb)
            .and_then(|t| t.last_reading.as_ref())
    }

    pub fn count(&self, limb: LimbId) -> Option<f64> {
        self.trackers
            .iter()
            .find(|t| t.spec.id == limb)
            .map(|t| t.machine.count())
    }

    pub fn limbs(&self) -> impl Iterator<Item = &LimbSpec> {
        self.trackers.iter().map(|t| &t.spec)
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }
}
