//! Debounced repetition state machine.
//!
//! Each limb holds a single direction bit and a running count. A transition
//! fires when the completion percentage reaches the extreme the limb is
//! waiting for; dwelling at that extreme does nothing until the opposite
//! extreme has been reached. Two transitions make one repetition.

use reptrack_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Which extreme the limb is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Waiting for the percentage to approach 100 (full contraction)
    #[default]
    AwaitingTop,
    /// Waiting for the percentage to approach 0 (full extension)
    AwaitingBottom,
}

impl Direction {
    /// `0` while awaiting the top, `1` while awaiting the bottom
    pub fn as_bit(self) -> u8 {
        match self {
            Direction::AwaitingTop => 0,
            Direction::AwaitingBottom => 1,
        }
    }
}

/// Half-cycle event emitted by the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    ReachedTop,
    ReachedBottom,
}

/// Mutable per-limb counting state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RepState {
    pub direction: Direction,
    half_reps: u32,
}

impl RepState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repetition count, always a multiple of 0.5
    pub fn count(&self) -> f64 {
        f64::from(self.half_reps) / 2.0
    }

    pub fn half_reps(&self) -> u32 {
        self.half_reps
    }

    /// Completed repetitions, dropping a pending half
    pub fn full_reps(&self) -> u32 {
        self.half_reps / 2
    }
}

/// Percentage thresholds that count as reaching an extreme
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawThresholds")]
pub struct Thresholds {
    top: f64,
    bottom: f64,
}

impl Thresholds {
    pub fn new(top: f64, bottom: f64) -> Result<Self> {
        if !(0.0..=100.0).contains(&bottom) || !(0.0..=100.0).contains(&top) || bottom >= top {
            return Err(Error::Config(format!(
                "thresholds must satisfy 0 <= bottom < top <= 100, got bottom={bottom} top={top}"
            )));
        }
        Ok(Self { top, bottom })
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn bottom(&self) -> f64 {
        self.bottom
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            top: 99.0,
            bottom: 1.0,
        }
    }
}

#[derive(Deserialize)]
struct RawThresholds {
    top: f64,
    bottom: f64,
}

impl TryFrom<RawThresholds> for Thresholds {
    type Error = Error;

    fn try_from(raw: RawThresholds) -> Result<Self> {
        Self::new(raw.top, raw.bottom)
    }
}

/// Feed one frame's percentage into `state`.
///
/// Returns the transition that fired, if any. Percentages strictly between
/// the thresholds, repeated frames at an already-reached extreme and
/// non-finite percentages leave the state untouched.
pub fn advance(state: &mut RepState, percentage: f64, thresholds: &Thresholds) -> Option<Transition> {
    match state.direction {
        Direction::AwaitingTop if percentage >= thresholds.top => {
            state.half_reps = state.half_reps.saturating_add(1);
            state.direction = Direction::AwaitingBottom;
            Some(Transition::ReachedTop)
        }
        Direction::AwaitingBottom if percentage <= thresholds.bottom => {
            state.half_reps = state.half_reps.saturating_add(1);
            state.direction = Direction::AwaitingTop;
            Some(Transition::ReachedBottom)
        }
        _ => None,
    }
}

/// Rep state machine for a single limb
#[derive(Debug, Clone, Default)]
pub struct RepStateMachine {
    thresholds: Thresholds,
    state: RepState,
}

impl RepStateMachine {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            state: RepState::new(),
        }
    }

    pub fn update(&mut self, percentage: f64) -> Option<Transition> {
        advance(&mut self.state, percentage, &self.thresholds)
    }

    pub fn state(&self) -> RepState {
        self.state
    }

    pub fn count(&self) -> f64 {
        self.state.count()
    }

    pub fn direction(&self) -> Direction {
        self.state.direction
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn reset(&mut self) {
        self.state = RepState::new();
    }
}
