//! Session control: start, stop and reset around a frame processor.

use std::collections::BTreeMap;

use reptrack_core::LandmarkFrame;
use reptrack_counter::{FrameProcessor, FrameResult, LimbId};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Fresh session, never started
    Idle,
    Running,
    Stopped,
}

/// A counting session driven by the excluded UI layer
#[derive(Debug, Clone)]
pub struct Session {
    processor: FrameProcessor,
    state: SessionState,
    frames_processed: u64,
}

/// Totals reported when a session ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub frames_processed: u64,
    pub reps: BTreeMap<LimbId, f64>,
}

impl Session {
    pub fn new(processor: FrameProcessor) -> Self {
        Self {
            processor,
            state: SessionState::Idle,
            frames_processed: 0,
        }
    }

    /// Begin accepting frames. Starting after a stop begins a new set from zero.
    pub fn start(&mut self) {
        match self.state {
            SessionState::Running => return,
            SessionState::Stopped => self.reset(),
            SessionState::Idle => {}
        }
        self.state = SessionState::Running;
        tracing::info!("Session started");
    }

    pub fn stop(&mut self) {
        if self.state == SessionState::Running {
            self.state = SessionState::Stopped;
            tracing::info!(frames = self.frames_processed, "Session stopped");
        }
    }

    /// Reinitialize every limb to zero reps, awaiting the top.
    pub fn reset(&mut self) {
        self.processor.reset();
        self.frames_processed = 0;
        tracing::debug!("Session reset");
    }

    /// Process one frame; ignored unless the session is running.
    pub fn process(&mut self, frame: &LandmarkFrame) -> Option<FrameResult> {
        if self.state != SessionState::Running {
            tracing::trace!("Frame ignored, session not running");
            return None;
        }
        self.frames_processed += 1;
        Some(self.processor.process(frame))
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    pub fn processor(&self) -> &FrameProcessor {
        &self.processor
    }

    pub fn summary(&self) -> SessionSummary {
        let reps = self
            .processor
            .limbs()
            .filter_map(|spec| self.processor.count(spec.id).map(|count| (spec.id, count)))
            .collect();

        SessionSummary {
            frames_processed: self.frames_processed,
            reps,
        }
    }
}
