//! JSON Lines landmark replay.
//!
//! Each non-blank line holds one frame from the pose detector:
//!
//! ```json
//! {"timestamp_ms": 1200, "landmarks": [{"id": 12, "x": 310.0, "y": 220.5, "visibility": 0.97}]}
//! ```
//!
//! An empty `landmarks` array means no person was detected.

use std::io::BufRead;

use reptrack_core::{Error, Landmark, LandmarkFrame, PoseLandmark, Position2D, Result, Timestamp};
use serde::{Deserialize, Serialize};

/// Serialized form of one detector frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Capture time; the arrival time is used when absent
    #[serde(default)]
    pub timestamp_ms: Option<i64>,
    #[serde(default)]
    pub landmarks: Vec<LandmarkRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkRecord {
    /// Detector index; values outside the schema are dropped, not rejected
    pub id: i64,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub visibility: Option<f32>,
}

impl FrameRecord {
    pub fn parse(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line)?)
    }

    /// Convert to a frame, dropping landmarks outside the schema
    pub fn into_frame(self) -> LandmarkFrame {
        let timestamp = self
            .timestamp_ms
            .map(Timestamp::from_millis)
            .unwrap_or_else(Timestamp::now);

        let detections = self.landmarks.into_iter().filter_map(|record| {
            let known = u8::try_from(record.id).ok().and_then(PoseLandmark::from_index);
            let Some(landmark) = known else {
                tracing::warn!(id = record.id, "Dropping unknown landmark");
                return None;
            };
            Some(Landmark {
                landmark,
                position: Position2D::new(record.x, record.y),
                visibility: record.visibility,
            })
        });

        LandmarkFrame::from_landmarks(timestamp, detections)
    }
}

/// Iterator over frames read from a JSON Lines source
pub struct FrameReader<R> {
    reader: R,
    line_number: usize,
    buffer: String,
}

impl<R: BufRead> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            buffer: String::new(),
        }
    }

    /// Line number of the most recently read line (1-based)
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl<R: BufRead> Iterator for FrameReader<R> {
    type Item = Result<LandmarkFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buffer.clear();
            match self.reader.read_line(&mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line_number += 1;

            let line = self.buffer.trim();
            if line.is_empty() {
                continue;
            }

            return Some(
                FrameRecord::parse(line)
                    .map(FrameRecord::into_frame)
                    .map_err(|e| Error::Serialization(format!("line {}: {e}", self.line_number))),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_frame() {
        let record = FrameRecord::parse(
            r#"{"timestamp_ms": 40, "landmarks": [{"id": 14, "x": 1.5, "y": 2.5, "visibility": 0.9}]}"#,
        )
        .unwrap();
        let frame = record.into_frame();

        assert_eq!(frame.timestamp, Timestamp::from_millis(40));
        let elbow = frame.get(PoseLandmark::RightElbow).unwrap();
        assert_eq!(elbow.position, Position2D::new(1.5, 2.5));
        assert_eq!(elbow.visibility, Some(0.9));
    }

    #[test]
    fn test_unknown_landmark_dropped() {
        let frame = FrameRecord::parse(
            r#"{"timestamp_ms": 0, "landmarks": [{"id": 99, "x": 0, "y": 0}, {"id": 0, "x": 1, "y": 1}]}"#,
        )
        .unwrap()
        .into_frame();
        assert_eq!(frame.len(), 1);
        assert!(frame.get(PoseLandmark::Nose).is_some());
    }

    #[test]
    fn test_out_of_range_id_keeps_rest_of_frame() {
        use reptrack_counter::{FrameProcessor, LimbId, ReadingStatus};

        let frame = FrameRecord::parse(concat!(
            r#"{"timestamp_ms": 0, "landmarks": ["#,
            r#"{"id": 300, "x": 0, "y": 0}, {"id": -1, "x": 0, "y": 0}, "#,
            r#"{"id": 12, "x": 0, "y": 0}, {"id": 14, "x": 50, "y": 0}, "#,
            r#"{"id": 16, "x": 100, "y": 0}]}"#,
        ))
        .unwrap()
        .into_frame();
        assert_eq!(frame.len(), 3);

        let mut processor = FrameProcessor::with_default_arms();
        let result = processor.process(&frame);
        let right = result.get(LimbId::Right).unwrap();
        assert_eq!(right.status, ReadingStatus::Tracked);
    }

    #[test]
    fn test_demo_recording_counts_two_reps() {
        use crate::session::Session;
        use reptrack_counter::{FrameProcessor, LimbId};

        let input = include_str!("../../../demos/curls.jsonl");
        let mut session = Session::new(FrameProcessor::with_default_arms());
        session.start();

        for frame in FrameReader::new(Cursor::new(input)) {
            session.process(&frame.unwrap());
        }

        let summary = session.summary();
        assert_eq!(summary.frames_processed, 16);
        assert_eq!(summary.reps[&LimbId::Left], 2.0);
        assert_eq!(summary.reps[&LimbId::Right], 2.0);
    }

    #[test]
    fn test_reader_skips_blank_and_reports_bad_lines() {
        let input = concat!(
            r#"{"timestamp_ms": 0, "landmarks": []}"#,
            "\n\n",
            "{not json}\n",
            r#"{"timestamp_ms": 20}"#,
            "\n",
        );
        let mut reader = FrameReader::new(Cursor::new(input));

        let first = reader.next().unwrap().unwrap();
        assert!(first.is_empty());

        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(err, Error::Serialization(ref msg) if msg.starts_with("line 3")));

        let last = reader.next().unwrap().unwrap();
        assert_eq!(last.timestamp, Timestamp::from_millis(20));
        assert_eq!(reader.line_number(), 4);
        assert!(reader.next().is_none());
    }
}
