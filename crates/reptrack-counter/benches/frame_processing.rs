//! Benchmarks for the per-frame counting pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use reptrack_core::{joint_angle, Landmark, LandmarkFrame, Position2D, Timestamp};
use reptrack_counter::{advance, Calibration, FrameProcessor, LimbSpec, RepState, Thresholds};

fn create_arm_frame(angle: f64, timestamp: i64) -> LandmarkFrame {
    let detections = [LimbSpec::left_arm(), LimbSpec::right_arm()]
        .into_iter()
        .flat_map(|spec| {
            let theta = angle.to_radians();
            [
                Landmark::new(spec.shoulder, Position2D::new(300.0, 200.0)).with_visibility(0.98),
                Landmark::new(spec.elbow, Position2D::new(300.0, 300.0)).with_visibility(0.97),
                Landmark::new(
                    spec.wrist,
                    Position2D::new(300.0 + 100.0 * theta.sin(), 300.0 - 100.0 * theta.cos()),
                )
                .with_visibility(0.95),
            ]
        });

    LandmarkFrame::from_landmarks(Timestamp::from_millis(timestamp), detections)
}

fn benchmark_angle(c: &mut Criterion) {
    let shoulder = Position2D::new(312.0, 201.0);
    let elbow = Position2D::new(298.0, 305.0);
    let wrist = Position2D::new(351.0, 240.0);

    c.bench_function("joint_angle", |b| {
        b.iter(|| joint_angle(black_box(&shoulder), black_box(&elbow), black_box(&wrist)))
    });

    let calibration = Calibration::default();
    c.bench_function("calibration_percentage", |b| {
        b.iter(|| calibration.percentage(black_box(97.5)))
    });
}

fn benchmark_state_machine(c: &mut Criterion) {
    let thresholds = Thresholds::default();
    let percentages: Vec<f64> = (0..1000).map(|i| ((i as f64) * 0.1).sin() * 50.0 + 50.0).collect();

    c.bench_function("advance_1000", |b| {
        b.iter(|| {
            let mut state = RepState::new();
            for &p in &percentages {
                advance(&mut state, black_box(p), &thresholds);
            }
            state
        })
    });
}

fn benchmark_processor(c: &mut Criterion) {
    let frames: Vec<LandmarkFrame> = (0..300)
        .map(|i| {
            let phase = (i as f64 * 0.05).sin();
            create_arm_frame(100.0 + 70.0 * phase, i * 20)
        })
        .collect();

    c.bench_function("process_300_frames", |b| {
        b.iter(|| {
            let mut processor = FrameProcessor::with_default_arms();
            for frame in &frames {
                black_box(processor.process(frame));
            }
        })
    });
}

criterion_group!(benches, benchmark_angle, benchmark_state_machine, benchmark_processor);
criterion_main!(benches);
