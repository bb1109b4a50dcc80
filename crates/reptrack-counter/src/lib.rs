//! # Reptrack-Counter
//!
//! Repetition counting from per-frame pose landmarks.
//!
//! ## Pipeline
//!
//! For every tracked limb, once per frame:
//!
//! 1. **Angle** - interior angle at the elbow from shoulder, elbow and wrist
//! 2. **Range** - the angle mapped onto a 0-100 completion percentage, where
//!    100 is full contraction and 0 full extension
//! 3. **Rep** - a debounced edge detector that adds half a repetition each
//!    time the percentage reaches the extreme the limb is waiting for
//!
//! A limb whose landmarks are missing or unusable in a frame keeps its
//! previous percentage and count. Limbs never influence each other.

pub mod limb;
pub mod processor;
pub mod range;
pub mod rep;

pub use limb::*;
pub use processor::*;
pub use range::*;
pub use rep::*;
