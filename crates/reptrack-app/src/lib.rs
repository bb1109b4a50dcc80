//! # Reptrack-App
//!
//! Application layer around the rep counter: configuration loading, session
//! control, display values for the renderer and JSON Lines landmark replay.

pub mod config;
pub mod display;
pub mod replay;
pub mod session;

pub use self::config::*;
pub use display::*;
pub use replay::*;
pub use session::*;
