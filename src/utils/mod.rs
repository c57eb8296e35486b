//! Utility Module
//!
//! - [`OrbitControls`]: camera orbit controller for interactive viewing
//! - [`FrameClock`]: frame timing, wall-clock or stepped

pub mod orbit_control;
pub mod time;

pub use orbit_control::OrbitControls;
pub use time::FrameClock;
