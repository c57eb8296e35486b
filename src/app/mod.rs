//! Input plumbing and the optional desktop window runner.

pub mod input;

#[cfg(feature = "winit")]
pub mod input_adapter;
#[cfg(feature = "winit")]
pub mod window;

#[cfg(feature = "winit")]
pub use window::App;
