//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! # Overview
//!
//! Almost nothing in the sequencing core fails in normal flow: missing clips, anchors
//! or assets degrade to a fallback with a logged warning. [`VignetteError`] covers the
//! few places that do report failure:
//! - Configuration loading and parsing
//! - Actor asset sources
//! - Out-of-range clip lookups requested by the caller
//! - The desktop event loop (with the `winit` feature)
//!
//! # Usage
//!
//! ```rust,ignore
//! use vignette::errors::Result;
//! use vignette::config::VignetteConfig;
//!
//! fn load() -> Result<VignetteConfig> {
//!     VignetteConfig::load("vignette.json")
//! }
//! ```

use thiserror::Error;

/// The main error type for the vignette engine.
#[derive(Error, Debug)]
pub enum VignetteError {
    // ========================================================================
    // Asset Errors
    // ========================================================================
    /// The requested asset could not be resolved by the source.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// The asset was found but its contents are unusable.
    #[error("Invalid asset {path}: {reason}")]
    InvalidAsset {
        /// Where the asset was read from
        path: String,
        /// What was wrong with it
        reason: String,
    },

    /// A clip index outside the actor's clip list.
    #[error("Clip index out of bounds for {actor}: {index} (clip count: {len})")]
    ClipIndexOutOfBounds {
        /// Actor label the lookup was made for
        actor: String,
        /// The invalid index
        index: usize,
        /// Number of clips available
        len: usize,
    },

    /// A direct clip request while the scripted sequence owns the actors.
    #[error("Cannot play clip {index} on {actor} while the sequence is running")]
    SequenceRunning {
        /// Actor label the clip was requested for
        actor: String,
        /// The requested index
        index: usize,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// JSON parsing error.
    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ========================================================================
    // Platform Errors
    // ========================================================================
    /// The window event loop could not be created or run.
    #[cfg(feature = "winit")]
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Alias for `Result<T, VignetteError>`.
pub type Result<T> = std::result::Result<T, VignetteError>;
