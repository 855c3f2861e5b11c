//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! # Overview
//!
//! The main error type [`TexelError`] covers all failure modes including:
//! - File I/O and document parsing failures
//! - Shader variant compilation errors
//! - Registry misuse (no compilation backend attached)
//! - Texture header probing errors
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for `std::result::Result<T, TexelError>`.
//!
//! ```rust,ignore
//! use texel::errors::{TexelError, Result};
//!
//! fn load_material() -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::resources::channels::TextureChannels;

/// The main error type for the Texel engine.
///
/// Each variant provides specific context about what went wrong.
#[derive(Error, Debug)]
pub enum TexelError {
    // ========================================================================
    // I/O & Document Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON syntax or shape error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A required field is missing or malformed.
    #[error("Failed to parse '{}': {message}", path.display())]
    ParseError {
        /// Document being read
        path: PathBuf,
        /// What was wrong with it
        message: String,
    },

    // ========================================================================
    // Shader Errors
    // ========================================================================
    /// The shader backend rejected a variant.
    #[error("Failed to compile shader variant {channels:?}: {message}")]
    ShaderCompile {
        /// Channel mask of the variant being compiled
        channels: TextureChannels,
        /// Backend diagnostic
        message: String,
    },

    /// The registry was queried without a compilation backend.
    #[error("Invalid context: {0}")]
    InvalidContext(String),

    // ========================================================================
    // Texture Errors
    // ========================================================================
    /// Image header could not be read.
    #[error("Image decode error: {0}")]
    ImageDecodeError(String),
}

// ============================================================================
// Convenient conversion implementations
// ============================================================================

impl From<image::ImageError> for TexelError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(io) => TexelError::IoError(io),
            other => TexelError::ImageDecodeError(other.to_string()),
        }
    }
}

/// Alias for `Result<T, TexelError>`.
pub type Result<T> = std::result::Result<T, TexelError>;
