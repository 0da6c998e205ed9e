//! Error types for the fallible seams of the arcade
//!
//! Only configuration errors are fatal. Audio and storage errors are logged by
//! their callers and never reach gameplay code.

use thiserror::Error;

/// Fatal errors while setting up a session or its drawing surface
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no browser window available")]
    NoWindow,
    #[error("canvas element `{0}` not found")]
    CanvasNotFound(String),
    #[error("2d rendering context unavailable")]
    NoContext,
    #[error("invalid logical size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("no game registered at index {0}")]
    UnknownGame(usize),
    #[error("game `{0}` is still locked")]
    Locked(String),
}

/// Sound synthesis failures (always swallowed by `SoundManager`)
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio context unavailable: {0}")]
    Unavailable(String),
    #[error("failed to build audio node: {0}")]
    Node(String),
}

/// Key-value persistence failures
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("failed to write `{key}`: {reason}")]
    Write { key: String, reason: String },
    #[error("failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
}
