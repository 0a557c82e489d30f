//! Error types for playback management

use thiserror::Error;

/// Playback errors
///
/// Queue operations never fail; invalid states are reported through
/// sentinel returns (`None`, `-1`). Errors exist only at the engine
/// boundary, where the platform can reject commands (autoplay policy,
/// device loss).
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Engine rejected a play command
    #[error("play rejected: {0}")]
    PlayRejected(String),

    /// Engine rejected a pause command
    #[error("pause rejected: {0}")]
    PauseRejected(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
