//! Comment widget error types

use thiserror::Error;

/// Errors that can occur in the comments layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommentError {
    /// The thread for a target has not been loaded yet
    #[error("Comments not loaded for target {0}")]
    NotLoaded(u64),

    /// The store rejected or failed to deliver a new comment
    #[error("Failed to post comment: {0}")]
    PostFailed(String),

    /// Sanitized text is below the minimum length
    #[error("Comment too short: {len} characters, at least {min} required")]
    TooShort { len: usize, min: usize },

    /// No target is selected
    #[error("No target selected")]
    NoTarget,

    /// Backing store could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for comment operations
pub type CommentResult<T> = Result<T, CommentError>;
