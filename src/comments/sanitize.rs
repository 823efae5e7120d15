//! Comment box input filtering
//!
//! Text typed into the comment box is filtered character by character against an
//! allow-list. Nothing is rejected outright: disallowed characters just vanish.

use super::error::{CommentError, CommentResult};

/// Characters a comment may contain
pub const ALLOWED_CHARS: &str =
    "abcdefghijklmnñopqrstuvwxyzABCDEFGJHIJKLMNOPQRSTUVWXYZáéíóúÁÉÍÓÚ ¿?,.!¡;:+=-@#$%&*()_1234567890";

/// Minimum trimmed length of a comment
pub const MIN_COMMENT_LEN: usize = 4;

/// Result of filtering one edit of the comment box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedInput {
    pub text: String,
    /// The raw input ended with a newline, which submits the form
    pub submit: bool,
}

/// Drop every character outside [`ALLOWED_CHARS`]
pub fn sanitize(raw: &str) -> SanitizedInput {
    let text: String = raw.chars().filter(|c| ALLOWED_CHARS.contains(*c)).collect();

    if text.len() != raw.len() {
        tracing::trace!(removed = raw.chars().count() - text.chars().count(), "Sanitized comment input");
    }

    SanitizedInput {
        text,
        submit: raw.ends_with('\n'),
    }
}

/// Check that sanitized text is long enough to post
pub fn validate(text: &str, min_len: usize) -> CommentResult<()> {
    let len = text.trim().chars().count();
    if len < min_len {
        return Err(CommentError::TooShort { len, min: min_len });
    }
    Ok(())
}
