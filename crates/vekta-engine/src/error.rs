//! Error taxonomy for the preview engine.

/// Errors surfaced to the user through the single message channel.
///
/// All variants are recoverable: none of them corrupt parameter,
/// session, or sequencer state, and the last good preview stays
/// mounted. The next user action (new file, another edit) proceeds
/// normally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The selected file is not an acceptable image. Raised before any
    /// network call.
    #[error("invalid file: {0}")]
    Validation(String),

    /// Upload or reprocess failed: network error, non-success status,
    /// or a malformed response body.
    #[error("transform request failed: {0}")]
    Transport(String),

    /// The follow-up fetch of the vector content failed after a
    /// nominally successful upload or reprocess.
    #[error("failed to fetch vector content: {0}")]
    ContentFetch(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_strings() {
        assert_eq!(
            EngineError::Validation("unsupported file type: a.txt".into()).to_string(),
            "invalid file: unsupported file type: a.txt"
        );
        assert_eq!(
            EngineError::Transport("status 500".into()).to_string(),
            "transform request failed: status 500"
        );
        assert_eq!(
            EngineError::ContentFetch("status 404".into()).to_string(),
            "failed to fetch vector content: status 404"
        );
    }
}
