//! Typed contract failures.
//!
//! Normal numeric flow never errors: every channel write clamps to its valid
//! range, so out-of-domain values are structurally impossible. The only two
//! failure modes are malformed events arriving from the boundary.

use thiserror::Error;

/// Contract violations raised at the stimulus boundary.
///
/// Both are permanent errors in the sense of the tool-error taxonomy:
/// retrying the same event cannot help, the caller built it wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SomaError {
    /// An emotional stimulus arrived without its emotion kind.
    #[error("emotional stimulus is missing its emotion kind")]
    MissingEmotionKind,

    /// A stimulus referenced a region outside the fixed 19-zone set.
    #[error("unknown body zone: {0}")]
    UnknownZone(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SomaError::UnknownZone("tail".to_string());
        assert_eq!(err.to_string(), "unknown body zone: tail");

        let err = SomaError::MissingEmotionKind;
        assert!(err.to_string().contains("emotion kind"));
    }
}
