//! Error taxonomy for label parsing and cache decoding.

/// Errors produced while parsing or decoding a label.
///
/// Out-of-range probabilities and `shared` tokens carrying costs are not
/// errors; they are corrected and reported through [`crate::obs`].
#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    #[error("malformed cost specification: {token:?} splits into {parts} parts (expected 1..=3)")]
    MalformedCostSpec { token: String, parts: usize },

    #[error("NaN cost ({raw}) for action: {action}")]
    NaNCost { action: String, raw: String },

    #[error("NaN probability ({raw}) for action: {action}")]
    NaNProbability { action: String, raw: String },

    #[error("evaluation requires an action and at least one event token, got {tokens} token(s)")]
    MissingEvalAction { tokens: usize },

    #[error("truncated cache record: needed {needed} bytes, got {got}")]
    TruncatedCache { needed: usize, got: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl LabelError {
    /// Whether this error came from the text grammar (the whole line is rejected).
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedCostSpec { .. }
                | Self::NaNCost { .. }
                | Self::NaNProbability { .. }
                | Self::MissingEvalAction { .. }
        )
    }

    /// Whether this error is a short cache read. Callers may treat it as end of data.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::TruncatedCache { .. })
    }
}

/// Result type for label operations.
pub type Result<T> = std::result::Result<T, LabelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_cost_spec_display() {
        let err = LabelError::MalformedCostSpec {
            token: "a:1:2:3".to_string(),
            parts: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("malformed cost specification"));
        assert!(msg.contains("a:1:2:3"));
        assert!(err.is_parse_error());
        assert!(!err.is_truncation());
    }

    #[test]
    fn test_nan_errors_name_the_action() {
        let err = LabelError::NaNCost {
            action: "left".to_string(),
            raw: "nan".to_string(),
        };
        assert!(err.to_string().contains("left"));

        let err = LabelError::NaNProbability {
            action: "right".to_string(),
            raw: "NaN".to_string(),
        };
        assert!(err.to_string().contains("NaN probability"));
        assert!(err.to_string().contains("right"));
    }

    #[test]
    fn test_truncated_cache_is_truncation() {
        let err = LabelError::TruncatedCache { needed: 8, got: 3 };
        assert!(err.is_truncation());
        assert!(!err.is_parse_error());
        assert!(err.to_string().contains("needed 8"));
    }

    #[test]
    fn test_io_error_from() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: LabelError = io.into();
        assert!(err.to_string().contains("io error"));
        assert!(!err.is_parse_error());
    }
}
