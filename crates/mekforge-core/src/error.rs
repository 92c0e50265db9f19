//! # Parse Errors
//!
//! Errors produced when turning external strings into core types. Every
//! variant carries the offending input so callers can surface it without
//! re-deriving context.

use thiserror::Error;

/// Failure to parse a core type from its string form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The string named no known severity.
    #[error("unknown severity {0:?} (expected info, warning, error, or critical)")]
    UnknownSeverity(String),

    /// The string named no known rule category.
    #[error("unknown rule category {0:?}")]
    UnknownRuleCategory(String),

    /// The string named no known unit category.
    #[error("unknown unit category {0:?} (expected mech, vehicle, aerospace, or infantry)")]
    UnknownUnitCategory(String),

    /// The string named no known unit subtype.
    #[error("unknown unit subtype {0:?}")]
    UnknownUnitSubtype(String),

    /// The string was not a valid RFC 3339 timestamp.
    #[error("invalid timestamp {0}")]
    InvalidTimestamp(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_offending_input() {
        let err = ParseError::UnknownSeverity("fatal".into());
        assert_eq!(
            err.to_string(),
            "unknown severity \"fatal\" (expected info, warning, error, or critical)"
        );

        let err = ParseError::UnknownUnitSubtype("land_air_mech".into());
        assert_eq!(err.to_string(), "unknown unit subtype \"land_air_mech\"");
    }

    #[test]
    fn implements_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&ParseError::UnknownRuleCategory("ballast".into()));
    }
}
