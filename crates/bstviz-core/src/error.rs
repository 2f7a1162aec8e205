//! Engine errors.

use thiserror::Error;

use crate::node::Key;

/// Result alias for fallible engine entry points.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Input the engine refuses before any operation starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The text is not a base-10 integer key.
    #[error("invalid key {input:?}: expected an integer")]
    InvalidKey { input: String },
}

/// Parse user input into a key.
///
/// Surrounding whitespace is ignored; anything else that is not a plain
/// base-10 integer is rejected.
pub fn parse_key(input: &str) -> Result<Key> {
    input
        .trim()
        .parse::<Key>()
        .map_err(|_| EngineError::InvalidKey {
            input: input.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integers_with_whitespace() {
        assert_eq!(parse_key(" 42 "), Ok(42));
        assert_eq!(parse_key("-7"), Ok(-7));
    }

    #[test]
    fn rejects_non_numeric_input() {
        for input in ["", "abc", "4.5", "12abc", "NaN"] {
            assert_eq!(
                parse_key(input),
                Err(EngineError::InvalidKey {
                    input: input.to_string()
                }),
                "input {input:?} should be rejected"
            );
        }
    }
}
