//! Error types for PHP serialize decoding and JSON rendering.

use thiserror::Error;

/// Errors that can occur while decoding PHP serialized data or rendering
/// the result as JSON.
///
/// All positions are 0-based character offsets into the input. Every
/// failure is terminal for the conversion it occurred in — there are no
/// partial results.
#[derive(Error, Debug)]
pub enum PhpSerializeError {
    /// An unrecognized value type tag at the top level or inside a container.
    #[error("Unknown type '{tag}' at position {pos}")]
    UnknownType { tag: char, pos: usize },

    /// An unrecognized type tag in key position (only `i` and `s` are valid keys).
    #[error("Unknown key type '{tag}' at position {pos}")]
    UnknownKeyType { tag: char, pos: usize },

    /// A non-public property name starting with NUL but missing its second
    /// NUL delimiter.
    #[error("Expected two <NUL> characters in non-public property name '{name}' at position {pos}")]
    MalformedPropertyName { name: String, pos: usize },

    /// An `r`/`R` back-reference whose 1-based index has no corresponding
    /// reference-table entry.
    #[error("Back-reference {index} at position {pos} is out of range (reference table holds {len} values)")]
    ReferenceOutOfRange {
        index: i64,
        pos: usize,
        len: usize,
    },

    /// The cursor ran past the end of the input, or a required delimiter
    /// was never found.
    #[error("Unexpected end of input at position {pos} while reading {expected}")]
    Truncated { pos: usize, expected: &'static str },

    /// A numeric payload (length prefix, integer, or float literal) failed
    /// to parse.
    #[error("Invalid {what} '{text}' at position {pos}")]
    InvalidLiteral {
        what: &'static str,
        text: String,
        pos: usize,
    },

    /// The rendering step failed to produce JSON text.
    #[error("JSON render error: {0}")]
    Json(#[from] serde_json::Error),

    /// Wrapper added by the public conversion entry points, carrying the
    /// underlying failure as its source.
    #[error("Failed to convert PHP serialized data to JSON: {source}")]
    Convert {
        #[source]
        source: Box<PhpSerializeError>,
    },
}

impl PhpSerializeError {
    /// Wrap a lower-level failure with the conversion context. Already
    /// wrapped errors pass through unchanged.
    pub(crate) fn into_convert(self) -> PhpSerializeError {
        match self {
            wrapped @ PhpSerializeError::Convert { .. } => wrapped,
            other => PhpSerializeError::Convert {
                source: Box::new(other),
            },
        }
    }
}

/// Convenience alias used throughout php2json-core.
pub type Result<T> = std::result::Result<T, PhpSerializeError>;
