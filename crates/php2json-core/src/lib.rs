//! # php2json-core
//!
//! Decoder for PHP's native `serialize()` text format, producing JSON.
//!
//! The format is a compact, length-prefixed grammar with internal
//! back-references and a container type (`a:`) that is ambiguous between
//! a sequential list and a keyed map until its keys have been seen. The
//! decoder resolves all of that into a [`PhpValue`] tree, which the
//! renderer then walks to emit JSON text.
//!
//! ## Quick start
//!
//! ```rust
//! use php2json_core::convert;
//!
//! // A sequential array becomes a JSON list…
//! let json = convert("a:2:{i:0;i:1;i:1;i:2;}").unwrap();
//! assert_eq!(json, "[1,2]");
//!
//! // …while string keys make it a JSON object, order preserved.
//! let json = convert(r#"a:2:{s:4:"name";s:5:"Alice";s:3:"age";i:30;}"#).unwrap();
//! assert_eq!(json, r#"{"name":"Alice","age":30}"#);
//! ```
//!
//! Objects carry their class name, surfaced as a synthetic key by
//! default:
//!
//! ```rust
//! use php2json_core::{convert_with, ConvertOptions};
//!
//! let php = r#"O:4:"User":1:{s:4:"name";s:5:"Alice";}"#;
//! let json = convert_with(php, &ConvertOptions::default()).unwrap();
//! assert_eq!(json, r#"{"__classname":"User","name":"Alice"}"#);
//! ```
//!
//! ## Modules
//!
//! - [`decoder`] — serialized text → [`PhpValue`] tree
//! - [`renderer`] — [`PhpValue`] tree + [`ConvertOptions`] → JSON text
//! - [`property`] — visibility demangling for object member names
//! - [`error`] — error types for decode/render failures
//! - [`types`] — the `PhpValue` tree itself

pub mod decoder;
pub mod error;
pub mod property;
pub mod renderer;
pub mod types;

pub use decoder::parse;
pub use error::{PhpSerializeError, Result};
pub use renderer::{render, to_json_value, ConvertOptions};
pub use types::PhpValue;

/// Convert PHP serialized text to compact JSON with default options.
///
/// Any failure — decode or render — is wrapped with conversion context,
/// so callers see one error per call and never a partial tree.
pub fn convert(input: &str) -> Result<String> {
    convert_with(input, &ConvertOptions::default())
}

/// Convert PHP serialized text to JSON with explicit options.
pub fn convert_with(input: &str, options: &ConvertOptions) -> Result<String> {
    let value = parse(input).map_err(PhpSerializeError::into_convert)?;
    render(&value, options).map_err(PhpSerializeError::into_convert)
}
