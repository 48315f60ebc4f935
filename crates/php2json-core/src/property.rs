//! Property-name demangling for non-public object members.
//!
//! PHP mangles non-public property names when serializing an object:
//! a protected property `name` is written as `\0*\0name`, and a private
//! property is written as `\0DeclaringClass\0name`. This module recovers
//! the display name, qualifying it with the declaring class when that
//! class differs from the object's own.

use crate::error::{PhpSerializeError, Result};

/// Demangle a raw property name into its display form.
///
/// - no leading NUL: public, returned unchanged
/// - `\0*\0name`: protected, returns `name`
/// - `\0Own\0name` where `Own` equals `owning_class`: private, returns `name`
/// - `\0Other\0name`: private on another class, returns `"Other::name"`
///
/// `pos` is the input position of the raw name, used only for error
/// reporting when the second NUL delimiter is missing.
pub fn demangle(raw: &str, owning_class: &str, pos: usize) -> Result<String> {
    if !raw.starts_with('\0') {
        return Ok(raw.to_string());
    }

    let rest = &raw[1..];
    let Some(nul) = rest.find('\0') else {
        return Err(PhpSerializeError::MalformedPropertyName {
            name: raw.replace('\0', "\\0"),
            pos,
        });
    };

    let marker = &rest[..nul];
    let prop = &rest[nul + 1..];

    if marker == "*" || marker == owning_class {
        Ok(prop.to_string())
    } else {
        Ok(format!("{}::{}", marker, prop))
    }
}
