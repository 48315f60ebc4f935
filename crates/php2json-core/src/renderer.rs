//! Rendering a decoded [`PhpValue`] tree as JSON text.
//!
//! The walk is mechanical: scalars map 1:1, containers recurse. The only
//! policy decisions live in [`ConvertOptions`] — whether objects surface
//! their class name as a synthetic key, under what name, and whether the
//! output is pretty-printed. Relies on `serde_json` with the
//! `preserve_order` feature so JSON objects keep the decoder's insertion
//! order.

use crate::error::Result;
use crate::types::PhpValue;
use serde_json::{Map, Number, Value};

/// Key under which a `C:` custom-serialized payload's class name is
/// rendered. Fixed by the format's ecosystem, not configurable.
pub const INCOMPLETE_CLASS_KEY: &str = "__PHP_Incomplete_Class_Name";

/// Options consumed by the renderer. The decoder never looks at these.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Surface each object's class name as an extra synthetic key.
    pub include_class_name: bool,
    /// Name of the synthetic class-name key.
    pub class_name_key: String,
    /// Pretty-print with newlines and indentation. Purely cosmetic.
    pub pretty: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            include_class_name: true,
            class_name_key: "__classname".to_string(),
            pretty: false,
        }
    }
}

/// Render a value tree as JSON text according to `options`.
pub fn render(value: &PhpValue, options: &ConvertOptions) -> Result<String> {
    let json = to_json_value(value, options);
    let text = if options.pretty {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    };
    Ok(text)
}

/// Convert a value tree into a `serde_json::Value`.
pub fn to_json_value(value: &PhpValue, options: &ConvertOptions) -> Value {
    match value {
        PhpValue::Null => Value::Null,
        PhpValue::Bool(b) => Value::Bool(*b),
        PhpValue::Int(i) => Value::Number((*i).into()),
        // JSON has no NaN/Infinity; those render as null.
        PhpValue::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
        PhpValue::String(s) => Value::String(s.clone()),
        PhpValue::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| to_json_value(item, options))
                .collect(),
        ),
        PhpValue::Map(entries) => {
            let mut map = Map::new();
            for (key, val) in entries {
                map.insert(key.clone(), to_json_value(val, options));
            }
            Value::Object(map)
        }
        PhpValue::Object {
            class_name,
            members,
        } => {
            let mut map = Map::new();
            if options.include_class_name {
                map.insert(
                    options.class_name_key.clone(),
                    Value::String(class_name.clone()),
                );
            }
            // A member named like the class-name key overwrites the
            // synthetic entry (last write wins, position kept).
            for (key, val) in members {
                map.insert(key.clone(), to_json_value(val, options));
            }
            Value::Object(map)
        }
        PhpValue::Opaque {
            class_name,
            serialized,
        } => {
            let mut map = Map::new();
            map.insert(
                INCOMPLETE_CLASS_KEY.to_string(),
                Value::String(class_name.clone()),
            );
            map.insert("serialized".to_string(), Value::String(serialized.clone()));
            Value::Object(map)
        }
    }
}
