//! Decoder for PHP's `serialize()` text format.
//!
//! The format is a compact, self-describing sequence of length-prefixed
//! records: a one-character type tag, a delimiter, and a payload. The
//! decoder walks it with a single forward-only cursor and produces one
//! [`PhpValue`] tree per call. It handles:
//!
//! - Scalars: `N;`, `b:1;`, `i:42;`, `d:1.5;`, `s:5:"hello";`
//! - Arrays (`a:`) with ambiguous container typing — sequential
//!   integer-keyed arrays become lists, everything else becomes a keyed
//!   map, decided during the scan (see [`Container`])
//! - Objects (`O:`) with visibility-mangled member names
//! - Custom-serialized objects (`C:`) kept as unparsed opaque bodies
//! - Back-references (`r:`/`R:`) resolved through a per-call reference
//!   table
//! - Enum cases (`E:`) decoded as plain strings
//!
//! # Key design decisions
//!
//! - **Char-indexed cursor**: the input is held as `Vec<char>` and all
//!   positions are character offsets. String payloads declare *byte*
//!   lengths, so `read_string` converts declared byte counts to
//!   character counts with the historical UTF-8 width table and resyncs
//!   on the terminator when the declared length disagrees with the
//!   content.
//! - **Reference table as plain `Vec`**: every scalar, array, and object
//!   appends exactly one entry in decode order. Containers reserve their
//!   slot before decoding children. Both reference tags resolve to copies;
//!   the output stays a strict tree.
//! - **Exhaustive tag dispatch**: unknown tags are an explicit error arm,
//!   never a silent fallthrough.

use crate::error::{PhpSerializeError, Result};
use crate::property;
use crate::types::PhpValue;

/// Decode one PHP serialized value from the start of `input`.
///
/// Trailing input after the first complete value is ignored. The cursor
/// and reference table live only for the duration of the call, so
/// concurrent parses of independent inputs never interact.
pub fn parse(input: &str) -> Result<PhpValue> {
    Parser::new(input).parse_next()
}

/// Per-call decode state: cursor position plus the reference table.
struct Parser {
    chars: Vec<char>,
    pos: usize,
    refs: Vec<PhpValue>,
}

impl Parser {
    fn new(input: &str) -> Self {
        Parser {
            chars: input.chars().collect(),
            pos: 0,
            refs: Vec::new(),
        }
    }

    fn parse_next(&mut self) -> Result<PhpValue> {
        let tag_pos = self.pos;
        let tag = self.read_type()?;
        match tag {
            'N' => self.parse_null(),
            'b' => self.parse_bool(),
            'i' => self.parse_int(),
            'd' => self.parse_float(),
            's' => self.parse_string(),
            'a' => self.parse_array(),
            'O' => self.parse_object(),
            'C' => self.parse_custom(),
            // Enum cases serialize as `E:len:"Unit:Case";` — surfaced as a string.
            'E' => self.parse_string(),
            'r' => self.parse_ref_copy(),
            'R' => self.parse_ref_alias(),
            other => Err(PhpSerializeError::UnknownType {
                tag: other,
                pos: tag_pos,
            }),
        }
    }

    // ── low-level cursor reads ──────────────────────────────────────────

    /// Read the one-character type tag and skip the delimiter after it.
    /// The delimiter is not inspected — the payload reads re-anchor on
    /// `:`/`;` themselves.
    fn read_type(&mut self) -> Result<char> {
        let tag = self.char_at(self.pos, "type tag")?;
        self.pos += 2;
        Ok(tag)
    }

    fn char_at(&self, pos: usize, expected: &'static str) -> Result<char> {
        self.chars
            .get(pos)
            .copied()
            .ok_or(PhpSerializeError::Truncated { pos, expected })
    }

    /// Position of the next `target` at or after `from`.
    fn find(&self, target: char, from: usize) -> Option<usize> {
        self.chars[from.min(self.chars.len())..]
            .iter()
            .position(|&c| c == target)
            .map(|off| from + off)
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }

    /// Read a decimal length prefix terminated by `:`, then skip the `:`
    /// and the single opening delimiter after it (`"` for strings, `{`
    /// for containers).
    fn read_length(&mut self) -> Result<usize> {
        let del = self.find(':', self.pos).ok_or(PhpSerializeError::Truncated {
            pos: self.pos,
            expected: "':' after length prefix",
        })?;
        let text = self.slice(self.pos, del);
        let value = text
            .parse::<usize>()
            .map_err(|_| PhpSerializeError::InvalidLiteral {
                what: "length prefix",
                text,
                pos: self.pos,
            })?;
        self.pos = del + 2;
        Ok(value)
    }

    /// Read a decimal integer terminated by `;` and step past it.
    fn read_int(&mut self) -> Result<i64> {
        let del = self.find(';', self.pos).ok_or(PhpSerializeError::Truncated {
            pos: self.pos,
            expected: "';' after integer",
        })?;
        let text = self.slice(self.pos, del);
        let value = text
            .parse::<i64>()
            .map_err(|_| PhpSerializeError::InvalidLiteral {
                what: "integer",
                text,
                pos: self.pos,
            })?;
        self.pos = del + 1;
        Ok(value)
    }

    /// Read a length-prefixed string delimited by `expect` (`"` for
    /// strings and class names, `}` for custom bodies).
    ///
    /// The declared length is a UTF-8 *byte* count, accumulated with the
    /// historical width table: code points ≤ 0x7F cost 1 byte, > 0x7FF
    /// cost 3, everything between costs 2. There is no separate 4-byte
    /// case. After measuring, the character following the computed span
    /// must be `expect`; if it is not, the span is extended to the next
    /// occurrence of `expect`, absorbing inputs whose declared length
    /// does not match the actual content. Measure, then verify, then
    /// recover — the order matters.
    fn read_string(&mut self, expect: char) -> Result<String> {
        let byte_len = self.read_length()?;

        let mut consumed = 0usize;
        let mut bytes = 0usize;
        while bytes < byte_len {
            let ch = self.char_at(self.pos + consumed, "string content")?;
            consumed += 1;
            bytes += match ch as u32 {
                c if c <= 0x7F => 1,
                c if c > 0x7FF => 3,
                _ => 2,
            };
        }

        if self.pos + consumed < self.chars.len() && self.chars[self.pos + consumed] != expect {
            if let Some(adjusted) = self.find(expect, self.pos + consumed) {
                consumed = adjusted - self.pos;
            }
        }

        let value = self.slice(self.pos, self.pos + consumed);
        // Skip the closing delimiter and the separator after it.
        self.pos += consumed + 2;
        Ok(value)
    }

    /// Read a container key: only `i` and `s` tags are valid here. The
    /// key is carried as its string form, which is also what the list/map
    /// classification compares against.
    fn read_key(&mut self) -> Result<String> {
        let tag_pos = self.pos;
        let tag = self.read_type()?;
        match tag {
            'i' => Ok(self.read_int()?.to_string()),
            's' => self.read_string('"'),
            other => Err(PhpSerializeError::UnknownKeyType {
                tag: other,
                pos: tag_pos,
            }),
        }
    }

    // ── per-tag decode routines ─────────────────────────────────────────

    fn parse_null(&mut self) -> Result<PhpValue> {
        self.refs.push(PhpValue::Null);
        Ok(PhpValue::Null)
    }

    fn parse_bool(&mut self) -> Result<PhpValue> {
        let del = self.find(';', self.pos).ok_or(PhpSerializeError::Truncated {
            pos: self.pos,
            expected: "';' after boolean",
        })?;
        let value = self.slice(self.pos, del) == "1";
        self.pos = del + 1;
        self.refs.push(PhpValue::Bool(value));
        Ok(PhpValue::Bool(value))
    }

    fn parse_int(&mut self) -> Result<PhpValue> {
        let value = self.read_int()?;
        self.refs.push(PhpValue::Int(value));
        Ok(PhpValue::Int(value))
    }

    fn parse_float(&mut self) -> Result<PhpValue> {
        let del = self.find(';', self.pos).ok_or(PhpSerializeError::Truncated {
            pos: self.pos,
            expected: "';' after float",
        })?;
        let text = self.slice(self.pos, del);
        // f64's grammar also accepts PHP's INF/-INF/NAN spellings.
        let value = text
            .parse::<f64>()
            .map_err(|_| PhpSerializeError::InvalidLiteral {
                what: "float",
                text,
                pos: self.pos,
            })?;
        self.pos = del + 1;
        self.refs.push(PhpValue::Float(value));
        Ok(PhpValue::Float(value))
    }

    fn parse_string(&mut self) -> Result<PhpValue> {
        let value = self.read_string('"')?;
        self.refs.push(PhpValue::String(value.clone()));
        Ok(PhpValue::String(value))
    }

    /// Decode `a:len:{key;value;...}` with list/map classification.
    fn parse_array(&mut self) -> Result<PhpValue> {
        let len = self.read_length()?;

        // Reserve the reference slot before decoding children so inner
        // back-references can address this container.
        let slot = self.refs.len();
        self.refs.push(PhpValue::Array(Vec::new()));

        let mut container = Container::new();
        for i in 0..len {
            let key = self.read_key()?;
            let value = self.parse_next()?;
            container.insert(i, key, value);
        }
        self.pos += 1; // closing '}'

        let value = container.into_value();
        self.refs[slot] = value.clone();
        Ok(value)
    }

    /// Decode `O:len:"Class":count:{key;value;...}` with member-name
    /// demangling against the declared class name.
    fn parse_object(&mut self) -> Result<PhpValue> {
        let slot = self.refs.len();
        self.refs.push(PhpValue::Object {
            class_name: String::new(),
            members: Vec::new(),
        });

        let class_name = self.read_string('"')?;
        let len = self.read_length()?;

        let mut members: Vec<(String, PhpValue)> = Vec::new();
        for _ in 0..len {
            let key_pos = self.pos;
            let raw_key = self.read_key()?;
            let value = self.parse_next()?;
            let display = property::demangle(&raw_key, &class_name, key_pos)?;
            insert_entry(&mut members, display, value);
        }
        self.pos += 1; // closing '}'

        let value = PhpValue::Object {
            class_name,
            members,
        };
        self.refs[slot] = value.clone();
        Ok(value)
    }

    /// Decode `C:len:"Class":len:{raw}`. The body is kept verbatim and
    /// deliberately skips the reference table.
    fn parse_custom(&mut self) -> Result<PhpValue> {
        let class_name = self.read_string('"')?;
        let serialized = self.read_string('}')?;
        // Unlike strings, nothing follows the closing brace.
        self.pos -= 1;
        Ok(PhpValue::Opaque {
            class_name,
            serialized,
        })
    }

    /// `r:N;` — resolve to a copy of table entry N and append that copy
    /// as a new table entry of its own.
    fn parse_ref_copy(&mut self) -> Result<PhpValue> {
        let idx_pos = self.pos;
        let index = self.read_int()?;
        let value = self.lookup_ref(index, idx_pos)?;
        self.refs.push(value.clone());
        Ok(value)
    }

    /// `R:N;` — same resolution as `r`, but without a new table entry.
    /// The wire's alias semantics collapse to content equality in a tree
    /// representation.
    fn parse_ref_alias(&mut self) -> Result<PhpValue> {
        let idx_pos = self.pos;
        let index = self.read_int()?;
        self.lookup_ref(index, idx_pos)
    }

    fn lookup_ref(&self, index: i64, pos: usize) -> Result<PhpValue> {
        // The wire's reference counter is 1-based.
        if index < 1 || index as usize > self.refs.len() {
            return Err(PhpSerializeError::ReferenceOutOfRange {
                index,
                pos,
                len: self.refs.len(),
            });
        }
        Ok(self.refs[index as usize - 1].clone())
    }
}

/// Per-container classification state: starts `Sequential` and converts
/// to `Mapped` on the first key that breaks the 0-based run. The
/// transition is one-way — later keys that happen to line up again do not
/// convert back.
enum Container {
    Sequential(Vec<PhpValue>),
    Mapped(Vec<(String, PhpValue)>),
}

impl Container {
    fn new() -> Self {
        Container::Sequential(Vec::new())
    }

    /// Insert the pair read at running index `i`. The sequential check
    /// compares key strings, so a string-typed `"0"` continues the run
    /// just like an integer 0.
    fn insert(&mut self, i: usize, key: String, value: PhpValue) {
        match self {
            Container::Sequential(items) if key == i.to_string() => {
                items.push(value);
            }
            Container::Sequential(items) => {
                let mut entries: Vec<(String, PhpValue)> = items
                    .drain(..)
                    .enumerate()
                    .map(|(j, v)| (j.to_string(), v))
                    .collect();
                insert_entry(&mut entries, key, value);
                *self = Container::Mapped(entries);
            }
            Container::Mapped(entries) => {
                insert_entry(entries, key, value);
            }
        }
    }

    fn into_value(self) -> PhpValue {
        match self {
            Container::Sequential(items) => PhpValue::Array(items),
            Container::Mapped(entries) => PhpValue::Map(entries),
        }
    }
}

/// Insert preserving first-occurrence position: a duplicate key replaces
/// the stored value in place instead of appending.
fn insert_entry(entries: &mut Vec<(String, PhpValue)>, key: String, value: PhpValue) {
    if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == key) {
        slot.1 = value;
    } else {
        entries.push((key, value));
    }
}
