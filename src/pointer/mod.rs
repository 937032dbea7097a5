//! JSON pointers (RFC 6901) and their URI fragment form.
//!
//! [`JsonPointer`] holds decoded reference tokens; both string forms are
//! produced from it. [`list_pointers`] enumerates every addressable location
//! of a document and is the source the sampler draws from.

mod parse;

pub(crate) use parse::{decode_fragment, parse_any};

use std::fmt;

use serde_json::Value;

use crate::error::PointerError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JsonPointer {
    tokens: Vec<String>,
}

impl JsonPointer {
    /// Accepts a pointer (`/a/b`) or a fragment identifier (`#/a/b`).
    pub fn parse(input: &str) -> Result<Self, PointerError> {
        Ok(Self {
            tokens: parse_any(input)?,
        })
    }

    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    pub fn pointer(&self) -> String {
        encode_pointer(&self.tokens)
    }

    pub fn fragment_id(&self) -> String {
        encode_fragment(&self.tokens)
    }

    pub fn resolve<'a>(&self, doc: &'a Value) -> Option<&'a Value> {
        self.tokens
            .iter()
            .try_fold(doc, |value, token| step(value, token))
    }

    pub fn set(&self, doc: &mut Value, value: Value) -> Result<Option<Value>, PointerError> {
        set_in(doc, &self.tokens, value)
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pointer())
    }
}

pub fn escape_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

pub fn unescape_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

pub fn encode_pointer<S: AsRef<str>>(tokens: &[S]) -> String {
    let mut out = String::new();
    for token in tokens {
        out.push('/');
        out.push_str(&escape_token(token.as_ref()));
    }
    out
}

// Same unreserved set as ECMAScript's encodeURIComponent.
fn is_fragment_safe(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"-_.!~*'()".contains(&b)
}

pub fn encode_fragment<S: AsRef<str>>(tokens: &[S]) -> String {
    let mut out = String::from("#");
    for token in tokens {
        out.push('/');
        for b in escape_token(token.as_ref()).bytes() {
            if is_fragment_safe(b) {
                out.push(b as char);
            } else {
                out.push_str(&format!("%{b:02X}"));
            }
        }
    }
    out
}

/// Array index token: `0` or digits without a leading zero.
pub(crate) fn parse_index(token: &str) -> Option<usize> {
    let valid = !token.is_empty()
        && token.bytes().all(|b| b.is_ascii_digit())
        && (token == "0" || !token.starts_with('0'));
    if valid { token.parse().ok() } else { None }
}

pub(crate) fn step<'a>(value: &'a Value, token: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(token),
        Value::Array(items) => parse_index(token).and_then(|i| items.get(i)),
        _ => None,
    }
}

fn step_mut<'a>(value: &'a mut Value, token: &str) -> Option<&'a mut Value> {
    match value {
        Value::Object(map) => map.get_mut(token),
        Value::Array(items) => parse_index(token).and_then(move |i| items.get_mut(i)),
        _ => None,
    }
}

/// Writes `value` at `tokens`, returning what was there before.
///
/// Objects gain missing members; arrays accept an index up to their length
/// or `-` to append. Intermediate locations must already exist.
pub(crate) fn set_in<S: AsRef<str>>(
    doc: &mut Value,
    tokens: &[S],
    value: Value,
) -> Result<Option<Value>, PointerError> {
    let Some((last, parents)) = tokens.split_last() else {
        return Ok(Some(std::mem::replace(doc, value)));
    };
    let unresolvable = || PointerError::Unresolvable(encode_pointer(tokens));

    let mut target = doc;
    for token in parents {
        target = step_mut(target, token.as_ref()).ok_or_else(unresolvable)?;
    }

    let last = last.as_ref();
    match target {
        Value::Object(map) => Ok(map.insert(last.to_string(), value)),
        Value::Array(items) => {
            let index = if last == "-" {
                Some(items.len())
            } else {
                parse_index(last)
            };
            match index {
                Some(i) if i < items.len() => Ok(Some(std::mem::replace(&mut items[i], value))),
                Some(i) if i == items.len() => {
                    items.push(value);
                    Ok(None)
                }
                _ => Err(unresolvable()),
            }
        }
        _ => Err(unresolvable()),
    }
}

/// One addressable location in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerEntry {
    pub pointer: String,
    pub fragment_id: String,
}

/// Every location in `doc`, root first, in depth-first pre-order.
pub fn list_pointers(doc: &Value) -> Vec<PointerEntry> {
    let mut entries = Vec::new();
    walk(doc, &mut Vec::new(), &mut |path, _| {
        entries.push(PointerEntry {
            pointer: encode_pointer(path),
            fragment_id: encode_fragment(path),
        });
    });
    entries
}

/// Pre-order traversal calling `visit` with the token path of every value.
pub(crate) fn walk<'a>(
    value: &'a Value,
    path: &mut Vec<String>,
    visit: &mut dyn FnMut(&[String], &'a Value),
) {
    visit(path.as_slice(), value);
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                path.push(key.clone());
                walk(child, path, visit);
                path.pop();
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                path.push(index.to_string());
                walk(child, path, visit);
                path.pop();
            }
        }
        _ => {}
    }
}
