//! Splits the pointer string on every call; no parsing ahead of time.

use std::borrow::Cow;

use serde_json::Value;

use super::{Flattened, Library, Method};
use crate::error::PointerError;
use crate::pointer;

pub fn library() -> Library {
    Library {
        flatten: Some(Method::new("dict", dict)),
        has: Some(Method::new("has", has)),
        get: Some(Method::new("get", get)),
        set: Some(Method::new("set", set)),
        ..Library::named("walk")
    }
}

fn segments(ptr: &str) -> Result<Vec<String>, PointerError> {
    let ptr: Cow<'_, str> = match ptr.strip_prefix('#') {
        Some(fragment) => Cow::Owned(pointer::decode_fragment(fragment)?),
        None => Cow::Borrowed(ptr),
    };
    if ptr.is_empty() {
        return Ok(Vec::new());
    }
    let rest = ptr.strip_prefix('/').ok_or(PointerError::NoParse(0))?;
    Ok(rest.split('/').map(pointer::unescape_token).collect())
}

// Leaves only: scalars and empty containers.
fn dict(doc: &Value) -> Result<Flattened<'_>, PointerError> {
    let mut out = Vec::new();
    pointer::walk(doc, &mut Vec::new(), &mut |path, value| {
        let leaf = match value {
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => true,
        };
        if leaf {
            out.push((pointer::encode_pointer(path), value));
        }
    });
    Ok(out)
}

fn get<'a>(doc: &'a Value, ptr: &str) -> Result<Option<&'a Value>, PointerError> {
    let mut value = doc;
    for segment in segments(ptr)? {
        match pointer::step(value, &segment) {
            Some(next) => value = next,
            None => return Ok(None),
        }
    }
    Ok(Some(value))
}

fn has(doc: &Value, ptr: &str) -> Result<bool, PointerError> {
    Ok(get(doc, ptr)?.is_some())
}

fn set(doc: &mut Value, ptr: &str, value: Value) -> Result<Option<Value>, PointerError> {
    pointer::set_in(doc, &segments(ptr)?, value)
}
