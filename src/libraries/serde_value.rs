//! Delegates to `serde_json::Value::pointer` and `pointer_mut`.
//!
//! `serde_json` only understands the plain pointer form, so fragments are
//! decoded and re-encoded first. Compiling does that once up front.

use serde_json::Value;

use super::{CompiledMethods, CompiledPointer, Library, Method};
use crate::error::PointerError;
use crate::pointer::JsonPointer;

pub fn library() -> Library {
    Library {
        get: Some(Method::new("pointer", get)),
        set: Some(Method::new("pointer_mut", set)),
        compile: Some(Method::new("normalize", normalize)),
        compiled: CompiledMethods {
            has: None,
            get: Some("get"),
            set: Some("set"),
        },
        ..Library::named("serde_json")
    }
}

fn plain_form(ptr: &str) -> Result<String, PointerError> {
    if ptr.starts_with('#') {
        Ok(JsonPointer::parse(ptr)?.pointer())
    } else {
        Ok(ptr.to_string())
    }
}

fn get<'a>(doc: &'a Value, ptr: &str) -> Result<Option<&'a Value>, PointerError> {
    if ptr.starts_with('#') {
        Ok(doc.pointer(&plain_form(ptr)?))
    } else {
        Ok(doc.pointer(ptr))
    }
}

fn replace(doc: &mut Value, ptr: &str, value: Value) -> Result<Option<Value>, PointerError> {
    let slot = doc
        .pointer_mut(ptr)
        .ok_or_else(|| PointerError::Unresolvable(ptr.to_string()))?;
    Ok(Some(std::mem::replace(slot, value)))
}

fn set(doc: &mut Value, ptr: &str, value: Value) -> Result<Option<Value>, PointerError> {
    replace(doc, &plain_form(ptr)?, value)
}

struct Normalized(String);

fn normalize(ptr: &str) -> Result<Box<dyn CompiledPointer>, PointerError> {
    Ok(Box::new(Normalized(JsonPointer::parse(ptr)?.pointer())))
}

impl CompiledPointer for Normalized {
    fn get<'a>(&self, doc: &'a Value) -> Option<&'a Value> {
        doc.pointer(&self.0)
    }

    fn set(&self, doc: &mut Value, value: Value) -> Result<Option<Value>, PointerError> {
        replace(doc, &self.0, value)
    }
}
