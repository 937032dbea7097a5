use serde_json::Value;

use super::{CompiledMethods, CompiledPointer, Flattened, Library, Method};
use crate::error::PointerError;
use crate::pointer::{self, JsonPointer};

pub fn library() -> Library {
    Library {
        flatten: Some(Method::new("flatten", flatten)),
        has: Some(Method::new("has", has)),
        get: Some(Method::new("get", get)),
        set: Some(Method::new("set", set)),
        compile: Some(Method::new("create", create)),
        compiled: CompiledMethods {
            has: Some("has"),
            get: Some("get"),
            set: Some("set"),
        },
        ..Library::named("ujson")
    }
}

// Every location, root included, in enumeration order.
fn flatten(doc: &Value) -> Result<Flattened<'_>, PointerError> {
    let mut out = Vec::new();
    pointer::walk(doc, &mut Vec::new(), &mut |path, value| {
        out.push((pointer::encode_pointer(path), value));
    });
    Ok(out)
}

fn has(doc: &Value, ptr: &str) -> Result<bool, PointerError> {
    Ok(JsonPointer::parse(ptr)?.resolve(doc).is_some())
}

fn get<'a>(doc: &'a Value, ptr: &str) -> Result<Option<&'a Value>, PointerError> {
    Ok(JsonPointer::parse(ptr)?.resolve(doc))
}

fn set(doc: &mut Value, ptr: &str, value: Value) -> Result<Option<Value>, PointerError> {
    JsonPointer::parse(ptr)?.set(doc, value)
}

fn create(ptr: &str) -> Result<Box<dyn CompiledPointer>, PointerError> {
    Ok(Box::new(JsonPointer::parse(ptr)?))
}

impl CompiledPointer for JsonPointer {
    fn get<'a>(&self, doc: &'a Value) -> Option<&'a Value> {
        self.resolve(doc)
    }

    fn set(&self, doc: &mut Value, value: Value) -> Result<Option<Value>, PointerError> {
        JsonPointer::set(self, doc, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // test the flatten function
    #[test]
    fn test_flatten() {
        let doc = json!({"a": {"b": 1}, "c": [true]});
        let flat = flatten(&doc).unwrap();
        let pointers: Vec<&str> = flat.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(pointers, vec!["", "/a", "/a/b", "/c", "/c/0"]);
        assert_eq!(flat[2].1, &json!(1));
        assert_eq!(flat[0].1, &doc);
    }

    // test the compiled pointer keeps decoded tokens
    #[test]
    fn test_create() {
        let compiled = create("#/a%20b/0").unwrap();
        let doc = json!({"a b": ["x"]});
        assert_eq!(compiled.get(&doc), Some(&json!("x")));
        assert!(compiled.has(&doc));
        assert!(create("/a~9").is_err());
    }
}
