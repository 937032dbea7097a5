//! The JSON-pointer implementations under test.
//!
//! Each implementation is described by a [`Library`]: a capability record
//! with one optional entry per operation. Callers check the entry before
//! dispatching, so an implementation lacking an operation is simply `None`.

mod serde_value;
mod ujson;
mod walk;

use serde_json::Value;

use crate::error::PointerError;

/// Ordered `(pointer, value)` pairs produced by a flatten operation.
pub type Flattened<'a> = Vec<(String, &'a Value)>;

pub type FlattenFn = for<'a> fn(&'a Value) -> Result<Flattened<'a>, PointerError>;
pub type HasFn = fn(&Value, &str) -> Result<bool, PointerError>;
pub type GetFn = for<'a> fn(&'a Value, &str) -> Result<Option<&'a Value>, PointerError>;
pub type SetFn = fn(&mut Value, &str, Value) -> Result<Option<Value>, PointerError>;
pub type CompileFn = fn(&str) -> Result<Box<dyn CompiledPointer>, PointerError>;

/// A library-specific, pre-parsed representation of one pointer.
pub trait CompiledPointer {
    fn get<'a>(&self, doc: &'a Value) -> Option<&'a Value>;

    fn has(&self, doc: &Value) -> bool {
        self.get(doc).is_some()
    }

    fn set(&self, doc: &mut Value, value: Value) -> Result<Option<Value>, PointerError>;
}

/// An operation entry: the library's own name for it and the callable.
#[derive(Clone, Copy)]
pub struct Method<F> {
    pub name: &'static str,
    pub call: F,
}

impl<F> Method<F> {
    pub const fn new(name: &'static str, call: F) -> Self {
        Self { name, call }
    }
}

/// Method names available on a library's compiled pointers.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompiledMethods {
    pub has: Option<&'static str>,
    pub get: Option<&'static str>,
    pub set: Option<&'static str>,
}

#[derive(Clone, Copy)]
pub struct Library {
    pub name: &'static str,
    pub flatten: Option<Method<FlattenFn>>,
    pub has: Option<Method<HasFn>>,
    pub get: Option<Method<GetFn>>,
    pub set: Option<Method<SetFn>>,
    pub compile: Option<Method<CompileFn>>,
    pub compiled: CompiledMethods,
}

impl Library {
    /// A library with no capabilities; registry entries fill in what they offer.
    pub const fn named(name: &'static str) -> Self {
        Self {
            name,
            flatten: None,
            has: None,
            get: None,
            set: None,
            compile: None,
            compiled: CompiledMethods {
                has: None,
                get: None,
                set: None,
            },
        }
    }
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("name", &self.name)
            .field("flatten", &self.flatten.map(|m| m.name))
            .field("has", &self.has.map(|m| m.name))
            .field("get", &self.get.map(|m| m.name))
            .field("set", &self.set.map(|m| m.name))
            .field("compile", &self.compile.map(|m| m.name))
            .field("compiled", &self.compiled)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Flatten,
    Has,
    Get,
    Set,
}

impl Operation {
    /// The library's method name for the plain variant, if it has one.
    pub fn plain_method(self, library: &Library) -> Option<&'static str> {
        match self {
            Operation::Flatten => library.flatten.map(|m| m.name),
            Operation::Has => library.has.map(|m| m.name),
            Operation::Get => library.get.map(|m| m.name),
            Operation::Set => library.set.map(|m| m.name),
        }
    }

    /// The compiled-pointer method name, only for libraries that can compile.
    pub fn compiled_method(self, library: &Library) -> Option<&'static str> {
        library.compile?;
        match self {
            Operation::Flatten => None,
            Operation::Has => library.compiled.has,
            Operation::Get => library.compiled.get,
            Operation::Set => library.compiled.set,
        }
    }
}

/// Every library under comparison, in report order.
pub fn registry() -> Vec<Library> {
    vec![ujson::library(), walk::library(), serde_value::library()]
}
