//! Runtime value model and lexically-scoped environments.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::ast::{Identifier, Statement};

pub const TRUE: Value = Value::Boolean(true);
pub const FALSE: Value = Value::Boolean(false);
pub const NULL: Value = Value::Null;

#[derive(Clone)]
pub struct Builtin {
    pub name: &'static str,
    pub func: fn(&[Value]) -> Value,
}

#[derive(Clone)]
pub struct FunctionValue {
    pub parameters: Vec<Identifier>,
    pub body: Statement,
    pub env: Rc<RefCell<Environment>>,
}

#[derive(Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    String(Rc<String>),
    Null,
    Array(Rc<Vec<Value>>),
    Hash(Rc<HashMap<HashKey, HashPair>>),
    Function(Rc<FunctionValue>),
    Builtin(Builtin),
    ReturnValue(Box<Value>),
    Error(String),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Value {
        Value::String(Rc::new(s.into()))
    }

    pub fn array(elements: Vec<Value>) -> Value {
        Value::Array(Rc::new(elements))
    }

    pub fn error(message: impl Into<String>) -> Value {
        Value::Error(message.into())
    }

    /// The tag rendered in error messages, matching the source corpus's
    /// `ObjectTypeEnum` names (`INTEGER`, `BOOLEAN`, ...).
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Boolean(_) => "BOOLEAN",
            Value::String(_) => "STRING",
            Value::Null => "NULL",
            Value::Array(_) => "ARRAY",
            Value::Hash(_) => "HASH",
            Value::Function(_) => "FUNCTION",
            Value::Builtin(_) => "BUILTIN",
            Value::ReturnValue(_) => "RETURN_VALUE",
            Value::Error(_) => "ERROR",
        }
    }

    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Boolean(false) | Value::Null)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// `HashKey` if this value can be used as a hash key, else `None`.
    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Value::Integer(i) => Some(HashKey { kind: self.kind(), bits: *i as u64 }),
            Value::Boolean(b) => Some(HashKey { kind: self.kind(), bits: u64::from(*b) }),
            Value::String(s) => Some(HashKey { kind: self.kind(), bits: fnv1a(s.as_bytes()) }),
            _ => None,
        }
    }
}

/// FNV-1a: a small, deterministic, non-cryptographic hash. Stable within a
/// single process run, which is all the hash-key contract requires.
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;
    let mut hash = OFFSET_BASIS;
    for &byte in bytes {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub kind: &'static str,
    pub bits: u64,
}

#[derive(Clone)]
pub struct HashPair {
    pub key: Value,
    pub value: Value,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::String(s) => write!(f, "{}", s),
            Value::Null => write!(f, "null"),
            Value::Array(elements) => {
                let parts: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Value::Hash(pairs) => {
                let parts: Vec<String> =
                    pairs.values().map(|p| format!("{}: {}", p.key, p.value)).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
            Value::Function(func) => {
                let params: Vec<String> =
                    func.parameters.iter().map(|p| p.value.clone()).collect();
                write!(f, "fn({}) {{ {} }}", params.join(", "), func.body)
            }
            Value::Builtin(_) => write!(f, "builtin function"),
            Value::ReturnValue(inner) => write!(f, "{}", inner),
            Value::Error(message) => write!(f, "ERROR: {}", message),
        }
    }
}

/// A lexical scope: a name→value table plus an optional parent. Lookup
/// walks the chain outward; bindings are always created in the innermost
/// frame, so `let` never rebinds an outer scope.
pub struct Environment {
    store: HashMap<String, Value>,
    outer: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment { store: HashMap::new(), outer: None }))
    }

    /// A child scope whose parent is `outer` — the constructor used both for
    /// block scopes and for the fresh frame created on each function call.
    pub fn new_enclosed(outer: Rc<RefCell<Environment>>) -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment { store: HashMap::new(), outer: Some(outer) }))
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => self.outer.as_ref().and_then(|outer| outer.borrow().get(name)),
        }
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) -> Value {
        let value_clone = value.clone();
        self.store.insert(name.into(), value);
        value_clone
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_hash_key_is_stable() {
        assert_eq!(Value::Integer(5).hash_key(), Value::Integer(5).hash_key());
        assert_ne!(Value::Integer(5).hash_key(), Value::Integer(6).hash_key());
    }

    #[test]
    fn string_hash_key_matches_for_equal_content() {
        let a = Value::string("name");
        let b = Value::string("name");
        assert_eq!(a.hash_key(), b.hash_key());
    }

    #[test]
    fn function_and_array_are_not_hashable() {
        assert!(Value::array(vec![]).hash_key().is_none());
    }

    #[test]
    fn environment_lookup_walks_outer_chain() {
        let outer = Environment::new();
        outer.borrow_mut().set("x", Value::Integer(5));
        let inner = Environment::new_enclosed(outer);
        assert!(matches!(inner.borrow().get("x"), Some(Value::Integer(5))));
        assert!(inner.borrow().get("y").is_none());
    }

    #[test]
    fn truthiness_matches_spec() {
        assert!(!FALSE.is_truthy());
        assert!(!NULL.is_truthy());
        assert!(TRUE.is_truthy());
        assert!(Value::Integer(0).is_truthy());
    }
}
