//! Fixed, name-indexed table of host-implemented functions.
//!
//! Every built-in takes a variadic slice of `Value` and returns a `Value`;
//! arity and type errors are returned as `Value::Error` rather than raised.

use crate::object::{Builtin, Value, NULL};

pub fn lookup(name: &str) -> Option<Builtin> {
    match name {
        "len" => Some(Builtin { name: "len", func: builtin_len }),
        "first" => Some(Builtin { name: "first", func: builtin_first }),
        "last" => Some(Builtin { name: "last", func: builtin_last }),
        "rest" => Some(Builtin { name: "rest", func: builtin_rest }),
        "push" => Some(Builtin { name: "push", func: builtin_push }),
        "puts" => Some(Builtin { name: "puts", func: builtin_puts }),
        _ => None,
    }
}

fn wrong_arity(got: usize, want: usize) -> Value {
    Value::error(format!("wrong number of arguments. got={}, want={}", got, want))
}

fn builtin_len(args: &[Value]) -> Value {
    if args.len() != 1 {
        return wrong_arity(args.len(), 1);
    }
    match &args[0] {
        Value::String(s) => Value::Integer(s.len() as i64),
        Value::Array(elements) => Value::Integer(elements.len() as i64),
        other => Value::error(format!("argument to 'len' not supported, got={}", other.kind())),
    }
}

fn builtin_first(args: &[Value]) -> Value {
    if args.len() != 1 {
        return wrong_arity(args.len(), 1);
    }
    match &args[0] {
        Value::Array(elements) => elements.first().cloned().unwrap_or(NULL),
        other => Value::error(format!("argument to 'first' must be ARRAY, got={}", other.kind())),
    }
}

fn builtin_last(args: &[Value]) -> Value {
    if args.len() != 1 {
        return wrong_arity(args.len(), 1);
    }
    match &args[0] {
        Value::Array(elements) => elements.last().cloned().unwrap_or(NULL),
        other => Value::error(format!("argument to 'last' must be ARRAY, got={}", other.kind())),
    }
}

fn builtin_rest(args: &[Value]) -> Value {
    if args.len() != 1 {
        return wrong_arity(args.len(), 1);
    }
    match &args[0] {
        Value::Array(elements) => {
            if elements.is_empty() {
                NULL
            } else {
                Value::array(elements[1..].to_vec())
            }
        }
        other => Value::error(format!("argument to 'rest' must be ARRAY, got={}", other.kind())),
    }
}

fn builtin_push(args: &[Value]) -> Value {
    if args.len() != 2 {
        return wrong_arity(args.len(), 2);
    }
    match &args[0] {
        Value::Array(elements) => {
            let mut new_elements = elements.as_ref().clone();
            new_elements.push(args[1].clone());
            Value::array(new_elements)
        }
        other => Value::error(format!("argument to 'push' must be ARRAY, got={}", other.kind())),
    }
}

fn builtin_puts(args: &[Value]) -> Value {
    for arg in args {
        println!("{}", arg);
    }
    NULL
}
