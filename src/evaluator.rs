//! Recursive AST walk producing a runtime [`Value`].
//!
//! Return-value propagation uses a sentinel wrapper rather than host
//! exceptions: `eval_program` unwraps a `ReturnValue` the moment it sees
//! one, while `eval_block` (used for `if`/function bodies) returns it still
//! wrapped, so `return` unwinds through nested blocks and stops only at the
//! function or program boundary.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::{Expression, Program, Statement};
use crate::builtins;
use crate::object::{Environment, FunctionValue, HashPair, Value, FALSE, NULL, TRUE};

pub fn eval_program(program: &Program, env: &Rc<RefCell<Environment>>) -> Value {
    let mut result = NULL;
    for stmt in &program.statements {
        result = eval_statement(stmt, env);
        match result {
            Value::ReturnValue(inner) => return *inner,
            Value::Error(_) => return result,
            _ => {}
        }
    }
    result
}

fn eval_block(statements: &[Statement], env: &Rc<RefCell<Environment>>) -> Value {
    let mut result = NULL;
    for stmt in statements {
        result = eval_statement(stmt, env);
        if matches!(result, Value::ReturnValue(_) | Value::Error(_)) {
            return result;
        }
    }
    result
}

fn eval_statement(stmt: &Statement, env: &Rc<RefCell<Environment>>) -> Value {
    match stmt {
        Statement::Let { name, value, .. } => {
            let evaluated = eval_expression(value, env);
            if evaluated.is_error() {
                return evaluated;
            }
            env.borrow_mut().set(name.value.clone(), evaluated);
            NULL
        }
        Statement::Return { value, .. } => {
            let evaluated = eval_expression(value, env);
            if evaluated.is_error() {
                return evaluated;
            }
            Value::ReturnValue(Box::new(evaluated))
        }
        Statement::Expression { expression, .. } => eval_expression(expression, env),
        Statement::Block { statements, .. } => eval_block(statements, env),
    }
}

fn eval_expression(expr: &Expression, env: &Rc<RefCell<Environment>>) -> Value {
    match expr {
        Expression::IntegerLiteral { value, .. } => Value::Integer(*value),
        Expression::BooleanLiteral { value, .. } => native_bool(*value),
        Expression::StringLiteral { value, .. } => Value::string(value.clone()),
        Expression::Identifier(ident) => eval_identifier(&ident.value, env),
        Expression::Prefix { operator, right, .. } => {
            let right_val = eval_expression(right, env);
            if right_val.is_error() {
                return right_val;
            }
            eval_prefix(operator, right_val)
        }
        Expression::Infix { left, operator, right, .. } => {
            let left_val = eval_expression(left, env);
            if left_val.is_error() {
                return left_val;
            }
            let right_val = eval_expression(right, env);
            if right_val.is_error() {
                return right_val;
            }
            eval_infix(operator, left_val, right_val)
        }
        Expression::If { condition, consequence, alternative, .. } => {
            let cond = eval_expression(condition, env);
            if cond.is_error() {
                return cond;
            }
            if cond.is_truthy() {
                eval_statement(consequence, env)
            } else if let Some(alt) = alternative {
                eval_statement(alt, env)
            } else {
                NULL
            }
        }
        Expression::FunctionLiteral { parameters, body, .. } => Value::Function(Rc::new(FunctionValue {
            parameters: parameters.clone(),
            body: (**body).clone(),
            env: env.clone(),
        })),
        Expression::Call { function, arguments, .. } => {
            let func = eval_expression(function, env);
            if func.is_error() {
                return func;
            }
            let args = match eval_expressions(arguments, env) {
                Ok(args) => args,
                Err(err) => return err,
            };
            apply_function(func, args)
        }
        Expression::ArrayLiteral { elements, .. } => match eval_expressions(elements, env) {
            Ok(values) => Value::array(values),
            Err(err) => err,
        },
        Expression::Index { left, index, .. } => {
            let left_val = eval_expression(left, env);
            if left_val.is_error() {
                return left_val;
            }
            let index_val = eval_expression(index, env);
            if index_val.is_error() {
                return index_val;
            }
            eval_index(left_val, index_val)
        }
        Expression::HashLiteral { pairs, .. } => eval_hash_literal(pairs, env),
    }
}

fn eval_expressions(exprs: &[Expression], env: &Rc<RefCell<Environment>>) -> Result<Vec<Value>, Value> {
    let mut values = Vec::with_capacity(exprs.len());
    for expr in exprs {
        let value = eval_expression(expr, env);
        if value.is_error() {
            return Err(value);
        }
        values.push(value);
    }
    Ok(values)
}

fn eval_identifier(name: &str, env: &Rc<RefCell<Environment>>) -> Value {
    if let Some(value) = env.borrow().get(name) {
        return value;
    }
    if let Some(builtin) = builtins::lookup(name) {
        return Value::Builtin(builtin);
    }
    Value::error(format!("identifier not found: {}", name))
}

fn eval_prefix(operator: &str, right: Value) -> Value {
    match operator {
        "!" => native_bool(!right.is_truthy()),
        "-" => match right {
            Value::Integer(i) => Value::Integer(-i),
            other => Value::error(format!("unknown operator: -{}", other.kind())),
        },
        _ => Value::error(format!("unknown operator: {}{}", operator, right.kind())),
    }
}

fn eval_infix(operator: &str, left: Value, right: Value) -> Value {
    match (&left, &right) {
        (Value::Integer(l), Value::Integer(r)) => eval_integer_infix(operator, *l, *r),
        (Value::String(l), Value::String(r)) => eval_string_infix(operator, l, r),
        _ if operator == "==" => native_bool(values_equal(&left, &right)),
        _ if operator == "!=" => native_bool(!values_equal(&left, &right)),
        _ if left.kind() != right.kind() => {
            Value::error(format!("type mismatch: {} {} {}", left.kind(), operator, right.kind()))
        }
        _ => Value::error(format!("unknown operator: {} {} {}", left.kind(), operator, right.kind())),
    }
}

/// Integer division truncates toward zero. Division by zero is
/// implementation-defined by the spec; this implementation reports it as a
/// runtime error rather than trapping or silently producing `NULL`.
fn eval_integer_infix(operator: &str, left: i64, right: i64) -> Value {
    match operator {
        "+" => Value::Integer(left + right),
        "-" => Value::Integer(left - right),
        "*" => Value::Integer(left * right),
        "/" => {
            if right == 0 {
                Value::error("division by zero")
            } else {
                Value::Integer(left / right)
            }
        }
        "<" => native_bool(left < right),
        ">" => native_bool(left > right),
        "==" => native_bool(left == right),
        "!=" => native_bool(left != right),
        _ => Value::error(format!("unknown operator: INTEGER {} INTEGER", operator)),
    }
}

fn eval_string_infix(operator: &str, left: &str, right: &str) -> Value {
    match operator {
        "+" => Value::string(format!("{}{}", left, right)),
        _ => Value::error(format!("unknown operator: STRING {} STRING", operator)),
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Boolean(l), Value::Boolean(r)) => l == r,
        (Value::Null, Value::Null) => true,
        (Value::Integer(l), Value::Integer(r)) => l == r,
        (Value::String(l), Value::String(r)) => l == r,
        _ => false,
    }
}

fn native_bool(value: bool) -> Value {
    if value {
        TRUE
    } else {
        FALSE
    }
}

/// Argument-count mismatch is unspecified by the source corpus; here it is
/// treated as an error, consistent with the built-in arity checks.
fn apply_function(func: Value, args: Vec<Value>) -> Value {
    match func {
        Value::Function(function) => {
            if args.len() != function.parameters.len() {
                return Value::error(format!(
                    "wrong number of arguments. got={}, want={}",
                    args.len(),
                    function.parameters.len()
                ));
            }
            let call_env = Environment::new_enclosed(function.env.clone());
            for (param, arg) in function.parameters.iter().zip(args) {
                call_env.borrow_mut().set(param.value.clone(), arg);
            }
            match eval_statement(&function.body, &call_env) {
                Value::ReturnValue(inner) => *inner,
                other => other,
            }
        }
        Value::Builtin(builtin) => (builtin.func)(&args),
        other => Value::error(format!("not a function: {}", other.kind())),
    }
}

fn eval_index(left: Value, index: Value) -> Value {
    match (&left, &index) {
        (Value::Array(elements), Value::Integer(i)) => {
            if *i < 0 || *i as usize >= elements.len() {
                NULL
            } else {
                elements[*i as usize].clone()
            }
        }
        (Value::Hash(pairs), _) => match index.hash_key() {
            Some(key) => pairs.get(&key).map(|pair| pair.value.clone()).unwrap_or(NULL),
            None => Value::error(format!("unusable as hash key: {}", index.kind())),
        },
        _ => Value::error(format!("index operator not supported: {}", left.kind())),
    }
}

fn eval_hash_literal(pairs: &[(Expression, Expression)], env: &Rc<RefCell<Environment>>) -> Value {
    let mut map = HashMap::with_capacity(pairs.len());
    for (key_expr, value_expr) in pairs {
        let key = eval_expression(key_expr, env);
        if key.is_error() {
            return key;
        }
        let hash_key = match key.hash_key() {
            Some(hash_key) => hash_key,
            None => return Value::error(format!("unusable as hash key: {}", key.kind())),
        };
        let value = eval_expression(value_expr, env);
        if value.is_error() {
            return value;
        }
        map.insert(hash_key, HashPair { key, value });
    }
    Value::Hash(Rc::new(map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn run(input: &str) -> Value {
        let mut parser = Parser::from_source(input);
        let program = parser.parse_program();
        assert!(parser.errors.is_empty(), "parser errors: {:?}", parser.errors);
        eval_program(&program, &Environment::new())
    }

    #[test]
    fn integer_arithmetic_respects_precedence() {
        let result = run("(5 + 10 * 2 + 15 / 3) * 2 + -10");
        assert_eq!(result.to_string(), "50");
    }

    #[test]
    fn return_unwinds_through_nested_if_blocks() {
        let result = run("if (10 > 1) { if (10 > 1) { return 10; } return 1; }");
        assert_eq!(result.to_string(), "10");
    }

    #[test]
    fn closures_capture_their_defining_environment() {
        let result = run(
            "let newAdder = fn(x) { fn(y) { x + y } }; let addTwo = newAdder(2); addTwo(2);",
        );
        assert_eq!(result.to_string(), "4");
    }

    #[test]
    fn string_concatenation() {
        let result = run(r#""Hello" + " " + "World!""#);
        assert_eq!(result.to_string(), "Hello World!");
    }

    #[test]
    fn type_mismatch_short_circuits_the_program() {
        let result = run("5 + true; 5;");
        assert_eq!(result.to_string(), "ERROR: type mismatch: INTEGER + BOOLEAN");
    }

    #[test]
    fn function_as_hash_key_is_an_error() {
        let result = run(r#"{"name": "yada"}[fn(x){x}];"#);
        assert_eq!(result.to_string(), "ERROR: unusable as hash key: FUNCTION");
    }

    #[test]
    fn push_is_functional_and_does_not_mutate() {
        let result = run("let a = [1,2,3]; push(a, 4)");
        assert_eq!(result.to_string(), "[1, 2, 3, 4]");
        let length = run("let a = [1,2,3]; push(a, 4); len(a)");
        assert_eq!(length.to_string(), "3");
    }

    #[test]
    fn identifier_not_found_is_reported() {
        let result = run("foobar");
        assert_eq!(result.to_string(), "ERROR: identifier not found: foobar");
    }

    #[test]
    fn array_index_out_of_range_is_null() {
        let result = run("[1, 2, 3][10]");
        assert_eq!(result.to_string(), "null");
    }
}
