use std::{cell::RefCell, cmp::Ordering, rc::Rc};

use crate::environment::prelude::{Scope, Value, NULL};

use super::{
    error::{RuntimeError, RuntimeErrorType, Unwind},
    expressions::call_function,
    EvalResult
};

/// Resolves `receiver.name` for arrays and strings to a callable bound to
/// the receiver.
pub fn lookup(receiver: Value, name: &str) -> Result<Value, RuntimeError> {
    let known = match &receiver {
        Value::Array { .. } => ARRAY_METHODS.contains(&name),
        Value::String { .. } => STRING_METHODS.contains(&name),
        _ => false
    };

    if !known {
        return Err(RuntimeError::new(RuntimeErrorType::UnknownMethod {
            kind: receiver.kind(),
            name: name.to_string()
        }));
    }

    let method = name.to_string();

    Ok(Value::native(name, move |arguments, scope| {
        match &receiver {
            Value::Array { values } => call_array_method(values, &method, arguments, scope),
            Value::String { value } => call_string_method(value, &method, arguments),
            _ => Ok(NULL)
        }
    }))
}

pub const ARRAY_METHODS: [&str; 9] = [
    "map", "filter", "reduce", "forEach", "push", "pop", "length", "slice", "sort"
];

pub const STRING_METHODS: [&str; 9] = [
    "length", "substring", "indexOf", "toUpperCase", "toLowerCase",
    "includes", "trim", "startsWith", "endsWith"
];

fn invalid_argument(function: &str, message: impl Into<String>) -> Unwind {
    RuntimeError::new(RuntimeErrorType::InvalidArgument {
        function: function.to_string(),
        message: message.into()
    }).into()
}

fn callback<'a>(method: &str, arguments: &'a [Value]) -> Result<&'a Value, Unwind> {
    match arguments.first() {
        Some(callback @ (Value::Function(_) | Value::Native(_))) => Ok(callback),
        Some(other) => Err(invalid_argument(method, format!("expected a function, got {}", other.kind()))),
        None => Err(invalid_argument(method, "expected a function"))
    }
}

/// Integer argument at `idx`, or `default` when absent.
fn integer(method: &str, arguments: &[Value], idx: usize, default: f64) -> Result<f64, Unwind> {
    match arguments.get(idx) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Number { value }) => Ok(value.trunc()),
        Some(other) => Err(invalid_argument(method, format!("expected a number, got {}", other.kind())))
    }
}

/// Clamps a possibly negative position into `0..=length`.
fn relative(position: f64, length: usize) -> usize {
    let length = length as f64;

    let position = if position < 0.0 {
        (length + position).max(0.0)
    } else {
        position.min(length)
    };

    position as usize
}

fn call_array_method(
    values: &Rc<RefCell<Vec<Value>>>,
    method: &str,
    arguments: Vec<Value>,
    scope: &Scope
) -> EvalResult {
    let receiver = Value::Array { values: values.clone() };
    // callbacks may mutate the array, so never hold a borrow across one
    let snapshot = || values.borrow().clone();

    match method {
        "length" => Ok(Value::number(values.borrow().len() as f64)),
        "push" => {
            let mut values = values.borrow_mut();
            values.extend(arguments);

            Ok(Value::number(values.len() as f64))
        },
        "pop" => Ok(values.borrow_mut().pop().unwrap_or(NULL)),
        "slice" => {
            let items = values.borrow();
            let start = relative(integer(method, &arguments, 0, 0.0)?, items.len());
            let end = relative(integer(method, &arguments, 1, items.len() as f64)?, items.len());

            let sliced = if start < end { items[start..end].to_vec() } else { vec![] };

            Ok(Value::array(sliced))
        },
        "map" => {
            let callback = callback(method, &arguments)?;
            let mut mapped = vec![];

            for (idx, item) in snapshot().into_iter().enumerate() {
                let args = vec![item, Value::number(idx as f64), receiver.clone()];
                mapped.push(call_function(callback, args, scope)?);
            }

            Ok(Value::array(mapped))
        },
        "filter" => {
            let callback = callback(method, &arguments)?;
            let mut kept = vec![];

            for (idx, item) in snapshot().into_iter().enumerate() {
                let args = vec![item.clone(), Value::number(idx as f64), receiver.clone()];

                if call_function(callback, args, scope)?.is_truthy() {
                    kept.push(item);
                }
            }

            Ok(Value::array(kept))
        },
        "forEach" => {
            let callback = callback(method, &arguments)?;

            for (idx, item) in snapshot().into_iter().enumerate() {
                call_function(callback, vec![item, Value::number(idx as f64), receiver.clone()], scope)?;
            }

            Ok(NULL)
        },
        "reduce" => {
            let callback = callback(method, &arguments)?;
            let mut items = snapshot().into_iter().enumerate();

            let mut accumulator = match arguments.get(1) {
                Some(initial) => initial.clone(),
                None => match items.next() {
                    Some((_, first)) => first,
                    None => return Err(invalid_argument(method, "empty array with no initial value"))
                }
            };

            for (idx, item) in items {
                let args = vec![accumulator, item, Value::number(idx as f64), receiver.clone()];
                accumulator = call_function(callback, args, scope)?;
            }

            Ok(accumulator)
        },
        "sort" => {
            let mut items = snapshot();

            match arguments.first() {
                Some(comparator @ (Value::Function(_) | Value::Native(_))) => {
                    let mut failure = None;

                    items.sort_by(|a, b| {
                        if failure.is_some() {
                            return Ordering::Equal;
                        }

                        match call_function(comparator, vec![a.clone(), b.clone()], scope) {
                            Ok(Value::Number { value }) if value < 0.0 => Ordering::Less,
                            Ok(Value::Number { value }) if value > 0.0 => Ordering::Greater,
                            Ok(_) => Ordering::Equal,
                            Err(unwind) => {
                                failure = Some(unwind);
                                Ordering::Equal
                            }
                        }
                    });

                    if let Some(unwind) = failure {
                        return Err(unwind);
                    }
                },
                Some(other) => return Err(invalid_argument(
                    method,
                    format!("expected a comparator function, got {}", other.kind())
                )),
                None => items.sort_by(default_order)
            }

            *values.borrow_mut() = items;

            Ok(receiver)
        },
        _ => Ok(NULL)
    }
}

/// Numbers ascending when both sides are numbers, string order otherwise.
fn default_order(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number { value: a }, Value::Number { value: b }) => {
            a.partial_cmp(b).unwrap_or(Ordering::Equal)
        },
        _ => a.to_string().cmp(&b.to_string())
    }
}

fn string_argument<'a>(method: &str, arguments: &'a [Value]) -> Result<&'a str, Unwind> {
    match arguments.first() {
        Some(Value::String { value }) => Ok(value),
        Some(other) => Err(invalid_argument(method, format!("expected a string, got {}", other.kind()))),
        None => Err(invalid_argument(method, "expected a string"))
    }
}

fn call_string_method(value: &str, method: &str, arguments: Vec<Value>) -> EvalResult {
    let result = match method {
        "length" => Value::number(value.chars().count() as f64),
        "toUpperCase" => Value::string(value.to_uppercase()),
        "toLowerCase" => Value::string(value.to_lowercase()),
        "trim" => Value::string(value.trim()),
        "substring" => {
            let chars = value.chars().collect::<Vec<char>>();
            let clamp = |position: f64| position.max(0.0).min(chars.len() as f64) as usize;

            let start = clamp(integer(method, &arguments, 0, 0.0)?);
            let end = clamp(integer(method, &arguments, 1, chars.len() as f64)?);
            let (start, end) = if start > end { (end, start) } else { (start, end) };

            Value::string(chars[start..end].iter().collect::<String>())
        },
        "indexOf" => {
            let needle = string_argument(method, &arguments)?;

            match value.find(needle) {
                Some(byte_idx) => Value::number(value[..byte_idx].chars().count() as f64),
                None => Value::number(-1.0)
            }
        },
        "includes" => Value::boolean(value.contains(string_argument(method, &arguments)?)),
        "startsWith" => Value::boolean(value.starts_with(string_argument(method, &arguments)?)),
        "endsWith" => Value::boolean(value.ends_with(string_argument(method, &arguments)?)),
        _ => NULL
    };

    Ok(result)
}
