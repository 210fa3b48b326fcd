use crate::{
    environment::prelude::{Scope, Value, NULL},
    eval::{methods, prelude::{call_function, EvalResult}}
};

use super::{invalid_argument, string_argument};

/// Free-function spellings of the string and array methods, taking the
/// receiver as their first argument, plus a few helpers only available
/// this way.
pub fn global_helpers() -> Vec<(&'static str, Value)> {
    let delegated = [
        "substring", "toUpperCase", "toLowerCase", "indexOf", "includes", "trim",
        "startsWith", "endsWith", "push", "pop", "length", "filter", "map",
        "reduce", "forEach",
    ];

    let mut helpers = delegated.into_iter()
        .map(|name| (name, Value::native(name, move |arguments, scope| delegate(name, arguments, scope))))
        .collect::<Vec<(&'static str, Value)>>();

    helpers.push(("replace", Value::native("replace", replace)));
    helpers.push(("split", Value::native("split", split)));
    helpers.push(("join", Value::native("join", join)));
    helpers.push(("find", Value::native("find", |arguments, scope| search("find", arguments, scope))));
    helpers.push(("some", Value::native("some", |arguments, scope| search("some", arguments, scope))));
    helpers.push(("every", Value::native("every", |arguments, scope| search("every", arguments, scope))));

    helpers
}

fn delegate(name: &str, mut arguments: Vec<Value>, scope: &Scope) -> EvalResult {
    if arguments.is_empty() {
        return Err(invalid_argument(name, "missing receiver"));
    }

    let receiver = arguments.remove(0);

    if !matches!(receiver, Value::Array { .. } | Value::String { .. }) {
        return Err(invalid_argument(name, format!("cannot be applied to {}", receiver.kind())));
    }

    let method = methods::lookup(receiver, name)?;

    call_function(&method, arguments, scope)
}

/// Replaces the first occurrence only.
fn replace(arguments: Vec<Value>, _scope: &Scope) -> EvalResult {
    let text = string_argument("replace", &arguments, 0)?;
    let pattern = string_argument("replace", &arguments, 1)?;
    let replacement = string_argument("replace", &arguments, 2)?;

    Ok(Value::string(text.replacen(pattern, replacement, 1)))
}

fn split(arguments: Vec<Value>, _scope: &Scope) -> EvalResult {
    let text = string_argument("split", &arguments, 0)?;
    let separator = string_argument("split", &arguments, 1)?;

    let parts: Vec<Value> = if separator.is_empty() {
        text.chars().map(Value::string).collect()
    } else {
        text.split(separator).map(Value::string).collect()
    };

    Ok(Value::array(parts))
}

fn join(arguments: Vec<Value>, _scope: &Scope) -> EvalResult {
    let separator = match arguments.get(1) {
        Some(Value::String { value }) => value.clone(),
        Some(other) => return Err(invalid_argument("join", format!("expected a string separator, got {}", other.kind()))),
        None => ",".to_string()
    };

    match arguments.first() {
        Some(Value::Array { values }) => {
            let parts = values.borrow()
                .iter()
                .map(|value| value.to_string())
                .collect::<Vec<String>>();

            Ok(Value::string(parts.join(&separator)))
        },
        Some(other) => Err(invalid_argument("join", format!("expected an array, got {}", other.kind()))),
        None => Err(invalid_argument("join", "missing receiver"))
    }
}

/// `find`, `some` and `every` stop at the first element that decides
/// the result.
fn search(name: &str, arguments: Vec<Value>, scope: &Scope) -> EvalResult {
    let (values, predicate) = match (arguments.first(), arguments.get(1)) {
        (Some(Value::Array { values }), Some(predicate @ (Value::Function(_) | Value::Native(_)))) => {
            (values.borrow().clone(), predicate.clone())
        },
        _ => return Err(invalid_argument(name, "expected an array and a function"))
    };

    for (idx, item) in values.into_iter().enumerate() {
        let hit = call_function(&predicate, vec![item.clone(), Value::number(idx as f64)], scope)?
            .is_truthy();

        match (name, hit) {
            ("find", true) => return Ok(item),
            ("some", true) => return Ok(Value::boolean(true)),
            ("every", false) => return Ok(Value::boolean(false)),
            _ => {}
        }
    }

    Ok(match name {
        "every" => Value::boolean(true),
        "some" => Value::boolean(false),
        _ => NULL
    })
}

