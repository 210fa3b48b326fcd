use rand::Rng;

use crate::{
    environment::prelude::Value,
    eval::prelude::{RuntimeError, RuntimeErrorType}
};

use super::{number_argument, object};

fn unary(name: &'static str, op: fn(f64) -> f64) -> Value {
    Value::native(name, move |arguments, _scope| {
        Ok(Value::number(op(number_argument(name, &arguments, 0)?)))
    })
}

fn fold(name: &'static str, initial: f64, op: fn(f64, f64) -> f64) -> Value {
    Value::native(name, move |arguments, _scope| {
        let mut result = initial;

        for idx in 0..arguments.len() {
            result = op(result, number_argument(name, &arguments, idx)?);
        }

        Ok(Value::number(result))
    })
}

pub fn math_object() -> Value {
    object(vec![
        ("max", fold("max", f64::NEG_INFINITY, f64::max)),
        ("min", fold("min", f64::INFINITY, f64::min)),
        // halves round towards positive infinity
        ("round", unary("round", |value| (value + 0.5).floor())),
        ("floor", unary("floor", f64::floor)),
        ("ceil", unary("ceil", f64::ceil)),
        ("abs", unary("abs", f64::abs)),
        ("sqrt", unary("sqrt", f64::sqrt)),
        ("pow", Value::native("pow", |arguments, _scope| {
            let base = number_argument("pow", &arguments, 0)?;
            let exponent = number_argument("pow", &arguments, 1)?;

            Ok(Value::number(base.powf(exponent)))
        })),
        ("random", Value::native("random", |_arguments, _scope| {
            Ok(Value::number(rand::thread_rng().gen::<f64>()))
        })),
    ])
}

pub fn to_number(value: &Value) -> Result<f64, RuntimeError> {
    match value {
        Value::Number { value } => Ok(*value),
        Value::Boolean { value } => Ok(if *value { 1.0 } else { 0.0 }),
        Value::Null => Ok(0.0),
        Value::String { value } => {
            let trimmed = value.trim();

            if trimmed.is_empty() {
                return Ok(0.0);
            }

            trimmed.parse::<f64>().map_err(|_| RuntimeError::new(RuntimeErrorType::InvalidArgument {
                function: "toNumber".to_string(),
                message: format!("cannot parse {value:?} as a number")
            }))
        },
        other => Err(RuntimeError::new(RuntimeErrorType::UnsupportedCoercion {
            from: other.kind(),
            to: "a number"
        }))
    }
}

pub fn type_object() -> Value {
    object(vec![
        ("toString", Value::native("toString", |arguments, _scope| {
            Ok(Value::string(arguments.first().map(Value::to_string).unwrap_or_default()))
        })),
        ("toNumber", Value::native("toNumber", |arguments, _scope| {
            let value = arguments.first().cloned().unwrap_or(Value::Null);

            Ok(Value::number(to_number(&value)?))
        })),
        ("toBoolean", Value::native("toBoolean", |arguments, _scope| {
            Ok(Value::boolean(arguments.first().is_some_and(Value::is_truthy)))
        })),
    ])
}
