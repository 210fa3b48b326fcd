pub mod io;
pub mod math;
pub mod collections;
pub mod fetch;

pub mod prelude {
    pub use super::{
        create_global_scope,
        fetch::json_to_value
    };
}


use crate::{
    environment::prelude::{Environment, Properties, Scope, Value, FALSE, NULL, TRUE},
    eval::prelude::{RuntimeError, RuntimeErrorType, Unwind},
    utils::prelude::Output
};

/// Root scope with every native binding a program can reach by name.
pub fn create_global_scope(output: Output) -> Scope {
    let scope = Environment::root();

    {
        let mut root = scope.borrow_mut();
        let mut bind = |name: &str, value: Value| {
            // the root starts empty, so names cannot collide
            let _ = root.declare(name, value, true);
        };

        bind("true", TRUE);
        bind("false", FALSE);
        bind("null", NULL);

        bind("gool", io::console(output));
        bind("jeeb", Value::native("jeeb", fetch::jeeb));
        bind("Math", math::math_object());
        bind("Type", math::type_object());

        for (name, value) in collections::global_helpers() {
            bind(name, value);
        }
    }

    scope
}

pub(crate) fn object(entries: Vec<(&str, Value)>) -> Value {
    Value::object(Properties::from_iter(
        entries.into_iter().map(|(key, value)| (key.to_string(), value))
    ))
}

pub(crate) fn invalid_argument(function: &str, message: impl Into<String>) -> Unwind {
    RuntimeError::new(RuntimeErrorType::InvalidArgument {
        function: function.to_string(),
        message: message.into()
    }).into()
}

pub(crate) fn number_argument(function: &str, arguments: &[Value], idx: usize) -> Result<f64, Unwind> {
    match arguments.get(idx) {
        Some(Value::Number { value }) => Ok(*value),
        Some(other) => Err(invalid_argument(function, format!("expected a number, got {}", other.kind()))),
        None => Err(invalid_argument(function, format!("missing argument {}", idx + 1)))
    }
}

pub(crate) fn string_argument<'a>(function: &str, arguments: &'a [Value], idx: usize) -> Result<&'a str, Unwind> {
    match arguments.get(idx) {
        Some(Value::String { value }) => Ok(value),
        Some(other) => Err(invalid_argument(function, format!("expected a string, got {}", other.kind()))),
        None => Err(invalid_argument(function, format!("missing argument {}", idx + 1)))
    }
}
