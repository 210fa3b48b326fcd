use std::{cell::RefCell, fmt::Display, rc::Rc};

use crate::{
    eval::prelude::{Deferred, Unwind},
    parser::prelude::{ArrowBody, FunctionDeclaration},
};

use super::environment::Scope;

pub const TRUE: Value = Value::Boolean { value: true };
pub const FALSE: Value = Value::Boolean { value: false };
pub const NULL: Value = Value::Null;

/// Host-provided callable: evaluated arguments plus the caller's scope.
pub type NativeCallable = dyn Fn(Vec<Value>, &Scope) -> Result<Value, Unwind>;

#[derive(Clone)]
pub enum Value {
    Null,
    Number {
        value: f64
    },
    Boolean {
        value: bool
    },
    String {
        value: String
    },
    Array {
        values: Rc<RefCell<Vec<Value>>>
    },
    Object {
        properties: Rc<RefCell<Properties>>
    },
    Function(Rc<Function>),
    Native(NativeFunction),
    Pending(Deferred),
    /// Carries a `raje3li` result up through enclosing blocks. Never
    /// escapes a function call.
    Return(Box<Value>),
}

pub struct Function {
    pub name: String,
    pub parameters: Vec<String>,
    pub body: ArrowBody,
    pub scope: Scope,
    pub is_async: bool,
}

impl Function {
    pub fn from_declaration(declaration: &FunctionDeclaration, scope: &Scope) -> Self {
        Self {
            name: declaration.name.value.clone(),
            parameters: declaration.parameters.iter()
                .map(|param| param.value.clone())
                .collect(),
            body: ArrowBody::Block(declaration.body.clone()),
            scope: scope.clone(),
            is_async: declaration.is_async,
        }
    }
}

#[derive(Clone)]
pub struct NativeFunction {
    pub name: String,
    pub call: Rc<NativeCallable>,
}

impl NativeFunction {
    pub fn new(
        name: impl Into<String>,
        call: impl Fn(Vec<Value>, &Scope) -> Result<Value, Unwind> + 'static
    ) -> Self {
        Self {
            name: name.into(),
            call: Rc::new(call),
        }
    }
}

/// Object properties in insertion order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Properties {
    entries: Vec<(String, Value)>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    /// Overwrites in place, so re-assigned keys keep their original position.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();

        match self.entries.iter_mut().find(|(name, _)| *name == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Value)> for Properties {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut properties = Properties::new();

        for (key, value) in iter {
            properties.insert(key, value);
        }

        properties
    }
}

impl Value {
    pub fn number(value: f64) -> Self {
        Self::Number { value }
    }

    pub fn boolean(value: bool) -> Self {
        Self::Boolean { value }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::String { value: value.into() }
    }

    pub fn array(values: Vec<Value>) -> Self {
        Self::Array { values: Rc::new(RefCell::new(values)) }
    }

    pub fn object(properties: Properties) -> Self {
        Self::Object { properties: Rc::new(RefCell::new(properties)) }
    }

    pub fn native(
        name: impl Into<String>,
        call: impl Fn(Vec<Value>, &Scope) -> Result<Value, Unwind> + 'static
    ) -> Self {
        Self::Native(NativeFunction::new(name, call))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Number { .. } => "number",
            Self::Boolean { .. } => "boolean",
            Self::String { .. } => "string",
            Self::Array { .. } => "array",
            Self::Object { .. } => "object",
            Self::Function(_) | Self::Native(_) => "function",
            Self::Pending(_) => "pending value",
            Self::Return(_) => "return signal",
        }
    }

    /// `false`, `0`, `""` and `null` are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Boolean { value } => *value,
            Self::Number { value } => *value != 0.0,
            Self::String { value } => !value.is_empty(),
            _ => true
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// Rendering used by the console built-in: like [`Display`] but
    /// containers show their structure and nested strings are quoted.
    /// A container reached again through itself prints as `[Circular]`.
    pub fn inspect(&self) -> String {
        match self {
            Self::String { value } => value.clone(),
            other => other.inspect_nested(&mut Vec::new()),
        }
    }

    fn inspect_nested(&self, open: &mut Vec<*const ()>) -> String {
        match self {
            Self::String { value } => format!("{value:?}"),
            Self::Array { values } => {
                let Some(values) = enter(open, values) else {
                    return "[Circular]".to_string();
                };

                let values = values.borrow()
                    .iter()
                    .map(|value| value.inspect_nested(open))
                    .collect::<Vec<String>>();

                open.pop();
                format!("[{}]", values.join(", "))
            },
            Self::Object { properties } => {
                let Some(properties) = enter(open, properties) else {
                    return "[Circular]".to_string();
                };
                let properties = properties.borrow();

                let entries = properties.iter()
                    .map(|(key, value)| format!("{key}: {}", value.inspect_nested(open)))
                    .collect::<Vec<String>>();

                open.pop();

                if entries.is_empty() {
                    "{}".to_string()
                } else {
                    format!("{{ {} }}", entries.join(", "))
                }
            },
            Self::Pending(_) => "<pending>".to_string(),
            other => other.to_string()
        }
    }

    /// String coercion. Like JavaScript's `join`, an array nested in itself
    /// contributes an empty string.
    fn coerce(&self, open: &mut Vec<*const ()>) -> String {
        match self {
            Self::Array { values } => {
                let Some(values) = enter(open, values) else {
                    return String::new();
                };

                let joined = values.borrow()
                    .iter()
                    .map(|value| value.coerce(open))
                    .collect::<Vec<String>>()
                    .join(",");

                open.pop();
                joined
            },
            other => other.to_string()
        }
    }
}

/// Pushes `container` onto the chain of containers being printed, or
/// returns `None` when it is already on it.
fn enter<'a, T>(open: &mut Vec<*const ()>, container: &'a Rc<RefCell<T>>) -> Option<&'a Rc<RefCell<T>>> {
    let ptr = Rc::as_ptr(container) as *const ();

    if open.contains(&ptr) {
        return None;
    }

    open.push(ptr);
    Some(container)
}

pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else {
        format!("{value}")
    }
}

/// String coercion used by `+` concatenation and caught-error binding.
impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Number { value } => write!(f, "{}", format_number(*value)),
            Self::Boolean { value } => write!(f, "{value}"),
            Self::String { value } => write!(f, "{value}"),
            Self::Array { .. } => write!(f, "{}", self.coerce(&mut Vec::new())),
            Self::Object { .. } => write!(f, "[object Object]"),
            Self::Function(function) => write!(f, "[function {}]", function.name),
            Self::Native(native) => write!(f, "[native function {}]", native.name),
            Self::Pending(_) => write!(f, "[pending]"),
            Self::Return(value) => write!(f, "{value}"),
        }
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "Null"),
            Self::Number { value } => write!(f, "Number({value})"),
            Self::Boolean { value } => write!(f, "Boolean({value})"),
            Self::String { value } => write!(f, "String({value:?})"),
            Self::Array { .. } | Self::Object { .. } => write!(f, "{}", self.inspect()),
            Self::Function(function) => write!(f, "Function({})", function.name),
            Self::Native(native) => write!(f, "Native({})", native.name),
            Self::Pending(deferred) => write!(f, "Pending(#{})", deferred.id()),
            Self::Return(value) => write!(f, "Return({value:?})"),
        }
    }
}

/// Structural for data, identity for functions and pending values.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Number { value: a }, Self::Number { value: b }) => a == b,
            (Self::Boolean { value: a }, Self::Boolean { value: b }) => a == b,
            (Self::String { value: a }, Self::String { value: b }) => a == b,
            (Self::Array { values: a }, Self::Array { values: b }) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            },
            (Self::Object { properties: a }, Self::Object { properties: b }) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            },
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Native(a), Self::Native(b)) => Rc::ptr_eq(&a.call, &b.call),
            (Self::Pending(a), Self::Pending(b)) => a.ptr_eq(b),
            (Self::Return(a), Self::Return(b)) => a == b,
            _ => false
        }
    }
}
