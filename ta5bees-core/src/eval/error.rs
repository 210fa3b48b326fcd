use thiserror::Error;

use crate::{environment::prelude::Value, utils::prelude::SrcSpan};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeErrorType {
    #[error("`{name}` is already declared in this scope")]
    DuplicateDeclaration {
        name: String
    },
    #[error("cannot reassign constant `{name}`")]
    ConstantReassignment {
        name: String
    },
    #[error("`{name}` is not defined")]
    UnresolvedIdentifier {
        name: String
    },
    #[error("operator `{operator}` cannot be applied to {left} and {right}")]
    OperandMismatch {
        operator: String,
        left: &'static str,
        right: &'static str
    },
    #[error("division by zero")]
    DivisionByZero,
    #[error("modulo by zero")]
    ModuloByZero,
    #[error("index {index} is out of bounds for length {length}")]
    IndexOutOfBounds {
        index: String,
        length: usize
    },
    #[error("{kind} has no method `{name}`")]
    UnknownMethod {
        kind: &'static str,
        name: String
    },
    #[error("invalid assignment target")]
    InvalidAssignmentTarget,
    #[error("{kind} is not callable")]
    NotCallable {
        kind: &'static str
    },
    #[error("cannot use {from} as {to}")]
    UnsupportedCoercion {
        from: &'static str,
        to: &'static str
    },
    #[error("{function}: {message}")]
    InvalidArgument {
        function: String,
        message: String
    },
    #[error("`{keyword}` used outside of a loop")]
    StrayLoopControl {
        keyword: &'static str
    },
    #[error("uncaught exception: {value}")]
    UncaughtThrow {
        value: String
    },
    #[error("network request failed: {message}")]
    Network {
        message: String
    },
    #[error("host failure: {message}")]
    Host {
        message: String
    },
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{error}")]
pub struct RuntimeError {
    pub error: RuntimeErrorType,
    pub location: Option<SrcSpan>
}

impl RuntimeError {
    pub fn new(error: RuntimeErrorType) -> Self {
        Self {
            error,
            location: None
        }
    }

    /// Attaches `location` unless a more precise one is already known.
    pub fn at(mut self, location: SrcSpan) -> Self {
        if self.location.is_none() {
            self.location = Some(location);
        }

        self
    }

    pub fn details(&self) -> (&'static str, Vec<String>) {
        let label = match &self.error {
            RuntimeErrorType::DuplicateDeclaration { .. } => "Declared twice",
            RuntimeErrorType::ConstantReassignment { .. } => "Constant reassigned",
            RuntimeErrorType::UnresolvedIdentifier { .. } => "Unknown identifier",
            RuntimeErrorType::OperandMismatch { .. } |
            RuntimeErrorType::UnsupportedCoercion { .. } => "Type error",
            RuntimeErrorType::DivisionByZero |
            RuntimeErrorType::ModuloByZero => "Zero divisor",
            RuntimeErrorType::IndexOutOfBounds { .. } => "Index out of bounds",
            RuntimeErrorType::UnknownMethod { .. } => "Unknown method",
            RuntimeErrorType::InvalidAssignmentTarget => "Cannot assign here",
            RuntimeErrorType::NotCallable { .. } => "Not a function",
            RuntimeErrorType::InvalidArgument { .. } => "Invalid argument",
            RuntimeErrorType::StrayLoopControl { .. } => "Not inside a loop",
            RuntimeErrorType::UncaughtThrow { .. } => "Thrown here",
            RuntimeErrorType::Network { .. } => "Request failed",
            RuntimeErrorType::Host { .. } => "Host failure",
        };

        (label, vec![self.error.to_string()])
    }
}

pub fn runtime_error<T>(error: RuntimeErrorType) -> Result<T, Unwind> {
    Err(Unwind::Error(RuntimeError::new(error)))
}

/// Non-local exits. Everything but `Error` is produced by a statement on
/// purpose and has a fixed place it may stop.
#[derive(Debug, Clone)]
pub enum Unwind {
    Error(RuntimeError),
    Throw {
        value: Value,
        location: SrcSpan
    },
    Break {
        location: SrcSpan
    },
    Continue {
        location: SrcSpan
    },
}

impl From<RuntimeError> for Unwind {
    fn from(value: RuntimeError) -> Self {
        Self::Error(value)
    }
}

impl Unwind {
    pub fn at(self, location: SrcSpan) -> Self {
        match self {
            Self::Error(err) => Self::Error(err.at(location)),
            other => other
        }
    }

    /// Value a catch block binds: the thrown value itself, or the message
    /// of a runtime error. Loop control is not catchable.
    pub fn into_caught(self) -> Result<Value, Unwind> {
        match self {
            Self::Error(err) => Ok(Value::string(err.error.to_string())),
            Self::Throw { value, .. } => Ok(value),
            other => Err(other)
        }
    }

    /// Loop control must not cross a function boundary.
    pub fn seal(self) -> Self {
        match self {
            Self::Break { location } => Self::Error(
                RuntimeError::new(RuntimeErrorType::StrayLoopControl { keyword: "iksir" }).at(location)
            ),
            Self::Continue { location } => Self::Error(
                RuntimeError::new(RuntimeErrorType::StrayLoopControl { keyword: "kammil" }).at(location)
            ),
            other => other
        }
    }

    pub fn into_error(self) -> RuntimeError {
        match self.seal() {
            Self::Error(err) => err,
            Self::Throw { value, location } => RuntimeError::new(RuntimeErrorType::UncaughtThrow {
                value: value.inspect()
            }).at(location),
            Self::Break { location } | Self::Continue { location } => {
                RuntimeError::new(RuntimeErrorType::StrayLoopControl { keyword: "iksir" }).at(location)
            }
        }
    }
}
