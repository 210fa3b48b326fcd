use std::rc::Rc;

use crate::{
    environment::prelude::{Environment, Function, Properties, Scope, Value, NULL},
    lexer::prelude::Token,
    parser::prelude::{ArrowBody, ArrowFunction, Assignment, Binary, Call, Expression, Member, Primitive},
    utils::prelude::SrcSpan
};

use super::{
    coroutine,
    deferred::{resolve, Deferred},
    error::{RuntimeError, RuntimeErrorType, Unwind},
    methods,
    statements::eval_block,
    EvalResult
};

pub fn eval_expression(expression: &Expression, scope: &Scope) -> EvalResult {
    match expression {
        Expression::Identifier(ident) => scope.borrow()
            .lookup(&ident.value)
            .map_err(|err| err.at(ident.location).into()),
        Expression::Primitive(Primitive::Number { value, .. }) => Ok(Value::number(*value)),
        Expression::Primitive(Primitive::String { value, .. }) => Ok(Value::string(value.clone())),
        Expression::Binary(binary) => eval_binary(binary, scope),
        Expression::Assignment(assignment) => eval_assignment(assignment, scope),
        Expression::Call(call) => eval_call(call, scope),
        Expression::Member(member) => eval_member(member, scope),
        Expression::Array(array) => {
            let values = array.elements.iter()
                .map(|element| eval_expression(element, scope))
                .collect::<Result<Vec<Value>, Unwind>>()?;

            Ok(Value::array(values))
        },
        Expression::Object(object) => {
            let mut properties = Properties::new();

            for property in &object.properties {
                properties.insert(property.key.clone(), eval_expression(&property.value, scope)?);
            }

            Ok(Value::object(properties))
        },
        Expression::ArrowFunction(arrow) => Ok(closure(arrow, scope, false)),
        Expression::Await(await_) => {
            match eval_expression(&await_.argument, scope)? {
                Value::Pending(deferred) => Ok(Value::Pending(Deferred::spawn(async move {
                    deferred.settled().await
                }))),
                value => Ok(value)
            }
        },
        Expression::AsyncWrap(wrap) => match wrap.argument.as_ref() {
            Expression::ArrowFunction(arrow) => Ok(closure(arrow, scope, true)),
            argument => {
                let value = eval_expression(argument, scope)?;

                Ok(Value::Pending(Deferred::spawn(resolve(value))))
            }
        },
    }
}

fn closure(arrow: &ArrowFunction, scope: &Scope, is_async: bool) -> Value {
    Value::Function(Rc::new(Function {
        name: "anonymous".to_string(),
        parameters: arrow.parameters.iter()
            .map(|param| param.value.clone())
            .collect(),
        body: arrow.body.clone(),
        scope: scope.clone(),
        is_async,
    }))
}

fn eval_binary(binary: &Binary, scope: &Scope) -> EvalResult {
    if matches!(binary.operator, Token::And | Token::Or) {
        return eval_logical(binary, scope);
    }

    let left = eval_expression(&binary.left, scope)?;
    let right = eval_expression(&binary.right, scope)?;

    if left.is_pending() || right.is_pending() {
        let operator = binary.operator.clone();
        let location = binary.location;

        return Ok(Value::Pending(Deferred::spawn(async move {
            let left = resolve(left).await?;
            let right = resolve(right).await?;

            apply_operator(&operator, left, right).map_err(|err| err.at(location).into())
        })));
    }

    apply_operator(&binary.operator, left, right).map_err(|err| err.at(binary.location).into())
}

/// `&&` and `||` yield booleans and skip the right operand when the left
/// one already decides the result.
fn eval_logical(binary: &Binary, scope: &Scope) -> EvalResult {
    let left = eval_expression(&binary.left, scope)?;
    let is_and = binary.operator == Token::And;

    if let Value::Pending(deferred) = left {
        let right = binary.right.clone();
        let scope = scope.clone();

        return Ok(Value::Pending(Deferred::spawn(async move {
            let left = deferred.settled().await?;

            if left.is_truthy() != is_and {
                return Ok(Value::boolean(!is_and));
            }

            let right = resolve(eval_expression(&right, &scope)?).await?;

            Ok(Value::boolean(right.is_truthy()))
        })));
    }

    if left.is_truthy() != is_and {
        return Ok(Value::boolean(!is_and));
    }

    match eval_expression(&binary.right, scope)? {
        Value::Pending(deferred) => Ok(Value::Pending(Deferred::spawn(async move {
            Ok(Value::boolean(deferred.settled().await?.is_truthy()))
        }))),
        right => Ok(Value::boolean(right.is_truthy()))
    }
}

/// Arithmetic and comparison on two settled operands.
pub fn apply_operator(operator: &Token, left: Value, right: Value) -> Result<Value, RuntimeError> {
    let is_comparison = matches!(
        operator,
        Token::Equal | Token::NotEqual |
        Token::LessThan | Token::LessThanOrEqual |
        Token::GreaterThan | Token::GreaterThanOrEqual
    );

    match (&left, &right) {
        (Value::String { .. }, _) | (_, Value::String { .. }) if *operator == Token::Plus => {
            Ok(Value::string(format!("{left}{right}")))
        },
        (Value::Number { value: a }, Value::Number { value: b }) => {
            let (a, b) = (*a, *b);

            let value = match operator {
                Token::Plus => Value::number(a + b),
                Token::Minus => Value::number(a - b),
                Token::Asterisk => Value::number(a * b),
                Token::Slash if b == 0.0 => return Err(RuntimeError::new(RuntimeErrorType::DivisionByZero)),
                Token::Slash => Value::number(a / b),
                Token::Percent if b == 0.0 => return Err(RuntimeError::new(RuntimeErrorType::ModuloByZero)),
                Token::Percent => Value::number(a % b),
                Token::Equal => Value::boolean(a == b),
                Token::NotEqual => Value::boolean(a != b),
                Token::LessThan => Value::boolean(a < b),
                Token::LessThanOrEqual => Value::boolean(a <= b),
                Token::GreaterThan => Value::boolean(a > b),
                Token::GreaterThanOrEqual => Value::boolean(a >= b),
                _ => return Err(mismatch(operator, &left, &right))
            };

            Ok(value)
        },
        // comparisons are only defined between numbers
        _ if is_comparison => Ok(NULL),
        _ => Err(mismatch(operator, &left, &right))
    }
}

fn mismatch(operator: &Token, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::new(RuntimeErrorType::OperandMismatch {
        operator: operator.as_literal(),
        left: left.kind(),
        right: right.kind()
    })
}

fn eval_assignment(assignment: &Assignment, scope: &Scope) -> EvalResult {
    let value = eval_expression(&assignment.value, scope)?;

    store(&assignment.assignee, value, scope)
}

/// Writes `value` to an identifier, array element or object property.
pub fn store(assignee: &Expression, value: Value, scope: &Scope) -> EvalResult {
    match assignee {
        Expression::Identifier(ident) => scope.borrow_mut()
            .assign(&ident.value, value)
            .map_err(|err| err.at(ident.location).into()),
        Expression::Member(member) => {
            let object = eval_expression(&member.object, scope)?;
            let key = property_key(member, scope)?;

            match object {
                Value::Array { values } => {
                    let mut values = values.borrow_mut();
                    let idx = array_index(&key, values.len()).map_err(|err| err.at(member.location))?;

                    values[idx] = value.clone();
                },
                Value::Object { properties } => {
                    let key = object_key(&key).map_err(|err| err.at(member.location))?;

                    properties.borrow_mut().insert(key, value.clone());
                },
                _ => return Err(RuntimeError::new(RuntimeErrorType::InvalidAssignmentTarget)
                    .at(member.location)
                    .into())
            }

            Ok(value)
        },
        other => Err(RuntimeError::new(RuntimeErrorType::InvalidAssignmentTarget)
            .at(other.location())
            .into())
    }
}

fn property_key(member: &Member, scope: &Scope) -> EvalResult {
    match (member.computed, member.property.as_ref()) {
        (false, Expression::Identifier(ident)) => Ok(Value::string(ident.value.clone())),
        _ => eval_expression(&member.property, scope)
    }
}

/// Only integral numbers inside `0..length` address an element.
pub fn array_index(key: &Value, length: usize) -> Result<usize, RuntimeError> {
    let index = match key {
        Value::Number { value } => *value,
        other => return Err(RuntimeError::new(RuntimeErrorType::UnsupportedCoercion {
            from: other.kind(),
            to: "an array index"
        }))
    };

    if index.fract() != 0.0 || index < 0.0 || index >= length as f64 {
        return Err(RuntimeError::new(RuntimeErrorType::IndexOutOfBounds {
            index: key.to_string(),
            length
        }));
    }

    Ok(index as usize)
}

pub fn object_key(key: &Value) -> Result<String, RuntimeError> {
    match key {
        Value::String { value } => Ok(value.clone()),
        Value::Number { .. } | Value::Boolean { .. } => Ok(key.to_string()),
        other => Err(RuntimeError::new(RuntimeErrorType::UnsupportedCoercion {
            from: other.kind(),
            to: "a property key"
        }))
    }
}

fn eval_member(member: &Member, scope: &Scope) -> EvalResult {
    let object = eval_expression(&member.object, scope)?;
    let key = property_key(member, scope)?;

    if object.is_pending() || key.is_pending() {
        let computed = member.computed;
        let location = member.location;

        return Ok(Value::Pending(Deferred::spawn(async move {
            let object = resolve(object).await?;
            let key = resolve(key).await?;

            read_member(object, key, computed).map_err(|err| err.at(location).into())
        })));
    }

    read_member(object, key, member.computed).map_err(|err| err.at(member.location).into())
}

pub fn read_member(object: Value, key: Value, computed: bool) -> Result<Value, RuntimeError> {
    match (&object, computed) {
        (Value::Object { properties }, _) => {
            let key = object_key(&key)?;

            Ok(properties.borrow().get(&key).cloned().unwrap_or(NULL))
        },
        (Value::Array { values }, true) => {
            let values = values.borrow();
            let idx = array_index(&key, values.len())?;

            Ok(values[idx].clone())
        },
        (Value::String { value }, true) => {
            let chars = value.chars().collect::<Vec<char>>();
            let idx = array_index(&key, chars.len())?;

            Ok(Value::string(chars[idx]))
        },
        (Value::Array { .. } | Value::String { .. }, false) => {
            let name = object_key(&key)?;

            methods::lookup(object, &name)
        },
        _ => Ok(NULL)
    }
}

fn eval_call(call: &Call, scope: &Scope) -> EvalResult {
    let callee = eval_expression(&call.callee, scope)?;
    let arguments = call.arguments.iter()
        .map(|argument| eval_expression(argument, scope))
        .collect::<Result<Vec<Value>, Unwind>>()?;

    invoke(callee, arguments, scope, call.location)
}

/// Calls `callee`, deferring the call until a pending callee or argument
/// has settled.
pub fn invoke(callee: Value, arguments: Vec<Value>, scope: &Scope, location: SrcSpan) -> EvalResult {
    if callee.is_pending() || arguments.iter().any(Value::is_pending) {
        let scope = scope.clone();

        return Ok(Value::Pending(Deferred::spawn(async move {
            let callee = resolve(callee).await?;
            let mut resolved = Vec::with_capacity(arguments.len());

            for argument in arguments {
                resolved.push(resolve(argument).await?);
            }

            call_function(&callee, resolved, &scope).map_err(|unwind| unwind.at(location))
        })));
    }

    call_function(&callee, arguments, scope).map_err(|unwind| unwind.at(location))
}

pub fn call_function(callee: &Value, arguments: Vec<Value>, scope: &Scope) -> EvalResult {
    match callee {
        Value::Native(native) => (native.call)(arguments, scope),
        Value::Function(function) => call_user_function(function, arguments),
        other => Err(RuntimeError::new(RuntimeErrorType::NotCallable { kind: other.kind() }).into())
    }
}

fn call_user_function(function: &Rc<Function>, arguments: Vec<Value>) -> EvalResult {
    let frame = Environment::child(&function.scope);

    {
        let mut frame = frame.borrow_mut();
        let mut arguments = arguments.into_iter();

        for name in &function.parameters {
            frame.declare(name, arguments.next().unwrap_or(NULL), false)?;
        }
    }

    if function.is_async {
        let function = function.clone();

        return Ok(Value::Pending(Deferred::spawn(async move {
            coroutine::exec_function_body(&function.body, &frame).await
        })));
    }

    let result = match &function.body {
        ArrowBody::Block(block) => eval_block(block, &frame),
        ArrowBody::Expression(expression) => eval_expression(expression, &frame)
    };

    match result.map_err(Unwind::seal)? {
        Value::Return(value) => Ok(*value),
        _ if matches!(function.body, ArrowBody::Block(_)) => Ok(NULL),
        value => Ok(value)
    }
}
