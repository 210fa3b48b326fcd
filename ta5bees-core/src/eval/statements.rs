use std::rc::Rc;

use crate::{
    environment::prelude::{Environment, Function, Scope, Value, NULL},
    parser::prelude::{
        ElseBranch, ForInit, ForStatement, IfStatement, Statement, TryCatchStatement,
        VariableDeclaration
    }
};

use super::{
    error::{RuntimeError, Unwind},
    expressions::eval_expression,
    EvalResult
};

pub fn eval_statement(statement: &Statement, scope: &Scope) -> EvalResult {
    match statement {
        Statement::VariableDeclaration(declaration) => {
            let value = match &declaration.value {
                Some(value) => eval_expression(value, scope)?,
                None => NULL
            };

            declare(declaration, value, scope)
        },
        Statement::FunctionDeclaration(declaration) => {
            let function = Value::Function(Rc::new(Function::from_declaration(declaration, scope)));

            scope.borrow_mut()
                .declare(&declaration.name.value, function, true)
                .map_err(|err| err.at(declaration.name.location).into())
        },
        Statement::If(if_) => eval_if(if_, scope),
        Statement::For(for_) => eval_for(for_, scope),
        Statement::TryCatch(try_) => eval_try(try_, scope),
        Statement::Return(return_) => {
            let value = match &return_.argument {
                Some(argument) => eval_expression(argument, scope)?,
                None => NULL
            };

            Ok(Value::Return(Box::new(value)))
        },
        Statement::Throw(throw) => Err(Unwind::Throw {
            value: eval_expression(&throw.argument, scope)?,
            location: throw.location
        }),
        Statement::Break { location } => Err(Unwind::Break { location: *location }),
        Statement::Continue { location } => Err(Unwind::Continue { location: *location }),
        Statement::Expression(expression) => eval_expression(expression, scope),
    }
}

pub fn declare(declaration: &VariableDeclaration, value: Value, scope: &Scope) -> EvalResult {
    scope.borrow_mut()
        .declare(&declaration.name.value, value, declaration.constant)
        .map_err(|err| err.at(declaration.name.location).into())
}

/// Runs statements in order. Stops early on a return signal, which is
/// handed back unchanged.
pub fn eval_block(block: &[Statement], scope: &Scope) -> EvalResult {
    let mut result = NULL;

    for statement in block {
        result = eval_statement(statement, scope)?;

        if let Value::Return(_) = result {
            break;
        }
    }

    Ok(result)
}

fn eval_if(if_: &IfStatement, scope: &Scope) -> EvalResult {
    if eval_expression(&if_.test, scope)?.is_truthy() {
        return eval_block(&if_.consequent, &Environment::child(scope));
    }

    match &if_.alternate {
        Some(ElseBranch::Block(block)) => eval_block(block, &Environment::child(scope)),
        Some(ElseBranch::If(nested)) => eval_if(nested, scope),
        None => Ok(NULL)
    }
}

fn eval_for(for_: &ForStatement, scope: &Scope) -> EvalResult {
    let mut frame = LoopFrame::new(scope);

    match &for_.init {
        Some(ForInit::Declaration(declaration)) => {
            let value = match &declaration.value {
                Some(value) => eval_expression(value, &frame.scope)?,
                None => NULL
            };

            declare(declaration, value, &frame.scope)?;
            frame.track(declaration);
        },
        Some(ForInit::Expression(expression)) => {
            eval_expression(expression, &frame.scope)?;
        },
        None => {}
    }

    loop {
        if let Some(test) = &for_.test {
            if !eval_expression(test, &frame.scope)?.is_truthy() {
                break;
            }
        }

        let iteration = frame.begin_iteration()?;
        let outcome = eval_block(&for_.body, &Environment::child(&iteration));

        match LoopStep::from_outcome(outcome)? {
            LoopStep::Next => frame.end_iteration(&iteration),
            LoopStep::Break => break,
            LoopStep::Return(value) => return Ok(value)
        }

        if let Some(update) = &for_.update {
            eval_expression(update, &frame.scope)?;
        }
    }

    Ok(NULL)
}

/// Scope holding a loop's init bindings. Every iteration sees its own copy
/// of them, so closures created in the body capture that iteration's value.
pub struct LoopFrame {
    pub scope: Scope,
    bindings: Vec<(String, bool)>,
}

impl LoopFrame {
    pub fn new(parent: &Scope) -> Self {
        Self {
            scope: Environment::child(parent),
            bindings: vec![]
        }
    }

    pub fn track(&mut self, declaration: &VariableDeclaration) {
        self.bindings.push((declaration.name.value.clone(), declaration.constant));
    }

    pub fn begin_iteration(&self) -> Result<Scope, RuntimeError> {
        let iteration = Environment::child(&self.scope);

        for (name, constant) in &self.bindings {
            let value = self.scope.borrow().lookup(name)?;

            iteration.borrow_mut().declare(name, value, *constant)?;
        }

        Ok(iteration)
    }

    /// Carries body updates of the loop variables back for the update step.
    pub fn end_iteration(&self, iteration: &Scope) {
        for (name, constant) in &self.bindings {
            if *constant {
                continue;
            }

            if let Some(value) = iteration.borrow().get(name) {
                self.scope.borrow_mut().set(name, value);
            }
        }
    }
}

pub enum LoopStep {
    Next,
    Break,
    Return(Value),
}

impl LoopStep {
    pub fn from_outcome(outcome: EvalResult) -> Result<Self, Unwind> {
        match outcome {
            Ok(value @ Value::Return(_)) => Ok(Self::Return(value)),
            Ok(_) | Err(Unwind::Continue { .. }) => Ok(Self::Next),
            Err(Unwind::Break { .. }) => Ok(Self::Break),
            Err(other) => Err(other)
        }
    }
}

fn eval_try(try_: &TryCatchStatement, scope: &Scope) -> EvalResult {
    match eval_block(&try_.body, scope) {
        Err(unwind) => {
            let handler = catch_scope(try_, unwind, scope)?;

            eval_block(&try_.handler, &handler)
        },
        ok => ok
    }
}

/// Scope for a catch block with the caught value bound, or the unwind
/// itself when it is not catchable.
pub fn catch_scope(try_: &TryCatchStatement, unwind: Unwind, scope: &Scope) -> Result<Scope, Unwind> {
    let caught = unwind.into_caught()?;

    log::debug!("caught `{}` into `{}`", caught.inspect(), try_.parameter.value);

    let handler = Environment::child(scope);
    handler.borrow_mut().declare(&try_.parameter.value, caught, false)?;

    Ok(handler)
}
