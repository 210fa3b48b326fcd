//! Sequential execution for async function bodies and top-level code.
//! Statements run one after another and every pending value a statement
//! produces is waited for before the next one starts.

use std::{future::Future, pin::Pin};

use crate::{
    environment::prelude::{Environment, Scope, Value, NULL},
    parser::prelude::{
        ArrowBody, ElseBranch, Expression, ForInit, ForStatement, IfStatement, Statement,
        TryCatchStatement
    }
};

use super::{
    deferred::resolve,
    error::Unwind,
    expressions::{eval_expression, store},
    statements::{catch_scope, declare, eval_statement, LoopFrame, LoopStep},
    EvalResult
};

type LocalFuture<'a> = Pin<Box<dyn Future<Output = EvalResult> + 'a>>;

pub async fn exec_function_body(body: &ArrowBody, frame: &Scope) -> EvalResult {
    let result = match body {
        ArrowBody::Block(block) => exec_block(block, frame).await,
        ArrowBody::Expression(expression) => settle(expression, frame).await
    };

    match result.map_err(Unwind::seal)? {
        Value::Return(value) => Ok(*value),
        _ if matches!(body, ArrowBody::Block(_)) => Ok(NULL),
        value => Ok(value)
    }
}

async fn settle(expression: &Expression, scope: &Scope) -> EvalResult {
    resolve(eval_expression(expression, scope)?).await
}

pub fn exec_block<'a>(block: &'a [Statement], scope: &'a Scope) -> LocalFuture<'a> {
    Box::pin(async move {
        let mut result = NULL;

        for statement in block {
            result = exec_statement(statement, scope).await?;

            if let Value::Return(_) = result {
                break;
            }
        }

        Ok(result)
    })
}

fn exec_statement<'a>(statement: &'a Statement, scope: &'a Scope) -> LocalFuture<'a> {
    Box::pin(async move {
        match statement {
            Statement::VariableDeclaration(declaration) => {
                let value = match &declaration.value {
                    Some(value) => settle(value, scope).await?,
                    None => NULL
                };

                declare(declaration, value, scope)
            },
            Statement::Expression(Expression::Assignment(assignment)) => {
                let value = settle(&assignment.value, scope).await?;

                store(&assignment.assignee, value, scope)
            },
            Statement::Expression(expression) => settle(expression, scope).await,
            Statement::Return(return_) => {
                let value = match &return_.argument {
                    Some(argument) => settle(argument, scope).await?,
                    None => NULL
                };

                Ok(Value::Return(Box::new(value)))
            },
            Statement::Throw(throw) => Err(Unwind::Throw {
                value: settle(&throw.argument, scope).await?,
                location: throw.location
            }),
            Statement::If(if_) => exec_if(if_, scope).await,
            Statement::For(for_) => exec_for(for_, scope).await,
            Statement::TryCatch(try_) => exec_try(try_, scope).await,
            Statement::FunctionDeclaration(_) |
            Statement::Break { .. } |
            Statement::Continue { .. } => eval_statement(statement, scope),
        }
    })
}

fn exec_if<'a>(if_: &'a IfStatement, scope: &'a Scope) -> LocalFuture<'a> {
    Box::pin(async move {
        if settle(&if_.test, scope).await?.is_truthy() {
            return exec_block(&if_.consequent, &Environment::child(scope)).await;
        }

        match &if_.alternate {
            Some(ElseBranch::Block(block)) => exec_block(block, &Environment::child(scope)).await,
            Some(ElseBranch::If(nested)) => exec_if(nested, scope).await,
            None => Ok(NULL)
        }
    })
}

async fn exec_for(for_: &ForStatement, scope: &Scope) -> EvalResult {
    let mut frame = LoopFrame::new(scope);

    match &for_.init {
        Some(ForInit::Declaration(declaration)) => {
            let value = match &declaration.value {
                Some(value) => settle(value, &frame.scope).await?,
                None => NULL
            };

            declare(declaration, value, &frame.scope)?;
            frame.track(declaration);
        },
        Some(ForInit::Expression(expression)) => {
            settle(expression, &frame.scope).await?;
        },
        None => {}
    }

    loop {
        if let Some(test) = &for_.test {
            if !settle(test, &frame.scope).await?.is_truthy() {
                break;
            }
        }

        let iteration = frame.begin_iteration()?;
        let body = Environment::child(&iteration);
        let outcome = exec_block(&for_.body, &body).await;

        match LoopStep::from_outcome(outcome)? {
            LoopStep::Next => frame.end_iteration(&iteration),
            LoopStep::Break => break,
            LoopStep::Return(value) => return Ok(value)
        }

        if let Some(update) = &for_.update {
            settle(update, &frame.scope).await?;
        }
    }

    Ok(NULL)
}

async fn exec_try(try_: &TryCatchStatement, scope: &Scope) -> EvalResult {
    match exec_block(&try_.body, scope).await {
        Err(unwind) => {
            let handler = catch_scope(try_, unwind, scope)?;

            exec_block(&try_.handler, &handler).await
        },
        ok => ok
    }
}
