pub mod error;
pub mod deferred;
pub mod expressions;
pub mod statements;
pub mod coroutine;
pub mod methods;

pub mod prelude {
    pub use super::{
        error::*,
        deferred::{resolve, Deferred},
        expressions::{call_function, eval_expression},
        statements::{eval_block, eval_statement},
        run_program,
        EvalResult
    };
}

#[cfg(test)]
mod tests;

use tokio::{runtime::Builder, task::LocalSet};

use crate::{
    environment::prelude::{Scope, Value},
    parser::prelude::Program
};

use error::{RuntimeError, RuntimeErrorType, Unwind};

pub type EvalResult = Result<Value, Unwind>;

/// Runs `program` in `scope` on a fresh single-threaded runtime. Top-level
/// statements execute sequentially, each pending result settling before
/// the next statement starts; afterwards every computation still in
/// flight is driven to completion.
///
/// Returns the value of the last statement, or the first failure of a
/// pending computation that nothing waited for.
pub fn run_program(program: &Program, scope: &Scope) -> Result<Value, RuntimeError> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| RuntimeError::new(RuntimeErrorType::Host { message: err.to_string() }))?;

    let local = LocalSet::new();
    deferred::clear_failures();

    log::debug!("running {} top-level statements", program.body.len());

    let outcome = local.block_on(&runtime, coroutine::exec_block(&program.body, scope));

    runtime.block_on(local);

    let unobserved = deferred::take_unobserved_failure();

    match (outcome, unobserved) {
        (Err(unwind), _) | (Ok(_), Some(unwind)) => Err(unwind.into_error()),
        (Ok(Value::Return(value)), None) => Ok(*value),
        (Ok(value), None) => Ok(value)
    }
}
