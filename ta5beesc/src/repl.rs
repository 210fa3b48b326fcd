use std::{io::Write, path::PathBuf};

use ta5bees_core::{
    driver::prelude::run_source,
    environment::prelude::Value,
    stdlib::prelude::create_global_scope,
    utils::prelude::Output
};

const PROMPT: &str = ">> ";

/// Reads lines until `.exit` or end of input, handing every non-empty
/// line to `handle`.
pub fn prompt_loop(mut handle: impl FnMut(&str)) -> std::io::Result<()> {
    let stdin = std::io::stdin();

    loop {
        let mut input = String::new();

        print!("{PROMPT}");
        std::io::stdout().flush()?;

        if stdin.read_line(&mut input)? == 0 {
            return Ok(());
        }

        match input.trim_end_matches(['\n', '\r']) {
            "" => {},
            ".exit" => return Ok(()),
            line => handle(line)
        }
    }
}

/// Evaluates each line against one root scope, so bindings persist
/// between inputs.
pub fn start() -> std::io::Result<()> {
    let scope = create_global_scope(Output::stdout());
    let path = PathBuf::from("repl");

    prompt_loop(|line| match run_source(&path, line, &scope) {
        Ok(Value::Null) => {},
        Ok(value) => println!("{}", value.inspect()),
        Err(err) => crate::report(&err)
    })
}
