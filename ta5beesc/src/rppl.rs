use ta5bees_core::parser::prelude::parse_module;

use crate::repl::prompt_loop;

pub fn start() -> std::io::Result<()> {
    prompt_loop(|line| match parse_module(line) {
        Ok(module) => println!("{}", module.program),
        Err(err) => {
            let (message, extra) = err.details();

            println!("[at {}] Parse error: {message}.\n\t{}", err.span, extra.join(";\n\t"))
        }
    })
}
