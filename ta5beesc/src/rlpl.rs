use ta5bees_core::lexer::prelude::tokenize;

use crate::repl::prompt_loop;

pub fn start() -> std::io::Result<()> {
    prompt_loop(|line| match tokenize(line) {
        Ok(tokens) => {
            for (start, token, _) in tokens {
                println!("{:>4}:{:<3} {:?}", start.line, start.column, token);
            }
        },
        Err(err) => {
            let (message, extra) = err.details();

            println!("[at {}] Lexical error: {message}", err.location);

            if !extra.is_empty() {
                println!("{}", extra.join("\n"));
            }
        }
    })
}
