use crate::{environment::prelude::{Value, NULL}, utils::prelude::Output};

/// `gool(...args)`: one line, arguments separated by a space.
pub fn console(output: Output) -> Value {
    Value::native("gool", move |arguments, _scope| {
        let line = arguments.iter()
            .map(|argument| argument.inspect())
            .collect::<Vec<String>>()
            .join(" ");

        output.write_line(line);

        Ok(NULL)
    })
}
