use std::{
    io::{IsTerminal, Write},
    time::Duration,
};
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

pub(crate) fn print_compiling(text: &str) {
    print_colourful_prefix("Compiling", Color::Cyan, text)
}

pub(crate) fn print_compiled(target: &str, duration: Duration) {
    print_colourful_prefix("Compiled", Color::Green, &format!("{target} in {}", seconds(duration)))
}

pub(crate) fn print_running(text: &str) {
    print_colourful_prefix("Running", Color::Magenta, text)
}

pub(crate) fn print_finished(duration: Duration) {
    print_colourful_prefix("Finished", Color::Green, &format!("in {}", seconds(duration)))
}

pub(crate) fn print_watching(text: &str) {
    print_colourful_prefix("Watching", Color::Yellow, text)
}

pub(crate) fn print_error(text: &str) {
    print_colourful_prefix("Error", Color::Red, text)
}

pub fn seconds(duration: Duration) -> String {
    format!("{:.2}s", duration.as_millis() as f32 / 1000.)
}

/// Right-aligned coloured word followed by `text`, written to stderr.
pub fn print_colourful_prefix(prefix: &str, color: Color, text: &str) {
    let buffer_writer = stderr_buffer_writer();
    let mut buffer = buffer_writer.buffer();

    let written = buffer
        .set_color(
            ColorSpec::new()
                .set_intense(true)
                .set_bold(true)
                .set_fg(Some(color)),
        )
        .and_then(|_| write!(buffer, "{prefix: >11}"))
        .and_then(|_| buffer.set_color(&ColorSpec::new()))
        .and_then(|_| writeln!(buffer, " {text}"))
        .and_then(|_| buffer_writer.print(&buffer));

    if let Err(err) = written {
        log::warn!("could not write to stderr: {err}");
    }
}

pub fn stderr_buffer_writer() -> BufferWriter {
    BufferWriter::stderr(color_choice())
}

fn colour_forced() -> bool {
    std::env::var("FORCE_COLOR").is_ok_and(|force| !force.is_empty())
}

fn color_choice() -> ColorChoice {
    if colour_forced() {
        ColorChoice::Always
    } else if std::io::stderr().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}
