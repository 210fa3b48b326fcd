mod cli;
mod repl;
mod rlpl;
mod rppl;
mod watch;

use std::{path::{Path, PathBuf}, time::Instant};

use clap::Parser;
use cli::{
    print_compiled, print_compiling, print_error, print_finished, print_running, print_watching
};
use ta5bees_core::{
    driver::prelude::{compile_file, run_file},
    utils::prelude::{Error, Output}
};
use watch::{WatchTarget, Watcher};

#[derive(Parser)]
#[command(name = "ta5beesc", version)]
enum Command {
    /// Transpiles a source file to JavaScript
    Compile {
        /// Path of source file
        path: PathBuf,
        /// Path of the emitted script [default: <stem>.js next to the source]
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Recompile whenever a source file in the directory changes
        #[arg(short, long, default_value_t = false)]
        watch: bool,
        /// Do not write a position map next to the script
        #[arg(long, default_value_t = false)]
        no_source_map: bool
    },
    /// Evaluates a source file
    Run {
        /// Path of source file
        path: PathBuf,
        /// Rerun whenever the file changes
        #[arg(short, long, default_value_t = false)]
        watch: bool
    },
    /// Runs Read Lex Print Loop
    Rlpl,
    /// Runs Read Parse Print Loop
    Rppl,
    /// Runs Read Eval Print Loop over one persistent scope
    Repl
}

fn main() {
    env_logger::init();

    let outcome = match Command::parse() {
        Command::Compile { path, out, watch, no_source_map } => {
            let compile_once = || compile(&path, out.as_deref(), !no_source_map);

            if watch {
                let target = match path.parent() {
                    Some(dir) if !dir.as_os_str().is_empty() => WatchTarget::Directory(dir.to_path_buf()),
                    _ => WatchTarget::Directory(PathBuf::from("."))
                };

                compile_once();
                watch_with(target, compile_once)
            } else if compile_once() {
                Ok(())
            } else {
                std::process::exit(1);
            }
        },
        Command::Run { path, watch } => {
            let run_once = || run(&path);

            if watch {
                run_once();
                watch_with(WatchTarget::File(path.clone()), run_once)
            } else if run_once() {
                Ok(())
            } else {
                std::process::exit(1);
            }
        },
        Command::Rlpl => rlpl::start(),
        Command::Rppl => rppl::start(),
        Command::Repl => repl::start()
    };

    if let Err(err) = outcome {
        report(&err.into());
        std::process::exit(1);
    }
}

fn compile(path: &Path, out: Option<&Path>, source_map: bool) -> bool {
    print_compiling(&path.display().to_string());
    let start = Instant::now();

    match compile_file(path, out, source_map) {
        Ok(compiled) => {
            print_compiled(&compiled.script.display().to_string(), start.elapsed());
            true
        },
        Err(err) => {
            report(&err);
            false
        }
    }
}

fn run(path: &Path) -> bool {
    print_running(&path.display().to_string());
    let start = Instant::now();

    match run_file(path, Output::stdout()) {
        Ok(_) => {
            print_finished(start.elapsed());
            true
        },
        Err(err) => {
            report(&err);
            false
        }
    }
}

fn watch_with(target: WatchTarget, mut action: impl FnMut() -> bool) -> std::io::Result<()> {
    let watcher = Watcher::new(target)?;

    print_watching(&watcher.target().to_string());

    watcher.run(|| {
        action();
    })
}

pub(crate) fn report(err: &Error) {
    let buf_writer = cli::stderr_buffer_writer();
    let mut buf = buf_writer.buffer();

    err.pretty(&mut buf);

    if let Err(io_err) = buf_writer.print(&buf) {
        print_error(&format!("{err}: {io_err}"));
    }
}
