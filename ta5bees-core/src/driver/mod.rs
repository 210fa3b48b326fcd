use std::path::{Path, PathBuf};

use utf8_chars::BufReadCharsExt;

use crate::{
    environment::prelude::{Scope, Value},
    eval::prelude::run_program,
    parser::prelude::{parse_module, parse_module_from_stream, Module},
    stdlib::prelude::create_global_scope,
    transpiler::prelude::{transpile, TranspileOptions},
    utils::prelude::{Error, Output}
};

pub mod prelude {
    pub use super::{compile_file, load, run_file, run_source, Compiled, Loaded};
}


/// Source text of a file together with its parsed module.
#[derive(Debug)]
pub struct Loaded {
    pub path: PathBuf,
    pub src: String,
    pub module: Module
}

/// Files written by [`compile_file`].
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    pub script: PathBuf,
    pub source_map: Option<PathBuf>
}

pub fn load(path: &Path) -> Result<Loaded, Error> {
    let file = std::fs::File::open(path)?;
    let file_size = file.metadata()?.len() as usize;

    let mut src = String::with_capacity(file_size);
    let mut failure = None;
    let mut reader = std::io::BufReader::new(file);

    let stream = reader.chars()
        .map_while(|c| match c {
            Ok(c) => {
                src.push(c);
                Some(c)
            },
            Err(err) => {
                failure = Some(err);
                None
            }
        });

    let parsed = parse_module_from_stream(stream);

    if let Some(err) = failure {
        return Err(err.into());
    }

    match parsed {
        Ok(module) => Ok(Loaded { path: path.to_path_buf(), src, module }),
        Err(error) => Err(Error::Parse { path: path.to_path_buf(), src, error })
    }
}

/// Parses and evaluates `src` in `scope`, which survives the call.
pub fn run_source(path: &Path, src: &str, scope: &Scope) -> Result<Value, Error> {
    let module = parse_module(src).map_err(|error| Error::Parse {
        path: path.to_path_buf(),
        src: src.to_string(),
        error
    })?;

    run_program(&module.program, scope).map_err(|error| Error::Runtime {
        path: path.to_path_buf(),
        src: src.to_string(),
        error
    })
}

/// Runs a file against a fresh root scope.
pub fn run_file(path: &Path, output: Output) -> Result<Value, Error> {
    let Loaded { path, src, module } = load(path)?;
    let scope = create_global_scope(output);

    log::debug!("running {}", path.display());

    run_program(&module.program, &scope).map_err(|error| Error::Runtime { path, src, error })
}

/// Transpiles a file into `out` (default `<stem>.js` beside the input) and,
/// when requested, a `<script>.map` position map referenced from the script.
pub fn compile_file(path: &Path, out: Option<&Path>, source_map: bool) -> Result<Compiled, Error> {
    let loaded = load(path)?;

    let source_name = loaded.path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let options = TranspileOptions { source_map, source_name };
    let transpiled = transpile(&loaded.module.program, &options);

    let script = match out {
        Some(out) => out.to_path_buf(),
        None => loaded.path.with_extension("js")
    };

    let mut code = transpiled.code;
    code.push('\n');

    let source_map = match transpiled.source_map {
        Some(map) => {
            let mut map_path = script.clone().into_os_string();
            map_path.push(".map");
            let map_path = PathBuf::from(map_path);

            let map_name = map_path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();

            code.push_str(&format!("//# sourceMappingURL={map_name}\n"));
            std::fs::write(&map_path, map.to_json()?)?;

            Some(map_path)
        },
        None => None
    };

    std::fs::write(&script, code)?;

    log::debug!("wrote {}", script.display());

    Ok(Compiled { script, source_map })
}
