use std::{path::PathBuf, rc::Rc};

use crate::{
    eval::prelude::{RuntimeError, RuntimeErrorType},
    parser::prelude::parse_module,
    utils::prelude::{Error, Output, SrcPos, SrcSpan, VectorOutputIO}
};

#[test]
fn test_span_join_keeps_start() {
    let start = SrcSpan::from(
        SrcPos { offset: 4, line: 2, column: 3 },
        SrcPos { offset: 6, line: 2, column: 5 }
    );
    let end = SrcSpan::at(SrcPos { offset: 20, line: 3, column: 1 });

    let joined = start.join(end);

    assert_eq!((joined.start, joined.end, joined.line, joined.column), (4, 20, 2, 3));
    assert_eq!(joined.to_string(), "2:3");
}

#[test]
fn test_vector_output_is_shared_between_clones() {
    let lines = VectorOutputIO::new();
    let output = Output::new(Rc::new(lines.clone()));

    output.write_line("one".into());
    output.clone().write_line("two".into());

    assert_eq!(lines.take(), vec!["one".to_string(), "two".to_string()]);
    assert!(lines.take().is_empty());

    Output::null().write_line("dropped".into());
    assert!(lines.take().is_empty());
}

#[test]
fn test_parse_error_rendering() {
    let src = "thabit x;".to_string();
    let error = parse_module(&src).unwrap_err();

    let rendered = Error::Parse {
        path: PathBuf::from("main.ta5bees"),
        src,
        error
    }.pretty_string();

    assert!(rendered.contains("Syntax error"), "{rendered}");
    assert!(rendered.contains("main.ta5bees:1:8"), "{rendered}");
}

#[test]
fn test_runtime_error_rendering() {
    let located = Error::Runtime {
        path: PathBuf::from("main.ta5bees"),
        src: "gool(1 / 0);".to_string(),
        error: RuntimeError::new(RuntimeErrorType::DivisionByZero).at(SrcSpan {
            start: 5,
            end: 10,
            line: 1,
            column: 6
        })
    }.pretty_string();

    assert!(located.contains("Runtime error"), "{located}");
    assert!(located.contains("main.ta5bees:1:6"), "{located}");
    assert!(located.contains("division by zero"), "{located}");

    let unlocated = Error::Runtime {
        path: PathBuf::new(),
        src: String::new(),
        error: RuntimeError::new(RuntimeErrorType::Host { message: "no runtime".into() })
    }.pretty_string();

    assert!(unlocated.starts_with("error: Runtime error"), "{unlocated}");
    assert!(unlocated.contains("host failure: no runtime"), "{unlocated}");
}
