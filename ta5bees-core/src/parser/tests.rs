use proptest::prelude::*;

use crate::{
    lexer::prelude::{LexicalErrorType, Token},
    parser::prelude::{
        parse_module, ArrowBody, ElseBranch, Expression, ForInit, ParseError, ParseErrorType,
        Primitive, Statement
    }
};

fn first_expression(input: &str) -> Result<Expression, ParseError> {
    let module = parse_module(input)?;

    match module.program.body.into_iter().next() {
        Some(Statement::Expression(expression)) => Ok(expression),
        other => panic!("expected an expression statement, got {other:?}")
    }
}

#[test]
fn test_declarations() -> Result<(), ParseError> {
    let input = r#"
        khalli a = 1;
        thabit b = "two";
        khalli c;
    "#;

    let module = parse_module(input)?;

    assert_eq!(module.program.body.len(), 3);

    match &module.program.body[2] {
        Statement::VariableDeclaration(declaration) => {
            assert!(!declaration.constant);
            assert_eq!(declaration.name.value, "c");
            assert_eq!(declaration.value, None);
        },
        other => panic!("expected a declaration, got {other:?}")
    }

    assert_eq!(
        module.program.to_string(),
        "khalli a = 1;\nthabit b = \"two\";\nkhalli c;"
    );

    Ok(())
}

#[test]
fn test_const_requires_value() {
    let err = parse_module("thabit x;").unwrap_err();

    assert_eq!(err.error, ParseErrorType::ConstWithoutValue);
    assert_eq!((err.span.line, err.span.column), (1, 8));
}

#[test]
fn test_precedence() -> Result<(), ParseError> {
    let cases = vec![
        ("1 + 2 * 3;", "1 + 2 * 3"),
        ("(1 + 2) * 3;", "(1 + 2) * 3"),
        ("a - (b - c);", "a - (b - c)"),
        ("a - b - c;", "a - b - c"),
        ("a > 1 && b < 2 || c == 3;", "a > 1 && b < 2 || c == 3"),
        ("a >= 1 && b <= 2;", "a >= 1 && b <= 2"),
        ("x = y = 3 % 2;", "x = y = 3 % 2"),
        ("(a + b).length();", "(a + b).length()"),
    ];

    for (input, expected) in cases {
        let expression = first_expression(input)?;

        assert_eq!(expression.to_string(), expected, "while parsing {input}");
    }

    Ok(())
}

#[test]
fn test_grouping_shapes_tree() -> Result<(), ParseError> {
    match first_expression("(1 + 2) * 3;")? {
        Expression::Binary(binary) => {
            assert_eq!(binary.operator, Token::Asterisk);
            assert!(matches!(*binary.left, Expression::Binary(_)));
            assert!(matches!(
                *binary.right,
                Expression::Primitive(Primitive::Number { value, .. }) if value == 3.0
            ));
        },
        other => panic!("expected a binary expression, got {other:?}")
    }

    Ok(())
}

#[test]
fn test_member_and_call_chains() -> Result<(), ParseError> {
    let expression = first_expression(r#"items.filter(x => x > 1).map((x, i) => x * i)[0].name;"#)?;

    assert_eq!(
        expression.to_string(),
        "items.filter((x) => x > 1).map((x, i) => x * i)[0].name"
    );

    match expression {
        Expression::Member(member) => {
            assert!(!member.computed);
            assert!(matches!(*member.object, Expression::Member(ref inner) if inner.computed));
        },
        other => panic!("expected a member expression, got {other:?}")
    }

    Ok(())
}

#[test]
fn test_arrow_functions() -> Result<(), ParseError> {
    let cases = vec![
        ("() => 1;", 0),
        ("x => x;", 1),
        ("(a, b) => a + b;", 2),
        ("[a, b, c] => a;", 3),
        ("(a) => { raje3li a; };", 1),
    ];

    for (input, arity) in cases {
        match first_expression(input)? {
            Expression::ArrowFunction(arrow) => {
                assert_eq!(arrow.parameters.len(), arity, "arity of {input}");
            },
            other => panic!("expected an arrow function for {input}, got {other:?}")
        }
    }

    match first_expression("(a) => { raje3li a; };")? {
        Expression::ArrowFunction(arrow) => assert!(matches!(arrow.body, ArrowBody::Block(_))),
        _ => unreachable!()
    }

    Ok(())
}

#[test]
fn test_grouped_expression_is_not_arrow() -> Result<(), ParseError> {
    assert!(matches!(first_expression("(a);")?, Expression::Identifier(_)));

    let err = parse_module("(a, b);").unwrap_err();

    assert!(
        matches!(&err.error, ParseErrorType::UnexpectedToken { token: Token::Comma, .. }),
        "got {err:?}"
    );

    Ok(())
}

#[test]
fn test_invalid_arrow_parameters() {
    let err = parse_module("[1, b] => b;").unwrap_err();

    assert_eq!(err.error, ParseErrorType::InvalidArrowParameters);
}

#[test]
fn test_literals() -> Result<(), ParseError> {
    let expression = first_expression(r#"{ name: "x", "with space": [1, 2,], tag, };"#)?;

    match &expression {
        Expression::Object(object) => {
            let keys = object.properties.iter()
                .map(|property| property.key.as_str())
                .collect::<Vec<&str>>();

            assert_eq!(keys, vec!["name", "with space", "tag"]);
            assert!(matches!(&object.properties[2].value, Expression::Identifier(ident) if ident.value == "tag"));
        },
        other => panic!("expected an object literal, got {other:?}")
    }

    assert_eq!(expression.to_string(), r#"{ name: "x", "with space": [1, 2], tag: tag }"#);

    Ok(())
}

#[test]
fn test_functions() -> Result<(), ParseError> {
    let input = r#"
        arrifli add(a, b) { raje3li a + b; }
        tazamonan arrifli load(url) { khalli r = stanna jeeb(url); raje3li r; }
        khalli wrapped = tazamonan () => 1;
    "#;

    let module = parse_module(input)?;

    match &module.program.body[..] {
        [Statement::FunctionDeclaration(add), Statement::FunctionDeclaration(load), Statement::VariableDeclaration(wrapped)] => {
            assert!(!add.is_async);
            assert_eq!(add.parameters.len(), 2);
            assert!(load.is_async);
            assert_eq!(load.body.len(), 2);
            assert!(matches!(wrapped.value, Some(Expression::AsyncWrap(_))));
        },
        other => panic!("unexpected program shape {other:?}")
    }

    Ok(())
}

#[test]
fn test_control_flow() -> Result<(), ParseError> {
    let input = r#"
        iza (a > 1) { gool(1); } willa iza (a > 0) { gool(2); } willa { gool(3); }
        la (khalli i = 0; i < 3; i = i + 1) { kammil; }
        la (;;) { iksir; }
        hawel { irmi "boom"; } law_sar_ma_sar { gool(error); }
        hawel { f(); } law_sar_ma_sar (e) { raje3li; }
    "#;

    let module = parse_module(input)?;

    match &module.program.body[0] {
        Statement::If(if_) => match &if_.alternate {
            Some(ElseBranch::If(nested)) => assert!(matches!(nested.alternate, Some(ElseBranch::Block(_)))),
            other => panic!("expected an else-if chain, got {other:?}")
        },
        other => panic!("expected an if statement, got {other:?}")
    }

    match &module.program.body[1] {
        Statement::For(for_) => {
            assert!(matches!(for_.init, Some(ForInit::Declaration(_))));
            assert!(for_.test.is_some());
            assert!(for_.update.is_some());
            assert!(matches!(for_.body[0], Statement::Continue { .. }));
        },
        other => panic!("expected a for statement, got {other:?}")
    }

    match &module.program.body[2] {
        Statement::For(for_) => {
            assert!(for_.init.is_none() && for_.test.is_none() && for_.update.is_none());
        },
        other => panic!("expected a for statement, got {other:?}")
    }

    match (&module.program.body[3], &module.program.body[4]) {
        (Statement::TryCatch(first), Statement::TryCatch(second)) => {
            assert_eq!(first.parameter.value, "error");
            assert_eq!(second.parameter.value, "e");
        },
        other => panic!("expected try statements, got {other:?}")
    }

    Ok(())
}

#[test]
fn test_missing_punctuation_points_at_next_token() {
    let cases = vec![
        ("iza (a > 1 { }", Token::LBrace, (1, 12)),
        ("la (khalli i = 0 i < 3; i = i + 1) { }", Token::Ident("i".into()), (1, 18)),
        ("la (khalli i = 0; i < 3 i = i + 1) { }", Token::Ident("i".into()), (1, 25)),
        ("hawel { f() } law_sar_ma_sar { }", Token::RBrace, (1, 13)),
        ("khalli x = 1\ngool(x);", Token::Ident("gool".into()), (2, 1)),
    ];

    for (input, found, (line, column)) in cases {
        let err = parse_module(input).unwrap_err();

        match &err.error {
            ParseErrorType::UnexpectedToken { token, .. } => {
                assert_eq!(*token, found, "wrong token reported for {input}");
            },
            other => panic!("expected an unexpected-token error for {input}, got {other:?}")
        }

        assert_eq!((err.span.line, err.span.column), (line, column), "wrong position for {input}");
    }
}

#[test]
fn test_lexical_error_surfaces() {
    let err = parse_module("khalli x = 1;\nkhalli y = x & 2;").unwrap_err();

    match err.error {
        ParseErrorType::LexError { error } => {
            assert_eq!(error.error, LexicalErrorType::LoneAmpersand);
            assert_eq!(error.location.line, 2);
        },
        other => panic!("expected a lexical error, got {other:?}")
    }
}

proptest! {
    #[test]
    fn test_numeric_literal_values(value in 0.0..1e12f64) {
        let input = format!("{value};");

        match first_expression(&input).map_err(|err| TestCaseError::fail(err.to_string()))? {
            Expression::Primitive(Primitive::Number { value: parsed, .. }) => prop_assert_eq!(parsed, value),
            other => prop_assert!(false, "expected a number for {}, got {:?}", input, other)
        }
    }

    #[test]
    fn test_string_literal_reprints(sample in "\\PC*") {
        let input = format!("{};", Token::Str(sample.clone()).as_literal());

        match first_expression(&input).map_err(|err| TestCaseError::fail(err.to_string()))? {
            Expression::Primitive(Primitive::String { value, .. }) => prop_assert_eq!(value, sample),
            other => prop_assert!(false, "expected a string for {}, got {:?}", input, other)
        }
    }
}
