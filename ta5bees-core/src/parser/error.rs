use crate::{lexer::prelude::{LexicalError, Token}, utils::prelude::SrcSpan};

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorType {
    ExpectedIdent,
    ExpectedExpression,
    UnexpectedEof,
    UnexpectedToken {
        token: Token,
        expected: Vec<String>,
    },
    ConstWithoutValue,
    InvalidArrowParameters,
    InvalidPropertyKey,
    LexError { error: LexicalError },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub error: ParseErrorType,
    pub span: SrcSpan
}

fn describe(token: &Token) -> String {
    match token {
        Token::Number(_) => "a Number".to_string(),
        Token::Str(_) => "a String".to_string(),
        Token::Ident(name) => format!("the identifier `{name}`"),
        Token::Eof => "the end of file".to_string(),
        _ if token.is_reserved_word() => format!("the keyword `{}`", token.as_literal()),
        _ => format!("`{}`", token.as_literal())
    }
}

impl ParseError {
    pub fn details(&self) -> (&'static str, Vec<String>) {
        match &self.error {
            ParseErrorType::ExpectedIdent => ("Expected identifier", vec![]),
            ParseErrorType::ExpectedExpression => ("Expected an expression", vec![]),
            ParseErrorType::UnexpectedToken { token, expected } => {
                let found = describe(token);

                let messages = std::iter::once(format!("Found {found}, expected one of: "))
                    .chain(expected.iter().map(|s| format!("- {s}")))
                    .collect();

                ("Not expected this", messages)
            },
            ParseErrorType::UnexpectedEof => ("Unexpected end of file", vec![]),
            ParseErrorType::ConstWithoutValue => (
                "Constant declared without a value",
                vec!["`thabit` bindings need an initializer: `thabit x = ...;`".to_string()]
            ),
            ParseErrorType::InvalidArrowParameters => (
                "Invalid arrow function parameters",
                vec!["Parameters must be identifiers".to_string()]
            ),
            ParseErrorType::InvalidPropertyKey => (
                "Invalid property key",
                vec!["Object keys are identifiers or string literals".to_string()]
            ),
            ParseErrorType::LexError { error } => error.details()
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (title, extra) = self.details();

        write!(f, "{title} at line {}, column {}", self.span.line, self.span.column)?;

        if let ParseErrorType::UnexpectedToken { token, expected } = &self.error {
            write!(f, ": found {}, expected {}", describe(token), expected.join(" or "))?;
        } else if let Some(hint) = extra.first() {
            write!(f, ": {hint}")?;
        }

        Ok(())
    }
}

impl From<LexicalError> for ParseError {
    fn from(error: LexicalError) -> Self {
        ParseError {
            span: error.location,
            error: ParseErrorType::LexError { error },
        }
    }
}
