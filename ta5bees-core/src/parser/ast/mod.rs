mod expression;
mod statement;

pub use expression::*;
pub use statement::*;

use std::{fmt::Display, rc::Rc};

use crate::{
    lexer::prelude::{LexResult, Token},
    parser::prelude::{Parse, ParseError, Parser, Precedence},
    utils::prelude::{SrcPos, SrcSpan}
};

/// Brace-delimited statement list. Shared so that function values can hold
/// their body without copying the tree.
pub type Block = Rc<[Statement]>;

pub fn display_block(block: &Block) -> String {
    if block.is_empty() {
        return "{}".to_string();
    }

    let statements = block.iter()
        .map(|statement| statement.to_string())
        .collect::<Vec<String>>();

    format!("{{ {} }}", statements.join(" "))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: String,
    pub program: Program
}

// program -> { <statement> } <eof>
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<Statement>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Program {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let mut body = vec![];

        while !matches!(parser.current_token, Some((_, Token::Eof, _))) {
            body.push(Statement::parse(parser, None)?);
        }

        let end = match &parser.current_token {
            Some((_, _, end)) => *end,
            None => SrcPos::default()
        };

        let start = SrcPos { offset: 0, line: 1, column: 1 };

        Ok(Self {
            body,
            location: SrcSpan::from(start, end)
        })
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let statements = self.body.iter()
            .map(|statement| statement.to_string())
            .collect::<Vec<String>>();

        write!(f, "{}", statements.join("\n"))
    }
}
