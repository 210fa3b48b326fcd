use std::collections::VecDeque;

use crate::{lexer::prelude::{tokenize, LexResult, LexicalError, Lexer, Spanned, Token}, utils::prelude::{SrcPos, SrcSpan}};
use super::error::{ParseError, ParseErrorType};
use super::ast::{Block, Expression, Module, Program, Statement};

pub trait Parse<T: Iterator<Item = LexResult>>
    where Self: Sized,
{
    fn parse(
        parser: &mut Parser<T>,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError>;
}

pub trait InfixParse<T: Iterator<Item = LexResult>>
    where Self: Sized,
{
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError>;
}

pub struct Parser<T: Iterator<Item = LexResult>> {
    pub current_token: Option<Spanned>,
    pub next_token: Option<Spanned>,
    pub lex_errors: Vec<LexicalError>,

    lookahead: VecDeque<Spanned>,
    last_end: SrcPos,
    tokens: T,
}

impl<T: Iterator<Item = LexResult>> Parser<T> {
    pub fn new(input: T) -> Self {
        let mut parser = Self {
            current_token: None,
            next_token: None,
            lex_errors: vec![],

            lookahead: VecDeque::new(),
            last_end: SrcPos::default(),
            tokens: input,
        };

        parser.step();
        parser.step();

        parser
    }

    pub fn step(&mut self) {
        let _ = self.next_token();
    }

    pub fn next_token(&mut self) -> Option<Spanned> {
        let t = self.current_token.take();
        let next = match self.lookahead.pop_front() {
            Some(token) => Some(token),
            None => self.pull()
        };

        self.current_token = self.next_token.take();
        self.next_token = next;

        if let Some((_, _, end)) = &t {
            self.last_end = *end;
        }

        t
    }

    fn pull(&mut self) -> Option<Spanned> {
        match self.tokens.next() {
            Some(Ok(token)) => Some(token),
            Some(Err(err)) => {
                self.lex_errors.push(err);
                None
            },
            None => None
        }
    }

    /// Token `n` positions ahead of the current one, `peek(0)` being the
    /// current token itself.
    pub fn peek(&mut self, n: usize) -> Option<&Token> {
        match n {
            0 => self.current_token.as_ref().map(|(_, token, _)| token),
            1 => self.next_token.as_ref().map(|(_, token, _)| token),
            _ => {
                while self.lookahead.len() < n - 1 {
                    match self.pull() {
                        Some(token) => self.lookahead.push_back(token),
                        None => break
                    }
                }

                self.lookahead.get(n - 2).map(|(_, token, _)| token)
            }
        }
    }

    pub fn check(&self, token: &Token) -> bool {
        matches!(&self.current_token, Some((_, current, _)) if current == token)
    }

    pub fn current_precedence(&self) -> Precedence {
        match &self.current_token {
            Some((_, token, _)) => Precedence::from(token),
            None => Precedence::Lowest
        }
    }

    pub fn eof_span(&self) -> SrcSpan {
        SrcSpan::at(self.last_end)
    }

    pub fn parse(&mut self) -> Result<Module, ParseError> {
        let program = Program::parse(self, None);

        if let Some(error) = self.lex_errors.first() {
            return Err(ParseError::from(*error));
        }

        Ok(Module {
            name: "".into(),
            program: program?
        })
    }

    pub fn expect_one(&mut self, token: Token) -> Result<(SrcPos, SrcPos), ParseError> {
        match &self.current_token {
            Some((start, tok, end)) if *tok == token => {
                let (start, end) = (*start, *end);
                self.step();
                Ok((start, end))
            },
            Some((start, tok, end)) => parse_error(
                ParseErrorType::UnexpectedToken {
                    token: tok.clone(),
                    expected: vec![format!("`{}`", token.as_literal())],
                },
                SrcSpan::from(*start, *end)
            ),
            None => parse_error(ParseErrorType::UnexpectedEof, self.eof_span())
        }
    }

    pub fn expect_ident(&mut self) -> Result<(SrcPos, String, SrcPos), ParseError> {
        match &self.current_token {
            Some((start, Token::Ident(value), end)) => {
                let ident = (*start, value.clone(), *end);
                self.step();
                Ok(ident)
            },
            Some((start, _, end)) => parse_error(
                ParseErrorType::ExpectedIdent,
                SrcSpan::from(*start, *end)
            ),
            None => parse_error(ParseErrorType::UnexpectedEof, self.eof_span())
        }
    }

    /// `{ <statement>* }`
    pub fn parse_block(&mut self) -> Result<(Block, SrcSpan), ParseError> {
        let (start, _) = self.expect_one(Token::LBrace)?;
        let mut statements = vec![];

        loop {
            match &self.current_token {
                Some((_, Token::RBrace, _)) => break,
                Some((start, Token::Eof, end)) => return parse_error(
                    ParseErrorType::UnexpectedToken {
                        token: Token::Eof,
                        expected: vec!["`}`".to_string()]
                    },
                    SrcSpan::from(*start, *end)
                ),
                Some(_) => statements.push(Statement::parse(self, None)?),
                None => return parse_error(ParseErrorType::UnexpectedEof, self.eof_span())
            }
        }

        let (_, end) = self.expect_one(Token::RBrace)?;

        Ok((statements.into(), SrcSpan::from(start, end)))
    }

    /// Whether the tokens from the current `(` form an arrow function's
    /// parameter list, i.e. `( [ident {, ident}] ) =>`.
    pub fn at_arrow_parameters(&mut self) -> bool {
        if !self.check(&Token::LParen) {
            return false;
        }

        let mut idx = 1;

        if matches!(self.peek(idx), Some(Token::RParen)) {
            return matches!(self.peek(idx + 1), Some(Token::Arrow));
        }

        loop {
            if !matches!(self.peek(idx), Some(Token::Ident(_))) {
                return false;
            }

            match self.peek(idx + 1) {
                Some(Token::Comma) => idx += 2,
                Some(Token::RParen) => return matches!(self.peek(idx + 2), Some(Token::Arrow)),
                _ => return false
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Precedence {
    Lowest,
    Logical,
    Comparison,
    Sum,
    Product,
    Call
}

impl From<&Token> for Precedence {
    fn from(value: &Token) -> Self {
        match value {
            Token::And | Token::Or => Self::Logical,
            Token::Equal | Token::NotEqual |
            Token::LessThan | Token::GreaterThan |
            Token::LessThanOrEqual | Token::GreaterThanOrEqual => Self::Comparison,
            Token::Plus | Token::Minus => Self::Sum,
            Token::Asterisk | Token::Slash | Token::Percent => Self::Product,
            Token::LParen | Token::LBracket | Token::Dot => Self::Call,
            _ => Self::Lowest,
        }
    }
}

/// Parses a whole source text. Tokenization runs to completion first, so a
/// lexical error anywhere in the input wins over any syntax error.
pub fn parse_module(src: &str) -> Result<Module, ParseError> {
    let tokens = tokenize(src)?;
    let mut parser = Parser::new(tokens.into_iter().map(Ok));

    parser.parse()
}

pub fn parse_module_from_stream(stream: impl Iterator<Item = char>) -> Result<Module, ParseError> {
    let lexer = Lexer::new(stream
        .scan(0, |pos, c| {
            *pos += c.len_utf8() as u32;
            Some((*pos - c.len_utf8() as u32, c))
        })
    );
    let tokens = lexer.collect::<Result<Vec<_>, _>>()?;
    let mut parser = Parser::new(tokens.into_iter().map(Ok));

    parser.parse()
}

pub fn parse_error<T>(error: ParseErrorType, span: SrcSpan) -> Result<T, ParseError> {
    Err(ParseError { error, span })
}
