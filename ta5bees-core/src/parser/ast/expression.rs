use std::{fmt::Display, rc::Rc};

use crate::{
    lexer::prelude::{LexResult, Token},
    parser::prelude::{parse_error, Block, InfixParse, Parse, ParseError, ParseErrorType, Parser, Precedence},
    utils::prelude::{SrcPos, SrcSpan}
};

use super::display_block;

// expression -> <assignment> | <arrow_function> | <binary> | <call> | <member> | <primary>
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    Primitive(Primitive),
    Binary(Binary),
    Assignment(Assignment),
    Call(Call),
    Member(Member),
    Array(ArrayLiteral),
    Object(ObjectLiteral),
    ArrowFunction(ArrowFunction),
    Await(Await),
    AsyncWrap(AsyncWrap),
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Expression {
    fn parse(
        parser: &mut Parser<T>,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let precedence = match precedence {
            Some(precedence) => precedence,
            None => return parse_assignment(parser)
        };

        let mut expr = parse_primary(parser)?;

        while precedence < parser.current_precedence() {
            expr = match &parser.current_token {
                Some((_, token, _)) if token.is_operator() => {
                    Self::Binary(Binary::parse(parser, expr, None)?)
                },
                Some((_, Token::Dot | Token::LBracket, _)) => {
                    Self::Member(Member::parse(parser, expr, None)?)
                },
                Some((_, Token::LParen, _)) => {
                    Self::Call(Call::parse(parser, expr, None)?)
                },
                _ => break
            }
        }

        Ok(expr)
    }
}

// assignment -> <arrow_function> | <logical> [ = <assignment> ]
fn parse_assignment<T: Iterator<Item = LexResult>>(parser: &mut Parser<T>) -> Result<Expression, ParseError> {
    if parser.at_arrow_parameters() {
        return Ok(Expression::ArrowFunction(ArrowFunction::parse(parser, None)?));
    }

    let left = Expression::parse(parser, Some(Precedence::Lowest))?;

    match &parser.current_token {
        Some((_, Token::Assign, _)) => Ok(Expression::Assignment(Assignment::parse(parser, left, None)?)),
        Some((_, Token::Arrow, _)) => Ok(Expression::ArrowFunction(ArrowFunction::from_parameters(parser, left)?)),
        _ => Ok(left)
    }
}

// primary -> <number> | <string> | <identifier> | "(" <expression> ")" | <array> | <object> | <await> | <async>
fn parse_primary<T: Iterator<Item = LexResult>>(parser: &mut Parser<T>) -> Result<Expression, ParseError> {
    let (start, token, end) = match &parser.current_token {
        Some(spanned) => spanned.clone(),
        None => return parse_error(ParseErrorType::UnexpectedEof, parser.eof_span())
    };

    let expr = match token {
        Token::Number(_) | Token::Str(_) => Expression::Primitive(Primitive::parse(parser, None)?),
        Token::Ident(_) => Expression::Identifier(Identifier::from(parser.expect_ident()?)),
        Token::LParen => {
            parser.step();
            let expression = Expression::parse(parser, None)?;
            parser.expect_one(Token::RParen)?;

            expression
        },
        Token::LBracket => Expression::Array(ArrayLiteral::parse(parser, None)?),
        Token::LBrace => Expression::Object(ObjectLiteral::parse(parser, None)?),
        Token::Await => Expression::Await(Await::parse(parser, None)?),
        Token::Async => Expression::AsyncWrap(AsyncWrap::parse(parser, None)?),
        token => return parse_error(
            ParseErrorType::UnexpectedToken {
                token,
                expected: vec!["an expression".to_string()]
            },
            SrcSpan::from(start, end)
        )
    };

    Ok(expr)
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(ident) => write!(f, "{ident}"),
            Self::Primitive(primitive) => write!(f, "{primitive}"),
            Self::Binary(binary) => write!(f, "{binary}"),
            Self::Assignment(assignment) => write!(f, "{assignment}"),
            Self::Call(call) => write!(f, "{call}"),
            Self::Member(member) => write!(f, "{member}"),
            Self::Array(array) => write!(f, "{array}"),
            Self::Object(object) => write!(f, "{object}"),
            Self::ArrowFunction(arrow) => write!(f, "{arrow}"),
            Self::Await(await_) => write!(f, "{await_}"),
            Self::AsyncWrap(wrap) => write!(f, "{wrap}")
        }
    }
}

impl Expression {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Identifier(ident) => ident.location,
            Self::Primitive(primitive) => primitive.location(),
            Self::Binary(binary) => binary.location,
            Self::Assignment(assignment) => assignment.location,
            Self::Call(call) => call.location,
            Self::Member(member) => member.location,
            Self::Array(array) => array.location,
            Self::Object(object) => object.location,
            Self::ArrowFunction(arrow) => arrow.location,
            Self::Await(await_) => await_.location,
            Self::AsyncWrap(wrap) => wrap.location
        }
    }

    /// Binding strength when this expression appears as an operand.
    pub fn precedence(&self) -> Precedence {
        match self {
            Self::Binary(binary) => Precedence::from(&binary.operator),
            Self::Assignment(_)
            | Self::ArrowFunction(_)
            | Self::Await(_)
            | Self::AsyncWrap(_) => Precedence::Lowest,
            _ => Precedence::Call
        }
    }
}

/// Renders `expr` as the object of a member access or the callee of a call.
pub fn display_callee(expr: &Expression) -> String {
    if expr.precedence() < Precedence::Call {
        format!("({expr})")
    } else {
        expr.to_string()
    }
}

// identifier -> [A-Za-z_][A-Za-z0-9_]*
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub value: String,
    pub location: SrcSpan
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl From<(SrcPos, String, SrcPos)> for Identifier {
    fn from(value: (SrcPos, String, SrcPos)) -> Self {
        Identifier {
            value: value.1,
            location: SrcSpan::from(value.0, value.2)
        }
    }
}

// primitive -> <number> | <string>
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Number {
        value: f64,
        location: SrcSpan
    },
    String {
        value: String,
        location: SrcSpan
    }
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Primitive {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        match parser.next_token() {
            Some((start, Token::Number(value), end)) => Ok(Self::Number {
                value,
                location: SrcSpan::from(start, end)
            }),
            Some((start, Token::Str(value), end)) => Ok(Self::String {
                value,
                location: SrcSpan::from(start, end)
            }),
            Some((start, token, end)) => parse_error(
                ParseErrorType::UnexpectedToken {
                    token,
                    expected: vec!["a Number".to_string(), "a String".to_string()]
                },
                SrcSpan::from(start, end)
            ),
            None => parse_error(ParseErrorType::UnexpectedEof, parser.eof_span())
        }
    }
}

impl Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number { value, .. } => write!(f, "{value}"),
            Self::String { value, .. } => write!(f, "{}", Token::Str(value.clone()).as_literal())
        }
    }
}

impl Primitive {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Number { location, .. } |
            Self::String { location, .. } => *location
        }
    }
}

// binary -> <expression> <operator> <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub left: Box<Expression>,
    pub operator: Token,
    pub right: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> InfixParse<T> for Binary {
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let precedence = parser.current_precedence();

        let operator = match parser.next_token() {
            Some((_, token, _)) if token.is_operator() => token,
            Some((start, token, end)) => return parse_error(
                ParseErrorType::UnexpectedToken {
                    token,
                    expected: vec!["an operator".to_string()]
                },
                SrcSpan::from(start, end)
            ),
            None => return parse_error(ParseErrorType::UnexpectedEof, parser.eof_span())
        };

        let right = Expression::parse(parser, Some(precedence))?;
        let location = left.location().join(right.location());

        Ok(Self {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            location
        })
    }
}

impl Binary {
    /// Whether `operand` needs parentheses to keep its grouping when printed
    /// as the left or right side of this expression.
    pub fn needs_parens(&self, operand: &Expression, is_right: bool) -> bool {
        let own = Precedence::from(&self.operator);
        let operand = operand.precedence();

        operand < own || (is_right && operand == own)
    }

    pub fn display_operand(&self, operand: &Expression, is_right: bool) -> String {
        if self.needs_parens(operand, is_right) {
            format!("({operand})")
        } else {
            operand.to_string()
        }
    }
}

impl Display for Binary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f, "{} {} {}",
            self.display_operand(&self.left, false),
            self.operator.as_literal(),
            self.display_operand(&self.right, true)
        )
    }
}

// assignment -> <expression> = <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub assignee: Box<Expression>,
    pub value: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> InfixParse<T> for Assignment {
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        parser.expect_one(Token::Assign)?;

        let value = Expression::parse(parser, None)?;
        let location = left.location().join(value.location());

        Ok(Self {
            assignee: Box::new(left),
            value: Box::new(value),
            location
        })
    }
}

impl Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.assignee, self.value)
    }
}

// call -> <expression> "(" [ <expression> {, <expression> } ] ")"
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> InfixParse<T> for Call {
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        parser.expect_one(Token::LParen)?;

        let mut arguments = vec![];

        if !parser.check(&Token::RParen) {
            loop {
                arguments.push(Expression::parse(parser, None)?);

                if !parser.check(&Token::Comma) {
                    break;
                }

                parser.step();
            }
        }

        let (_, end) = parser.expect_one(Token::RParen)?;
        let location = SrcSpan { end: end.offset, ..left.location() };

        Ok(Self {
            callee: Box::new(left),
            arguments,
            location
        })
    }
}

impl Display for Call {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let arguments = self.arguments.iter()
            .map(|arg| arg.to_string())
            .collect::<Vec<String>>();

        write!(f, "{}({})", display_callee(&self.callee), arguments.join(", "))
    }
}

// member -> <expression> . <identifier> | <expression> "[" <expression> "]"
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub object: Box<Expression>,
    pub property: Box<Expression>,
    pub computed: bool,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> InfixParse<T> for Member {
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (property, computed, end) = if parser.check(&Token::Dot) {
            parser.step();

            let ident = Identifier::from(parser.expect_ident()?);
            let end = ident.location.end;

            (Expression::Identifier(ident), false, end)
        } else {
            parser.expect_one(Token::LBracket)?;

            let property = Expression::parse(parser, None)?;
            let (_, end) = parser.expect_one(Token::RBracket)?;

            (property, true, end.offset)
        };

        let location = SrcSpan { end, ..left.location() };

        Ok(Self {
            object: Box::new(left),
            property: Box::new(property),
            computed,
            location
        })
    }
}

impl Display for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.computed {
            write!(f, "{}[{}]", display_callee(&self.object), self.property)
        } else {
            write!(f, "{}.{}", display_callee(&self.object), self.property)
        }
    }
}

// array -> "[" [ <expression> {, <expression> } [,] ] "]"
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral {
    pub elements: Vec<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for ArrayLiteral {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::LBracket)?;

        let mut elements = vec![];

        while !parser.check(&Token::RBracket) {
            elements.push(Expression::parse(parser, None)?);

            if !parser.check(&Token::Comma) {
                break;
            }

            parser.step();
        }

        let (_, end) = parser.expect_one(Token::RBracket)?;

        Ok(Self {
            elements,
            location: SrcSpan::from(start, end)
        })
    }
}

impl Display for ArrayLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let elements = self.elements.iter()
            .map(|element| element.to_string())
            .collect::<Vec<String>>();

        write!(f, "[{}]", elements.join(", "))
    }
}

// object -> "{" [ <property> {, <property> } [,] ] "}"
// property -> (<identifier> | <string>) [ : <expression> ]
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectLiteral {
    pub properties: Vec<Property>,
    pub location: SrcSpan
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: String,
    pub value: Expression,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for ObjectLiteral {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::LBrace)?;

        let mut properties = vec![];

        while !parser.check(&Token::RBrace) {
            let (key_start, key, key_end) = match parser.next_token() {
                Some((start, Token::Ident(key) | Token::Str(key), end)) => (start, key, end),
                Some((start, _, end)) => return parse_error(
                    ParseErrorType::InvalidPropertyKey,
                    SrcSpan::from(start, end)
                ),
                None => return parse_error(ParseErrorType::UnexpectedEof, parser.eof_span())
            };

            let key_location = SrcSpan::from(key_start, key_end);

            let value = if parser.check(&Token::Colon) {
                parser.step();
                Expression::parse(parser, None)?
            } else {
                // `{ key }` reads `key` from scope
                Expression::Identifier(Identifier {
                    value: key.clone(),
                    location: key_location
                })
            };

            let location = key_location.join(value.location());

            properties.push(Property { key, value, location });

            if !parser.check(&Token::Comma) {
                break;
            }

            parser.step();
        }

        let (_, end) = parser.expect_one(Token::RBrace)?;

        Ok(Self {
            properties,
            location: SrcSpan::from(start, end)
        })
    }
}

impl Display for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let is_plain = self.key.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && self.key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

        if is_plain {
            write!(f, "{}: {}", self.key, self.value)
        } else {
            write!(f, "{}: {}", Token::Str(self.key.clone()).as_literal(), self.value)
        }
    }
}

impl Display for ObjectLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.properties.is_empty() {
            return write!(f, "{{}}");
        }

        let properties = self.properties.iter()
            .map(|property| property.to_string())
            .collect::<Vec<String>>();

        write!(f, "{{ {} }}", properties.join(", "))
    }
}

// arrow_function -> <parameters> => ( <block> | <expression> )
// parameters -> <identifier> | "(" [ <identifier> {, <identifier> } ] ")" | "[" ... "]"
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowFunction {
    pub parameters: Vec<Identifier>,
    pub body: ArrowBody,
    pub location: SrcSpan
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    Block(Block),
    /// Expression body, implicitly returned.
    Expression(Rc<Expression>),
}

impl<T: Iterator<Item = LexResult>> Parse<T> for ArrowFunction {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::LParen)?;

        let mut parameters = vec![];

        while !parser.check(&Token::RParen) {
            parameters.push(Identifier::from(parser.expect_ident()?));

            if !parser.check(&Token::Comma) {
                break;
            }

            parser.step();
        }

        parser.expect_one(Token::RParen)?;

        Self::finish(parser, parameters, SrcSpan::at(start))
    }
}

impl ArrowFunction {
    /// Arrow function whose parameter list was already parsed as `left`,
    /// either a bare identifier or an array literal of identifiers.
    pub fn from_parameters<T: Iterator<Item = LexResult>>(
        parser: &mut Parser<T>,
        left: Expression
    ) -> Result<Self, ParseError> {
        let location = left.location();

        let parameters = match left {
            Expression::Identifier(ident) => vec![ident],
            Expression::Array(array) => array.elements
                .into_iter()
                .map(|element| match element {
                    Expression::Identifier(ident) => Ok(ident),
                    other => parse_error(ParseErrorType::InvalidArrowParameters, other.location())
                })
                .collect::<Result<Vec<Identifier>, ParseError>>()?,
            _ => return parse_error(ParseErrorType::InvalidArrowParameters, location)
        };

        Self::finish(parser, parameters, location)
    }

    fn finish<T: Iterator<Item = LexResult>>(
        parser: &mut Parser<T>,
        parameters: Vec<Identifier>,
        start: SrcSpan
    ) -> Result<Self, ParseError> {
        parser.expect_one(Token::Arrow)?;

        let (body, end) = if parser.check(&Token::LBrace) {
            let (block, location) = parser.parse_block()?;

            (ArrowBody::Block(block), location)
        } else {
            let expression = Expression::parse(parser, None)?;
            let location = expression.location();

            (ArrowBody::Expression(Rc::new(expression)), location)
        };

        Ok(Self {
            parameters,
            body,
            location: start.join(end)
        })
    }
}

impl Display for ArrowFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parameters = self.parameters.iter()
            .map(|param| param.to_string())
            .collect::<Vec<String>>();

        match &self.body {
            ArrowBody::Block(block) => write!(f, "({}) => {}", parameters.join(", "), display_block(block)),
            ArrowBody::Expression(expression) => write!(f, "({}) => {}", parameters.join(", "), expression)
        }
    }
}

// await -> stanna <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct Await {
    pub argument: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Await {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Await)?;

        let argument = Expression::parse(parser, None)?;
        let location = SrcSpan::at(start).join(argument.location());

        Ok(Self {
            argument: Box::new(argument),
            location
        })
    }
}

impl Display for Await {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stanna {}", self.argument)
    }
}

// async -> tazamonan <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct AsyncWrap {
    pub argument: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for AsyncWrap {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Async)?;

        let argument = Expression::parse(parser, None)?;
        let location = SrcSpan::at(start).join(argument.location());

        Ok(Self {
            argument: Box::new(argument),
            location
        })
    }
}

impl Display for AsyncWrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tazamonan {}", self.argument)
    }
}
