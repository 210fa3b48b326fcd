use std::fmt::Display;

use crate::{
    lexer::prelude::{LexResult, Token},
    parser::prelude::{parse_error, Block, Parse, ParseError, ParseErrorType, Parser, Precedence},
    utils::prelude::SrcSpan
};

use super::{display_block, Expression, Identifier};

// statement -> <variable_declaration> | <function_declaration> | <if> | <for> | <try_catch>
//            | <return> | <throw> | iksir ; | kammil ; | <expression> ;
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    VariableDeclaration(VariableDeclaration),
    FunctionDeclaration(FunctionDeclaration),
    If(IfStatement),
    For(ForStatement),
    TryCatch(TryCatchStatement),
    Return(ReturnStatement),
    Throw(ThrowStatement),
    Break {
        location: SrcSpan
    },
    Continue {
        location: SrcSpan
    },
    Expression(Expression),
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Statement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let token = match &parser.current_token {
            Some((_, token, _)) => token.clone(),
            None => return parse_error(ParseErrorType::UnexpectedEof, parser.eof_span())
        };

        let res = match token {
            Token::Let | Token::Const => Self::VariableDeclaration(VariableDeclaration::parse(parser, None)?),
            Token::Function => Self::FunctionDeclaration(FunctionDeclaration::parse(parser, None)?),
            Token::Async if matches!(parser.peek(1), Some(Token::Function)) => {
                Self::FunctionDeclaration(FunctionDeclaration::parse(parser, None)?)
            },
            Token::If => Self::If(IfStatement::parse(parser, None)?),
            Token::For => Self::For(ForStatement::parse(parser, None)?),
            Token::Try => Self::TryCatch(TryCatchStatement::parse(parser, None)?),
            Token::Return => Self::Return(ReturnStatement::parse(parser, None)?),
            Token::Throw => Self::Throw(ThrowStatement::parse(parser, None)?),
            Token::Break | Token::Continue => {
                let (start, _) = parser.expect_one(token.clone())?;
                let (_, end) = parser.expect_one(Token::Semicolon)?;
                let location = SrcSpan::from(start, end);

                if token == Token::Break {
                    Self::Break { location }
                } else {
                    Self::Continue { location }
                }
            },
            _ => {
                let expression = Expression::parse(parser, None)?;
                parser.expect_one(Token::Semicolon)?;

                Self::Expression(expression)
            }
        };

        Ok(res)
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VariableDeclaration(declaration) => write!(f, "{declaration}"),
            Self::FunctionDeclaration(function) => write!(f, "{function}"),
            Self::If(if_) => write!(f, "{if_}"),
            Self::For(for_) => write!(f, "{for_}"),
            Self::TryCatch(try_) => write!(f, "{try_}"),
            Self::Return(return_) => write!(f, "{return_}"),
            Self::Throw(throw) => write!(f, "{throw}"),
            Self::Break { .. } => write!(f, "iksir;"),
            Self::Continue { .. } => write!(f, "kammil;"),
            Self::Expression(expression) => write!(f, "{expression};")
        }
    }
}

impl Statement {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::VariableDeclaration(declaration) => declaration.location,
            Self::FunctionDeclaration(function) => function.location,
            Self::If(if_) => if_.location,
            Self::For(for_) => for_.location,
            Self::TryCatch(try_) => try_.location,
            Self::Return(return_) => return_.location,
            Self::Throw(throw) => throw.location,
            Self::Break { location } | Self::Continue { location } => *location,
            Self::Expression(expression) => expression.location()
        }
    }
}

// variable_declaration -> (khalli | thabit) <identifier> [ = <expression> ] ;
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub constant: bool,
    pub name: Identifier,
    pub value: Option<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for VariableDeclaration {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, keyword, _) = match parser.next_token() {
            Some(spanned) => spanned,
            None => return parse_error(ParseErrorType::UnexpectedEof, parser.eof_span())
        };

        let constant = keyword == Token::Const;
        let name = Identifier::from(parser.expect_ident()?);

        let value = if parser.check(&Token::Assign) {
            parser.step();
            Some(Expression::parse(parser, None)?)
        } else if constant {
            return parse_error(ParseErrorType::ConstWithoutValue, name.location);
        } else {
            None
        };

        let (_, end) = parser.expect_one(Token::Semicolon)?;

        Ok(Self {
            constant,
            name,
            value,
            location: SrcSpan::from(start, end)
        })
    }
}

impl Display for VariableDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keyword = if self.constant { "thabit" } else { "khalli" };

        match &self.value {
            Some(value) => write!(f, "{keyword} {} = {value};", self.name),
            None => write!(f, "{keyword} {};", self.name)
        }
    }
}

// function_declaration -> [tazamonan] arrifli <identifier> "(" [ <identifier> {, <identifier> } ] ")" <block>
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    pub name: Identifier,
    pub parameters: Vec<Identifier>,
    pub body: Block,
    pub is_async: bool,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for FunctionDeclaration {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let is_async = parser.check(&Token::Async);

        let start = if is_async {
            let (start, _) = parser.expect_one(Token::Async)?;
            parser.expect_one(Token::Function)?;
            start
        } else {
            parser.expect_one(Token::Function)?.0
        };

        let name = Identifier::from(parser.expect_ident()?);

        parser.expect_one(Token::LParen)?;

        let mut parameters = vec![];

        while !parser.check(&Token::RParen) {
            parameters.push(Identifier::from(parser.expect_ident()?));

            if !parser.check(&Token::Comma) {
                break;
            }

            parser.step();
        }

        parser.expect_one(Token::RParen)?;

        let (body, body_location) = parser.parse_block()?;

        Ok(Self {
            name,
            parameters,
            body,
            is_async,
            location: SrcSpan::at(start).join(body_location)
        })
    }
}

impl Display for FunctionDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parameters = self.parameters.iter()
            .map(|param| param.to_string())
            .collect::<Vec<String>>();

        if self.is_async {
            write!(f, "tazamonan ")?;
        }

        write!(f, "arrifli {}({}) {}", self.name, parameters.join(", "), display_block(&self.body))
    }
}

// if -> iza "(" <expression> ")" <block> [ willa ( <if> | <block> ) ]
#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub test: Expression,
    pub consequent: Block,
    pub alternate: Option<ElseBranch>,
    pub location: SrcSpan
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElseBranch {
    Block(Block),
    If(Box<IfStatement>),
}

impl<T: Iterator<Item = LexResult>> Parse<T> for IfStatement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::If)?;

        parser.expect_one(Token::LParen)?;
        let test = Expression::parse(parser, None)?;
        parser.expect_one(Token::RParen)?;

        let (consequent, mut location) = parser.parse_block()?;

        let alternate = if parser.check(&Token::Else) {
            parser.step();

            if parser.check(&Token::If) {
                let nested = IfStatement::parse(parser, None)?;
                location = nested.location;

                Some(ElseBranch::If(Box::new(nested)))
            } else {
                let (block, block_location) = parser.parse_block()?;
                location = block_location;

                Some(ElseBranch::Block(block))
            }
        } else {
            None
        };

        Ok(Self {
            test,
            consequent,
            alternate,
            location: SrcSpan::at(start).join(location)
        })
    }
}

impl Display for IfStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "iza ({}) {}", self.test, display_block(&self.consequent))?;

        match &self.alternate {
            Some(ElseBranch::Block(block)) => write!(f, " willa {}", display_block(block)),
            Some(ElseBranch::If(nested)) => write!(f, " willa {nested}"),
            None => Ok(())
        }
    }
}

// for -> la "(" [ <variable_declaration> | <expression> ] ; [ <expression> ] ; [ <expression> ] ")" <block>
#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    pub init: Option<ForInit>,
    pub test: Option<Expression>,
    pub update: Option<Expression>,
    pub body: Block,
    pub location: SrcSpan
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Declaration(VariableDeclaration),
    Expression(Expression),
}

impl<T: Iterator<Item = LexResult>> Parse<T> for ForStatement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::For)?;

        parser.expect_one(Token::LParen)?;

        // the declaration consumes its own `;`
        let init = match &parser.current_token {
            Some((_, Token::Semicolon, _)) => {
                parser.step();
                None
            },
            Some((_, Token::Let | Token::Const, _)) => {
                Some(ForInit::Declaration(VariableDeclaration::parse(parser, None)?))
            },
            _ => {
                let expression = Expression::parse(parser, None)?;
                parser.expect_one(Token::Semicolon)?;

                Some(ForInit::Expression(expression))
            }
        };

        let test = if parser.check(&Token::Semicolon) {
            None
        } else {
            Some(Expression::parse(parser, None)?)
        };

        parser.expect_one(Token::Semicolon)?;

        let update = if parser.check(&Token::RParen) {
            None
        } else {
            Some(Expression::parse(parser, None)?)
        };

        parser.expect_one(Token::RParen)?;

        let (body, body_location) = parser.parse_block()?;

        Ok(Self {
            init,
            test,
            update,
            body,
            location: SrcSpan::at(start).join(body_location)
        })
    }
}

impl Display for ForStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let init = match &self.init {
            Some(ForInit::Declaration(declaration)) => declaration.to_string(),
            Some(ForInit::Expression(expression)) => format!("{expression};"),
            None => ";".to_string()
        };
        let test = self.test.as_ref().map(|test| format!(" {test}")).unwrap_or_default();
        let update = self.update.as_ref().map(|update| format!(" {update}")).unwrap_or_default();

        write!(f, "la ({init}{test};{update}) {}", display_block(&self.body))
    }
}

// try_catch -> hawel <block> law_sar_ma_sar [ "(" <identifier> ")" ] <block>
#[derive(Debug, Clone, PartialEq)]
pub struct TryCatchStatement {
    pub body: Block,
    pub parameter: Identifier,
    pub handler: Block,
    pub location: SrcSpan
}

/// Name bound in a catch block declared without a parameter.
pub const DEFAULT_CATCH_PARAMETER: &str = "error";

impl<T: Iterator<Item = LexResult>> Parse<T> for TryCatchStatement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Try)?;

        let (body, _) = parser.parse_block()?;

        let (catch_start, catch_end) = parser.expect_one(Token::Catch)?;

        let parameter = if parser.check(&Token::LParen) {
            parser.step();
            let ident = Identifier::from(parser.expect_ident()?);
            parser.expect_one(Token::RParen)?;

            ident
        } else {
            Identifier {
                value: DEFAULT_CATCH_PARAMETER.to_string(),
                location: SrcSpan::from(catch_start, catch_end)
            }
        };

        let (handler, handler_location) = parser.parse_block()?;

        Ok(Self {
            body,
            parameter,
            handler,
            location: SrcSpan::at(start).join(handler_location)
        })
    }
}

impl Display for TryCatchStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f, "hawel {} law_sar_ma_sar ({}) {}",
            display_block(&self.body), self.parameter, display_block(&self.handler)
        )
    }
}

// return -> raje3li [ <expression> ] ;
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub argument: Option<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for ReturnStatement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Return)?;

        let argument = if parser.check(&Token::Semicolon) {
            None
        } else {
            Some(Expression::parse(parser, None)?)
        };

        let (_, end) = parser.expect_one(Token::Semicolon)?;

        Ok(Self {
            argument,
            location: SrcSpan::from(start, end)
        })
    }
}

impl Display for ReturnStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.argument {
            Some(argument) => write!(f, "raje3li {argument};"),
            None => write!(f, "raje3li;")
        }
    }
}

// throw -> irmi <expression> ;
#[derive(Debug, Clone, PartialEq)]
pub struct ThrowStatement {
    pub argument: Expression,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for ThrowStatement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Throw)?;

        let argument = Expression::parse(parser, None)?;

        let (_, end) = parser.expect_one(Token::Semicolon)?;

        Ok(Self {
            argument,
            location: SrcSpan::from(start, end)
        })
    }
}

impl Display for ThrowStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "irmi {};", self.argument)
    }
}
