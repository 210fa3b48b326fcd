#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // [A-Za-z_][A-Za-z0-9_]*
    Ident(String),
    // digits [ . digits ]
    Number(f64),
    // "..." with \" and \\ decoded
    Str(String),

    // Операции отношения
    Equal, // ==
    NotEqual, // !=
    LessThan, // <
    LessThanOrEqual, // <=
    GreaterThan, // >
    GreaterThanOrEqual, // >=

    // Арифметика
    Plus, // +
    Minus, // -
    Asterisk, // *
    Slash, // /
    Percent, // %

    // Логика
    And, // &&
    Or, // ||
    Bang, // !

    Assign, // =
    Arrow, // =>

    // Ключевые слова
    Let, // khalli
    Const, // thabit
    Function, // arrifli
    If, // iza
    Else, // willa
    For, // la
    Return, // raje3li
    Try, // hawel
    Catch, // law_sar_ma_sar
    Throw, // irmi
    Continue, // kammil
    Break, // iksir
    Await, // stanna
    Async, // tazamonan

    // Разделители
    Comma, // ,
    Colon, // :
    Semicolon, // ;
    Dot, // .
    LParen, // (
    RParen, // )
    LBrace, // {
    RBrace, // }
    LBracket, // [
    RBracket, // ]

    Eof,
}

impl Token {
    pub fn is_reserved_word(&self) -> bool {
        matches!(
            self,
            Token::Let
            | Token::Const
            | Token::Function
            | Token::If
            | Token::Else
            | Token::For
            | Token::Return
            | Token::Try
            | Token::Catch
            | Token::Throw
            | Token::Continue
            | Token::Break
            | Token::Await
            | Token::Async
        )
    }

    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            Token::Plus
            | Token::Minus
            | Token::Asterisk
            | Token::Slash
            | Token::Percent
            | Token::And
            | Token::Or
            | Token::Equal
            | Token::NotEqual
            | Token::LessThan
            | Token::LessThanOrEqual
            | Token::GreaterThan
            | Token::GreaterThanOrEqual
        )
    }

    /// Source text of the token; string literals are re-quoted.
    pub fn as_literal(&self) -> String {
        match self {
            Token::Ident(value) => value.clone(),
            Token::Number(value) => format!("{}", value),
            Token::Str(value) => format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\"")),

            Token::Equal => "==".to_string(),
            Token::NotEqual => "!=".to_string(),
            Token::LessThan => "<".to_string(),
            Token::LessThanOrEqual => "<=".to_string(),
            Token::GreaterThan => ">".to_string(),
            Token::GreaterThanOrEqual => ">=".to_string(),
            Token::Plus => "+".to_string(),
            Token::Minus => "-".to_string(),
            Token::Asterisk => "*".to_string(),
            Token::Slash => "/".to_string(),
            Token::Percent => "%".to_string(),
            Token::And => "&&".to_string(),
            Token::Or => "||".to_string(),
            Token::Bang => "!".to_string(),
            Token::Assign => "=".to_string(),
            Token::Arrow => "=>".to_string(),

            Token::Let => "khalli".to_string(),
            Token::Const => "thabit".to_string(),
            Token::Function => "arrifli".to_string(),
            Token::If => "iza".to_string(),
            Token::Else => "willa".to_string(),
            Token::For => "la".to_string(),
            Token::Return => "raje3li".to_string(),
            Token::Try => "hawel".to_string(),
            Token::Catch => "law_sar_ma_sar".to_string(),
            Token::Throw => "irmi".to_string(),
            Token::Continue => "kammil".to_string(),
            Token::Break => "iksir".to_string(),
            Token::Await => "stanna".to_string(),
            Token::Async => "tazamonan".to_string(),

            Token::Comma => ",".to_string(),
            Token::Colon => ":".to_string(),
            Token::Semicolon => ";".to_string(),
            Token::Dot => ".".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::LBrace => "{".to_string(),
            Token::RBrace => "}".to_string(),
            Token::LBracket => "[".to_string(),
            Token::RBracket => "]".to_string(),

            Token::Eof => "end of file".to_string(),
        }
    }
}
