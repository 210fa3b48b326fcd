use crate::utils::prelude::SrcSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalErrorType {
    UnrecognizedToken { tok: char },
    LoneAmpersand,
    LonePipe,
    UnterminatedString,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexicalError {
    pub error: LexicalErrorType,
    pub location: SrcSpan
}

impl LexicalError {
    pub fn details(&self) -> (&'static str, Vec<String>) {
        match self.error {
            LexicalErrorType::UnrecognizedToken { tok } => {
                ("Unrecognized character", vec![format!("`{tok}` is not part of the language")])
            },
            LexicalErrorType::LoneAmpersand => {
                ("Unexpected `&`", vec!["Did you mean `&&`?".to_string()])
            },
            LexicalErrorType::LonePipe => {
                ("Unexpected `|`", vec!["Did you mean `||`?".to_string()])
            },
            LexicalErrorType::UnterminatedString => {
                ("Unterminated string literal", vec![])
            }
        }
    }
}

impl std::fmt::Display for LexicalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at line {}, column {}", self.details().0, self.location.line, self.location.column)
    }
}
