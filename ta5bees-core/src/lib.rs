pub mod lexer;
pub mod parser;
pub mod environment;
pub mod eval;
pub mod stdlib;
pub mod transpiler;
pub mod driver;
pub mod utils;
