use super::error::{LexicalError, LexicalErrorType};
use super::token::Token;
use std::fmt::Display;
use crate::utils::prelude::{SrcPos, SrcSpan};

pub type Spanned = (SrcPos, Token, SrcPos);
pub type LexResult = std::result::Result<Spanned, LexicalError>;

pub fn str_to_keyword(word: &str) -> Option<Token> {
	Some(match word {
		"khalli" => Token::Let,
		"thabit" => Token::Const,
		"arrifli" => Token::Function,
		"iza" => Token::If,
		"willa" => Token::Else,
		"la" => Token::For,
		"raje3li" => Token::Return,
		"hawel" => Token::Try,
		"law_sar_ma_sar" => Token::Catch,
		"irmi" => Token::Throw,
		"kammil" => Token::Continue,
		"iksir" => Token::Break,
		"stanna" => Token::Await,
		"tazamonan" => Token::Async,

		_ => return None
	})
}

/// Tokenizes the whole input, stopping at the first lexical error.
/// The returned sequence always ends with [`Token::Eof`].
pub fn tokenize(src: &str) -> Result<Vec<Spanned>, LexicalError> {
	Lexer::new(src.char_indices().map(|(i, c)| (i as u32, c))).collect()
}

#[derive(Debug)]
pub struct Lexer<T: Iterator<Item = (u32, char)>> {
	position: u32,
	next_position: u32,
	ch: Option<char>,
	next_ch: Option<char>,
	line: u32,
	column: u32,
	finished: bool,
	input: T,
}

impl<T: Iterator<Item = (u32, char)>> Display for Lexer<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f,
			"Lexer {{\n\tposition: {} ({}:{}),\n\tch: {:?}, next_ch: {:?}\n}}",
			self.position, self.line, self.column, self.ch, self.next_ch
		)
	}
}

impl<T: Iterator<Item = (u32, char)>> Lexer<T> {
	pub fn new(input: T) -> Self {
        let mut lexer = Self {
            position: 0,
            next_position: 0,
            ch: None,
			next_ch: None,
			line: 1,
			column: 1,
			finished: false,
            input,
        };

        lexer.next_char();
        lexer.next_char();

        lexer
    }

    pub fn next_token(&mut self) -> LexResult {
		self.skip_trivia();

		let span = match self.ch {
			Some(ch) => match ch {
				'(' => self.eat_one_char(Token::LParen),
				')' => self.eat_one_char(Token::RParen),
				'{' => self.eat_one_char(Token::LBrace),
				'}' => self.eat_one_char(Token::RBrace),
				'[' => self.eat_one_char(Token::LBracket),
				']' => self.eat_one_char(Token::RBracket),
				',' => self.eat_one_char(Token::Comma),
				':' => self.eat_one_char(Token::Colon),
				';' => self.eat_one_char(Token::Semicolon),
				'.' => self.eat_one_char(Token::Dot),
				'+' => self.eat_one_char(Token::Plus),
				'-' => self.eat_one_char(Token::Minus),
				'*' => self.eat_one_char(Token::Asterisk),
				'/' => self.eat_one_char(Token::Slash),
				'%' => self.eat_one_char(Token::Percent),
				'=' => match self.next_ch {
					Some('=') => self.eat_two_chars(Token::Equal),
					Some('>') => self.eat_two_chars(Token::Arrow),
					_ => self.eat_one_char(Token::Assign)
				},
				'!' => match self.next_ch {
					Some('=') => self.eat_two_chars(Token::NotEqual),
					_ => self.eat_one_char(Token::Bang)
				},
				'<' => match self.next_ch {
					Some('=') => self.eat_two_chars(Token::LessThanOrEqual),
					_ => self.eat_one_char(Token::LessThan)
				},
				'>' => match self.next_ch {
					Some('=') => self.eat_two_chars(Token::GreaterThanOrEqual),
					_ => self.eat_one_char(Token::GreaterThan)
				},
				'&' => match self.next_ch {
					Some('&') => self.eat_two_chars(Token::And),
					_ => return Err(self.error_here(LexicalErrorType::LoneAmpersand))
				},
				'|' => match self.next_ch {
					Some('|') => self.eat_two_chars(Token::Or),
					_ => return Err(self.error_here(LexicalErrorType::LonePipe))
				},
				'"' => return self.lex_string(),
				'a'..='z' | 'A'..='Z' | '_' => self.lex_ident(),
				'0'..='9' => self.lex_number(),
				c => return Err(self.error_here(LexicalErrorType::UnrecognizedToken { tok: c }))
			},
			None => {
				let pos = self.pos();
				(pos, Token::Eof, pos)
			}
		};

		Ok(span)
    }

	fn pos(&self) -> SrcPos {
		SrcPos {
			offset: self.position,
			line: self.line,
			column: self.column
		}
	}

	fn error_here(&self, error: LexicalErrorType) -> LexicalError {
		LexicalError {
			error,
			location: SrcSpan::at(self.pos())
		}
	}

	fn next_char(&mut self) -> Option<char> {
		let ch = self.ch;

		match ch {
			Some('\n') => {
				self.line += 1;
				self.column = 1;
			},
			Some(_) => self.column += 1,
			None => {}
		}

		let next = self.input.next();

		self.position = self.next_position;
		self.ch = self.next_ch;

		match next {
			Some((pos, c)) => {
				self.next_position = pos;
				self.next_ch = Some(c);
			},
			None => {
				self.next_position = self.position + self.ch.map_or(0, |c| c.len_utf8() as u32);
				self.next_ch = None;
			}
		}

		ch
	}

	fn skip_trivia(&mut self) {
		loop {
			match (self.ch, self.next_ch) {
				(Some(' ' | '\t' | '\r' | '\n'), _) => {
					self.next_char();
				},
				(Some('/'), Some('/')) => {
					while !matches!(self.ch, Some('\n') | None) {
						self.next_char();
					}
				},
				_ => break
			}
		}
	}

	fn eat_one_char(&mut self, token: Token) -> Spanned {
		let start_pos = self.pos();
		self.next_char();
		let end_pos = self.pos();

		(start_pos, token, end_pos)
	}

	fn eat_two_chars(&mut self, token: Token) -> Spanned {
		let start_pos = self.pos();
		self.next_char();
		self.next_char();
		let end_pos = self.pos();

		(start_pos, token, end_pos)
	}

	fn lex_ident(&mut self) -> Spanned {
        let start_pos = self.pos();
		let mut ident = String::new();

		while let Some(ch) = self.ch {
			if !(ch.is_ascii_alphanumeric() || ch == '_') {
				break;
			}

			ident.push(ch);
			self.next_char();
		}

        let end_pos = self.pos();

		match str_to_keyword(&ident) {
			Some(keyword) => (start_pos, keyword, end_pos),
			None => (start_pos, Token::Ident(ident), end_pos)
		}
	}

	fn lex_number(&mut self) -> Spanned {
		let start_pos = self.pos();
		let mut value = String::new();

		self.take_digits(&mut value);

		// `1.foo` lexes as a number followed by a member access
		if self.ch == Some('.') && self.next_ch.is_some_and(|c| c.is_ascii_digit()) {
			value.push('.');
			self.next_char();
			self.take_digits(&mut value);
		}

		let end_pos = self.pos();

		// digits with at most one inner period always parse
		let number = value.parse::<f64>().unwrap_or_default();

		(start_pos, Token::Number(number), end_pos)
	}

	fn take_digits(&mut self, value: &mut String) {
		while let Some(ch) = self.ch {
			if !ch.is_ascii_digit() {
				break;
			}

			value.push(ch);
			self.next_char();
		}
	}

	fn lex_string(&mut self) -> LexResult {
		let start_pos = self.pos();
		let mut value = String::new();

		self.next_char(); // opening quote

		loop {
			match self.next_char() {
				Some('"') => break,
				Some('\\') => match self.next_char() {
					Some('"') => value.push('"'),
					Some('\\') => value.push('\\'),
					Some(other) => {
						value.push('\\');
						value.push(other);
					},
					None => return Err(self.unterminated(start_pos))
				},
				Some(ch) => value.push(ch),
				None => return Err(self.unterminated(start_pos))
			}
		}

		let end_pos = self.pos();

		Ok((start_pos, Token::Str(value), end_pos))
	}

	fn unterminated(&self, start: SrcPos) -> LexicalError {
		LexicalError {
			error: LexicalErrorType::UnterminatedString,
			location: SrcSpan::from(start, self.pos())
		}
	}
}

impl<T: Iterator<Item = (u32, char)>> Iterator for Lexer<T> {
	type Item = LexResult;

	fn next(&mut self) -> Option<Self::Item> {
		if self.finished {
			return None;
		}

		let token = self.next_token();

		if matches!(token, Ok((_, Token::Eof, _)) | Err(_)) {
			self.finished = true;
		}

		Some(token)
	}
}
