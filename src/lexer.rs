use std::fmt;

use crate::{
    ast::Token,
    error::{LexError, LexErrorKind},
};

/// Location of a character in the statement text (1-based line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn start() -> Self {
        Position {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    token_start: Position,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            token_start: Position::start(),
        }
    }

    /// The text being lexed.
    pub fn source(&self) -> String {
        self.input.iter().collect()
    }

    /// Where the most recently returned token began.
    pub fn token_start(&self) -> Position {
        self.token_start
    }

    fn here(&self) -> Position {
        Position {
            offset: self.position,
            line: self.line,
            column: self.column,
        }
    }

    fn error(&self, kind: LexErrorKind) -> LexError {
        LexError {
            kind,
            position: self.here(),
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        if self.current_char() == Some('\n') {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self) -> Result<String, LexError> {
        let mut result = String::new();
        self.advance(); // opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                '"' => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    self.advance();
                    match self.current_char() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some('"') => result.push('"'),
                        Some('\\') => result.push('\\'),
                        Some(other) => return Err(self.error(LexErrorKind::InvalidEscape(other))),
                        None => return Err(self.error(LexErrorKind::UnterminatedString)),
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(self.error(LexErrorKind::UnterminatedString))
    }

    fn read_bytes(&mut self) -> Result<Token, LexError> {
        self.advance(); // 0
        self.advance(); // x

        let mut digits = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_hexdigit() {
                digits.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if digits.is_empty() {
            return Err(self.error(LexErrorKind::EmptyHexLiteral));
        }
        if digits.len() % 2 != 0 {
            return Err(self.error(LexErrorKind::OddHexLiteral(digits.len())));
        }

        let bytes = digits
            .as_bytes()
            .chunks(2)
            .map(|pair| {
                // both characters were checked with is_ascii_hexdigit
                let hi = (pair[0] as char).to_digit(16).unwrap_or(0);
                let lo = (pair[1] as char).to_digit(16).unwrap_or(0);
                (hi * 16 + lo) as u8
            })
            .collect();

        Ok(Token::Bytes(bytes))
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let mut number = String::new();
        let mut is_float = false;

        if let Some(sign @ ('-' | '+')) = self.current_char() {
            number.push(sign);
            self.advance();
        }

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_float
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if is_float {
            match number.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(Token::Float(n)),
                _ => Err(self.error(LexErrorKind::NumberOutOfRange(number))),
            }
        } else {
            number
                .parse::<i64>()
                .map(Token::Integer)
                .map_err(|_| self.error(LexErrorKind::NumberOutOfRange(number)))
        }
    }

    fn single(&mut self, token: Token) -> Result<Token, LexError> {
        self.advance();
        Ok(token)
    }

    fn pair_or(&mut self, second: char, pair: Token, single: Token) -> Result<Token, LexError> {
        if self.peek_char(1) == Some(second) {
            self.advance();
            self.advance();
            Ok(pair)
        } else {
            self.single(single)
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        self.token_start = self.here();

        match self.current_char() {
            None => Ok(Token::Eof),
            Some('(') => self.single(Token::LParen),
            Some(')') => self.single(Token::RParen),
            Some('[') => self.single(Token::LBracket),
            Some(']') => self.single(Token::RBracket),
            Some('.') => self.single(Token::Dot),
            Some(',') => self.single(Token::Comma),
            Some('=') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Ok(Token::EqEq)
                } else {
                    Err(self.error(LexErrorKind::BareEquals))
                }
            }
            Some('!') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Ok(Token::NotEq)
                } else {
                    Err(self.error(LexErrorKind::UnexpectedChar('!')))
                }
            }
            Some('<') => self.pair_or('=', Token::LtEq, Token::Lt),
            Some('>') => self.pair_or('=', Token::GtEq, Token::Gt),
            Some('"') => self.read_string().map(Token::String),
            Some('0') if matches!(self.peek_char(1), Some('x' | 'X')) => self.read_bytes(),
            Some('-' | '+') if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.read_number()
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number(),
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();

                Ok(match ident.as_str() {
                    "where" => Token::Where,
                    "and" => Token::And,
                    "or" => Token::Or,
                    "true" => Token::Boolean(true),
                    "false" => Token::Boolean(false),
                    "nil" => Token::Nil,
                    _ => Token::Identifier(ident),
                })
            }
            Some(ch) => Err(self.error(LexErrorKind::UnexpectedChar(ch))),
        }
    }

    /// Lex the whole input, stopping at the first error.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            if token == Token::Eof {
                return Ok(tokens);
            }
            tokens.push(token);
        }
    }
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("where and or true false nil");
    assert_eq!(lexer.next_token().unwrap(), Token::Where);
    assert_eq!(lexer.next_token().unwrap(), Token::And);
    assert_eq!(lexer.next_token().unwrap(), Token::Or);
    assert_eq!(lexer.next_token().unwrap(), Token::Boolean(true));
    assert_eq!(lexer.next_token().unwrap(), Token::Boolean(false));
    assert_eq!(lexer.next_token().unwrap(), Token::Nil);
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_statement_tokens() {
    let mut lexer = Lexer::new(r#"set(name, "x") where name=="fido""#);
    assert_eq!(lexer.next_token().unwrap(), Token::Identifier("set".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::LParen);
    assert_eq!(lexer.next_token().unwrap(), Token::Identifier("name".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::Comma);
    assert_eq!(lexer.next_token().unwrap(), Token::String("x".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::RParen);
    assert_eq!(lexer.next_token().unwrap(), Token::Where);
    assert_eq!(lexer.next_token().unwrap(), Token::Identifier("name".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::EqEq);
    assert_eq!(lexer.next_token().unwrap(), Token::String("fido".to_string()));
}

#[test]
fn test_token_start_tracks_columns() {
    let mut lexer = Lexer::new("set ( x");
    lexer.next_token().unwrap();
    lexer.next_token().unwrap();
    assert_eq!(lexer.token_start().column, 5);
    lexer.next_token().unwrap();
    assert_eq!(lexer.token_start().column, 7);
}

#[test]
fn test_float_overflow_is_out_of_range() {
    let literal = format!("{}.0", "9".repeat(400));
    let err = Lexer::new(&literal).tokenize().unwrap_err();
    assert_eq!(err.kind, LexErrorKind::NumberOutOfRange(literal));

    let tiny = format!("0.{}1", "0".repeat(400));
    assert_eq!(Lexer::new(&tiny).tokenize().unwrap(), vec![Token::Float(0.0)]);
}
