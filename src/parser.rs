use crate::{
    ast::{
        BooleanExpression, BooleanValue, CompareOp, Comparison, EnumSymbol, Expr, Field,
        Invocation, ParsedStatement, Path, Term, Token,
    },
    error::ParseError,
    lexer::{Lexer, Position},
};
use std::mem;

/// Recursive-descent parser for a single statement.
///
/// Grammar, highest precedence last:
///
/// ```text
/// statement   := invocation ["where" expression]
/// expression  := term {"or" term}
/// term        := boolValue {"and" boolValue}
/// boolValue   := comparison | bool | "(" expression ")"
/// comparison  := value op value
/// value       := string | float | int | bool | bytes | "nil" | enum
///              | list | path | invocation
/// path        := field {"." field}
/// field       := identifier ["[" string "]"]
/// invocation  := identifier "(" [value {"," value}] ")"
/// ```
pub struct Parser {
    source: String,
    lexer: Lexer,
    current_token: Token,
    current_start: Position,
}

/// Parse statement text in one call.
///
/// # Examples
///
/// ```
/// use ottl_lang::{parse, Expr};
///
/// let parsed = parse(r#"set("foo")"#).unwrap();
/// assert_eq!(parsed.invocation.function, "set");
/// assert_eq!(parsed.invocation.arguments, vec![Expr::String("foo".into())]);
/// assert!(parsed.where_clause.is_none());
/// ```
pub fn parse(text: &str) -> Result<ParsedStatement, ParseError> {
    Parser::new(Lexer::new(text))?.parse_statement()
}

/// Upper-case identifiers (`A-Z`, digits, `_`) are enum symbols unless they
/// are followed by something that makes them a path or a call.
fn is_enum_symbol(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let source = lexer.source();
        let current_token = lexer
            .next_token()
            .map_err(|e| ParseError::from_lex(&source, e))?;
        let current_start = lexer.token_start();
        Ok(Parser {
            source,
            lexer,
            current_token,
            current_start,
        })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current_token = self
            .lexer
            .next_token()
            .map_err(|e| ParseError::from_lex(&self.source, e))?;
        self.current_start = self.lexer.token_start();
        Ok(())
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(&self.source, self.current_start, message)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        self.error(format!(
            "expected {}, found {}",
            expected,
            self.current_token.describe()
        ))
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if mem::discriminant(&self.current_token) != mem::discriminant(&expected) {
            return Err(self.unexpected(&expected.describe()));
        }
        self.advance()
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current_token) == mem::discriminant(token)
    }

    /// Parse a complete statement, requiring the input to end after it.
    pub fn parse_statement(&mut self) -> Result<ParsedStatement, ParseError> {
        let function = match &self.current_token {
            Token::Identifier(name) => name.clone(),
            _ => return Err(self.unexpected("function name")),
        };
        self.advance()?;

        if !self.check(&Token::LParen) {
            return Err(self.unexpected("'(' after function name"));
        }
        let invocation = self.parse_invocation(function)?;

        let where_clause = if self.check(&Token::Where) {
            self.advance()?;
            Some(self.parse_boolean_expression()?)
        } else {
            None
        };

        if !self.check(&Token::Eof) {
            return Err(self.unexpected("end of statement"));
        }

        Ok(ParsedStatement {
            invocation,
            where_clause,
        })
    }

    /// Parse `( args )` for a function whose name was already consumed.
    fn parse_invocation(&mut self, function: String) -> Result<Invocation, ParseError> {
        self.expect(Token::LParen)?;

        let mut arguments = Vec::new();
        if self.check(&Token::RParen) {
            self.advance()?;
            return Ok(Invocation::new(function, arguments));
        }

        loop {
            arguments.push(self.parse_value()?);
            match self.current_token {
                Token::Comma => self.advance()?,
                Token::RParen => {
                    self.advance()?;
                    return Ok(Invocation::new(function, arguments));
                }
                _ => return Err(self.unexpected("',' or ')' in argument list")),
            }
        }
    }

    /// Parse any value production.
    pub fn parse_value(&mut self) -> Result<Expr, ParseError> {
        match mem::replace(&mut self.current_token, Token::Eof) {
            Token::String(s) => {
                self.advance()?;
                Ok(Expr::String(s))
            }
            Token::Float(n) => {
                self.advance()?;
                Ok(Expr::Float(n))
            }
            Token::Integer(n) => {
                self.advance()?;
                Ok(Expr::Int(n))
            }
            Token::Boolean(b) => {
                self.advance()?;
                Ok(Expr::Bool(b))
            }
            Token::Bytes(bytes) => {
                self.advance()?;
                Ok(Expr::Bytes(bytes))
            }
            Token::Nil => {
                self.advance()?;
                Ok(Expr::Nil)
            }
            Token::LBracket => {
                self.advance()?;
                self.parse_list()
            }
            Token::Identifier(name) => {
                self.advance()?;

                // Disambiguate call, enum symbol and path
                match self.current_token {
                    Token::LParen => Ok(Expr::Invocation(self.parse_invocation(name)?)),
                    Token::Dot | Token::LBracket => Ok(Expr::Path(self.parse_path(name)?)),
                    _ if is_enum_symbol(&name) => Ok(Expr::Enum(EnumSymbol(name))),
                    _ => Ok(Expr::Path(self.parse_path(name)?)),
                }
            }
            token => {
                self.current_token = token;
                Err(self.unexpected("a value"))
            }
        }
    }

    fn parse_list(&mut self) -> Result<Expr, ParseError> {
        let mut elements = vec![];

        if self.check(&Token::RBracket) {
            self.advance()?;
            return Ok(Expr::List(elements));
        }

        loop {
            elements.push(self.parse_value()?);
            match self.current_token {
                Token::Comma => self.advance()?,
                Token::RBracket => {
                    self.advance()?;
                    return Ok(Expr::List(elements));
                }
                _ => return Err(self.unexpected("',' or ']' in list")),
            }
        }
    }

    /// Parse the rest of a path whose first field name was already consumed.
    fn parse_path(&mut self, first: String) -> Result<Path, ParseError> {
        let mut fields = vec![self.parse_field(first)?];

        while self.check(&Token::Dot) {
            self.advance()?;
            let name = match &self.current_token {
                Token::Identifier(n) => n.clone(),
                _ => return Err(self.unexpected("field name after '.'")),
            };
            self.advance()?;
            fields.push(self.parse_field(name)?);
        }

        Ok(Path::new(fields))
    }

    fn parse_field(&mut self, name: String) -> Result<Field, ParseError> {
        if !self.check(&Token::LBracket) {
            return Ok(Field::new(name));
        }
        self.advance()?;

        let key = match &self.current_token {
            Token::String(key) => key.clone(),
            _ => return Err(self.unexpected("string map key")),
        };
        self.advance()?;
        self.expect(Token::RBracket)?;

        Ok(Field::keyed(name, key))
    }

    fn parse_boolean_expression(&mut self) -> Result<BooleanExpression, ParseError> {
        let left = self.parse_term()?;
        let mut rest = Vec::new();

        while self.check(&Token::Or) {
            self.advance()?;
            rest.push(self.parse_term()?);
        }

        Ok(BooleanExpression { left, rest })
    }

    fn parse_term(&mut self) -> Result<Term, ParseError> {
        let left = self.parse_boolean_value()?;
        let mut rest = Vec::new();

        while self.check(&Token::And) {
            self.advance()?;
            rest.push(self.parse_boolean_value()?);
        }

        Ok(Term { left, rest })
    }

    fn parse_boolean_value(&mut self) -> Result<BooleanValue, ParseError> {
        match self.current_token {
            Token::LParen => {
                self.advance()?;
                let inner = self.parse_boolean_expression()?;
                self.expect(Token::RParen)?;
                Ok(BooleanValue::SubExpr(Box::new(inner)))
            }
            Token::Boolean(b) => {
                self.advance()?;
                // `true == x` is still a comparison
                match self.comparison_operator() {
                    Some(op) => {
                        self.advance()?;
                        let right = self.parse_value()?;
                        Ok(BooleanValue::Comparison(Comparison {
                            left: Expr::Bool(b),
                            op,
                            right,
                        }))
                    }
                    None => Ok(BooleanValue::Constant(b)),
                }
            }
            _ => {
                let left = self.parse_value()?;
                let op = self
                    .comparison_operator()
                    .ok_or_else(|| self.unexpected("comparison operator"))?;
                self.advance()?;
                let right = self.parse_value()?;
                Ok(BooleanValue::Comparison(Comparison { left, op, right }))
            }
        }
    }

    fn comparison_operator(&self) -> Option<CompareOp> {
        match self.current_token {
            Token::EqEq => Some(CompareOp::Eq),
            Token::NotEq => Some(CompareOp::Ne),
            Token::Lt => Some(CompareOp::Lt),
            Token::LtEq => Some(CompareOp::Lte),
            Token::Gt => Some(CompareOp::Gt),
            Token::GtEq => Some(CompareOp::Gte),
            _ => None,
        }
    }
}
