/// Lexical tokens produced by the [`Lexer`](crate::lexer::Lexer).
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Floating point number
    ///
    /// # Examples
    /// ```text
    /// 1.2
    /// -3.0
    /// ```
    Float(f64),

    /// Integer
    ///
    /// # Examples
    /// ```text
    /// 12
    /// -10
    /// ```
    Integer(i64),

    /// String literal enclosed in double quotes, escapes already resolved
    ///
    /// # Examples
    /// ```text
    /// "fido"
    /// "fo\"o"
    /// ```
    String(String),

    /// Byte sequence from a `0x` hex literal with an even digit count
    ///
    /// # Examples
    /// ```text
    /// 0x0102030405060708
    /// ```
    Bytes(Vec<u8>),

    /// Boolean values
    Boolean(bool),

    /// The `nil` literal
    Nil,

    // Identifiers
    /// Function names, path fields and enum symbols.
    ///
    /// The lexer does not tell these apart; the parser decides from the
    /// surrounding tokens.
    ///
    /// # Examples
    /// ```text
    /// set
    /// attributes
    /// SPAN_KIND_SERVER
    /// ```
    Identifier(String),

    // Keywords
    /// Introduces the condition of a statement
    Where,

    /// Logical AND (word, not symbol)
    And,

    /// Logical OR (word, not symbol)
    Or,

    // Comparison
    /// Equality operator
    EqEq,

    /// Inequality operator
    NotEq,

    /// Less than
    Lt,

    /// Greater than
    Gt,

    /// Less than or equal
    LtEq,

    /// Greater than or equal
    GtEq,

    // Delimiters
    /// Left bracket for map keys and list literals
    LBracket,

    /// Right bracket
    RBracket,

    /// Left parenthesis for argument lists or grouping
    LParen,

    /// Right parenthesis
    RParen,

    /// Dot between path fields
    Dot,

    /// Comma between arguments or list elements
    Comma,

    /// End of input
    Eof,
}

impl Token {
    /// Short description used in parse error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Float(n) => format!("float {n}"),
            Token::Integer(n) => format!("integer {n}"),
            Token::String(s) => format!("string {s:?}"),
            Token::Bytes(b) => format!("{}-byte literal", b.len()),
            Token::Boolean(b) => format!("'{b}'"),
            Token::Nil => "'nil'".to_string(),
            Token::Identifier(name) => format!("identifier '{name}'"),
            Token::Where => "'where'".to_string(),
            Token::And => "'and'".to_string(),
            Token::Or => "'or'".to_string(),
            Token::EqEq => "'=='".to_string(),
            Token::NotEq => "'!='".to_string(),
            Token::Lt => "'<'".to_string(),
            Token::Gt => "'>'".to_string(),
            Token::LtEq => "'<='".to_string(),
            Token::GtEq => "'>='".to_string(),
            Token::LBracket => "'['".to_string(),
            Token::RBracket => "']'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::Dot => "'.'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Eof => "end of statement".to_string(),
        }
    }
}
