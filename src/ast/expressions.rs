use std::fmt;

/// A single argument or comparison operand as written in a statement.
///
/// Exactly one variant is active, so a literal can never be both a string
/// and a path at the same time.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// String literal
    ///
    /// # Example
    /// ```text
    /// "fido"
    /// ```
    String(String),

    /// Float literal
    ///
    /// # Example
    /// ```text
    /// 1.2
    /// ```
    Float(f64),

    /// Integer literal
    ///
    /// # Example
    /// ```text
    /// 12
    /// ```
    Int(i64),

    /// Boolean literal
    Bool(bool),

    /// Raw bytes decoded from a `0x` literal
    ///
    /// # Example
    /// ```text
    /// 0x0102030405060708
    /// ```
    Bytes(Vec<u8>),

    /// Bare upper-case symbol, resolved to an integer by the host
    ///
    /// # Example
    /// ```text
    /// SPAN_KIND_SERVER
    /// ```
    Enum(EnumSymbol),

    /// The `nil` literal
    Nil,

    /// Field access into the record
    ///
    /// # Examples
    /// ```text
    /// name
    /// resource.attributes["host.name"]
    /// ```
    Path(Path),

    /// Nested function call
    ///
    /// # Example
    /// ```text
    /// Concat(["a", "b"], "+")
    /// ```
    Invocation(Invocation),

    /// Ordered list, elements may mix any kind
    ///
    /// # Example
    /// ```text
    /// ["1", 2, 3.0, nil, attributes["test"]]
    /// ```
    List(Vec<Expr>),
}

impl Expr {
    /// Human-readable kind, used in bind errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::String(_) => "string",
            Expr::Float(_) => "float",
            Expr::Int(_) => "int",
            Expr::Bool(_) => "bool",
            Expr::Bytes(_) => "bytes",
            Expr::Enum(_) => "enum",
            Expr::Nil => "nil",
            Expr::Path(_) => "path",
            Expr::Invocation(_) => "invocation",
            Expr::List(_) => "list",
        }
    }

    /// True when the value can differ between records: paths, invocations
    /// and lists containing either.
    pub fn is_dynamic(&self) -> bool {
        match self {
            Expr::Path(_) | Expr::Invocation(_) => true,
            Expr::List(items) => items.iter().any(Expr::is_dynamic),
            _ => false,
        }
    }
}

/// Name of an enum symbol as it appeared in the statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumSymbol(pub String);

impl EnumSymbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One segment of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    /// Literal key selecting into a map-valued field, `attributes["bar"]`
    pub map_key: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Field {
            name: name.into(),
            map_key: None,
        }
    }

    pub fn keyed(name: impl Into<String>, key: impl Into<String>) -> Self {
        Field {
            name: name.into(),
            map_key: Some(key.into()),
        }
    }
}

/// Non-empty sequence of fields naming a location in a record.
///
/// The parser never produces an empty path; only the host knows how the
/// fields map onto a concrete record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub fields: Vec<Field>,
}

impl Path {
    pub fn new(fields: Vec<Field>) -> Self {
        Path { fields }
    }

    pub fn first(&self) -> Option<&Field> {
        self.fields.first()
    }
}

/// A named function call with its ordered arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub function: String,
    pub arguments: Vec<Expr>,
}

impl Invocation {
    pub fn new(function: impl Into<String>, arguments: Vec<Expr>) -> Self {
        Invocation {
            function: function.into(),
            arguments,
        }
    }
}

pub(crate) fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for ch in s.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::String(s) => write_quoted(f, s),
            Expr::Float(n) => {
                let text = n.to_string();
                // keep a decimal point so the literal re-lexes as a float
                if text.contains('.') || !n.is_finite() {
                    f.write_str(&text)
                } else {
                    write!(f, "{text}.0")
                }
            }
            Expr::Int(n) => write!(f, "{n}"),
            Expr::Bool(b) => write!(f, "{b}"),
            Expr::Bytes(bytes) => {
                f.write_str("0x")?;
                for b in bytes {
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
            Expr::Enum(symbol) => f.write_str(symbol.as_str()),
            Expr::Nil => f.write_str("nil"),
            Expr::Path(path) => write!(f, "{path}"),
            Expr::Invocation(invocation) => write!(f, "{invocation}"),
            Expr::List(items) => {
                f.write_str("[")?;
                write_list(f, items)?;
                f.write_str("]")
            }
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(key) = &self.map_key {
            f.write_str("[")?;
            write_quoted(f, key)?;
            f.write_str("]")?;
        }
        Ok(())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.function)?;
        write_list(f, &self.arguments)?;
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_display_keeps_decimal_point() {
        assert_eq!(Expr::Float(3.0).to_string(), "3.0");
        assert_eq!(Expr::Float(1.25).to_string(), "1.25");
    }

    #[test]
    fn path_display() {
        let path = Path::new(vec![
            Field::new("foo"),
            Field::keyed("attributes", "bar"),
            Field::new("cat"),
        ]);
        assert_eq!(path.to_string(), r#"foo.attributes["bar"].cat"#);
    }

    #[test]
    fn dynamic_detection() {
        let path = Expr::Path(Path::new(vec![Field::new("name")]));
        assert!(path.is_dynamic());
        assert!(Expr::List(vec![Expr::Int(1), path]).is_dynamic());
        assert!(!Expr::List(vec![Expr::Int(1), Expr::Nil]).is_dynamic());
        assert!(!Expr::Enum(EnumSymbol("A".into())).is_dynamic());
    }
}
