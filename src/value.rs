use std::collections::HashMap;

/// A resolved runtime value, as returned by getters and accepted by setters.
///
/// This is separate from [`Expr`](crate::ast::Expr): an `Expr` is what was
/// written in the statement, a `Value` is what a path or function produced
/// for one particular record.
///
/// # Examples
///
/// ```
/// use ottl_lang::Value;
/// use std::collections::HashMap;
///
/// let name = Value::String("fido".to_string());
/// let count = Value::Int(3);
///
/// let mut attributes = HashMap::new();
/// attributes.insert("http.method".to_string(), Value::from("GET"));
/// let record = Value::Map(attributes);
///
/// assert_eq!(name.type_name(), "string");
/// assert_eq!(count.as_int(), Some(3));
/// assert!(record.as_map().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent / null
    #[default]
    Nil,

    Bool(bool),

    Int(i64),

    Float(f64),

    String(String),

    /// Raw byte sequence, e.g. trace and span ids
    Bytes(Vec<u8>),

    /// Ordered, heterogeneous list
    List(Vec<Value>),

    /// String-keyed map, e.g. attributes
    Map(HashMap<String, Value>),
}

impl Value {
    /// Returns a human-readable type name for a Value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as integer. Floats are not truncated here; see [`Value::to_int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Best-effort integer conversion: truncates floats, parses strings,
    /// maps bools to 0/1. Returns `None` when no sensible integer exists.
    pub fn to_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
            Value::Float(n) if *n >= i64::MIN as f64 && *n < i64::MAX as f64 => {
                Some(n.trunc() as i64)
            }
            Value::String(s) => s.trim().parse::<i64>().ok(),
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Render for string concatenation. Nil renders as an empty string;
    /// lists and maps render in literal syntax with map keys sorted.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Nil => String::new(),
            Value::String(s) => s.clone(),
            Value::Bytes(bytes) => hex(bytes),
            other => {
                let mut out = String::new();
                other.write_nested(&mut out);
                out
            }
        }
    }

    fn write_nested(&self, out: &mut String) {
        match self {
            Value::Nil => out.push_str("nil"),
            Value::Bool(b) => out.push_str(&b.to_string()),
            Value::Int(n) => out.push_str(&n.to_string()),
            Value::Float(n) => out.push_str(&n.to_string()),
            Value::String(s) => out.push_str(&format!("{s:?}")),
            Value::Bytes(bytes) => {
                out.push_str("0x");
                out.push_str(&hex(bytes));
            }
            Value::List(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.write_nested(out);
                }
                out.push(']');
            }
            Value::Map(map) => {
                let mut entries: Vec<_> = map.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                out.push('{');
                for (i, (key, value)) in entries.into_iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&format!("{key:?}: "));
                    value.write_nested(out);
                }
                out.push('}');
            }
        }
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(map: HashMap<String, Value>) -> Self {
        Value::Map(map)
    }
}
