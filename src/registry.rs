//! Function registry and the calling convention shared by every function.
//!
//! A function is registered under a name with a list of [`Param`]s. While
//! binding, each argument written in the statement is checked against its
//! parameter and converted into an [`Arg`]; the function's factory then
//! receives the converted arguments as [`BoundArgs`] and returns the compiled
//! closure.
//!
//! Functions come in two flavours:
//!
//! - **editors** mutate the record and only appear as the top-level call of a
//!   statement (`set`, `delete_key`, ...).
//! - **converters** are pure and produce a value. They can be the top-level
//!   call, an argument to another function or a comparison operand
//!   (`Concat`, `IsMatch`, ...).

use std::{collections::HashMap, fmt, sync::Arc};

use crate::{
    error::{BindError, EvalError},
    resolver::{GetSetter, Getter},
    value::Value,
};

/// Compiled editor: runs against one record, may return a value.
pub type Action<R> = Arc<dyn Fn(&mut R) -> Result<Option<Value>, EvalError> + Send + Sync>;

/// What a factory produces.
pub enum Compiled<R> {
    Editor(Action<R>),
    Converter(Getter<R>),
}

impl<R: 'static> Compiled<R> {
    pub fn editor<F>(f: F) -> Self
    where
        F: Fn(&mut R) -> Result<Option<Value>, EvalError> + Send + Sync + 'static,
    {
        Compiled::Editor(Arc::new(f))
    }

    pub fn converter<F>(f: F) -> Self
    where
        F: Fn(&R) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        Compiled::Converter(Arc::new(f))
    }

    /// The closure to run when this is the statement's top-level call.
    /// A converter's value becomes the statement result.
    pub fn into_action(self) -> Action<R> {
        match self {
            Compiled::Editor(action) => action,
            Compiled::Converter(getter) => Arc::new(move |record: &mut R| getter(&*record).map(Some)),
        }
    }
}

/// What an argument position accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Any value; literals are fixed at bind time, paths and converters are
    /// evaluated per record.
    Getter,
    /// A path the host can write to.
    GetSetter,
    /// String literal
    String,
    /// Integer literal
    Int,
    /// Float literal; integer literals are widened
    Float,
    /// Boolean literal
    Bool,
    /// Byte literal
    Bytes,
    /// Enum symbol (or integer literal)
    Enum,
    /// List of string literals
    StringList,
    /// List of arbitrary values, each bound like [`ParamKind::Getter`]
    GetterList,
}

impl ParamKind {
    pub fn describe(self) -> &'static str {
        match self {
            ParamKind::Getter => "a value",
            ParamKind::GetSetter => "a settable path",
            ParamKind::String => "a string literal",
            ParamKind::Int => "an int literal",
            ParamKind::Float => "a float literal",
            ParamKind::Bool => "a bool literal",
            ParamKind::Bytes => "a byte literal",
            ParamKind::Enum => "an enum symbol",
            ParamKind::StringList => "a list of string literals",
            ParamKind::GetterList => "a list",
        }
    }
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: &'static str,
    pub kind: ParamKind,
    /// Value used when the argument is omitted. `None` means required.
    pub default: Option<Value>,
}

impl Param {
    pub fn required(name: &'static str, kind: ParamKind) -> Self {
        Param {
            name,
            kind,
            default: None,
        }
    }

    pub fn optional(name: &'static str, kind: ParamKind, default: Value) -> Self {
        Param {
            name,
            kind,
            default: Some(default),
        }
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// A converted argument.
pub enum Arg<R> {
    Getter(Getter<R>),
    GetSetter(GetSetter<R>),
    /// Literal fixed at bind time (strings, numbers, bools, bytes, resolved
    /// enums, string lists and defaults)
    Literal(Value),
    Getters(Vec<Getter<R>>),
}

impl<R> Arg<R> {
    fn kind(&self) -> &'static str {
        match self {
            Arg::Getter(_) => "a value",
            Arg::GetSetter(_) => "a settable path",
            Arg::Literal(value) => value.type_name(),
            Arg::Getters(_) => "a list",
        }
    }
}

/// Arguments handed to a factory, consumed in declaration order.
pub struct BoundArgs<R> {
    function: String,
    args: std::vec::IntoIter<Arg<R>>,
    index: usize,
}

impl<R: 'static> BoundArgs<R> {
    pub fn new(function: impl Into<String>, args: Vec<Arg<R>>) -> Self {
        BoundArgs {
            function: function.into(),
            args: args.into_iter(),
            index: 0,
        }
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    fn mismatch(&self, expected: &str, found: &str) -> BindError {
        BindError::ArgumentKind {
            function: self.function.clone(),
            index: self.index,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    fn next(&mut self) -> Result<Arg<R>, BindError> {
        let arg = self.args.next().ok_or_else(|| BindError::Arity {
            function: self.function.clone(),
            expected: format!("at least {}", self.index + 1),
            got: self.index,
        })?;
        self.index += 1;
        Ok(arg)
    }

    /// Next argument as a getter. Literals are wrapped in constant getters.
    pub fn getter(&mut self) -> Result<Getter<R>, BindError> {
        match self.next()? {
            Arg::Getter(getter) => Ok(getter),
            Arg::GetSetter(target) => Ok(target.getter()),
            Arg::Literal(value) => Ok(crate::resolver::constant(value)),
            other => Err(self.mismatch("a value", other.kind())),
        }
    }

    pub fn get_setter(&mut self) -> Result<GetSetter<R>, BindError> {
        match self.next()? {
            Arg::GetSetter(target) => Ok(target),
            other => Err(self.mismatch("a settable path", other.kind())),
        }
    }

    pub fn literal(&mut self) -> Result<Value, BindError> {
        match self.next()? {
            Arg::Literal(value) => Ok(value),
            other => Err(self.mismatch("a literal", other.kind())),
        }
    }

    pub fn string(&mut self) -> Result<String, BindError> {
        match self.literal()? {
            Value::String(s) => Ok(s),
            other => Err(self.mismatch("a string literal", other.type_name())),
        }
    }

    pub fn int(&mut self) -> Result<i64, BindError> {
        match self.literal()? {
            Value::Int(n) => Ok(n),
            other => Err(self.mismatch("an int literal", other.type_name())),
        }
    }

    pub fn float(&mut self) -> Result<f64, BindError> {
        match self.literal()? {
            Value::Float(n) => Ok(n),
            Value::Int(n) => Ok(n as f64),
            other => Err(self.mismatch("a float literal", other.type_name())),
        }
    }

    pub fn bool(&mut self) -> Result<bool, BindError> {
        match self.literal()? {
            Value::Bool(b) => Ok(b),
            other => Err(self.mismatch("a bool literal", other.type_name())),
        }
    }

    pub fn bytes(&mut self) -> Result<Vec<u8>, BindError> {
        match self.literal()? {
            Value::Bytes(b) => Ok(b),
            other => Err(self.mismatch("a byte literal", other.type_name())),
        }
    }

    pub fn string_list(&mut self) -> Result<Vec<String>, BindError> {
        match self.literal()? {
            Value::List(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    other => Err(self.mismatch("a list of string literals", other.type_name())),
                })
                .collect(),
            other => Err(self.mismatch("a list of string literals", other.type_name())),
        }
    }

    pub fn getters(&mut self) -> Result<Vec<Getter<R>>, BindError> {
        match self.next()? {
            Arg::Getters(getters) => Ok(getters),
            Arg::Literal(Value::List(items)) => {
                Ok(items.into_iter().map(crate::resolver::constant).collect())
            }
            other => Err(self.mismatch("a list", other.kind())),
        }
    }

    /// Report a factory-level problem such as an invalid regex.
    pub fn invalid(&self, message: impl Into<String>) -> BindError {
        BindError::Factory {
            function: self.function.clone(),
            message: message.into(),
        }
    }
}

/// Builds the compiled closure from bound arguments.
pub type Factory<R> = Arc<dyn Fn(BoundArgs<R>) -> Result<Compiled<R>, BindError> + Send + Sync>;

/// A registered function.
pub struct FunctionSpec<R> {
    pub name: String,
    pub params: Vec<Param>,
    pub factory: Factory<R>,
}

impl<R> FunctionSpec<R> {
    pub fn required_count(&self) -> usize {
        self.params.iter().filter(|p| p.is_required()).count()
    }

    /// `"2"` or `"1 to 3"`, for arity errors.
    pub fn arity_description(&self) -> String {
        let required = self.required_count();
        if required == self.params.len() {
            required.to_string()
        } else {
            format!("{} to {}", required, self.params.len())
        }
    }
}

impl<R> fmt::Debug for FunctionSpec<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionSpec")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish()
    }
}

/// Name → function table, built once and passed to the binder.
///
/// There is no global registry; tests and hosts can hold as many
/// independent registries as they need.
pub struct FunctionRegistry<R> {
    functions: HashMap<String, FunctionSpec<R>>,
}

impl<R> Default for FunctionRegistry<R> {
    fn default() -> Self {
        FunctionRegistry {
            functions: HashMap::new(),
        }
    }
}

impl<R> fmt::Debug for FunctionRegistry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.functions.keys().collect();
        names.sort();
        f.debug_struct("FunctionRegistry")
            .field("functions", &names)
            .finish()
    }
}

impl<R: 'static> FunctionRegistry<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a function.
    pub fn register<F>(&mut self, name: &str, params: Vec<Param>, factory: F) -> &mut Self
    where
        F: Fn(BoundArgs<R>) -> Result<Compiled<R>, BindError> + Send + Sync + 'static,
    {
        self.functions.insert(
            name.to_string(),
            FunctionSpec {
                name: name.to_string(),
                params,
                factory: Arc::new(factory),
            },
        );
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with<F>(mut self, name: &str, params: Vec<Param>, factory: F) -> Self
    where
        F: Fn(BoundArgs<R>) -> Result<Compiled<R>, BindError> + Send + Sync + 'static,
    {
        self.register(name, params, factory);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FunctionSpec<R>> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
