//! The contract between the language and the system embedding it.
//!
//! The language never looks inside a record. A host supplies, once per
//! record type, a [`PathResolver`] that turns a parsed [`Path`] into a
//! getter (and optionally a setter), and an [`EnumResolver`] that maps enum
//! symbols to integers. Both are called only while binding; the closures they
//! return are kept in the bound statement and reused for every record.

use std::{fmt, sync::Arc};

use crate::{
    ast::{EnumSymbol, Path},
    error::{EvalError, ResolveError},
    value::Value,
};

/// Reads a value out of a record.
pub type Getter<R> = Arc<dyn Fn(&R) -> Result<Value, EvalError> + Send + Sync>;

/// Writes a value into a record.
pub type Setter<R> = Arc<dyn Fn(&mut R, Value) -> Result<(), EvalError> + Send + Sync>;

/// A resolved path: always readable, writable when the host allows it.
pub struct GetSetter<R> {
    getter: Getter<R>,
    setter: Option<Setter<R>>,
}

impl<R> GetSetter<R> {
    pub fn new(getter: Getter<R>, setter: Option<Setter<R>>) -> Self {
        GetSetter { getter, setter }
    }

    /// A location that can only be read.
    pub fn read_only<G>(getter: G) -> Self
    where
        G: Fn(&R) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        GetSetter {
            getter: Arc::new(getter),
            setter: None,
        }
    }

    /// A location that can be read and written.
    pub fn read_write<G, S>(getter: G, setter: S) -> Self
    where
        G: Fn(&R) -> Result<Value, EvalError> + Send + Sync + 'static,
        S: Fn(&mut R, Value) -> Result<(), EvalError> + Send + Sync + 'static,
    {
        GetSetter {
            getter: Arc::new(getter),
            setter: Some(Arc::new(setter)),
        }
    }

    pub fn get(&self, record: &R) -> Result<Value, EvalError> {
        (self.getter)(record)
    }

    pub fn set(&self, record: &mut R, value: Value) -> Result<(), EvalError> {
        match &self.setter {
            Some(setter) => setter(record, value),
            None => Err(EvalError::NotSettable),
        }
    }

    pub fn is_settable(&self) -> bool {
        self.setter.is_some()
    }

    pub fn getter(&self) -> Getter<R> {
        Arc::clone(&self.getter)
    }
}

impl<R> Clone for GetSetter<R> {
    fn clone(&self) -> Self {
        GetSetter {
            getter: Arc::clone(&self.getter),
            setter: self.setter.clone(),
        }
    }
}

impl<R> fmt::Debug for GetSetter<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GetSetter")
            .field("settable", &self.is_settable())
            .finish()
    }
}

/// Turns parsed paths into accessors for record type `R`.
pub trait PathResolver<R> {
    fn resolve_path(&self, path: &Path) -> Result<GetSetter<R>, ResolveError>;
}

/// Maps bare enum symbols to their integer values.
pub trait EnumResolver {
    fn resolve_enum(&self, symbol: &EnumSymbol) -> Result<i64, ResolveError>;
}

impl<R, F> PathResolver<R> for F
where
    F: Fn(&Path) -> Result<GetSetter<R>, ResolveError>,
{
    fn resolve_path(&self, path: &Path) -> Result<GetSetter<R>, ResolveError> {
        self(path)
    }
}

/// Resolver for hosts that define no enums: every symbol is unknown.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEnums;

impl EnumResolver for NoEnums {
    fn resolve_enum(&self, symbol: &EnumSymbol) -> Result<i64, ResolveError> {
        Err(ResolveError::UnknownEnum(symbol.as_str().to_string()))
    }
}

/// A getter that always yields the same value, used for literals.
pub fn constant<R: 'static>(value: Value) -> Getter<R> {
    Arc::new(move |_: &R| Ok(value.clone()))
}
