//! A ready-made host for records that are plain nested maps.
//!
//! Used by the `ottl` binary and handy in tests: any [`Value::Map`] can be
//! queried and edited without writing a resolver.

use std::{collections::HashMap, sync::Arc};

use crate::{
    ast::{EnumSymbol, Path},
    error::{EvalError, ResolveError},
    resolver::{EnumResolver, GetSetter, PathResolver},
    value::Value,
};

/// Resolves every path against a [`Value::Map`] record.
///
/// Each field name selects a key and a map key selects a key inside that
/// field, so `resource.attributes["host.name"]` reads
/// `record["resource"]["attributes"]["host.name"]`.
///
/// - Reading a key that is not there is [`EvalError::MissingField`].
/// - Writing creates missing keys and intermediate maps. A `nil` on the way
///   is replaced with a map.
/// - Reading or writing through anything else is [`EvalError::NotAMap`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MapPathResolver;

/// Flatten a path into the sequence of map keys it walks.
fn keys(path: &Path) -> Vec<String> {
    path.fields
        .iter()
        .flat_map(|field| std::iter::once(field.name.clone()).chain(field.map_key.clone()))
        .collect()
}

fn read<'v>(current: &'v Value, keys: &[String], path: &str) -> Result<&'v Value, EvalError> {
    let Some((key, rest)) = keys.split_first() else {
        return Ok(current);
    };

    match current {
        Value::Map(map) => {
            let child = map
                .get(key)
                .ok_or_else(|| EvalError::MissingField(path.to_string()))?;
            read(child, rest, path)
        }
        other => Err(EvalError::NotAMap {
            path: path.to_string(),
            found: other.type_name(),
        }),
    }
}

fn write(current: &mut Value, keys: &[String], value: Value, path: &str) -> Result<(), EvalError> {
    let Some((key, rest)) = keys.split_first() else {
        *current = value;
        return Ok(());
    };

    if current.is_nil() {
        *current = Value::Map(HashMap::new());
    }

    match current {
        Value::Map(map) => {
            if rest.is_empty() {
                map.insert(key.clone(), value);
                return Ok(());
            }
            let child = map.entry(key.clone()).or_insert(Value::Nil);
            write(child, rest, value, path)
        }
        other => Err(EvalError::NotAMap {
            path: path.to_string(),
            found: other.type_name(),
        }),
    }
}

impl PathResolver<Value> for MapPathResolver {
    fn resolve_path(&self, path: &Path) -> Result<GetSetter<Value>, ResolveError> {
        if path.fields.is_empty() {
            return Err(ResolveError::UnknownPath(String::new()));
        }

        let keys: Arc<[String]> = keys(path).into();
        let text: Arc<str> = path.to_string().into();

        let (get_keys, get_text) = (Arc::clone(&keys), Arc::clone(&text));
        Ok(GetSetter::read_write(
            move |record: &Value| read(record, &get_keys, &get_text).cloned(),
            move |record: &mut Value, value: Value| write(record, &keys, value, &text),
        ))
    }
}

/// Enum symbols known to a host.
///
/// # Examples
///
/// ```
/// use ottl_lang::{EnumSymbol, SymbolTable, resolver::EnumResolver};
///
/// let symbols = SymbolTable::new()
///     .with("SPAN_KIND_SERVER", 2)
///     .with("SPAN_KIND_CLIENT", 3);
///
/// assert_eq!(symbols.resolve_enum(&EnumSymbol("SPAN_KIND_CLIENT".into())), Ok(3));
/// assert!(symbols.resolve_enum(&EnumSymbol("NOPE".into())).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: HashMap<String, i64>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: i64) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: i64) -> Option<i64> {
        self.symbols.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.symbols.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, i64)> for SymbolTable {
    fn from_iter<I: IntoIterator<Item = (S, i64)>>(iter: I) -> Self {
        SymbolTable {
            symbols: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl EnumResolver for SymbolTable {
    fn resolve_enum(&self, symbol: &EnumSymbol) -> Result<i64, ResolveError> {
        self.get(symbol.as_str())
            .ok_or_else(|| ResolveError::UnknownEnum(symbol.as_str().to_string()))
    }
}
