//! Standard function catalogue.
//!
//! Editors (lower-case) change the record; converters (capitalized) compute a
//! value. All of them are generic over the record type: they only touch the
//! record through the getters and setters the host resolved.
//!
//! | Function | Kind | Parameters |
//! |---|---|---|
//! | `set` | editor | target: settable path, value |
//! | `delete_key` | editor | target: settable path, key: string |
//! | `keep_keys` | editor | target: settable path, keys: list of strings |
//! | `replace_pattern` | editor | target: settable path, regex: string, replacement: string |
//! | `truncate_all` | editor | target: settable path, limit: int |
//! | `Concat` | converter | values: list, delimiter: string (default `""`) |
//! | `IsMatch` | converter | target, regex: string |
//! | `Int` | converter | value |

use regex::Regex;

use crate::{
    error::EvalError,
    registry::{Compiled, FunctionRegistry, Param, ParamKind},
    value::Value,
};

impl<R: 'static> FunctionRegistry<R> {
    /// A registry holding the standard catalogue.
    pub fn with_standard_functions() -> Self {
        let mut registry = FunctionRegistry::new();
        register_standard(&mut registry);
        registry
    }
}

/// Add the standard catalogue to an existing registry, replacing any
/// functions with the same names.
pub fn register_standard<R: 'static>(registry: &mut FunctionRegistry<R>) {
    registry
        .register(
            "set",
            vec![
                Param::required("target", ParamKind::GetSetter),
                Param::required("value", ParamKind::Getter),
            ],
            |mut args| {
                let target = args.get_setter()?;
                let value = args.getter()?;
                Ok(Compiled::editor(move |record: &mut R| {
                    let value = value(&*record)?;
                    target.set(record, value)?;
                    Ok(None)
                }))
            },
        )
        .register(
            "delete_key",
            vec![
                Param::required("target", ParamKind::GetSetter),
                Param::required("key", ParamKind::String),
            ],
            |mut args| {
                let target = args.get_setter()?;
                let key = args.string()?;
                Ok(Compiled::editor(move |record: &mut R| {
                    // non-map targets are left alone
                    if let Value::Map(mut map) = target.get(record)?
                        && map.remove(&key).is_some()
                    {
                        target.set(record, Value::Map(map))?;
                    }
                    Ok(None)
                }))
            },
        )
        .register(
            "keep_keys",
            vec![
                Param::required("target", ParamKind::GetSetter),
                Param::required("keys", ParamKind::StringList),
            ],
            |mut args| {
                let target = args.get_setter()?;
                let keys = args.string_list()?;
                Ok(Compiled::editor(move |record: &mut R| {
                    if let Value::Map(mut map) = target.get(record)? {
                        map.retain(|k, _| keys.contains(k));
                        target.set(record, Value::Map(map))?;
                    }
                    Ok(None)
                }))
            },
        )
        .register(
            "replace_pattern",
            vec![
                Param::required("target", ParamKind::GetSetter),
                Param::required("regex", ParamKind::String),
                Param::required("replacement", ParamKind::String),
            ],
            |mut args| {
                let target = args.get_setter()?;
                let pattern = args.string()?;
                let replacement = args.string()?;
                let regex = Regex::new(&pattern)
                    .map_err(|e| args.invalid(format!("invalid regex '{pattern}': {e}")))?;

                Ok(Compiled::editor(move |record: &mut R| {
                    if let Value::String(current) = target.get(record)? {
                        let replaced = regex.replace_all(&current, replacement.as_str());
                        if replaced != current {
                            let replaced = replaced.into_owned();
                            target.set(record, Value::String(replaced))?;
                        }
                    }
                    Ok(None)
                }))
            },
        )
        .register(
            "truncate_all",
            vec![
                Param::required("target", ParamKind::GetSetter),
                Param::required("limit", ParamKind::Int),
            ],
            |mut args| {
                let target = args.get_setter()?;
                let limit = args.int()?;
                let limit = usize::try_from(limit)
                    .map_err(|_| args.invalid(format!("limit must be non-negative, got {limit}")))?;

                Ok(Compiled::editor(move |record: &mut R| {
                    if let Value::Map(mut map) = target.get(record)? {
                        for value in map.values_mut() {
                            if let Value::String(s) = value
                                && s.chars().count() > limit
                            {
                                *s = s.chars().take(limit).collect();
                            }
                        }
                        target.set(record, Value::Map(map))?;
                    }
                    Ok(None)
                }))
            },
        )
        .register(
            "Concat",
            vec![
                Param::required("values", ParamKind::GetterList),
                Param::optional("delimiter", ParamKind::String, Value::from("")),
            ],
            |mut args| {
                let values = args.getters()?;
                let delimiter = args.string()?;
                Ok(Compiled::converter(move |record: &R| {
                    let parts = values
                        .iter()
                        .map(|getter| getter(record).map(|v| v.to_display_string()))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Value::String(parts.join(delimiter.as_str())))
                }))
            },
        )
        .register(
            "IsMatch",
            vec![
                Param::required("target", ParamKind::Getter),
                Param::required("regex", ParamKind::String),
            ],
            |mut args| {
                let target = args.getter()?;
                let pattern = args.string()?;
                let regex = Regex::new(&pattern)
                    .map_err(|e| args.invalid(format!("invalid regex '{pattern}': {e}")))?;

                Ok(Compiled::converter(move |record: &R| {
                    let matched = match target(record)? {
                        Value::Nil => false,
                        Value::String(s) => regex.is_match(&s),
                        scalar @ (Value::Bool(_) | Value::Int(_) | Value::Float(_)) => {
                            regex.is_match(&scalar.to_display_string())
                        }
                        other => {
                            return Err(EvalError::TypeMismatch {
                                expected: "string",
                                found: other.type_name(),
                            });
                        }
                    };
                    Ok(Value::Bool(matched))
                }))
            },
        )
        .register(
            "Int",
            vec![Param::required("value", ParamKind::Getter)],
            |mut args| {
                let value = args.getter()?;
                Ok(Compiled::converter(move |record: &R| {
                    Ok(value(record)?.to_int().map_or(Value::Nil, Value::Int))
                }))
            },
        );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_names() {
        let registry = FunctionRegistry::<Value>::with_standard_functions();
        assert_eq!(
            registry.names(),
            vec![
                "Concat",
                "Int",
                "IsMatch",
                "delete_key",
                "keep_keys",
                "replace_pattern",
                "set",
                "truncate_all"
            ]
        );
    }

    #[test]
    fn concat_has_optional_delimiter() {
        let registry = FunctionRegistry::<Value>::with_standard_functions();
        let concat = registry.get("Concat").unwrap();
        assert_eq!(concat.required_count(), 1);
        assert_eq!(concat.arity_description(), "1 to 2");
    }
}
