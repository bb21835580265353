//! Binding: attaching a parsed statement to one record type.
//!
//! Every path and enum symbol is resolved here, every function is looked up
//! and its arguments checked, and the where-clause is compiled into a
//! [`Condition`]. Nothing is resolved again per record.
//!
//! Arguments bind in one of two modes:
//!
//! | Argument | Mode | Result |
//! |---|---|---|
//! | string, int, float, bool, bytes, nil | eager | fixed value |
//! | enum symbol | eager | resolved integer |
//! | list of the above | eager | fixed list |
//! | path | lazy | host getter |
//! | nested converter call | lazy | compiled getter |
//! | list containing a path or call | lazy | getter building the list per record |

use std::sync::Arc;

use crate::{
    ast::{BooleanExpression, BooleanValue, Expr, Invocation, ParsedStatement, Term},
    error::{BindError, CompileError},
    evaluator::{CompiledExpression, CompiledTerm, CompiledValue, Condition},
    parser::parse,
    registry::{Arg, BoundArgs, Compiled, FunctionRegistry, ParamKind},
    resolver::{EnumResolver, Getter, PathResolver, constant},
    statement::Statement,
    value::Value,
};

/// Bind a parsed statement against a record type.
///
/// The returned statement keeps only the closures produced here; binding the
/// same `ParsedStatement` against two resolvers yields two independent
/// statements.
pub fn bind<R, P, E>(
    parsed: &ParsedStatement,
    paths: &P,
    enums: &E,
    registry: &FunctionRegistry<R>,
) -> Result<Statement<R>, BindError>
where
    R: 'static,
    P: PathResolver<R> + ?Sized,
    E: EnumResolver + ?Sized,
{
    Binder {
        registry,
        paths,
        enums,
    }
    .bind(parsed, parsed.to_string())
}

/// A bound operand: either fixed now or read from each record.
enum Bound<R> {
    Eager(Value),
    Lazy(Getter<R>),
}

impl<R: 'static> Bound<R> {
    fn into_getter(self) -> Getter<R> {
        match self {
            Bound::Eager(value) => constant(value),
            Bound::Lazy(getter) => getter,
        }
    }
}

struct Binder<'a, R, P: ?Sized, E: ?Sized> {
    registry: &'a FunctionRegistry<R>,
    paths: &'a P,
    enums: &'a E,
}

impl<R, P, E> Binder<'_, R, P, E>
where
    R: 'static,
    P: PathResolver<R> + ?Sized,
    E: EnumResolver + ?Sized,
{
    fn bind(&self, parsed: &ParsedStatement, source: String) -> Result<Statement<R>, BindError> {
        let action = self.invocation(&parsed.invocation)?.into_action();
        let condition = match &parsed.where_clause {
            Some(expression) => Condition::from_expression(self.expression(expression)?),
            None => Condition::always(),
        };
        Ok(Statement::new(source, condition, action))
    }

    fn invocation(&self, invocation: &Invocation) -> Result<Compiled<R>, BindError> {
        let function = &invocation.function;
        let spec = self
            .registry
            .get(function)
            .ok_or_else(|| BindError::UnknownFunction(function.clone()))?;

        let got = invocation.arguments.len();
        let arity = || BindError::Arity {
            function: function.clone(),
            expected: spec.arity_description(),
            got,
        };
        if got < spec.required_count() || got > spec.params.len() {
            return Err(arity());
        }

        let mut args = Vec::with_capacity(spec.params.len());
        for (index, param) in spec.params.iter().enumerate() {
            let arg = match (invocation.arguments.get(index), &param.default) {
                (Some(expr), _) => self.argument(function, index, param.kind, expr)?,
                (None, Some(default)) => Arg::Literal(default.clone()),
                (None, None) => return Err(arity()),
            };
            args.push(arg);
        }

        tracing::debug!(function = %function, arguments = got, "binding function");
        (spec.factory)(BoundArgs::new(function.clone(), args))
    }

    fn argument(
        &self,
        function: &str,
        index: usize,
        kind: ParamKind,
        expr: &Expr,
    ) -> Result<Arg<R>, BindError> {
        let mismatch = || BindError::ArgumentKind {
            function: function.to_string(),
            index,
            expected: kind.describe().to_string(),
            found: expr.kind().to_string(),
        };

        let arg = match (kind, expr) {
            (ParamKind::Getter, _) => Arg::Getter(self.value(expr)?.into_getter()),
            (ParamKind::GetSetter, Expr::Path(path)) => {
                let target = self.paths.resolve_path(path)?;
                if !target.is_settable() {
                    return Err(BindError::NotSettable(path.to_string()));
                }
                Arg::GetSetter(target)
            }
            (ParamKind::String, Expr::String(s)) => Arg::Literal(Value::String(s.clone())),
            (ParamKind::Int, Expr::Int(n)) => Arg::Literal(Value::Int(*n)),
            (ParamKind::Float, Expr::Float(n)) => Arg::Literal(Value::Float(*n)),
            (ParamKind::Float, Expr::Int(n)) => Arg::Literal(Value::Float(*n as f64)),
            (ParamKind::Bool, Expr::Bool(b)) => Arg::Literal(Value::Bool(*b)),
            (ParamKind::Bytes, Expr::Bytes(bytes)) => Arg::Literal(Value::Bytes(bytes.clone())),
            (ParamKind::Enum, Expr::Enum(symbol)) => {
                Arg::Literal(Value::Int(self.enums.resolve_enum(symbol)?))
            }
            (ParamKind::Enum, Expr::Int(n)) => Arg::Literal(Value::Int(*n)),
            (ParamKind::StringList, Expr::List(items)) => {
                let strings = items
                    .iter()
                    .map(|item| match item {
                        Expr::String(s) => Ok(Value::String(s.clone())),
                        _ => Err(mismatch()),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Arg::Literal(Value::List(strings))
            }
            (ParamKind::GetterList, Expr::List(items)) => Arg::Getters(
                items
                    .iter()
                    .map(|item| self.value(item).map(Bound::into_getter))
                    .collect::<Result<_, _>>()?,
            ),
            _ => return Err(mismatch()),
        };
        Ok(arg)
    }

    /// Bind a value position: fold literals now, defer paths and calls.
    fn value(&self, expr: &Expr) -> Result<Bound<R>, BindError> {
        let bound = match expr {
            Expr::String(s) => Bound::Eager(Value::String(s.clone())),
            Expr::Float(n) => Bound::Eager(Value::Float(*n)),
            Expr::Int(n) => Bound::Eager(Value::Int(*n)),
            Expr::Bool(b) => Bound::Eager(Value::Bool(*b)),
            Expr::Bytes(bytes) => Bound::Eager(Value::Bytes(bytes.clone())),
            Expr::Nil => Bound::Eager(Value::Nil),
            Expr::Enum(symbol) => Bound::Eager(Value::Int(self.enums.resolve_enum(symbol)?)),
            Expr::Path(path) => Bound::Lazy(self.paths.resolve_path(path)?.getter()),
            Expr::Invocation(invocation) => match self.invocation(invocation)? {
                Compiled::Converter(getter) => Bound::Lazy(getter),
                Compiled::Editor(_) => {
                    return Err(BindError::EditorAsValue(invocation.function.clone()));
                }
            },
            Expr::List(items) => self.list(items)?,
        };
        Ok(bound)
    }

    fn list(&self, items: &[Expr]) -> Result<Bound<R>, BindError> {
        let elements = items
            .iter()
            .map(|item| self.value(item))
            .collect::<Result<Vec<_>, _>>()?;

        if elements.iter().all(|e| matches!(e, Bound::Eager(_))) {
            let values = elements
                .into_iter()
                .filter_map(|e| match e {
                    Bound::Eager(value) => Some(value),
                    Bound::Lazy(_) => None,
                })
                .collect();
            return Ok(Bound::Eager(Value::List(values)));
        }

        let getters: Vec<Getter<R>> = elements.into_iter().map(Bound::into_getter).collect();
        Ok(Bound::Lazy(Arc::new(move |record: &R| {
            getters
                .iter()
                .map(|getter| getter(record))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List)
        })))
    }

    fn expression(&self, expression: &BooleanExpression) -> Result<CompiledExpression<R>, BindError> {
        Ok(CompiledExpression {
            terms: expression
                .terms()
                .map(|term| self.term(term))
                .collect::<Result<_, _>>()?,
        })
    }

    fn term(&self, term: &Term) -> Result<CompiledTerm<R>, BindError> {
        Ok(CompiledTerm {
            values: term
                .values()
                .map(|value| self.boolean_value(value))
                .collect::<Result<_, _>>()?,
        })
    }

    fn boolean_value(&self, value: &BooleanValue) -> Result<CompiledValue<R>, BindError> {
        Ok(match value {
            BooleanValue::Constant(b) => CompiledValue::Constant(*b),
            BooleanValue::Comparison(comparison) => CompiledValue::Comparison {
                left: self.value(&comparison.left)?.into_getter(),
                op: comparison.op,
                right: self.value(&comparison.right)?.into_getter(),
            },
            BooleanValue::SubExpr(inner) => CompiledValue::SubExpr(self.expression(inner)?),
        })
    }
}

/// Parses and binds statement text for one record type.
///
/// Holds the registry and both resolvers so a host can configure them once
/// and compile as many statements as it needs.
///
/// # Examples
///
/// ```
/// use ottl_lang::{Compiler, FunctionRegistry, MapPathResolver, SymbolTable, Value};
///
/// let compiler = Compiler::new(
///     FunctionRegistry::with_standard_functions(),
///     MapPathResolver,
///     SymbolTable::new(),
/// );
/// let statement = compiler
///     .compile(r#"set(attributes["env"], "prod") where name == "checkout""#)
///     .unwrap();
///
/// let mut record = Value::Map(Default::default());
/// let execution = statement.execute(&mut record).unwrap();
/// assert!(!execution.condition_matched);
/// ```
pub struct Compiler<R, P, E> {
    registry: FunctionRegistry<R>,
    paths: P,
    enums: E,
}

impl<R, P, E> Compiler<R, P, E>
where
    R: 'static,
    P: PathResolver<R>,
    E: EnumResolver,
{
    pub fn new(registry: FunctionRegistry<R>, paths: P, enums: E) -> Self {
        Compiler {
            registry,
            paths,
            enums,
        }
    }

    pub fn registry(&self) -> &FunctionRegistry<R> {
        &self.registry
    }

    /// Parse and bind one statement.
    pub fn compile(&self, text: &str) -> Result<Statement<R>, CompileError> {
        let parsed = parse(text)?;
        Binder {
            registry: &self.registry,
            paths: &self.paths,
            enums: &self.enums,
        }
        .bind(&parsed, text.to_string())
        .map_err(|source| CompileError::Bind {
            statement: text.to_string(),
            source,
        })
    }

    /// Compile every statement, or none.
    ///
    /// All failures are collected so a configuration with several mistakes
    /// reports them together.
    pub fn compile_all<S: AsRef<str>>(
        &self,
        texts: &[S],
    ) -> Result<Vec<Statement<R>>, Vec<CompileError>> {
        let mut statements = Vec::with_capacity(texts.len());
        let mut errors = Vec::new();

        for text in texts {
            match self.compile(text.as_ref()) {
                Ok(statement) => statements.push(statement),
                Err(err) => errors.push(err),
            }
        }

        if errors.is_empty() {
            tracing::debug!(count = statements.len(), "compiled statements");
            Ok(statements)
        } else {
            Err(errors)
        }
    }
}
