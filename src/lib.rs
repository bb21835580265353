pub mod ast;
pub mod binder;
pub mod cli;
pub mod compare;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod lexer;
pub mod parser;
pub mod record;
pub mod registry;
pub mod resolver;
pub mod statement;
pub mod value;

pub use ast::{
    BooleanExpression, BooleanValue, CompareOp, Comparison, EnumSymbol, Expr, Field, Invocation,
    ParsedStatement, Path, Term, Token,
};
pub use binder::{Compiler, bind};
pub use error::{
    BindError, CompileError, EvalError, LexError, LexErrorKind, ParseError, ResolveError,
};
pub use evaluator::Condition;
pub use lexer::{Lexer, Position};
pub use parser::{Parser, parse};
pub use record::{MapPathResolver, SymbolTable};
pub use registry::{Action, Compiled, FunctionRegistry, Param, ParamKind};
pub use resolver::{EnumResolver, GetSetter, Getter, NoEnums, PathResolver, Setter};
pub use statement::{Execution, Statement, execute_all};
pub use value::Value;
