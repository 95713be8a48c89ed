#![deny(missing_docs)]
#![doc = "Single-variable function expressions: tokenizer, parser, evaluation and rendering."]

/// Expression tree, evaluation and rendering.
pub mod ast;
/// Parse and build errors.
pub mod error;
/// Parsed single-variable functions.
pub mod function;
/// Tokenizer.
pub mod lexer;
/// Recursive-descent parser.
pub mod parser;

pub use ast::{BinOp, Constant, Expr, Func};
pub use error::{ExprError, ParseError};
pub use function::{Function, DEFAULT_VARIABLE};
pub use parser::{parse, MAX_DEPTH};
