use mct_core::errors::{ErrorInfo, MctError};
use thiserror::Error;

/// Failure to turn a source string into an expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse \"{expression}\" at offset {position}: {message}")]
pub struct ParseError {
    /// Source text that failed to parse.
    pub expression: String,
    /// Byte offset of the offending token.
    pub position: usize,
    /// What went wrong.
    pub message: String,
}

impl ParseError {
    pub(crate) fn new(expression: &str, position: usize, message: impl Into<String>) -> Self {
        Self {
            expression: expression.to_string(),
            position,
            message: message.into(),
        }
    }
}

/// Failure to build a single-variable [`Function`](crate::Function).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    /// The source did not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The expression mentions more than one free variable.
    #[error("too many variables ({}) in \"{expression}\"", .variables.join(", "))]
    TooManyVariables {
        /// Source text.
        expression: String,
        /// Free variables found, sorted.
        variables: Vec<String>,
    },
}

impl From<ExprError> for MctError {
    fn from(err: ExprError) -> Self {
        match &err {
            ExprError::Parse(parse) => MctError::Expr(
                ErrorInfo::new("expr.parse", parse.message.clone())
                    .with_context("expression", parse.expression.clone())
                    .with_context("position", parse.position.to_string()),
            ),
            ExprError::TooManyVariables {
                expression,
                variables,
            } => MctError::Expr(
                ErrorInfo::new("expr.too_many_variables", err.to_string())
                    .with_context("expression", expression.clone())
                    .with_context("variables", variables.join(",")),
            ),
        }
    }
}
