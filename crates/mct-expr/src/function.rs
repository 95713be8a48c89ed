use std::fmt;

use crate::ast::Expr;
use crate::error::ExprError;
use crate::parser::parse;

/// Name used for the bound variable of constant functions.
pub const DEFAULT_VARIABLE: &str = "x";

/// A real function of at most one variable, parsed from source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    source: String,
    expr: Expr,
    variable: String,
}

impl Function {
    /// Parses `source` and checks it has at most one free variable.
    pub fn parse(source: &str) -> Result<Self, ExprError> {
        let expr = parse(source)?;
        let variables = expr.free_variables();
        if variables.len() > 1 {
            return Err(ExprError::TooManyVariables {
                expression: source.to_string(),
                variables: variables.into_iter().collect(),
            });
        }
        let variable = variables
            .into_iter()
            .next()
            .unwrap_or_else(|| DEFAULT_VARIABLE.to_string());
        Ok(Self {
            source: source.to_string(),
            expr,
            variable,
        })
    }

    /// Evaluates the function at `x`.
    pub fn eval(&self, x: f64) -> f64 {
        self.expr.eval(x)
    }

    /// Source text as supplied.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parsed tree.
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Name of the bound variable (`x` when the expression is constant).
    pub fn variable(&self) -> &str {
        &self.variable
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}
