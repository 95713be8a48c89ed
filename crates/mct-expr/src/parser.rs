use crate::ast::{BinOp, Constant, Expr, Func};
use crate::error::ParseError;
use crate::lexer::{tokenize, Token, TokenKind};

/// Deepest tree the parser builds: nested groups, unary signs, exponents and
/// links of one `+`/`*` chain all count.
pub const MAX_DEPTH: usize = 256;

/// Parses an arithmetic expression.
///
/// Grammar, loosest binding first:
///
/// ```text
/// sum     := product (('+' | '-') product)*
/// product := unary (('*' | '/') unary)*
/// unary   := ('+' | '-') unary | power
/// power   := atom (('^' | '**') unary)?
/// atom    := number | name | name '(' sum (',' sum)* ')' | '(' sum ')'
/// ```
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(ParseError::new(source, 0, "empty expression"));
    }
    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.sum()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(ParseError::new(
            source,
            token.position,
            "unexpected trailing input",
        )),
    }
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|token| &token.kind)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn end_position(&self) -> usize {
        self.source.len()
    }

    fn error_here(&self, message: impl Into<String>) -> ParseError {
        let position = self
            .peek()
            .map(|token| token.position)
            .unwrap_or_else(|| self.end_position());
        ParseError::new(self.source, position, message)
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<(), ParseError> {
        match self.peek_kind() {
            Some(found) if *found == kind => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(self.error_here(format!("expected {what}"))),
        }
    }

    fn descend(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error_here("expression nested too deeply"));
        }
        Ok(())
    }

    fn sum(&mut self) -> Result<Expr, ParseError> {
        let depth = self.depth;
        let mut lhs = self.product()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => BinOp::Add,
                Some(TokenKind::Minus) => BinOp::Sub,
                _ => break,
            };
            self.pos += 1;
            self.descend()?;
            let rhs = self.product()?;
            lhs = binary(op, lhs, rhs);
        }
        self.depth = depth;
        Ok(lhs)
    }

    fn product(&mut self) -> Result<Expr, ParseError> {
        let depth = self.depth;
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Star) => BinOp::Mul,
                Some(TokenKind::Slash) => BinOp::Div,
                _ => break,
            };
            self.pos += 1;
            self.descend()?;
            let rhs = self.unary()?;
            lhs = binary(op, lhs, rhs);
        }
        self.depth = depth;
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        self.descend()?;
        let expr = match self.peek_kind() {
            Some(TokenKind::Minus) => {
                self.pos += 1;
                Expr::Neg(Box::new(self.unary()?))
            }
            Some(TokenKind::Plus) => {
                self.pos += 1;
                self.unary()?
            }
            _ => self.power()?,
        };
        self.depth -= 1;
        Ok(expr)
    }

    fn power(&mut self) -> Result<Expr, ParseError> {
        let base = self.atom()?;
        if let Some(TokenKind::Caret) = self.peek_kind() {
            self.pos += 1;
            let exponent = self.unary()?;
            return Ok(binary(BinOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Expr, ParseError> {
        let Some(token) = self.next() else {
            return Err(self.error_here("unexpected end of expression"));
        };
        match token.kind {
            TokenKind::Number(value) => Ok(Expr::Num(value)),
            TokenKind::LParen => {
                let inner = self.sum()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::Ident(name) => {
                if let Some(TokenKind::LParen) = self.peek_kind() {
                    let func = Func::lookup(&name).ok_or_else(|| {
                        ParseError::new(
                            self.source,
                            token.position,
                            format!("unknown function '{name}'"),
                        )
                    })?;
                    self.pos += 1;
                    let args = self.arguments()?;
                    let (min, max) = func.arity();
                    if args.len() < min || args.len() > max {
                        return Err(ParseError::new(
                            self.source,
                            token.position,
                            format!("'{name}' takes {min}..={max} arguments, got {}", args.len()),
                        ));
                    }
                    Ok(Expr::Call { func, args })
                } else if let Some(constant) = Constant::lookup(&name) {
                    Ok(Expr::Const(constant))
                } else if Func::lookup(&name).is_some() {
                    Err(ParseError::new(
                        self.source,
                        token.position,
                        format!("function '{name}' used without arguments"),
                    ))
                } else {
                    Ok(Expr::Var(name))
                }
            }
            _ => Err(ParseError::new(
                self.source,
                token.position,
                "expected a number, name or '('",
            )),
        }
    }

    fn arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = vec![self.sum()?];
        while let Some(TokenKind::Comma) = self.peek_kind() {
            self.pos += 1;
            args.push(self.sum()?);
        }
        self.expect(TokenKind::RParen, "')' after arguments")?;
        Ok(args)
    }
}

fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}
