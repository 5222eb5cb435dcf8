//! Boolean update rules.
//!
//! # Syntax
//!
//! ```text
//! rule := or
//! or   := and ( '|' and )*          `||` is accepted as well
//! and  := not ( '&' not )*          `&&` is accepted as well
//! not  := '!' not | atom
//! atom := '(' or ')' | 'true' | 'false' | NAME
//! NAME := [A-Za-z_][A-Za-z0-9_]*
//! ```
//!
//! Names are resolved to [`NodeIndex`]es while parsing, so evaluation is a
//! plain walk over indices.

use bn_core::NodeIndex;

/// A parsed update rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Const(bool),
    Var(NodeIndex),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

/// Why a rule failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    Syntax(String),
    UnknownNode(String),
}

impl Expr {
    /// Parse `src`, resolving node names through `resolve`.
    pub fn parse<F>(src: &str, resolve: F) -> Result<Expr, RuleError>
    where
        F: Fn(&str) -> Option<NodeIndex>,
    {
        let mut parser = Parser { src, pos: 0, depth: 0, resolve };
        let expr = parser.or()?;
        parser.skip_ws();
        match parser.peek() {
            None => Ok(expr),
            Some(c) => Err(parser.unexpected(c)),
        }
    }

    /// Evaluate against a full state vector.
    ///
    /// Every `Var` index must be in range for `state`; rules produced by
    /// [`parse`](Self::parse) against the same network always are.
    pub fn eval(&self, state: &[bool]) -> bool {
        match self {
            Expr::Const(v) => *v,
            Expr::Var(i) => state[i.index()],
            Expr::Not(e) => !e.eval(state),
            Expr::And(a, b) => a.eval(state) && b.eval(state),
            Expr::Or(a, b) => a.eval(state) || b.eval(state),
        }
    }
}

// ── Recursive-descent parser ──────────────────────────────────────────────────

/// Deepest nesting of `!` and parentheses a rule may use.
pub const MAX_RULE_DEPTH: usize = 256;

struct Parser<'a, F> {
    src:     &'a str,
    pos:     usize,
    depth:   usize,
    resolve: F,
}

impl<F> Parser<'_, F>
where
    F: Fn(&str) -> Option<NodeIndex>,
{
    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Consume operator `c` if it is next.  `&&` and `||` count as one operator.
    fn eat(&mut self, c: u8) -> bool {
        self.skip_ws();
        if self.peek() != Some(c) {
            return false;
        }
        self.pos += 1;
        if matches!(c, b'&' | b'|') && self.peek() == Some(c) {
            self.pos += 1;
        }
        true
    }

    fn unexpected(&self, c: u8) -> RuleError {
        RuleError::Syntax(format!("unexpected {:?} at column {}", c as char, self.pos + 1))
    }

    fn or(&mut self) -> Result<Expr, RuleError> {
        let mut lhs = self.and()?;
        while self.eat(b'|') {
            let rhs = self.and()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Expr, RuleError> {
        let mut lhs = self.not()?;
        while self.eat(b'&') {
            let rhs = self.not()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn descend(&mut self) -> Result<(), RuleError> {
        self.depth += 1;
        if self.depth > MAX_RULE_DEPTH {
            return Err(RuleError::Syntax(format!(
                "nesting deeper than {MAX_RULE_DEPTH} at column {}",
                self.pos + 1
            )));
        }
        Ok(())
    }

    fn not(&mut self) -> Result<Expr, RuleError> {
        if self.eat(b'!') {
            self.descend()?;
            let inner = self.not()?;
            self.depth -= 1;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.atom()
    }

    fn atom(&mut self) -> Result<Expr, RuleError> {
        self.skip_ws();
        match self.peek() {
            Some(b'(') => {
                self.pos += 1;
                self.descend()?;
                let inner = self.or()?;
                self.depth -= 1;
                if !self.eat(b')') {
                    return Err(RuleError::Syntax(format!(
                        "expected ')' at column {}",
                        self.pos + 1
                    )));
                }
                Ok(inner)
            }
            Some(c) if c.is_ascii_alphabetic() || c == b'_' => {
                let start = self.pos;
                while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_') {
                    self.pos += 1;
                }
                // Only ASCII bytes were consumed, so both ends are char boundaries.
                let name = &self.src[start..self.pos];
                match name {
                    "true" => Ok(Expr::Const(true)),
                    "false" => Ok(Expr::Const(false)),
                    _ => (self.resolve)(name)
                        .map(Expr::Var)
                        .ok_or_else(|| RuleError::UnknownNode(name.to_string())),
                }
            }
            Some(c) => Err(self.unexpected(c)),
            None => Err(RuleError::Syntax("unexpected end of rule".to_string())),
        }
    }
}
