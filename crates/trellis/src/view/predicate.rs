//! The predicate expression language.
//!
//! View templates gate elements on small boolean expressions
//! (`defined_when`, `visible_when`, `enabled_when`) evaluated against a
//! name→value scope supplied by the host. The language is deliberately tiny:
//!
//! | Syntax | Meaning |
//! |--------|---------|
//! | `name`, `object.attr` | Scope lookup (dots allowed in names) |
//! | `'text'`, `"text"` | String literal |
//! | `42`, `-1`, `2.5` | Numeric literal |
//! | `true` / `false` / `none` | Keyword literals (any capitalization) |
//! | `==  !=  <  <=  >  >=` | Comparison |
//! | `and`, `or`, `not` (also `&&`, `\|\|`, `!`) | Boolean operators |
//! | `( … )` | Grouping |
//!
//! Truthiness follows the scope value: booleans as-is, numbers non-zero,
//! strings non-empty, `none` false.
//!
//! Errors are surfaced as [`PredicateError`] so hosts can validate templates
//! up front. The engines themselves call [`passes`], which treats an empty
//! expression as `true` and maps errors to `false` with a `warn` log — a
//! broken predicate hides an element, it never brings the view down.

use std::collections::HashMap;

use trellis_core::logging::targets;

use crate::error::PredicateError;

/// A value in the evaluation scope.
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeValue {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// String value.
    Str(String),
    /// Absent value; compares equal only to itself and is never truthy.
    None,
}

impl ScopeValue {
    /// The truthiness of this value.
    pub fn is_truthy(&self) -> bool {
        match self {
            ScopeValue::Bool(b) => *b,
            ScopeValue::Int(n) => *n != 0,
            ScopeValue::Float(n) => *n != 0.0,
            ScopeValue::Str(s) => !s.is_empty(),
            ScopeValue::None => false,
        }
    }

    /// Numeric view of this value, when it has one.
    fn as_number(&self) -> Option<f64> {
        match self {
            ScopeValue::Int(n) => Some(*n as f64),
            ScopeValue::Float(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<bool> for ScopeValue {
    fn from(b: bool) -> Self {
        ScopeValue::Bool(b)
    }
}

impl From<i64> for ScopeValue {
    fn from(n: i64) -> Self {
        ScopeValue::Int(n)
    }
}

impl From<i32> for ScopeValue {
    fn from(n: i32) -> Self {
        ScopeValue::Int(n as i64)
    }
}

impl From<f64> for ScopeValue {
    fn from(n: f64) -> Self {
        ScopeValue::Float(n)
    }
}

impl From<&str> for ScopeValue {
    fn from(s: &str) -> Self {
        ScopeValue::Str(s.to_string())
    }
}

impl From<String> for ScopeValue {
    fn from(s: String) -> Self {
        ScopeValue::Str(s)
    }
}

/// The name→value scope predicates are evaluated against.
#[derive(Debug, Clone, Default)]
pub struct EvalContext {
    values: HashMap<String, ScopeValue>,
}

impl EvalContext {
    /// Create an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a name; replaces any previous binding.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ScopeValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Bind a name, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ScopeValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Look up a name.
    pub fn get(&self, name: &str) -> Option<&ScopeValue> {
        self.values.get(name)
    }
}

/// Evaluate an expression against a scope.
///
/// Returns the truthiness of the expression's value, or a
/// [`PredicateError`] for malformed expressions and unknown names.
pub fn evaluate(expression: &str, ctx: &EvalContext) -> Result<bool, PredicateError> {
    let tokens = tokenize(expression)?;
    let mut parser = Parser {
        expression,
        tokens,
        pos: 0,
    };
    let expr = parser.parse_expression()?;
    parser.expect_end()?;
    Ok(eval(&expr, ctx, expression)?.is_truthy())
}

/// The gate used by the engines: empty expressions pass, broken ones fail
/// closed.
///
/// Evaluation errors are logged at `warn` and treated as `false` — the
/// element simply does not appear.
pub fn passes(expression: &str, ctx: &EvalContext) -> bool {
    if expression.trim().is_empty() {
        return true;
    }
    match evaluate(expression, ctx) {
        Ok(result) => result,
        Err(err) => {
            tracing::warn!(
                target: targets::PREDICATE,
                expression,
                error = %err,
                "predicate failed to evaluate, treating as false"
            );
            false
        }
    }
}

// =============================================================================
// Lexer
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Int(i64),
    Float(f64),
    True,
    False,
    None,
    And,
    Or,
    Not,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    LParen,
    RParen,
}

fn tokenize(expression: &str) -> Result<Vec<(usize, Token)>, PredicateError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = expression.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let start = i;
        let ch = chars[i];
        match ch {
            c if c.is_whitespace() => {
                i += 1;
            }
            '(' => {
                tokens.push((start, Token::LParen));
                i += 1;
            }
            ')' => {
                tokens.push((start, Token::RParen));
                i += 1;
            }
            '=' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push((start, Token::Eq));
                    i += 2;
                } else {
                    return Err(PredicateError::parse(
                        expression,
                        start,
                        "'=' is not an operator, use '=='",
                    ));
                }
            }
            '!' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push((start, Token::Ne));
                    i += 2;
                } else {
                    tokens.push((start, Token::Not));
                    i += 1;
                }
            }
            '<' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push((start, Token::Le));
                    i += 2;
                } else {
                    tokens.push((start, Token::Lt));
                    i += 1;
                }
            }
            '>' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push((start, Token::Ge));
                    i += 2;
                } else {
                    tokens.push((start, Token::Gt));
                    i += 1;
                }
            }
            '&' => {
                if chars.get(i + 1) == Some(&'&') {
                    tokens.push((start, Token::And));
                    i += 2;
                } else {
                    return Err(PredicateError::parse(expression, start, "expected '&&'"));
                }
            }
            '|' => {
                if chars.get(i + 1) == Some(&'|') {
                    tokens.push((start, Token::Or));
                    i += 2;
                } else {
                    return Err(PredicateError::parse(expression, start, "expected '||'"));
                }
            }
            '\'' | '"' => {
                let quote = ch;
                i += 1;
                let mut text = String::new();
                loop {
                    match chars.get(i) {
                        Some(&c) if c == quote => {
                            i += 1;
                            break;
                        }
                        Some(&c) => {
                            text.push(c);
                            i += 1;
                        }
                        None => {
                            return Err(PredicateError::parse(
                                expression,
                                start,
                                "unterminated string literal",
                            ));
                        }
                    }
                }
                tokens.push((start, Token::Str(text)));
            }
            c if c.is_ascii_digit()
                || (c == '-' && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit())) =>
            {
                let mut text = String::new();
                if c == '-' {
                    text.push('-');
                    i += 1;
                }
                let mut is_float = false;
                while let Some(&c) = chars.get(i) {
                    if c.is_ascii_digit() {
                        text.push(c);
                        i += 1;
                    } else if c == '.' && !is_float
                        && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit())
                    {
                        is_float = true;
                        text.push(c);
                        i += 1;
                    } else {
                        break;
                    }
                }
                let token = if is_float {
                    Token::Float(text.parse().map_err(|_| {
                        PredicateError::parse(expression, start, "invalid number")
                    })?)
                } else {
                    Token::Int(text.parse().map_err(|_| {
                        PredicateError::parse(expression, start, "invalid number")
                    })?)
                };
                tokens.push((start, token));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut word = String::new();
                while let Some(&c) = chars.get(i) {
                    if c.is_alphanumeric() || c == '_' || c == '.' {
                        word.push(c);
                        i += 1;
                    } else {
                        break;
                    }
                }
                let token = match word.to_ascii_lowercase().as_str() {
                    "and" => Token::And,
                    "or" => Token::Or,
                    "not" => Token::Not,
                    "true" => Token::True,
                    "false" => Token::False,
                    "none" => Token::None,
                    _ => Token::Ident(word),
                };
                tokens.push((start, token));
            }
            _ => {
                return Err(PredicateError::parse(
                    expression,
                    start,
                    format!("unexpected character '{ch}'"),
                ));
            }
        }
    }

    Ok(tokens)
}

// =============================================================================
// Parser
// =============================================================================

#[derive(Debug, Clone)]
enum Expr {
    Literal(ScopeValue),
    Name(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Compare(Box<Expr>, CmpOp, Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

struct Parser<'a> {
    expression: &'a str,
    tokens: Vec<(usize, Token)>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(_, t)| t.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn error_here(&self, message: impl Into<String>) -> PredicateError {
        let position = self
            .tokens
            .get(self.pos)
            .map(|(p, _)| *p)
            .unwrap_or(self.expression.len());
        PredicateError::parse(self.expression, position, message)
    }

    fn expect_end(&self) -> Result<(), PredicateError> {
        if self.pos == self.tokens.len() {
            Ok(())
        } else {
            Err(self.error_here("unexpected trailing input"))
        }
    }

    /// expr := and_expr ( OR and_expr )*
    fn parse_expression(&mut self) -> Result<Expr, PredicateError> {
        let mut left = self.parse_and()?;
        while self.peek() == Some(&Token::Or) {
            self.advance();
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    /// and_expr := not_expr ( AND not_expr )*
    fn parse_and(&mut self) -> Result<Expr, PredicateError> {
        let mut left = self.parse_not()?;
        while self.peek() == Some(&Token::And) {
            self.advance();
            let right = self.parse_not()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    /// not_expr := NOT not_expr | comparison
    fn parse_not(&mut self) -> Result<Expr, PredicateError> {
        if self.peek() == Some(&Token::Not) {
            self.advance();
            let inner = self.parse_not()?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_comparison()
    }

    /// comparison := primary ( cmp_op primary )?
    fn parse_comparison(&mut self) -> Result<Expr, PredicateError> {
        let left = self.parse_primary()?;
        let op = match self.peek() {
            Some(Token::Eq) => CmpOp::Eq,
            Some(Token::Ne) => CmpOp::Ne,
            Some(Token::Lt) => CmpOp::Lt,
            Some(Token::Le) => CmpOp::Le,
            Some(Token::Gt) => CmpOp::Gt,
            Some(Token::Ge) => CmpOp::Ge,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.parse_primary()?;
        Ok(Expr::Compare(Box::new(left), op, Box::new(right)))
    }

    /// primary := literal | ident | '(' expr ')'
    fn parse_primary(&mut self) -> Result<Expr, PredicateError> {
        match self.advance() {
            Some(Token::True) => Ok(Expr::Literal(ScopeValue::Bool(true))),
            Some(Token::False) => Ok(Expr::Literal(ScopeValue::Bool(false))),
            Some(Token::None) => Ok(Expr::Literal(ScopeValue::None)),
            Some(Token::Int(n)) => Ok(Expr::Literal(ScopeValue::Int(n))),
            Some(Token::Float(n)) => Ok(Expr::Literal(ScopeValue::Float(n))),
            Some(Token::Str(s)) => Ok(Expr::Literal(ScopeValue::Str(s))),
            Some(Token::Ident(name)) => Ok(Expr::Name(name)),
            Some(Token::LParen) => {
                let inner = self.parse_expression()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    _ => {
                        self.pos = self.pos.saturating_sub(1);
                        Err(self.error_here("expected ')'"))
                    }
                }
            }
            _ => {
                self.pos = self.pos.saturating_sub(1);
                Err(self.error_here("expected a value"))
            }
        }
    }
}

// =============================================================================
// Evaluation
// =============================================================================

fn eval(expr: &Expr, ctx: &EvalContext, expression: &str) -> Result<ScopeValue, PredicateError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Name(name) => ctx.get(name).cloned().ok_or_else(|| {
            PredicateError::eval(expression, format!("unknown name '{name}'"))
        }),
        Expr::Not(inner) => Ok(ScopeValue::Bool(
            !eval(inner, ctx, expression)?.is_truthy(),
        )),
        Expr::And(left, right) => {
            // Short-circuit like the boolean operators users expect.
            if !eval(left, ctx, expression)?.is_truthy() {
                return Ok(ScopeValue::Bool(false));
            }
            Ok(ScopeValue::Bool(eval(right, ctx, expression)?.is_truthy()))
        }
        Expr::Or(left, right) => {
            if eval(left, ctx, expression)?.is_truthy() {
                return Ok(ScopeValue::Bool(true));
            }
            Ok(ScopeValue::Bool(eval(right, ctx, expression)?.is_truthy()))
        }
        Expr::Compare(left, op, right) => {
            let a = eval(left, ctx, expression)?;
            let b = eval(right, ctx, expression)?;
            compare(*op, &a, &b, expression).map(ScopeValue::Bool)
        }
    }
}

fn compare(
    op: CmpOp,
    a: &ScopeValue,
    b: &ScopeValue,
    expression: &str,
) -> Result<bool, PredicateError> {
    match op {
        CmpOp::Eq => Ok(values_equal(a, b)),
        CmpOp::Ne => Ok(!values_equal(a, b)),
        CmpOp::Lt | CmpOp::Le | CmpOp::Gt | CmpOp::Ge => {
            let ordering = if let (Some(x), Some(y)) = (a.as_number(), b.as_number()) {
                x.partial_cmp(&y)
            } else if let (ScopeValue::Str(x), ScopeValue::Str(y)) = (a, b) {
                Some(x.cmp(y))
            } else {
                return Err(PredicateError::eval(
                    expression,
                    format!("cannot order {a:?} against {b:?}"),
                ));
            };
            let Some(ordering) = ordering else {
                return Ok(false);
            };
            Ok(match op {
                CmpOp::Lt => ordering.is_lt(),
                CmpOp::Le => ordering.is_le(),
                CmpOp::Gt => ordering.is_gt(),
                CmpOp::Ge => ordering.is_ge(),
                CmpOp::Eq | CmpOp::Ne => unreachable!(),
            })
        }
    }
}

/// Equality across scope values: numerics compare numerically, mismatched
/// kinds are simply unequal.
fn values_equal(a: &ScopeValue, b: &ScopeValue) -> bool {
    if let (Some(x), Some(y)) = (a.as_number(), b.as_number()) {
        return x == y;
    }
    match (a, b) {
        (ScopeValue::Str(x), ScopeValue::Str(y)) => x == y,
        (ScopeValue::Bool(x), ScopeValue::Bool(y)) => x == y,
        (ScopeValue::None, ScopeValue::None) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> EvalContext {
        EvalContext::new()
            .with("mode", "simple")
            .with("count", 3)
            .with("ratio", 0.5)
            .with("enabled", true)
            .with("object.selection", ScopeValue::None)
    }

    #[test]
    fn test_empty_expression_passes() {
        assert!(passes("", &ctx()));
        assert!(passes("   ", &ctx()));
    }

    #[test]
    fn test_name_truthiness() {
        assert!(evaluate("enabled", &ctx()).unwrap());
        assert!(evaluate("count", &ctx()).unwrap());
        assert!(!evaluate("object.selection", &ctx()).unwrap());
    }

    #[test]
    fn test_comparisons() {
        let ctx = ctx();
        assert!(evaluate("mode == 'simple'", &ctx).unwrap());
        assert!(evaluate("mode != \"custom\"", &ctx).unwrap());
        assert!(evaluate("count >= 3", &ctx).unwrap());
        assert!(evaluate("count < 4", &ctx).unwrap());
        assert!(evaluate("ratio > 0.4", &ctx).unwrap());
        // Integers and floats compare numerically.
        assert!(evaluate("count == 3.0", &ctx).unwrap());
    }

    #[test]
    fn test_boolean_operators() {
        let ctx = ctx();
        assert!(evaluate("enabled and count > 0", &ctx).unwrap());
        assert!(evaluate("not enabled or count == 3", &ctx).unwrap());
        assert!(evaluate("enabled && (count > 5 || ratio < 1)", &ctx).unwrap());
        assert!(!evaluate("!enabled", &ctx).unwrap());
    }

    #[test]
    fn test_none_literal() {
        let ctx = ctx();
        assert!(evaluate("object.selection == none", &ctx).unwrap());
        assert!(evaluate("mode != None", &ctx).unwrap());
    }

    #[test]
    fn test_negative_numbers() {
        let ctx = ctx();
        assert!(evaluate("count > -1", &ctx).unwrap());
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        let err = evaluate("missing", &ctx()).unwrap_err();
        assert!(matches!(err, PredicateError::Eval { .. }));
        // …and passes() fails closed.
        assert!(!passes("missing", &ctx()));
    }

    #[test]
    fn test_parse_errors() {
        let ctx = ctx();
        assert!(matches!(
            evaluate("mode = 'simple'", &ctx),
            Err(PredicateError::Parse { .. })
        ));
        assert!(matches!(
            evaluate("(count > 1", &ctx),
            Err(PredicateError::Parse { .. })
        ));
        assert!(matches!(
            evaluate("mode == 'unterminated", &ctx),
            Err(PredicateError::Parse { .. })
        ));
        assert!(!passes("count >", &ctx));
    }

    #[test]
    fn test_type_mismatch_ordering_is_an_error() {
        assert!(matches!(
            evaluate("mode > 3", &ctx()),
            Err(PredicateError::Eval { .. })
        ));
    }

    #[test]
    fn test_cross_type_equality_is_false_not_an_error() {
        let ctx = ctx();
        assert!(!evaluate("mode == 3", &ctx).unwrap());
        assert!(evaluate("mode != 3", &ctx).unwrap());
    }
}
