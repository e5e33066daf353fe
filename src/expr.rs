//! Default-value expressions.
//!
//! A default is a string with `$NAME` environment interpolation. `$$` is a
//! literal `$`. Substitution is a single pass; substituted text is never
//! re-scanned.
//!
//! For numeric fields an unset or empty variable substitutes as `0`, and the
//! substituted string is then evaluated as arithmetic (`+ - * / %`, unary
//! sign, parentheses) and reformatted as an integer or float literal.
//!
//! Lookups go through [`Environment`] or a closure so tests can pass
//! synthetic variables instead of touching the process environment.

use std::collections::HashMap;

use crate::error::ExprError;
use crate::kind::Kind;

const ESCAPE: char = '$';

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Where `$NAME` references are looked up.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Environment {
    /// The process environment, read at resolution time.
    #[default]
    Process,
    /// A fixed set of variables; anything else is unset.
    Fixed(HashMap<String, String>),
}

impl Environment {
    pub fn fixed<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Environment::Fixed(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn get(&self, name: &str) -> Option<String> {
        match self {
            Environment::Process => std::env::var(name).ok(),
            Environment::Fixed(vars) => vars.get(name).cloned(),
        }
    }
}

/// Interpolate `$NAME` references using `lookup`.
pub fn interpolate_with<F>(expr: &str, numeric: bool, lookup: F) -> Result<String, ExprError>
where
    F: Fn(&str) -> Option<String>,
{
    let malformed = || ExprError::Malformed {
        expr: expr.to_string(),
    };
    let substitute = |name: &str, out: &mut String| {
        let value = lookup(name).unwrap_or_default();
        if value.is_empty() && numeric {
            out.push('0');
        } else {
            out.push_str(&value);
        }
    };

    let mut out = String::with_capacity(expr.len());
    let mut name = String::new();
    let mut escaping = false;
    let mut chars = expr.chars().peekable();

    while let Some(c) = chars.next() {
        let at_end = chars.peek().is_none();
        if c == ESCAPE {
            if escaping && name.is_empty() {
                out.push(ESCAPE);
                escaping = false;
                continue;
            }
            if escaping {
                substitute(&name, &mut out);
                name.clear();
            }
            if at_end {
                return Err(malformed());
            }
            escaping = true;
            continue;
        }

        if !escaping {
            out.push(c);
            continue;
        }

        if is_word_char(c) {
            name.push(c);
            if at_end {
                substitute(&name, &mut out);
            }
        } else {
            if name.is_empty() {
                return Err(malformed());
            }
            substitute(&name, &mut out);
            out.push(c);
            name.clear();
            escaping = false;
        }
    }

    Ok(out)
}

/// Resolve a default expression for a field of `kind` against `env`.
pub fn resolve(expr: &str, kind: &Kind, env: &Environment) -> Result<String, ExprError> {
    resolve_with(expr, kind, |name| env.get(name))
}

/// Resolve a default expression for a field of `kind` using `lookup`.
///
/// Non-numeric kinds get plain interpolation. Integer kinds evaluate the
/// arithmetic and truncate toward zero; float kinds format with six decimals.
/// Integer results are never clamped to the field's width, so an
/// out-of-range default fails later as an overflow.
pub fn resolve_with<F>(expr: &str, kind: &Kind, lookup: F) -> Result<String, ExprError>
where
    F: Fn(&str) -> Option<String>,
{
    let numeric = kind.is_numeric();
    let substituted = interpolate_with(expr, numeric, lookup)?;
    tracing::trace!(expr, %substituted, "interpolated default expression");
    if !numeric {
        return Ok(substituted);
    }

    match evaluate_number(&substituted)? {
        Number::Int(n) if kind.is_integer() => Ok(n.to_string()),
        Number::Float(f) if kind.is_integer() => {
            if !f.is_finite() {
                return Err(ExprError::Evaluation {
                    expr: substituted,
                    reason: "result is not a finite number".into(),
                });
            }
            // unclamped, so the coercer reports out-of-range values
            let truncated = f.trunc();
            if truncated == 0.0 {
                Ok("0".to_string())
            } else {
                Ok(format!("{truncated:.0}"))
            }
        }
        number => Ok(format!("{:.6}", number.as_f64())),
    }
}

/// Evaluate an arithmetic expression.
pub fn evaluate(expr: &str) -> Result<f64, ExprError> {
    evaluate_number(expr).map(Number::as_f64)
}

fn evaluate_number(expr: &str) -> Result<Number, ExprError> {
    let mut parser = Arith {
        src: expr,
        chars: expr.char_indices().peekable(),
    };
    let value = parser.expression()?;
    parser.skip_whitespace();
    match parser.chars.peek() {
        None => Ok(value),
        Some(&(pos, c)) => Err(parser.error(format!("unexpected '{c}' at offset {pos}"))),
    }
}

/// Integers stay exact until an operation leaves the integers or overflows
/// `i128`; from then on the value is a float.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Number {
    Int(i128),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(f) => f,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Number::Int(n) => n == 0,
            Number::Float(f) => f == 0.0,
        }
    }

    fn combine(
        self,
        rhs: Number,
        exact: fn(i128, i128) -> Option<i128>,
        float: fn(f64, f64) -> f64,
    ) -> Number {
        if let (Number::Int(a), Number::Int(b)) = (self, rhs)
            && let Some(n) = exact(a, b)
        {
            return Number::Int(n);
        }
        Number::Float(float(self.as_f64(), rhs.as_f64()))
    }

    fn add(self, rhs: Number) -> Number {
        self.combine(rhs, i128::checked_add, |a, b| a + b)
    }

    fn sub(self, rhs: Number) -> Number {
        self.combine(rhs, i128::checked_sub, |a, b| a - b)
    }

    fn mul(self, rhs: Number) -> Number {
        self.combine(rhs, i128::checked_mul, |a, b| a * b)
    }

    fn div(self, rhs: Number) -> Number {
        self.combine(
            rhs,
            |a, b| match a.checked_rem(b) {
                Some(0) => a.checked_div(b),
                _ => None,
            },
            |a, b| a / b,
        )
    }

    fn rem(self, rhs: Number) -> Number {
        self.combine(rhs, i128::checked_rem, |a, b| a % b)
    }

    fn neg(self) -> Number {
        match self {
            Number::Int(n) => n
                .checked_neg()
                .map_or(Number::Float(-(n as f64)), Number::Int),
            Number::Float(f) => Number::Float(-f),
        }
    }
}

/// Recursive-descent evaluator:
///
/// ```text
/// expression := term (('+' | '-') term)*
/// term       := unary (('*' | '/' | '%') unary)*
/// unary      := ('+' | '-') unary | primary
/// primary    := number | '(' expression ')'
/// ```
struct Arith<'a> {
    src: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl Arith<'_> {
    fn error(&self, reason: impl Into<String>) -> ExprError {
        ExprError::Evaluation {
            expr: self.src.to_string(),
            reason: reason.into(),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        self.chars.next_if(|&(_, c)| c == expected).is_some()
    }

    fn expression(&mut self) -> Result<Number, ExprError> {
        let mut acc = self.term()?;
        loop {
            if self.eat('+') {
                acc = acc.add(self.term()?);
            } else if self.eat('-') {
                acc = acc.sub(self.term()?);
            } else {
                return Ok(acc);
            }
        }
    }

    fn term(&mut self) -> Result<Number, ExprError> {
        let mut acc = self.unary()?;
        loop {
            if self.eat('*') {
                acc = acc.mul(self.unary()?);
            } else if self.eat('/') {
                let rhs = self.unary()?;
                if rhs.is_zero() {
                    return Err(self.error("division by zero"));
                }
                acc = acc.div(rhs);
            } else if self.eat('%') {
                let rhs = self.unary()?;
                if rhs.is_zero() {
                    return Err(self.error("modulo by zero"));
                }
                acc = acc.rem(rhs);
            } else {
                return Ok(acc);
            }
        }
    }

    fn unary(&mut self) -> Result<Number, ExprError> {
        if self.eat('-') {
            return Ok(self.unary()?.neg());
        }
        if self.eat('+') {
            return self.unary();
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Number, ExprError> {
        if self.eat('(') {
            let value = self.expression()?;
            if !self.eat(')') {
                return Err(self.error("missing ')'"));
            }
            return Ok(value);
        }
        self.skip_whitespace();
        self.number()
    }

    fn number(&mut self) -> Result<Number, ExprError> {
        let Some(&(start, _)) = self.chars.peek() else {
            return Err(self.error("unexpected end of expression"));
        };
        let mut end = start;
        let mut prev = '\0';
        while let Some(&(pos, c)) = self.chars.peek() {
            let exponent_sign = (c == '+' || c == '-') && matches!(prev, 'e' | 'E');
            if c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || exponent_sign {
                end = pos + c.len_utf8();
                prev = c;
                self.chars.next();
            } else {
                break;
            }
        }
        let src = self.src;
        let literal = &src[start..end];
        if literal.is_empty() {
            return Err(self.error(format!("expected a number at offset {start}")));
        }
        if let Ok(n) = literal.parse::<i128>() {
            return Ok(Number::Int(n));
        }
        literal
            .parse::<f64>()
            .map(Number::Float)
            .map_err(|_| self.error(format!("invalid number '{literal}'")))
    }
}
