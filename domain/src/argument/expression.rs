use bigdecimal::{BigDecimal, One, ToPrimitive, Zero};
use std::str::FromStr;
use thiserror::Error;
use tracing::instrument;

const MAX_EXPONENT: i64 = 256;
const MAX_DIGITS: u64 = 1000;
const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    #[error("Unexpected character '{0}'")]
    UnexpectedCharacter(char),
    #[error("Unexpected end of expression")]
    UnexpectedEnd,
    #[error("Invalid number {0}")]
    InvalidNumber(String),
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Unsupported exponent {0}")]
    UnsupportedExponent(String),
    #[error("The result would have more than {MAX_DIGITS} digits")]
    ResultTooLarge,
    #[error("Parentheses and signs are nested more than {MAX_DEPTH} levels deep")]
    NestedTooDeeply,
}

/// Evaluates `+ - * / ^` with parentheses and unary signs on exact decimals.
///
/// `^` binds tighter than unary minus and is right associative, so `-2^2` is `-4`
/// and `2^3^2` is `2^9`.
///
/// Results are capped at [`MAX_DIGITS`] digits and nesting at [`MAX_DEPTH`] levels.
#[instrument(level = "debug", err)]
pub fn evaluate(expression: &str) -> Result<BigDecimal, ExpressionError> {
    let mut parser = Parser {
        chars: expression.chars().collect(),
        position: 0,
        depth: 0,
    };

    let value = parser.sum()?;
    match parser.peek() {
        Some(c) => Err(ExpressionError::UnexpectedCharacter(c)),
        None => Ok(value),
    }
}

struct Parser {
    chars: Vec<char>,
    position: usize,
    depth: usize,
}

impl Parser {
    fn current(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn peek(&mut self) -> Option<char> {
        while self.current().is_some_and(char::is_whitespace) {
            self.position += 1;
        }
        self.current()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn sum(&mut self) -> Result<BigDecimal, ExpressionError> {
        let mut value = self.product()?;
        while let Some(operator @ ('+' | '-')) = self.peek() {
            self.advance();
            let rhs = self.product()?;
            value = if operator == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn product(&mut self) -> Result<BigDecimal, ExpressionError> {
        let mut value = self.unary()?;
        while let Some(operator @ ('*' | '/')) = self.peek() {
            self.advance();
            let rhs = self.unary()?;
            value = if operator == '*' {
                multiply(value, rhs)?
            } else {
                divide(value, rhs)?
            };
        }
        Ok(value)
    }

    // Every recursive descent passes through here.
    fn unary(&mut self) -> Result<BigDecimal, ExpressionError> {
        if self.depth >= MAX_DEPTH {
            return Err(ExpressionError::NestedTooDeeply);
        }
        self.depth += 1;
        let value = self.signed();
        self.depth -= 1;
        value
    }

    fn signed(&mut self) -> Result<BigDecimal, ExpressionError> {
        match self.peek() {
            Some('-') => {
                self.advance();
                Ok(-self.unary()?)
            }
            Some('+') => {
                self.advance();
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<BigDecimal, ExpressionError> {
        let base = self.primary()?;
        if self.peek() != Some('^') {
            return Ok(base);
        }
        self.advance();
        let exponent = self.unary()?;
        power(base, exponent)
    }

    fn primary(&mut self) -> Result<BigDecimal, ExpressionError> {
        match self.peek() {
            None => Err(ExpressionError::UnexpectedEnd),
            Some('(') => {
                self.advance();
                let value = self.sum()?;
                match self.peek() {
                    Some(')') => {
                        self.advance();
                        Ok(value)
                    }
                    Some(c) => Err(ExpressionError::UnexpectedCharacter(c)),
                    None => Err(ExpressionError::UnexpectedEnd),
                }
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(c) => Err(ExpressionError::UnexpectedCharacter(c)),
        }
    }

    fn number(&mut self) -> Result<BigDecimal, ExpressionError> {
        let start = self.position;
        while let Some(c) = self.current() {
            if !(c.is_ascii_digit() || c == '.') {
                break;
            }
            self.advance();
        }

        let literal: String = self.chars[start..self.position].iter().collect();
        BigDecimal::from_str(&literal).map_err(|_| ExpressionError::InvalidNumber(literal))
    }
}

fn divide(lhs: BigDecimal, rhs: BigDecimal) -> Result<BigDecimal, ExpressionError> {
    if rhs.is_zero() {
        return Err(ExpressionError::DivisionByZero);
    }
    Ok(lhs / rhs)
}

fn multiply(lhs: BigDecimal, rhs: BigDecimal) -> Result<BigDecimal, ExpressionError> {
    if lhs.digits() + rhs.digits() > MAX_DIGITS {
        return Err(ExpressionError::ResultTooLarge);
    }
    Ok(lhs * rhs)
}

fn power(base: BigDecimal, exponent: BigDecimal) -> Result<BigDecimal, ExpressionError> {
    let steps = exponent
        .is_integer()
        .then(|| exponent.to_i64())
        .flatten()
        .filter(|steps| steps.abs() <= MAX_EXPONENT)
        .ok_or_else(|| ExpressionError::UnsupportedExponent(exponent.to_string()))?;

    if !base.is_zero() && base.digits().saturating_mul(steps.unsigned_abs()) > MAX_DIGITS {
        return Err(ExpressionError::ResultTooLarge);
    }

    let mut result = BigDecimal::one();
    for _ in 0..steps.abs() {
        result *= &base;
    }

    if steps < 0 {
        divide(BigDecimal::one(), result)
    } else {
        Ok(result)
    }
}
