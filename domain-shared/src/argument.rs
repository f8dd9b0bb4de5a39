use bigdecimal::BigDecimal;
use std::fmt;
use std::str::FromStr;

/// A single argument as it arrived from the user, before any typed resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    Text(String),
    Number(BigDecimal),
}

impl Argument {
    pub fn text(value: impl Into<String>) -> Self {
        Argument::Text(value.into())
    }

    pub fn number(value: impl Into<BigDecimal>) -> Self {
        Argument::Number(value.into())
    }

    /// Textual view of the argument. Numbers render in their canonical form.
    pub fn as_string(&self) -> Option<String> {
        match self {
            Argument::Text(text) => Some(text.clone()),
            Argument::Number(number) => Some(number.to_string()),
        }
    }

    /// Numeric view of the argument. Text only qualifies if it is a decimal literal.
    pub fn as_number(&self) -> Option<BigDecimal> {
        match self {
            Argument::Number(number) => Some(number.clone()),
            Argument::Text(text) if is_decimal_literal(text) => BigDecimal::from_str(text).ok(),
            Argument::Text(_) => None,
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Text(text) => write!(f, "\"{}\"", text),
            Argument::Number(number) => write!(f, "{}", number),
        }
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Argument::Text(value.to_string())
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Argument::Text(value)
    }
}

impl From<i64> for Argument {
    fn from(value: i64) -> Self {
        Argument::Number(BigDecimal::from(value))
    }
}

impl From<u64> for Argument {
    fn from(value: u64) -> Self {
        Argument::Number(BigDecimal::from(value))
    }
}

/// `[+-]digits[.digits]` or `[+-].digits`, no exponent and no surrounding whitespace.
pub fn is_decimal_literal(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (integral, fractional) = match unsigned.split_once('.') {
        Some((integral, fractional)) => (integral, Some(fractional)),
        None => (unsigned, None),
    };

    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());

    match fractional {
        None => !integral.is_empty() && all_digits(integral),
        Some(fractional) => {
            all_digits(integral) && all_digits(fractional) && !fractional.is_empty()
        }
    }
}
