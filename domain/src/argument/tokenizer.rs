use bigdecimal::BigDecimal;
use domain_shared::argument::{is_decimal_literal, Argument};
use std::str::FromStr;
use tracing::instrument;

/// A prefixed text message split into a qualified command name and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedCommand {
    pub qualified_name: String,
    pub arguments: Vec<Argument>,
}

struct Token {
    value: String,
    quoted: bool,
}

/// Returns `None` when the message does not start with `prefix` or names no command.
///
/// Arguments are split on whitespace. Double quotes group words into one text
/// argument, unquoted decimal literals become numbers.
#[instrument(level = "trace")]
pub fn tokenize(content: &str, prefix: &str) -> Option<TokenizedCommand> {
    let body = content.strip_prefix(prefix)?;
    let mut tokens = split(body).into_iter();

    let name = tokens.next().filter(|token| !token.quoted)?;
    let arguments = tokens.map(into_argument).collect();

    Some(TokenizedCommand {
        qualified_name: name.value.to_lowercase(),
        arguments,
    })
}

fn split(body: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut in_quotes = false;

    for c in body.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if quoted || !current.is_empty() {
                    tokens.push(Token {
                        value: std::mem::take(&mut current),
                        quoted,
                    });
                }
                quoted = false;
            }
            c => current.push(c),
        }
    }

    if quoted || !current.is_empty() {
        tokens.push(Token {
            value: current,
            quoted,
        });
    }

    tokens
}

fn into_argument(token: Token) -> Argument {
    if !token.quoted && is_decimal_literal(&token.value) {
        if let Ok(number) = BigDecimal::from_str(&token.value) {
            return Argument::Number(number);
        }
    }
    Argument::Text(token.value)
}
