pub mod assignable_role;
pub mod blacklist;
pub mod reddit;
pub mod reddit_legacy;
pub mod response;

use crate::command::{CommandContext, CommandError};
use domain::argument::ResolutionError;
use domain_shared::argument::Argument;
use regex::Regex;

/// Position in a configured list, or the entry itself.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Index(i64),
    Value(String),
}

impl Entry {
    fn from_argument(argument: &Argument) -> Option<Self> {
        match argument {
            Argument::Number(_) => domain::argument::resolve_integer(argument).map(Entry::Index),
            Argument::Text(text) => Some(Entry::Value(text.clone())),
        }
    }

    /// Position of the entry in `values`, if it exists.
    fn position<'a, I>(&self, values: I) -> Option<usize>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let values: Vec<_> = values.into_iter().collect();
        match self {
            Entry::Index(index) => usize::try_from(*index)
                .ok()
                .filter(|index| *index < values.len()),
            Entry::Value(value) => values.iter().position(|candidate| *candidate == value.as_str()),
        }
    }
}

/// The first positional argument, or the first present option of `names`.
fn required_entry(context: &CommandContext, names: &[&str]) -> Result<Entry, CommandError> {
    let argument = context
        .parameters()
        .raw(names, 0)
        .ok_or(ResolutionError::MissingArgument { index: 0 })?;

    Entry::from_argument(argument)
        .ok_or_else(|| ResolutionError::NoResolution(argument.to_string()).into())
}

fn compile_pattern(pattern: &str) -> Result<Regex, CommandError> {
    Regex::new(pattern)
        .map_err(|error| CommandError::InvalidArgument(format!("Invalid pattern `{}`: {}", pattern, error)))
}

/// `r/Rust` and `rust` name the same subreddit.
fn normalize_subreddit(name: &str) -> String {
    let name = name.trim();
    let name = name
        .strip_prefix("r/")
        .or_else(|| name.strip_prefix("/r/"))
        .unwrap_or(name);
    name.to_lowercase()
}

fn validate_subreddit(name: &str) -> Result<(), CommandError> {
    let valid = (2..=21).contains(&name.len())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(CommandError::InvalidArgument(format!(
            "`{}` is not a valid subreddit name",
            name
        )))
    }
}
