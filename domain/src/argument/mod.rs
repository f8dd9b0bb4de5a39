mod expression;
mod resolver;
mod tokenizer;

pub use expression::{evaluate, ExpressionError};
pub use resolver::{
    resolve_channel, resolve_date, resolve_decimal, resolve_enum, resolve_expression,
    resolve_integer, resolve_rank, resolve_role, resolve_string, resolve_time_unit, resolve_user,
    NamedVariant, TimeUnit,
};
pub use tokenizer::{tokenize, TokenizedCommand};

use domain_shared::argument::Argument;
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("Could not resolve argument {0}")]
    NoResolution(String),
    #[error("Missing argument at position {}", index + 1)]
    MissingArgument { index: usize },
}

/// Declared position of a parameter and whether it may be left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    pub index: usize,
    pub use_default: bool,
}

impl Parameter {
    pub const fn required(index: usize) -> Self {
        Self {
            index,
            use_default: false,
        }
    }

    pub const fn with_default(index: usize) -> Self {
        Self {
            index,
            use_default: true,
        }
    }

    #[instrument(level = "trace", skip(self, arguments, resolver))]
    pub fn resolve<T, F>(
        &self,
        arguments: &[Argument],
        resolver: F,
    ) -> Result<Option<T>, ResolutionError>
    where
        F: Fn(&Argument) -> Option<T>,
    {
        if self.index >= arguments.len() && !self.use_default {
            return Err(ResolutionError::MissingArgument { index: self.index });
        }

        resolve_optional(arguments, self.index, resolver)
    }
}

/// Lifts a resolver into the failing form used by the list-level operations.
pub fn required<T, F>(resolver: F) -> impl Fn(&Argument) -> Result<T, ResolutionError>
where
    F: Fn(&Argument) -> Option<T>,
{
    move |argument| {
        resolver(argument).ok_or_else(|| ResolutionError::NoResolution(argument.to_string()))
    }
}

/// Resolves the argument at `index`. Out of range is `Ok(None)`, never an error.
pub fn resolve_optional<T, F>(
    arguments: &[Argument],
    index: usize,
    resolver: F,
) -> Result<Option<T>, ResolutionError>
where
    F: Fn(&Argument) -> Option<T>,
{
    match arguments.get(index) {
        None => Ok(None),
        Some(argument) => required(resolver)(argument).map(Some),
    }
}

/// Resolves every argument in order. The first failure aborts with no partial result.
pub fn resolve_many<T, F>(arguments: &[Argument], resolver: F) -> Result<Vec<T>, ResolutionError>
where
    F: Fn(&Argument) -> Option<T>,
{
    let resolver = required(resolver);
    arguments.iter().map(resolver).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;

    fn arguments() -> Vec<Argument> {
        vec![Argument::text("hello"), Argument::from(5i64)]
    }

    #[test]
    fn out_of_range_index_is_absent() {
        let result = resolve_optional(&arguments(), 7, resolve_string);

        assert_eq!(result, Ok(None));
    }

    #[test]
    fn defined_resolution_is_present() {
        let result = resolve_optional(&arguments(), 1, resolve_decimal);

        assert_eq!(result, Ok(Some(BigDecimal::from(5))));
    }

    #[test]
    fn undefined_resolution_fails() {
        let result = resolve_optional(&arguments(), 0, resolve_decimal);

        assert_eq!(
            result,
            Err(ResolutionError::NoResolution("\"hello\"".to_string()))
        );
    }

    #[test]
    fn many_fails_on_first_unresolvable_argument() {
        let arguments = vec![Argument::text("5"), Argument::text("x")];

        let result = resolve_many(&arguments, resolve_decimal);

        assert_eq!(
            result,
            Err(ResolutionError::NoResolution("\"x\"".to_string()))
        );
    }

    #[test]
    fn many_keeps_input_order() {
        let arguments = vec![Argument::text("3"), Argument::text("1"), Argument::text("2")];

        let result = resolve_many(&arguments, resolve_decimal);

        assert_eq!(
            result,
            Ok(vec![
                BigDecimal::from(3),
                BigDecimal::from(1),
                BigDecimal::from(2)
            ])
        );
    }

    #[test]
    fn many_of_nothing_is_empty() {
        assert_eq!(resolve_many(&[], resolve_string), Ok(vec![]));
    }

    #[test]
    fn missing_required_parameter_is_reported_by_position() {
        let result = Parameter::required(2).resolve(&arguments(), resolve_string);

        assert_eq!(result, Err(ResolutionError::MissingArgument { index: 2 }));
    }

    #[test]
    fn missing_parameter_with_default_is_absent() {
        let result = Parameter::with_default(2).resolve(&arguments(), resolve_string);

        assert_eq!(result, Ok(None));
    }
}
