use crate::command::error::map_discord_err;
use crate::command::{Command, CommandContext, CommandError};
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use domain::argument::{evaluate, ResolutionError};
use domain_shared::argument::Argument;
use tracing::{error, instrument};

const DISPLAYED_DECIMALS: i64 = 10;

pub struct MathCommand {
    context: CommandContext,
    argument: Argument,
}

#[instrument(level = "debug", skip_all)]
pub fn create(context: CommandContext) -> Result<Box<dyn Command>, CommandError> {
    let mut arguments = context
        .parameters()
        .remaining("expression", 0, |argument| Some(argument.clone()))?;

    // Text commands arrive split on whitespace
    let argument = match arguments.len() {
        0 => return Err(ResolutionError::MissingArgument { index: 0 }.into()),
        1 => arguments.remove(0),
        _ => Argument::Text(
            arguments
                .iter()
                .filter_map(Argument::as_string)
                .collect::<Vec<_>>()
                .join(" "),
        ),
    };

    Ok(Box::new(MathCommand { context, argument }))
}

impl MathCommand {
    /// Runs off the async workers, the expression is user input.
    async fn value(&self) -> Result<BigDecimal, CommandError> {
        let text = match &self.argument {
            Argument::Number(number) => return Ok(number.clone()),
            Argument::Text(text) => text.clone(),
        };

        tokio::task::spawn_blocking(move || evaluate(&text))
            .await
            .map_err(|join_error| {
                error!(error = %join_error, "Expression evaluation crashed");
                CommandError::Unhandled("The expression could not be evaluated".to_string())
            })?
            .map_err(CommandError::from)
    }
}

#[async_trait]
impl Command for MathCommand {
    #[instrument(level = "info", skip(self))]
    async fn run(&self) -> Result<(), CommandError> {
        let value = self.value().await?;
        let expression = self.argument.as_string().unwrap_or_default();

        self.context
            .reply
            .info(format!("`{}` = **{}**", expression, format_decimal(&value)))
            .await
            .map_err(map_discord_err)?;
        Ok(())
    }
}

fn format_decimal(value: &BigDecimal) -> String {
    let text = value.round(DISPLAYED_DECIMALS).to_string();
    if !text.contains('.') {
        return text;
    }
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
