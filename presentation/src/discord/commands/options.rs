use bigdecimal::BigDecimal;
use domain_shared::argument::Argument;
use poise::serenity_prelude as serenity;
use serenity::CommandDataOptionValue;
use std::collections::BTreeMap;
use std::str::FromStr;

type Flattened = (Option<String>, Option<String>, BTreeMap<String, Argument>);

/// Walks down subcommand groups and subcommands to the named leaf options.
pub fn flatten_options(options: &[serenity::CommandDataOption]) -> Flattened {
    let mut arguments = BTreeMap::new();

    for option in options {
        match &option.value {
            CommandDataOptionValue::SubCommandGroup(options) => {
                let (_, subcommand, arguments) = flatten_options(options);
                return (Some(option.name.clone()), subcommand, arguments);
            }
            CommandDataOptionValue::SubCommand(options) => {
                let (_, _, arguments) = flatten_options(options);
                return (None, Some(option.name.clone()), arguments);
            }
            value => {
                if let Some(argument) = serenity_to_domain_argument(value) {
                    arguments.insert(option.name.clone(), argument);
                }
            }
        }
    }

    (None, None, arguments)
}

fn serenity_to_domain_argument(value: &CommandDataOptionValue) -> Option<Argument> {
    match value {
        CommandDataOptionValue::String(text) => Some(Argument::text(text.as_str())),
        CommandDataOptionValue::Integer(number) => Some(Argument::from(*number)),
        CommandDataOptionValue::Number(number) => BigDecimal::from_str(&number.to_string())
            .ok()
            .map(Argument::number),
        CommandDataOptionValue::Boolean(flag) => Some(Argument::text(flag.to_string())),
        CommandDataOptionValue::User(user_id) => Some(Argument::from(user_id.get())),
        CommandDataOptionValue::Role(role_id) => Some(Argument::from(role_id.get())),
        CommandDataOptionValue::Channel(channel_id) => Some(Argument::from(channel_id.get())),
        CommandDataOptionValue::Mentionable(id) => Some(Argument::from(id.get())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options(value: serde_json::Value) -> Vec<serenity::CommandDataOption> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn nested_options_are_flattened() {
        let options = options(json!([{
            "name": "blacklist",
            "type": 2,
            "options": [{
                "name": "remove",
                "type": 1,
                "options": [{ "name": "index", "type": 4, "value": 2 }]
            }]
        }]));

        let (group, subcommand, arguments) = flatten_options(&options);

        assert_eq!(group.as_deref(), Some("blacklist"));
        assert_eq!(subcommand.as_deref(), Some("remove"));
        assert_eq!(arguments.get("index"), Some(&Argument::from(2i64)));
    }

    #[test]
    fn top_level_options_are_kept() {
        let options = options(json!([
            { "name": "expression", "type": 3, "value": "1 + 1" }
        ]));

        let (group, subcommand, arguments) = flatten_options(&options);

        assert_eq!((group, subcommand), (None, None));
        assert_eq!(arguments.get("expression"), Some(&Argument::text("1 + 1")));
    }
}
