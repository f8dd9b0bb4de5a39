use crate::argument::expression::evaluate;
use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{Duration, NaiveDate};
use domain_shared::argument::Argument;
use domain_shared::discord::{ChannelId, RoleId, UserId};
use domain_shared::permission::Permission;
use domain_shared::rank::Rank;

/// Enumerations that can be resolved from free text by their constant name.
pub trait NamedVariant: Sized + Copy + 'static {
    const VARIANTS: &'static [Self];

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
}

impl TimeUnit {
    pub fn duration(&self) -> Duration {
        match self {
            TimeUnit::Seconds => Duration::seconds(1),
            TimeUnit::Minutes => Duration::minutes(1),
            TimeUnit::Hours => Duration::hours(1),
            TimeUnit::Days => Duration::days(1),
            TimeUnit::Weeks => Duration::weeks(1),
        }
    }

    /// Whole units contained in `duration`.
    pub fn count(&self, duration: Duration) -> i64 {
        duration.num_seconds() / self.duration().num_seconds()
    }
}

impl NamedVariant for TimeUnit {
    const VARIANTS: &'static [Self] = &[
        TimeUnit::Seconds,
        TimeUnit::Minutes,
        TimeUnit::Hours,
        TimeUnit::Days,
        TimeUnit::Weeks,
    ];

    fn name(&self) -> &'static str {
        match self {
            TimeUnit::Seconds => "SECONDS",
            TimeUnit::Minutes => "MINUTES",
            TimeUnit::Hours => "HOURS",
            TimeUnit::Days => "DAYS",
            TimeUnit::Weeks => "WEEKS",
        }
    }
}

impl NamedVariant for Rank {
    const VARIANTS: &'static [Self] = &Rank::ALL;

    fn name(&self) -> &'static str {
        Rank::name(self)
    }
}

impl NamedVariant for Permission {
    const VARIANTS: &'static [Self] = &Permission::ALL;

    fn name(&self) -> &'static str {
        Permission::name(self)
    }
}

pub fn resolve_string(argument: &Argument) -> Option<String> {
    argument.as_string()
}

pub fn resolve_decimal(argument: &Argument) -> Option<BigDecimal> {
    argument.as_number()
}

pub fn resolve_integer(argument: &Argument) -> Option<i64> {
    let number = argument.as_number()?;
    if !number.is_integer() {
        return None;
    }
    number.to_i64()
}

/// Strict `yyyy-mm-dd`. The date is calendar-checked and understood as UTC.
pub fn resolve_date(argument: &Argument) -> Option<NaiveDate> {
    let Argument::Text(text) = argument else {
        return None;
    };

    let shape_matches = text.len() == 10
        && text.bytes().enumerate().all(|(position, byte)| match position {
            4 | 7 => byte == b'-',
            _ => byte.is_ascii_digit(),
        });
    if !shape_matches {
        return None;
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

pub fn resolve_enum<T: NamedVariant>(argument: &Argument) -> Option<T> {
    let Argument::Text(text) = argument else {
        return None;
    };

    T::VARIANTS
        .iter()
        .copied()
        .find(|variant| variant.name().eq_ignore_ascii_case(text))
}

pub fn resolve_time_unit(argument: &Argument) -> Option<TimeUnit> {
    resolve_enum(argument)
}

pub fn resolve_rank(argument: &Argument) -> Option<Rank> {
    resolve_enum(argument)
}

/// Numbers are taken as already evaluated, text is evaluated as an arithmetic expression.
pub fn resolve_expression(argument: &Argument) -> Option<BigDecimal> {
    match argument {
        Argument::Number(number) => Some(number.clone()),
        Argument::Text(text) => evaluate(text).ok(),
    }
}

pub fn resolve_user(argument: &Argument) -> Option<UserId> {
    resolve_snowflake(argument, &["<@!", "<@"]).map(UserId)
}

pub fn resolve_role(argument: &Argument) -> Option<RoleId> {
    resolve_snowflake(argument, &["<@&"]).map(RoleId)
}

pub fn resolve_channel(argument: &Argument) -> Option<ChannelId> {
    resolve_snowflake(argument, &["<#"]).map(ChannelId)
}

fn resolve_snowflake(argument: &Argument, prefixes: &[&str]) -> Option<u64> {
    match argument {
        Argument::Number(number) if number.is_integer() => number.to_u64(),
        Argument::Number(_) => None,
        Argument::Text(text) => {
            if let Ok(id) = text.parse::<u64>() {
                return Some(id);
            }

            prefixes
                .iter()
                .find_map(|prefix| text.strip_prefix(prefix))
                .and_then(|rest| rest.strip_suffix('>'))
                .and_then(|id| id.parse::<u64>().ok())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn dates_must_match_the_exact_pattern() {
        assert_eq!(
            resolve_date(&Argument::text("2021-03-04")),
            NaiveDate::from_ymd_opt(2021, 3, 4)
        );
        assert_eq!(resolve_date(&Argument::text("2021-3-4")), None);
        assert_eq!(resolve_date(&Argument::text("04.03.2021")), None);
        assert_eq!(resolve_date(&Argument::text(" 2021-03-04")), None);
    }

    #[test]
    fn dates_must_exist_in_the_calendar() {
        assert_eq!(resolve_date(&Argument::text("2021-02-30")), None);
        assert_eq!(resolve_date(&Argument::text("2021-13-01")), None);
        assert_eq!(
            resolve_date(&Argument::text("2024-02-29")),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn decimals_are_exact() {
        assert_eq!(
            resolve_decimal(&Argument::text("0.1")),
            BigDecimal::from_str("0.1").ok()
        );
        assert_eq!(resolve_decimal(&Argument::text("ten")), None);
    }

    #[test]
    fn integers_reject_fractions() {
        assert_eq!(resolve_integer(&Argument::text("3")), Some(3));
        assert_eq!(resolve_integer(&Argument::text("3.5")), None);
    }

    #[test]
    fn enums_match_names_ignoring_case() {
        assert_eq!(resolve_rank(&Argument::text("developer")), Some(Rank::Developer));
        assert_eq!(resolve_rank(&Argument::text("ROOT")), Some(Rank::Root));
        assert_eq!(resolve_rank(&Argument::text("dev")), None);
        assert_eq!(resolve_time_unit(&Argument::text("Days")), Some(TimeUnit::Days));
        assert_eq!(
            resolve_enum::<Permission>(&Argument::text("manage_roles")),
            Some(Permission::ManageRoles)
        );
    }

    #[test]
    fn mentions_resolve_to_ids() {
        assert_eq!(resolve_user(&Argument::text("<@42>")), Some(UserId(42)));
        assert_eq!(resolve_user(&Argument::text("<@!42>")), Some(UserId(42)));
        assert_eq!(resolve_user(&Argument::from(42u64)), Some(UserId(42)));
        assert_eq!(resolve_user(&Argument::text("<@&42>")), None);
        assert_eq!(resolve_role(&Argument::text("<@&7>")), Some(RoleId(7)));
        assert_eq!(resolve_role(&Argument::text("<@7>")), None);
        assert_eq!(resolve_channel(&Argument::text("<#9>")), Some(ChannelId(9)));
        assert_eq!(resolve_channel(&Argument::text("#general")), None);
    }

    #[test]
    fn expressions_are_evaluated() {
        assert_eq!(
            resolve_expression(&Argument::text("2 * (3 + 4)")),
            Some(BigDecimal::from(14))
        );
        assert_eq!(
            resolve_expression(&Argument::from(5i64)),
            Some(BigDecimal::from(5))
        );
        assert_eq!(resolve_expression(&Argument::text("2 +")), None);
    }

    #[test]
    fn time_units_count_whole_units() {
        assert_eq!(TimeUnit::Hours.count(Duration::minutes(150)), 2);
        assert_eq!(TimeUnit::Seconds.count(Duration::minutes(1)), 60);
    }
}
