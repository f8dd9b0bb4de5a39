use domain_shared::permission::{Permission, PermissionSet};
use domain_shared::rank::Rank;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing permissions: {}", format_permissions(.missing))]
pub struct InsufficientPermission {
    pub missing: PermissionSet,
}

/// Passes when the actor is [`Rank::Root`] or holds every required permission.
#[instrument(level = "debug")]
pub fn validate_permissions(
    effective_ranks: &BTreeSet<Rank>,
    required: &PermissionSet,
    actual: &PermissionSet,
) -> Result<(), InsufficientPermission> {
    if effective_ranks.contains(&Rank::Root) {
        return Ok(());
    }

    let missing: PermissionSet = required.difference(actual).copied().collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(InsufficientPermission { missing })
    }
}

fn format_permissions(permissions: &PermissionSet) -> String {
    permissions
        .iter()
        .map(Permission::name)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_bypasses_permissions() {
        let ranks = BTreeSet::from([Rank::Root]);
        let required = PermissionSet::from([Permission::Administrator]);

        let result = validate_permissions(&ranks, &required, &PermissionSet::new());

        assert_eq!(result, Ok(()));
    }

    #[test]
    fn superset_passes() {
        let ranks = BTreeSet::from([Rank::User]);
        let required = PermissionSet::from([Permission::ManageMessages]);
        let actual = PermissionSet::from([Permission::ManageMessages, Permission::SendMessages]);

        assert_eq!(validate_permissions(&ranks, &required, &actual), Ok(()));
    }

    #[test]
    fn reports_exactly_the_missing_permissions() {
        let ranks = BTreeSet::from([Rank::Developer, Rank::User]);
        let required = PermissionSet::from([
            Permission::ManageRoles,
            Permission::ManageMessages,
            Permission::SendMessages,
        ]);
        let actual = PermissionSet::from([Permission::SendMessages, Permission::BanMembers]);

        let result = validate_permissions(&ranks, &required, &actual);

        assert_eq!(
            result,
            Err(InsufficientPermission {
                missing: PermissionSet::from([Permission::ManageRoles, Permission::ManageMessages]),
            })
        );
    }

    #[test]
    fn error_lists_missing_permissions() {
        let error = InsufficientPermission {
            missing: PermissionSet::from([Permission::ManageRoles]),
        };

        assert_eq!(error.to_string(), "Missing permissions: MANAGE_ROLES");
    }
}
