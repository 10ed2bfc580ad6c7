//! The single place the student-visibility predicate lives: assigned to all,
//! assigned individually, or assigned through the student's group.

use std::collections::BTreeSet;

use crate::core::context::AppContext;
use crate::db::types::Role;
use crate::error::StoreError;

pub(crate) fn visible_to_student(
    assign_to_all: bool,
    individually_assigned: bool,
    assigned_groups: &[String],
    student_group: Option<&str>,
) -> bool {
    assign_to_all
        || individually_assigned
        || student_group
            .is_some_and(|group| assigned_groups.iter().any(|assigned| assigned == group))
}

/// Resolve a targeted save into concrete student ids: the individually picked
/// students plus every student of the named groups, deduplicated. Group
/// membership is read live from the directory at save time. Empty when the
/// work is assigned to all, which needs no per-student rows.
pub(crate) async fn resolve_assigned_student_ids(
    ctx: &AppContext,
    assign_to_all: bool,
    assigned_groups: &[String],
    assigned_student_ids: &[String],
) -> Result<Vec<String>, StoreError> {
    if assign_to_all {
        return Ok(Vec::new());
    }
    let mut ids: BTreeSet<String> = assigned_student_ids.iter().cloned().collect();
    for group in assigned_groups {
        for user in ctx.backend().users_in_group(group).await? {
            if user.role == Role::Student {
                ids.insert(user.id);
            }
        }
    }
    Ok(ids.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_to_all_wins() {
        assert!(visible_to_student(true, false, &[], None));
    }

    #[test]
    fn individual_assignment_is_visible() {
        assert!(visible_to_student(false, true, &[], None));
    }

    #[test]
    fn group_match_is_visible() {
        let groups = vec!["wing-a".to_string()];
        assert!(visible_to_student(false, false, &groups, Some("wing-a")));
    }

    #[test]
    fn no_match_is_hidden() {
        let groups = vec!["wing-a".to_string()];
        assert!(!visible_to_student(false, false, &groups, Some("wing-b")));
        assert!(!visible_to_student(false, false, &groups, None));
    }
}
