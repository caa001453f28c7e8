use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// A named set of users that split group purchases equally.
///
/// Membership is fixed at creation time. The set is ordered so member
/// iteration (and therefore settlement order) is deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub members: BTreeSet<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Creates a new group. Duplicate ids in `members` collapse into one.
    pub fn new(name: String, members: impl IntoIterator<Item = Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            members: members.into_iter().collect(),
            created_at: Utc::now(),
        }
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, user_id: Uuid) -> bool {
        self.members.contains(&user_id)
    }

    /// Everyone in the group except `user_id`, in id order.
    pub fn members_except(&self, user_id: Uuid) -> Vec<Uuid> {
        self.members
            .iter()
            .copied()
            .filter(|id| *id != user_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_deduplicates_members() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let group = Group::new("flat".to_string(), [a, b, a]);
        assert_eq!(group.member_count(), 2);
        assert!(group.contains(a));
        assert!(group.contains(b));
    }

    #[test]
    fn test_members_except_excludes_only_the_given_user() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let group = Group::new("trip".to_string(), [a, b, c]);

        let rest = group.members_except(a);
        assert_eq!(rest.len(), 2);
        assert!(!rest.contains(&a));
        assert!(rest.contains(&b));
        assert!(rest.contains(&c));
    }

    #[test]
    fn test_members_except_non_member_returns_everyone() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let group = Group::new("dinner".to_string(), [a, b]);
        assert_eq!(group.members_except(Uuid::new_v4()).len(), 2);
    }

    #[test]
    fn test_empty_group() {
        let group = Group::new("ghost town".to_string(), std::iter::empty());
        assert_eq!(group.member_count(), 0);
        assert!(group.members_except(Uuid::new_v4()).is_empty());
    }
}
