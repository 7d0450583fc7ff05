use super::AppliedUniversity;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LanguageScore {
    pub kind: String,
    pub score: String,
}

/// Reason why a user cannot edit their application list.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EditBlocker {
    QuotaExhausted,
    DeadlineRestricted,
}

impl fmt::Display for EditBlocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuotaExhausted => f.write_str("all edits have been used"),
            Self::DeadlineRestricted => f.write_str("the deadline is too close"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub gpa: Option<f64>,
    #[serde(default)]
    pub language_scores: Vec<LanguageScore>,
    #[serde(default)]
    pub edit_count: u32,
    pub max_edit_count: u32,
    #[serde(default)]
    pub deadline_restricted: bool,
    #[serde(default)]
    pub applied: Vec<AppliedUniversity>,
}

impl User {
    pub fn can_edit(&self) -> bool {
        self.edit_count < self.max_edit_count && !self.deadline_restricted
    }

    pub fn remaining_edits(&self) -> u32 {
        self.max_edit_count.saturating_sub(self.edit_count)
    }

    pub fn edit_blockers(&self) -> Vec<EditBlocker> {
        let mut blockers = Vec::new();
        if self.edit_count >= self.max_edit_count {
            blockers.push(EditBlocker::QuotaExhausted);
        }
        if self.deadline_restricted {
            blockers.push(EditBlocker::DeadlineRestricted);
        }
        blockers
    }

    /// Applications sorted by ascending rank.
    pub fn ranked_applications(&self) -> Vec<AppliedUniversity> {
        let mut applied = self.applied.clone();
        applied.sort_by_key(|a| a.rank);
        applied
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(edit_count: u32, max_edit_count: u32, deadline_restricted: bool) -> User {
        User {
            id: "u1".into(),
            name: "Kim".into(),
            gpa: Some(4.1),
            language_scores: vec![],
            edit_count,
            max_edit_count,
            deadline_restricted,
            applied: vec![],
        }
    }

    #[test]
    fn test_can_edit() {
        assert!(user(0, 2, false).can_edit());
        assert!(user(1, 2, false).can_edit());
        assert!(!user(2, 2, false).can_edit());
        assert!(!user(0, 2, true).can_edit());
    }

    #[test]
    fn test_remaining_edits() {
        assert_eq!(user(0, 2, false).remaining_edits(), 2);
        assert_eq!(user(2, 2, false).remaining_edits(), 0);
        assert_eq!(user(3, 2, false).remaining_edits(), 0);
    }

    #[test]
    fn test_edit_blockers() {
        assert!(user(0, 2, false).edit_blockers().is_empty());
        assert_eq!(
            user(2, 2, true).edit_blockers(),
            vec![EditBlocker::QuotaExhausted, EditBlocker::DeadlineRestricted]
        );
    }

    #[test]
    fn test_ranked_applications() {
        let u = User {
            applied: vec![
                AppliedUniversity::new("b", 2),
                AppliedUniversity::new("a", 1),
            ],
            ..user(0, 2, false)
        };
        let ranked = u.ranked_applications();
        assert_eq!(ranked[0].university.as_str(), "a");
        assert_eq!(ranked[1].university.as_str(), "b");
    }
}
