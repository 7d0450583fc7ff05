use super::UniversityId;
use serde::{Deserialize, Serialize};

/// A university in a user's application list, with its 1-based preference
/// rank.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AppliedUniversity {
    pub university: UniversityId,
    pub rank: usize,
}

impl AppliedUniversity {
    pub fn new(university: impl Into<UniversityId>, rank: usize) -> Self {
        Self {
            university: university.into(),
            rank,
        }
    }
}

