use crate::model::{AppliedUniversity, MAX_APPLICATIONS, UniversityId};

/// Effect of toggling a university in a selection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Toggle {
    /// The university was appended with the given rank.
    Selected(usize),
    /// The university was removed and the remaining ranks compacted.
    Deselected,
    /// The selection is full and the university was not added.
    Full,
    /// The university is neither in the catalog nor added during the
    /// session, so it was not added.
    Unknown,
}

/// Ranked list of selected universities.
///
/// Entries are kept in rank order and ranks always form `1..=len()`, so the
/// position of an entry determines its rank.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Selection(Vec<AppliedUniversity>);

impl Selection {
    /// Build a selection from a stored application list, ordering it by rank.
    /// Ranks are renumbered from 1 to close any gap.
    pub fn from_applied(applied: &[AppliedUniversity]) -> Self {
        let mut entries = applied.to_vec();
        entries.sort_by_key(|a| a.rank);
        let mut selection = Selection(entries);
        selection.compact();
        selection
    }

    pub fn entries(&self) -> &[AppliedUniversity] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.0.len() >= MAX_APPLICATIONS
    }

    pub fn rank_of(&self, university: &UniversityId) -> Option<usize> {
        self.0
            .iter()
            .find(|a| &a.university == university)
            .map(|a| a.rank)
    }

    /// Remove the university if it is selected, otherwise append it after
    /// the last rank unless the selection is full.
    pub fn toggle(&mut self, university: &UniversityId) -> Toggle {
        if let Some(pos) = self.0.iter().position(|a| &a.university == university) {
            self.0.remove(pos);
            self.compact();
            Toggle::Deselected
        } else {
            self.push_last(university.clone())
                .map_or(Toggle::Full, Toggle::Selected)
        }
    }

    /// Append a university with the next rank. Return the assigned rank, or
    /// `None` if the selection is full.
    pub fn push_last(&mut self, university: UniversityId) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        let rank = self.0.len() + 1;
        self.0.push(AppliedUniversity { university, rank });
        Some(rank)
    }

    /// Check whether this selection differs from a stored list, comparing
    /// both lists entry by entry once sorted by rank.
    pub fn differs_from(&self, persisted: &[AppliedUniversity]) -> bool {
        let mut persisted = persisted.iter().collect::<Vec<_>>();
        persisted.sort_by_key(|a| a.rank);
        self.0.len() != persisted.len() || self.0.iter().zip(persisted).any(|(a, b)| a != b)
    }

    pub fn to_vec(&self) -> Vec<AppliedUniversity> {
        self.0.clone()
    }

    fn compact(&mut self) {
        for (index, entry) in self.0.iter_mut().enumerate() {
            entry.rank = index + 1;
        }
    }
}
