use super::Directory;
use crate::checks::check_applications;
use crate::model::{AppliedUniversity, University, UniversityId, User, UserId};
use eyre::{Error, OptionExt, WrapErr, bail};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Default, Deserialize)]
struct Fixtures {
    #[serde(default)]
    universities: Vec<University>,
    #[serde(default)]
    users: Vec<User>,
}

/// In-process directory, seeded from a fixtures file or built directly.
#[derive(Debug)]
pub struct MemoryStore {
    universities: HashMap<UniversityId, University>,
    users: HashMap<UserId, User>,
    count_edits: bool,
}

impl MemoryStore {
    pub fn new(universities: Vec<University>, users: Vec<User>) -> Self {
        Self {
            universities: universities.into_iter().map(|u| (u.id.clone(), u)).collect(),
            users: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
            count_edits: true,
        }
    }

    pub fn load(file_name: impl AsRef<Path>) -> Result<Self, Error> {
        let file_name = file_name.as_ref();
        let content = std::fs::read_to_string(file_name)
            .wrap_err_with(|| format!("cannot load fixtures from {}", file_name.display()))?;
        let fixtures: Fixtures = toml::from_str(&content).wrap_err("cannot parse fixtures")?;
        for user in &fixtures.users {
            check_applications(&user.id, &user.applied)?;
        }
        debug!(
            universities = fixtures.universities.len(),
            users = fixtures.users.len(),
            "fixtures loaded",
        );
        Ok(Self::new(fixtures.universities, fixtures.users))
    }

    /// Whether a successful persist consumes one edit of the user's quota.
    pub fn with_edit_counting(self, count_edits: bool) -> Self {
        Self {
            count_edits,
            ..self
        }
    }
}

impl Directory for MemoryStore {
    async fn list_universities(&mut self) -> Result<Vec<University>, Error> {
        let mut universities = self.universities.values().cloned().collect::<Vec<_>>();
        universities.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(universities)
    }

    async fn lookup_user(&mut self, user: &UserId) -> Result<Option<User>, Error> {
        Ok(self.users.get(user).cloned())
    }

    async fn lookup_applications(
        &mut self,
        user: &UserId,
    ) -> Result<Vec<(University, usize)>, Error> {
        let Some(user) = self.users.get(user) else {
            return Ok(Vec::new());
        };
        Ok(user
            .ranked_applications()
            .into_iter()
            .filter_map(|a| match self.universities.get(&a.university) {
                Some(u) => Some((u.clone(), a.rank)),
                None => {
                    warn!(university = %a.university, user = %user.id, "unknown applied university");
                    None
                }
            })
            .collect())
    }

    async fn persist_applications(
        &mut self,
        user: &UserId,
        applied: &[AppliedUniversity],
    ) -> Result<(), Error> {
        check_applications(user, applied)?;
        if let Some(unknown) = applied
            .iter()
            .find(|a| !a.university.is_custom() && !self.universities.contains_key(&a.university))
        {
            bail!("cannot apply to unknown university {}", unknown.university);
        }
        let stored = self
            .users
            .get_mut(user)
            .ok_or_eyre("cannot update applications of an unknown user")?;
        stored.applied = applied.to_vec();
        if self.count_edits {
            stored.edit_count += 1;
        }
        Ok(())
    }
}
