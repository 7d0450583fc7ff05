use crate::config::{Config, get_config, parse_config};
use crate::model::{AppliedUniversity, University, User, UserId};
use eyre::{Error, bail};

pub use self::memory::MemoryStore;
pub use self::sql::SqlStore;

mod memory;
mod sql;

/// Source of truth for users and their application lists.
pub trait Directory {
    /// Every university of the base catalog.
    async fn list_universities(&mut self) -> Result<Vec<University>, Error>;

    async fn lookup_user(&mut self, user: &UserId) -> Result<Option<User>, Error>;

    /// Applied universities of a user, ordered by ascending rank.
    async fn lookup_applications(
        &mut self,
        user: &UserId,
    ) -> Result<Vec<(University, usize)>, Error>;

    /// Replace the stored application list of a user.
    async fn persist_applications(
        &mut self,
        user: &UserId,
        applied: &[AppliedUniversity],
    ) -> Result<(), Error>;
}

pub enum Store {
    Memory(MemoryStore),
    Sql(SqlStore),
}

impl Store {
    pub async fn from_config(config: &Config) -> Result<Self, Error> {
        let count_edits = parse_config(config, "editor", "count_edits", true)?;
        match &get_config(config, "store", "kind").unwrap_or_else(|| "memory".to_owned())[..] {
            "memory" => {
                let fixtures = get_config(config, "store", "fixtures")
                    .unwrap_or_else(|| "data/fixtures.toml".to_owned());
                Ok(Store::Memory(
                    MemoryStore::load(&fixtures)?.with_edit_counting(count_edits),
                ))
            }
            "sql" => {
                let Some(url) = get_config(config, "store", "url") else {
                    bail!("store.url is required for the sql store");
                };
                Ok(Store::Sql(
                    SqlStore::new(&url).await?.with_edit_counting(count_edits),
                ))
            }
            other => bail!("unknown store: {}", other),
        }
    }
}

impl Directory for Store {
    async fn list_universities(&mut self) -> Result<Vec<University>, Error> {
        match self {
            Store::Memory(store) => store.list_universities().await,
            Store::Sql(store) => store.list_universities().await,
        }
    }

    async fn lookup_user(&mut self, user: &UserId) -> Result<Option<User>, Error> {
        match self {
            Store::Memory(store) => store.lookup_user(user).await,
            Store::Sql(store) => store.lookup_user(user).await,
        }
    }

    async fn lookup_applications(
        &mut self,
        user: &UserId,
    ) -> Result<Vec<(University, usize)>, Error> {
        match self {
            Store::Memory(store) => store.lookup_applications(user).await,
            Store::Sql(store) => store.lookup_applications(user).await,
        }
    }

    async fn persist_applications(
        &mut self,
        user: &UserId,
        applied: &[AppliedUniversity],
    ) -> Result<(), Error> {
        match self {
            Store::Memory(store) => store.persist_applications(user, applied).await,
            Store::Sql(store) => store.persist_applications(user, applied).await,
        }
    }
}
