use super::Directory;
use crate::checks::check_applications;
use crate::model::{
    AppliedUniversity, CompetitionRatio, LanguageScore, University, UniversityId, User, UserId,
};
use eyre::{Error, WrapErr, ensure};
use sqlx::any::{AnyConnectOptions, AnyRow};
use sqlx::{AnyConnection, Connection, Row};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{debug, instrument, trace, warn};

/// Directory backed by a SQL database through the `sqlx` Any driver.
pub struct SqlStore {
    conn: AnyConnection,
    count_edits: bool,
}

/// Read a non-negative integer column.
fn unsigned(row: &AnyRow, column: &str) -> Result<u32, Error> {
    let value = row.try_get::<i32, _>(column)?;
    u32::try_from(value).wrap_err_with(|| format!("invalid {column} value {value}"))
}

fn university_from_row(row: &AnyRow) -> Result<University, Error> {
    Ok(University {
        id: UniversityId(row.try_get("id")?),
        name: row.try_get("name")?,
        country: row.try_get("country")?,
        flag: row.try_get("flag")?,
        competition_ratio: CompetitionRatio {
            level1: unsigned(row, "level1")?,
            level2: unsigned(row, "level2")?,
        },
        notices: Vec::new(),
        applicant_count: unsigned(row, "applicant_count")?,
    })
}

impl SqlStore {
    pub async fn new(s: &str) -> Result<Self, Error> {
        sqlx::any::install_default_drivers();
        Ok(Self {
            conn: AnyConnection::connect_with(&AnyConnectOptions::from_str(s)?)
                .await
                .wrap_err("cannot connect to database")?,
            count_edits: true,
        })
    }

    pub fn with_edit_counting(self, count_edits: bool) -> Self {
        Self {
            count_edits,
            ..self
        }
    }

    async fn load_universities(
        &mut self,
        ids: &[UniversityId],
    ) -> Result<HashMap<UniversityId, University>, Error> {
        let mut universities = HashMap::new();
        for id in ids {
            let university = sqlx::query(
                "SELECT id, name, country, flag, level1, level2, applicant_count FROM universities WHERE id=?",
            )
            .bind(id.as_str())
            .map(|row: AnyRow| university_from_row(&row))
            .fetch_optional(&mut self.conn)
            .await?
            .transpose()?;
            if let Some(mut university) = university {
                university.notices = self.load_notices(id).await?;
                universities.insert(id.clone(), university);
            }
        }
        Ok(universities)
    }

    async fn load_notices(&mut self, id: &UniversityId) -> Result<Vec<String>, Error> {
        Ok(
            sqlx::query("SELECT body FROM notices WHERE university_id=? ORDER BY id")
                .bind(id.as_str())
                .map(|row: AnyRow| row.get::<String, _>("body"))
                .fetch_all(&mut self.conn)
                .await?,
        )
    }

    async fn load_language_scores(&mut self, user: &UserId) -> Result<Vec<LanguageScore>, Error> {
        Ok(
            sqlx::query("SELECT kind, score FROM language_scores WHERE user_id=? ORDER BY kind")
                .bind(user.0.as_str())
                .map(|row: AnyRow| LanguageScore {
                    kind: row.get("kind"),
                    score: row.get("score"),
                })
                .fetch_all(&mut self.conn)
                .await?,
        )
    }

    async fn load_applied(&mut self, user: &UserId) -> Result<Vec<AppliedUniversity>, Error> {
        sqlx::query(
            "SELECT university_id, rank_position FROM applications WHERE user_id=? ORDER BY rank_position",
        )
        .bind(user.0.as_str())
        .map(|row: AnyRow| -> Result<_, Error> {
            let rank = row.try_get::<i32, _>("rank_position")?;
            Ok(AppliedUniversity {
                university: UniversityId(row.try_get("university_id")?),
                rank: usize::try_from(rank).wrap_err_with(|| format!("invalid rank {rank}"))?,
            })
        })
        .fetch_all(&mut self.conn)
        .await?
        .into_iter()
        .collect()
    }
}

impl Directory for SqlStore {
    #[instrument(skip(self))]
    async fn list_universities(&mut self) -> Result<Vec<University>, Error> {
        let mut universities = sqlx::query(
            "SELECT id, name, country, flag, level1, level2, applicant_count FROM universities ORDER BY name",
        )
        .map(|row: AnyRow| university_from_row(&row))
        .fetch_all(&mut self.conn)
        .await
        .wrap_err("cannot load universities")?
        .into_iter()
        .collect::<Result<Vec<_>, Error>>()?;
        for university in &mut universities {
            university.notices = self.load_notices(&university.id).await?;
        }
        trace!(universities = universities.len(), "universities loaded");
        Ok(universities)
    }

    #[instrument(skip(self))]
    async fn lookup_user(&mut self, user: &UserId) -> Result<Option<User>, Error> {
        let Some(mut found) = sqlx::query(
            "SELECT id, name, gpa, edit_count, max_edit_count, deadline_restricted FROM users WHERE id=?",
        )
        .bind(user.0.as_str())
        .map(|row: AnyRow| -> Result<_, Error> {
            Ok(User {
                id: UserId(row.try_get("id")?),
                name: row.try_get("name")?,
                gpa: row.try_get("gpa")?,
                language_scores: Vec::new(),
                edit_count: unsigned(&row, "edit_count")?,
                max_edit_count: unsigned(&row, "max_edit_count")?,
                deadline_restricted: row.try_get::<i32, _>("deadline_restricted")? != 0,
                applied: Vec::new(),
            })
        })
        .fetch_optional(&mut self.conn)
        .await
        .wrap_err("cannot load user")?
        .transpose()?
        else {
            return Ok(None);
        };
        found.language_scores = self
            .load_language_scores(user)
            .await
            .wrap_err("cannot load language scores")?;
        found.applied = self
            .load_applied(user)
            .await
            .wrap_err("cannot load applications")?;
        check_applications(user, &found.applied)?;
        trace!(user = %found, applied = found.applied.len(), "user loaded");
        Ok(Some(found))
    }

    #[instrument(skip(self))]
    async fn lookup_applications(
        &mut self,
        user: &UserId,
    ) -> Result<Vec<(University, usize)>, Error> {
        let applied = self
            .load_applied(user)
            .await
            .wrap_err("cannot load applications")?;
        let ids = applied.iter().map(|a| a.university.clone()).collect::<Vec<_>>();
        let mut universities = self
            .load_universities(&ids)
            .await
            .wrap_err("cannot load universities")?;
        Ok(applied
            .into_iter()
            .filter_map(|a| match universities.remove(&a.university) {
                Some(u) => Some((u, a.rank)),
                None => {
                    warn!(university = %a.university, "unknown applied university");
                    None
                }
            })
            .collect())
    }

    #[instrument(skip(self, applied))]
    async fn persist_applications(
        &mut self,
        user: &UserId,
        applied: &[AppliedUniversity],
    ) -> Result<(), Error> {
        check_applications(user, applied)?;
        let mut trans = self.conn.begin().await?;
        let known_user = sqlx::query("SELECT id FROM users WHERE id=?")
            .bind(user.0.as_str())
            .fetch_optional(&mut *trans)
            .await
            .wrap_err("cannot load user")?;
        ensure!(
            known_user.is_some(),
            "cannot update applications of unknown user {user}"
        );
        for a in applied.iter().filter(|a| !a.university.is_custom()) {
            let known = sqlx::query("SELECT id FROM universities WHERE id=?")
                .bind(a.university.as_str())
                .fetch_optional(&mut *trans)
                .await
                .wrap_err("cannot load universities")?;
            ensure!(
                known.is_some(),
                "cannot apply to unknown university {}",
                a.university
            );
        }
        sqlx::query("DELETE FROM applications WHERE user_id=?")
            .bind(user.0.as_str())
            .execute(&mut *trans)
            .await
            .wrap_err("cannot clear previous applications")?;
        for a in applied {
            sqlx::query(
                "INSERT INTO applications (user_id, university_id, rank_position) VALUES (?, ?, ?)",
            )
            .bind(user.0.as_str())
            .bind(a.university.as_str())
            .bind(i32::try_from(a.rank).wrap_err_with(|| format!("invalid rank {}", a.rank))?)
            .execute(&mut *trans)
            .await
            .wrap_err("cannot save applications")?;
        }
        if self.count_edits {
            let updated = sqlx::query("UPDATE users SET edit_count=edit_count+1 WHERE id=?")
                .bind(user.0.as_str())
                .execute(&mut *trans)
                .await
                .wrap_err("cannot update edit count")?;
            ensure!(
                updated.rows_affected() == 1,
                "cannot update edit count of user {user}"
            );
        }
        trans
            .commit()
            .await
            .wrap_err("error when committing transaction")?;
        debug!(applied = applied.len(), "applications persisted");
        Ok(())
    }
}
