use crate::catalog::Catalog;
use crate::config::{Config, parse_config};
use crate::model::{AppliedUniversity, EditBlocker, University, UniversityId, User, UserId};
use crate::store::Directory;
use eyre::Error;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, instrument, trace, warn};

pub use self::search::SearchSession;
pub use self::selection::{Selection, Toggle};

mod search;
mod selection;

#[derive(Clone, Copy, Debug)]
pub struct EditorSettings {
    /// Simulated latency before the application list is persisted.
    pub submit_delay: Duration,
    /// Delay between a successful submission and navigation to the profile.
    pub redirect_delay: Duration,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            submit_delay: Duration::from_millis(1000),
            redirect_delay: Duration::from_millis(3000),
        }
    }
}

impl EditorSettings {
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Ok(Self {
            submit_delay: Duration::from_millis(parse_config(
                config,
                "editor",
                "submit_delay_ms",
                1000,
            )?),
            redirect_delay: Duration::from_millis(parse_config(
                config,
                "editor",
                "redirect_delay_ms",
                3000,
            )?),
        })
    }
}

/// User-visible message produced by an editor operation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Success(text) => write!(f, "ok: {text}"),
            Notice::Error(text) => write!(f, "error: {text}"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SkipReason {
    EditingClosed,
    NoChanges,
    InFlight,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Submission {
    /// The list was persisted; the host navigates to the profile once the
    /// delay has elapsed.
    Saved {
        profile: UserId,
        redirect_after: Duration,
    },
    /// The directory refused or failed; the candidate list is untouched.
    Failed,
    /// Nothing was sent to the directory.
    Skipped(SkipReason),
}

/// Editing session of one user's application list.
///
/// The candidate selection is a scratch copy: the stored list only changes
/// through a successful [`Editor::submit`].
pub struct Editor<'a, D, C> {
    directory: &'a mut D,
    catalog: &'a C,
    settings: EditorSettings,
    user: User,
    catalog_universities: Vec<University>,
    custom: Vec<University>,
    candidate: Selection,
    search: SearchSession,
    in_flight: bool,
    notice: Option<Notice>,
}

impl<'a, D: Directory, C: Catalog> Editor<'a, D, C> {
    /// Load the user's stored applications into a new editing session.
    /// Return `None` if the user does not exist.
    #[instrument(skip(directory, catalog, settings))]
    pub async fn open(
        directory: &'a mut D,
        catalog: &'a C,
        user: &UserId,
        settings: EditorSettings,
    ) -> Result<Option<Editor<'a, D, C>>, Error> {
        let Some(user) = directory.lookup_user(user).await? else {
            debug!("user not found");
            return Ok(None);
        };
        let catalog_universities = directory.list_universities().await?;
        let candidate = Selection::from_applied(&user.applied);
        debug!(
            user = %user,
            applied = candidate.len(),
            can_edit = user.can_edit(),
            "editor opened",
        );
        Ok(Some(Editor {
            directory,
            catalog,
            settings,
            user,
            catalog_universities,
            custom: Vec::new(),
            candidate,
            search: SearchSession::default(),
            in_flight: false,
            notice: None,
        }))
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn can_edit(&self) -> bool {
        self.user.can_edit()
    }

    pub fn remaining_edits(&self) -> u32 {
        self.user.remaining_edits()
    }

    pub fn edit_blockers(&self) -> Vec<EditBlocker> {
        self.user.edit_blockers()
    }

    pub fn candidate(&self) -> &Selection {
        &self.candidate
    }

    pub fn custom_universities(&self) -> &[University] {
        &self.custom
    }

    pub fn search_session(&self) -> &SearchSession {
        &self.search
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    /// Universities that can be selected: the base catalog followed by the
    /// universities added during this session.
    pub fn available_universities(&self) -> impl Iterator<Item = &University> {
        self.catalog_universities.iter().chain(&self.custom)
    }

    pub fn university(&self, id: &UniversityId) -> Option<&University> {
        self.available_universities().find(|u| &u.id == id)
    }

    /// Select or deselect a university. Does nothing when editing is not
    /// permitted. A university that is neither in the catalog nor added
    /// during this session can only be deselected.
    pub fn toggle(&mut self, university: &UniversityId) -> Option<Toggle> {
        if !self.can_edit() {
            debug!(university = %university, "toggle ignored, editing is closed");
            return None;
        }
        if self.university(university).is_none() && self.candidate.rank_of(university).is_none() {
            debug!(university = %university, "toggle ignored, unknown university");
            return Some(Toggle::Unknown);
        }
        let toggle = self.candidate.toggle(university);
        trace!(university = %university, ?toggle, "toggled");
        Some(toggle)
    }

    /// Register a university that is not part of the base catalog under a
    /// fresh custom identifier, and select it with the last rank.
    pub fn add_custom_university(&mut self, candidate: University) -> Option<UniversityId> {
        if !self.can_edit() || self.candidate.is_full() {
            debug!(university = %candidate.name, "custom university not added");
            return None;
        }
        let mut id = UniversityId::custom();
        while self.custom.iter().any(|u| u.id == id) {
            id = UniversityId::custom();
        }
        let university = University {
            id: id.clone(),
            ..candidate
        };
        info!(university = %university, id = %id, "custom university added");
        self.notice = Some(Notice::Success(format!(
            "{} has been added",
            university.name
        )));
        self.custom.push(university);
        self.candidate.push_last(id.clone());
        Some(id)
    }

    pub fn has_pending_changes(&self) -> bool {
        self.candidate.differs_from(&self.user.applied)
    }

    /// Run a catalog search for the "add a university" form. An empty query
    /// yields no results.
    pub async fn search(&mut self, query: &str) -> &[University] {
        self.search.set_query(query);
        let results = if query.trim().is_empty() {
            Vec::new()
        } else {
            match self.catalog.search(query).await {
                Ok(results) => results,
                Err(e) => {
                    warn!(query, error = %e, "catalog search failed");
                    Vec::new()
                }
            }
        };
        self.search.set_results(query, results);
        self.search.results()
    }

    /// Stage one search result for confirmation.
    pub fn select_result(&mut self, index: usize) -> Option<&University> {
        self.search.select(index)
    }

    /// Add the staged search result as a custom university. The staged
    /// university is kept when the selection is full.
    pub fn confirm_add(&mut self) -> Option<UniversityId> {
        if self.search.staged().is_none() || self.candidate.is_full() || !self.can_edit() {
            return None;
        }
        let staged = self.search.take_staged()?;
        let id = self.add_custom_university(staged);
        self.search.clear();
        id
    }

    pub fn cancel_add(&mut self) {
        self.search.clear();
    }

    /// Persist the candidate list. Only one submission may be in flight.
    #[instrument(skip(self), fields(user = %self.user.id))]
    pub async fn submit(&mut self) -> Submission {
        let applied = match self.begin_submit() {
            Ok(applied) => applied,
            Err(reason) => {
                debug!(?reason, "submission skipped");
                return Submission::Skipped(reason);
            }
        };
        tokio::time::sleep(self.settings.submit_delay).await;
        let result = self
            .directory
            .persist_applications(&self.user.id, &applied)
            .await;
        let submission = self.finish_submit(applied, result);
        if matches!(submission, Submission::Saved { .. }) {
            match self.directory.lookup_user(&self.user.id).await {
                Ok(Some(user)) => self.user = user,
                Ok(None) => warn!("user disappeared after submission"),
                Err(e) => warn!(error = %e, "cannot refresh user after submission"),
            }
        }
        submission
    }

    /// Check that a submission may start, mark it in flight and capture the
    /// list to send.
    fn begin_submit(&mut self) -> Result<Vec<AppliedUniversity>, SkipReason> {
        if self.in_flight {
            return Err(SkipReason::InFlight);
        }
        if !self.can_edit() {
            return Err(SkipReason::EditingClosed);
        }
        if !self.has_pending_changes() {
            return Err(SkipReason::NoChanges);
        }
        self.in_flight = true;
        Ok(self.candidate.to_vec())
    }

    fn finish_submit(
        &mut self,
        applied: Vec<AppliedUniversity>,
        result: Result<(), Error>,
    ) -> Submission {
        self.in_flight = false;
        match result {
            Ok(()) => {
                info!(applied = applied.len(), "application list updated");
                self.user.applied = applied;
                self.notice = Some(Notice::Success(
                    "your application list has been updated".to_owned(),
                ));
                Submission::Saved {
                    profile: self.user.id.clone(),
                    redirect_after: self.settings.redirect_delay,
                }
            }
            Err(e) => {
                warn!(error = %e, "cannot update application list");
                self.notice = Some(Notice::Error(
                    "an error occurred while updating, please try again".to_owned(),
                ));
                Submission::Failed
            }
        }
    }
}
