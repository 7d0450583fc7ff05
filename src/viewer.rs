use crate::model::{University, User, UserId};
use crate::store::Directory;
use eyre::Error;
use tracing::debug;

/// Read-only view of a user's profile.
#[derive(Debug)]
pub struct ProfileView {
    pub user: User,
    /// Applied universities with their rank, by ascending rank.
    pub applications: Vec<(University, usize)>,
    /// Whether the person looking at the profile owns it.
    pub owner: bool,
}

impl ProfileView {
    /// The application editor is only offered to the profile owner.
    pub fn can_open_editor(&self) -> bool {
        self.owner
    }
}

#[derive(Debug)]
pub enum Profile {
    NotFound,
    Found(ProfileView),
}

pub async fn view_profile<D: Directory>(
    directory: &mut D,
    user: &UserId,
    viewer: Option<&UserId>,
) -> Result<Profile, Error> {
    let Some(found) = directory.lookup_user(user).await? else {
        debug!(user = %user, "profile not found");
        return Ok(Profile::NotFound);
    };
    let mut applications = directory.lookup_applications(user).await?;
    applications.sort_by_key(|&(_, rank)| rank);
    Ok(Profile::Found(ProfileView {
        owner: viewer == Some(&found.id),
        user: found,
        applications,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AppliedUniversity, CompetitionRatio};
    use crate::store::MemoryStore;

    fn store() -> MemoryStore {
        let university = |id: &str| University {
            id: id.into(),
            name: id.to_uppercase(),
            country: "Somewhere".into(),
            flag: String::new(),
            competition_ratio: CompetitionRatio::default(),
            notices: vec![],
            applicant_count: 3,
        };
        MemoryStore::new(
            vec![university("a"), university("b"), university("c")],
            vec![User {
                id: "u1".into(),
                name: "Kim".into(),
                gpa: Some(3.9),
                language_scores: vec![],
                edit_count: 0,
                max_edit_count: 2,
                deadline_restricted: false,
                applied: vec![
                    AppliedUniversity::new("c", 2),
                    AppliedUniversity::new("a", 3),
                    AppliedUniversity::new("b", 1),
                ],
            }],
        )
    }

    #[tokio::test]
    async fn test_profile_sorted_by_rank() {
        let mut store = store();
        let Profile::Found(view) = view_profile(&mut store, &"u1".into(), None).await.unwrap()
        else {
            panic!("profile should exist");
        };
        let ids = view
            .applications
            .iter()
            .map(|(u, r)| (u.id.as_str(), *r))
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![("b", 1), ("c", 2), ("a", 3)]);
        assert!(!view.can_open_editor());
    }

    #[tokio::test]
    async fn test_owner() {
        let mut store = store();
        let owner = UserId::from("u1");
        let other = UserId::from("u2");
        match view_profile(&mut store, &owner, Some(&owner)).await.unwrap() {
            Profile::Found(view) => assert!(view.can_open_editor()),
            Profile::NotFound => panic!("profile should exist"),
        }
        match view_profile(&mut store, &owner, Some(&other)).await.unwrap() {
            Profile::Found(view) => assert!(!view.can_open_editor()),
            Profile::NotFound => panic!("profile should exist"),
        }
    }

    #[tokio::test]
    async fn test_not_found() {
        let mut store = store();
        assert!(matches!(
            view_profile(&mut store, &"nobody".into(), None).await.unwrap(),
            Profile::NotFound
        ));
    }
}
