pub use self::application::AppliedUniversity;
pub use self::university::{CompetitionRatio, University, UniversityId};
pub use self::user::{EditBlocker, LanguageScore, User, UserId};

mod application;
mod university;
mod user;

/// Maximum number of universities a user may apply to.
pub const MAX_APPLICATIONS: usize = 5;
