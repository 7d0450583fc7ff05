use crate::model::{AppliedUniversity, MAX_APPLICATIONS, UserId};
use eyre::{Error, bail, ensure};
use std::collections::HashSet;

/// Check that an application list is well formed: no more than
/// `MAX_APPLICATIONS` entries, ranks forming exactly `1..=N`, and no
/// university listed twice.
pub fn check_applications(user: &UserId, applied: &[AppliedUniversity]) -> Result<(), Error> {
    ensure!(
        applied.len() <= MAX_APPLICATIONS,
        "user {} applied to {} universities, at most {} are allowed",
        user,
        applied.len(),
        MAX_APPLICATIONS
    );
    let mut ranks = applied.iter().map(|a| a.rank).collect::<Vec<_>>();
    ranks.sort_unstable();
    if let Some((expected, &found)) = (1..).zip(&ranks).find(|&(e, &r)| e != r) {
        bail!(
            "user {} has inconsistent ranks: expected rank {}, found {}",
            user,
            expected,
            found
        );
    }
    let mut seen = HashSet::new();
    if let Some(duplicate) = applied.iter().find(|a| !seen.insert(&a.university)) {
        bail!(
            "user {} applied to university {} more than once",
            user,
            duplicate.university
        );
    }
    Ok(())
}
