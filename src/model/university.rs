use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

const CUSTOM_PREFIX: &str = "custom-";

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UniversityId(pub String);

impl UniversityId {
    /// Build a fresh identifier for a university added by a user during an
    /// editing session.
    pub fn custom() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis());
        let salt: u16 = rand::rng().random();
        Self(format!("{CUSTOM_PREFIX}{millis}-{salt:04x}"))
    }

    pub fn is_custom(&self) -> bool {
        self.0.starts_with(CUSTOM_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UniversityId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for UniversityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for UniversityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CompetitionRatio {
    pub level1: u32,
    pub level2: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct University {
    pub id: UniversityId,
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub flag: String,
    #[serde(default)]
    pub competition_ratio: CompetitionRatio,
    #[serde(default)]
    pub notices: Vec<String>,
    #[serde(default)]
    pub applicant_count: u32,
}

impl University {
    /// Total number of seats offered, across both levels.
    pub fn seats(&self) -> u32 {
        self.competition_ratio
            .level1
            .saturating_add(self.competition_ratio.level2)
    }

    /// Case-insensitive substring match on the name or the country.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query) || self.country.to_lowercase().contains(&query)
    }
}

impl fmt::Display for University {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.flag.is_empty() {
            write!(f, "{} ({})", self.name, self.country)
        } else {
            write!(f, "{} {} ({})", self.flag, self.name, self.country)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stanford() -> University {
        University {
            id: "stanford".into(),
            name: "Stanford University".into(),
            country: "USA".into(),
            flag: String::new(),
            competition_ratio: CompetitionRatio {
                level1: 5,
                level2: 3,
            },
            notices: vec![],
            applicant_count: 0,
        }
    }

    #[test]
    fn test_custom_ids() {
        let a = UniversityId::custom();
        let b = UniversityId::custom();
        assert!(a.is_custom());
        assert!(b.is_custom());
        assert_ne!(a, b);
        assert!(!UniversityId::from("stanford").is_custom());
    }

    #[test]
    fn test_matches() {
        let u = stanford();
        assert!(u.matches("stanford"));
        assert!(u.matches("STAN"));
        assert!(u.matches("usa"));
        assert!(!u.matches("cambridge"));
    }

    #[test]
    fn test_seats() {
        assert_eq!(stanford().seats(), 8);
        let huge = University {
            competition_ratio: CompetitionRatio {
                level1: u32::MAX,
                level2: 1,
            },
            ..stanford()
        };
        assert_eq!(huge.seats(), u32::MAX);
    }
}
