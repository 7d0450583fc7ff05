use crate::config::{Config, get_config, parse_config};
use crate::model::{CompetitionRatio, University, UniversityId};
use eyre::{Error, WrapErr};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

/// Search over universities that are not part of the base catalog.
pub trait Catalog {
    async fn search(&self, query: &str) -> Result<Vec<University>, Error>;
}

#[derive(Debug, Deserialize)]
struct CatalogRecord {
    id: String,
    name: String,
    country: String,
    #[serde(default)]
    flag: String,
    #[serde(default)]
    level1: u32,
    #[serde(default)]
    level2: u32,
}

impl From<CatalogRecord> for University {
    fn from(r: CatalogRecord) -> Self {
        University {
            id: UniversityId(r.id),
            name: r.name,
            country: r.country,
            flag: r.flag,
            competition_ratio: CompetitionRatio {
                level1: r.level1,
                level2: r.level2,
            },
            notices: Vec::new(),
            applicant_count: 0,
        }
    }
}

/// Fixed list of universities answered after a simulated network delay.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    entries: Vec<University>,
    delay: Duration,
}

impl StaticCatalog {
    pub fn new(entries: Vec<University>, delay: Duration) -> Self {
        Self { entries, delay }
    }

    pub fn builtin(delay: Duration) -> Self {
        let entry = |id: &str, name: &str, country: &str, flag: &str, level1, level2| University {
            id: id.into(),
            name: name.to_owned(),
            country: country.to_owned(),
            flag: flag.to_owned(),
            competition_ratio: CompetitionRatio { level1, level2 },
            notices: Vec::new(),
            applicant_count: 0,
        };
        Self::new(
            vec![
                entry("search-1", "Stanford University", "United States", "🇺🇸", 5, 3),
                entry("search-2", "University of Cambridge", "United Kingdom", "🇬🇧", 4, 2),
                entry("search-3", "Seoul National University", "South Korea", "🇰🇷", 10, 5),
            ],
            delay,
        )
    }

    /// Load entries from a CSV file with `id,name,country,flag,level1,level2`
    /// columns.
    pub fn from_csv(file_name: impl AsRef<Path>, delay: Duration) -> Result<Self, Error> {
        let file_name = file_name.as_ref();
        let mut reader = csv::Reader::from_path(file_name)
            .wrap_err_with(|| format!("cannot open catalog {}", file_name.display()))?;
        let entries = reader
            .deserialize::<CatalogRecord>()
            .map(|r| r.map(University::from))
            .collect::<Result<Vec<_>, _>>()
            .wrap_err("cannot parse catalog")?;
        debug!(entries = entries.len(), file = %file_name.display(), "catalog loaded");
        Ok(Self::new(entries, delay))
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let delay = Duration::from_millis(parse_config(config, "catalog", "delay_ms", 300)?);
        match get_config(config, "catalog", "file") {
            Some(file) => Self::from_csv(file, delay),
            None => Ok(Self::builtin(delay)),
        }
    }
}

impl Catalog for StaticCatalog {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<University>, Error> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        tokio::time::sleep(self.delay).await;
        Ok(self
            .entries
            .iter()
            .filter(|u| u.matches(query))
            .cloned()
            .collect())
    }
}
