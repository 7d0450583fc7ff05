use crate::model::University;

/// State of the "add a university" form: the query being typed, the current
/// results and the university staged for confirmation.
#[derive(Clone, Debug, Default)]
pub struct SearchSession {
    query: String,
    results: Vec<University>,
    staged: Option<University>,
}

impl SearchSession {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[University] {
        &self.results
    }

    pub fn staged(&self) -> Option<&University> {
        self.staged.as_ref()
    }

    /// Start a new query. Any staged university is discarded.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_owned();
        self.staged = None;
        self.results.clear();
    }

    /// Record the results of a search, unless the query has changed since.
    pub fn set_results(&mut self, query: &str, results: Vec<University>) -> bool {
        if self.query != query {
            return false;
        }
        self.results = results;
        true
    }

    /// Stage one of the results for confirmation, clearing the query and the
    /// result list.
    pub fn select(&mut self, index: usize) -> Option<&University> {
        if index >= self.results.len() {
            return None;
        }
        let university = self.results.swap_remove(index);
        self.results.clear();
        self.query.clear();
        self.staged = Some(university);
        self.staged.as_ref()
    }

    pub fn take_staged(&mut self) -> Option<University> {
        self.staged.take()
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.results.clear();
        self.staged = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CompetitionRatio;

    fn university(id: &str) -> University {
        University {
            id: id.into(),
            name: id.to_uppercase(),
            country: "Nowhere".into(),
            flag: String::new(),
            competition_ratio: CompetitionRatio::default(),
            notices: vec![],
            applicant_count: 0,
        }
    }

    #[test]
    fn test_select_stages_and_clears() {
        let mut session = SearchSession::default();
        session.set_query("un");
        assert!(session.set_results("un", vec![university("a"), university("b")]));
        assert_eq!(session.select(1).map(|u| u.id.as_str()), Some("b"));
        assert!(session.results().is_empty());
        assert_eq!(session.query(), "");
        assert_eq!(session.staged().map(|u| u.id.as_str()), Some("b"));
    }

    #[test]
    fn test_select_out_of_range() {
        let mut session = SearchSession::default();
        session.set_query("un");
        session.set_results("un", vec![university("a")]);
        assert!(session.select(3).is_none());
        assert_eq!(session.results().len(), 1);
        assert!(session.staged().is_none());
    }

    #[test]
    fn test_new_query_discards_staged() {
        let mut session = SearchSession::default();
        session.set_query("a");
        session.set_results("a", vec![university("a")]);
        session.select(0);
        session.set_query("b");
        assert!(session.staged().is_none());
    }

    #[test]
    fn test_stale_results_are_ignored() {
        let mut session = SearchSession::default();
        session.set_query("b");
        assert!(!session.set_results("a", vec![university("a")]));
        assert!(session.results().is_empty());
    }
}
