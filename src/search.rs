use crate::metrics::Metrics;
use crate::record::Case;
use log::{debug, info};
use std::collections::HashSet;
use std::fmt;

/// Searchable case fields, in the order they are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Id,
    Title,
    Notes,
    Preconditions,
    Comments,
    Steps,
}

impl SearchField {
    pub const ALL: [SearchField; 6] = [
        SearchField::Id,
        SearchField::Title,
        SearchField::Notes,
        SearchField::Preconditions,
        SearchField::Comments,
        SearchField::Steps,
    ];

    /// Exact, case-sensitive containment test. A null field never matches.
    pub fn matches(self, case: &Case, text: &str) -> bool {
        match self {
            SearchField::Id => case.id.to_string().contains(text),
            SearchField::Title => case.title.contains(text),
            SearchField::Notes => contains(case.notes.as_deref(), text),
            SearchField::Preconditions => contains(case.preconditions.as_deref(), text),
            SearchField::Comments => contains(case.comments.as_deref(), text),
            SearchField::Steps => case
                .steps
                .as_ref()
                .is_some_and(|steps| steps.iter().any(|step| step.contains(text))),
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchField::Id => write!(f, "id"),
            SearchField::Title => write!(f, "title"),
            SearchField::Notes => write!(f, "notes"),
            SearchField::Preconditions => write!(f, "preconditions"),
            SearchField::Comments => write!(f, "comments"),
            SearchField::Steps => write!(f, "steps"),
        }
    }
}

fn contains(value: Option<&str>, text: &str) -> bool {
    value.is_some_and(|v| v.contains(text))
}

/// Returns every case containing `text` in any searchable field.
///
/// Hits are collected field by field and then deduplicated on full case
/// equality, keeping the first occurrence. A case matching on both `title`
/// and `steps` therefore sits where its `title` hit put it.
///
/// Equality covers the typed fields of [`Case`] only. API keys that `Case`
/// does not model, such as `section_id` or `updated_on`, are dropped on
/// decoding, so two payloads that differ only in those keys count as one case.
pub fn find_in_cases<'a>(cases: &'a [Case], text: &str) -> Vec<&'a Case> {
    let mut found: Vec<&Case> = Vec::new();
    for field in SearchField::ALL {
        let before = found.len();
        found.extend(cases.iter().filter(|case| field.matches(case, text)));
        debug!("{} hit(s) on {field}", found.len() - before);
    }

    let mut seen = HashSet::with_capacity(found.len());
    found.retain(|case| seen.insert(*case));

    info!("found test cases: {}", found.len());
    found
}

/// Case search with optional metric reporting.
#[derive(Default)]
pub struct SearchEngine {
    metrics: Option<Metrics>,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metrics(metrics: Metrics) -> Self {
        Self {
            metrics: Some(metrics),
        }
    }

    pub fn search<'a>(&self, cases: &'a [Case], text: &str) -> Vec<&'a Case> {
        let found = find_in_cases(cases, text);
        if let Some(metrics) = &self.metrics {
            metrics.searches_run.inc();
            metrics.cases_matched.inc_by(found.len() as u64);
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Step;

    fn ids(found: &[&Case]) -> Vec<String> {
        found.iter().map(|c| c.id.to_string()).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(find_in_cases(&[], "login").is_empty());
    }

    #[test]
    fn test_absent_text_finds_nothing() {
        let cases = vec![
            Case::new(1u64, "Login works").with_notes("first"),
            Case::new(2u64, "Other").with_steps(vec![Step::new("open", "shown")]),
        ];
        assert!(find_in_cases(&cases, "zzz").is_empty());
    }

    #[test]
    fn test_case_sensitive_end_to_end() {
        let cases = vec![
            Case::new(1u64, "Login works").with_steps(vec![Step::new("open app", "shown")]),
            Case::new(2u64, "Other").with_notes("mentions login flow"),
        ];

        let found = find_in_cases(&cases, "login");
        assert_eq!(found, vec![&cases[1]]);
    }

    #[test]
    fn test_multi_field_match_appears_once() {
        let cases = vec![Case::new(5u64, "reset password")
            .with_notes("password rules")
            .with_comments("password")
            .with_steps(vec![Step::new("enter password", "password accepted")])];

        let found = find_in_cases(&cases, "password");
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_order_follows_first_matching_field() {
        let cases = vec![Case::new(42u64, "Unrelated"), Case::new(7u64, "Answer is 42")];

        assert_eq!(ids(&find_in_cases(&cases, "42")), vec!["42", "7"]);
    }

    #[test]
    fn test_earlier_field_wins_position() {
        // title hit on case 2 precedes the steps hit on case 1
        let cases = vec![
            Case::new(1u64, "A").with_steps(vec![Step::new("checkout", "")]),
            Case::new(2u64, "checkout flow").with_steps(vec![Step::new("", "checkout done")]),
        ];

        assert_eq!(ids(&find_in_cases(&cases, "checkout")), vec!["2", "1"]);
    }

    #[test]
    fn test_null_notes_never_match_on_notes() {
        let case = Case::new(3u64, "Banner");
        assert!(!SearchField::Notes.matches(&case, ""));
        assert!(SearchField::Title.matches(&case, "Ban"));
    }

    #[test]
    fn test_steps_match_on_content_or_expected() {
        let case = Case::new(9u64, "t").with_steps(vec![
            Step::new("click save", "nothing"),
            Step::new("wait", "toast appears"),
        ]);

        assert!(SearchField::Steps.matches(&case, "save"));
        assert!(SearchField::Steps.matches(&case, "toast"));
        assert!(!SearchField::Steps.matches(&case, "delete"));

        let empty = Case::new(10u64, "t").with_steps(vec![]);
        assert!(!SearchField::Steps.matches(&empty, ""));
    }

    #[test]
    fn test_id_matches_on_string_form() {
        let cases = vec![Case::new(1234u64, "x")];
        assert_eq!(find_in_cases(&cases, "23").len(), 1);
    }

    #[test]
    fn test_identical_cases_collapse() {
        let case = Case::new(1u64, "dup");
        let cases = vec![case.clone(), case];
        assert_eq!(find_in_cases(&cases, "dup").len(), 1);
    }

    #[test]
    fn test_cases_differing_in_unmodelled_keys_collapse() {
        let cases: Vec<Case> = serde_json::from_value(serde_json::json!([
            {"id": 5, "title": "dup", "section_id": 1, "updated_on": 1700000000},
            {"id": 5, "title": "dup", "section_id": 2, "updated_on": 1700000099}
        ]))
        .unwrap();
        assert_eq!(cases[0], cases[1]);
        assert_eq!(find_in_cases(&cases, "dup").len(), 1);
    }

    #[test]
    fn test_empty_text_matches_everything() {
        let cases = vec![Case::new(1u64, "a"), Case::new(2u64, "b")];
        assert_eq!(find_in_cases(&cases, "").len(), 2);
    }

    #[test]
    fn test_search_reports_count() {
        testing_logger::setup();
        let cases = vec![Case::new(1u64, "alpha"), Case::new(2u64, "beta")];
        find_in_cases(&cases, "alpha");

        testing_logger::validate(|captured| {
            assert!(
                captured
                    .iter()
                    .any(|log| log.level == log::Level::Info && log.body == "found test cases: 1")
            );
        });
    }

    #[test]
    fn test_engine_updates_metrics() {
        let metrics = Metrics::new();
        let engine = SearchEngine::with_metrics(metrics.clone());
        let cases = vec![Case::new(1u64, "alpha"), Case::new(2u64, "alphabet")];

        let found = engine.search(&cases, "alpha");
        assert_eq!(found.len(), 2);
        assert_eq!(metrics.searches_run.get(), 1);
        assert_eq!(metrics.cases_matched.get(), 2);
    }
}
