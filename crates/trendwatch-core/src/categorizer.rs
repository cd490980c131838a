//! Keyword categorization by substring-trigger counting.

use crate::categories::CategoryRule;

/// Label returned when no category trigger matches.
pub const DEFAULT_CATEGORY: &str = "General Marketing";

/// Maps keywords onto an ordered category taxonomy.
///
/// A category scores one point for every trigger contained in the keyword
/// (case-insensitive). The highest score wins; on a tie the category declared
/// first wins. Triggers are used as given; blank ones are rejected when a
/// taxonomy is loaded.
#[derive(Debug, Clone)]
pub struct Categorizer {
    rules: Vec<(String, Vec<String>)>,
}

impl Categorizer {
    #[must_use]
    pub fn new(categories: &[CategoryRule]) -> Self {
        let rules = categories
            .iter()
            .map(|rule| {
                let triggers = rule.triggers.iter().map(|t| t.to_lowercase()).collect();
                (rule.label.clone(), triggers)
            })
            .collect();
        Self { rules }
    }

    #[must_use]
    pub fn categorize(&self, keyword: &str) -> &str {
        let keyword = keyword.to_lowercase();

        let mut best: Option<(&str, usize)> = None;
        for (label, triggers) in &self.rules {
            let score = triggers
                .iter()
                .filter(|t| keyword.contains(t.as_str()))
                .count();
            if score == 0 {
                continue;
            }
            // Strictly greater keeps the earlier category on ties.
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((label.as_str(), score));
            }
        }

        best.map_or(DEFAULT_CATEGORY, |(label, _)| label)
    }
}
