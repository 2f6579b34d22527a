use std::collections::HashSet;

use log::info;

use crate::entities::EntityIdentifier;

/// Turns resume text into a deduplicated set of search terms: identified
/// entities unioned with curated technical skills found in the text.
pub struct KeywordExtractor {
    identifier: Box<dyn EntityIdentifier>,
    skills: Vec<String>,
}

impl KeywordExtractor {
    pub fn new(identifier: Box<dyn EntityIdentifier>, skills: Vec<String>) -> Self {
        KeywordExtractor { identifier, skills }
    }

    pub fn degraded(&self) -> bool {
        self.identifier.degraded()
    }

    /// Returns the keyword set as a Vec; order is not significant and the
    /// result is deduplicated case-insensitively with display case
    /// preserved. Terms of 3 chars or fewer without internal whitespace are
    /// discarded as noise (stray initials, numbers).
    pub fn extract(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let mut seen: HashSet<String> = HashSet::new();
        let mut keywords: Vec<String> = Vec::new();

        let mut add = |term: &str| {
            let term = term.trim();
            if term.is_empty() {
                return;
            }
            if term.chars().count() <= 3 && !term.contains(char::is_whitespace) {
                return;
            }
            if seen.insert(term.to_lowercase()) {
                keywords.push(term.to_string());
            }
        };

        for entity in self.identifier.identify(text) {
            add(&entity.text);
        }
        for skill in &self.skills {
            if lower.contains(&skill.to_lowercase()) {
                add(skill);
            }
        }

        info!("Extracted {} keywords from resume", keywords.len());
        keywords
    }
}
