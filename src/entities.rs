use std::path::Path;

use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityLabel {
    Organization,
    Place,
    Product,
    JobRole,
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub label: EntityLabel,
    pub text: String,
}

/// Entity identification capability. Two implementations exist: the
/// lexicon-backed identifier and a fixed fallback used when the lexicon is
/// unavailable, selected once at startup by [`select_identifier`].
pub trait EntityIdentifier: Send + Sync {
    fn identify(&self, text: &str) -> Vec<Entity>;

    /// True when this is the degraded-mode fallback.
    fn degraded(&self) -> bool {
        false
    }
}

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("could not read entity lexicon: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse entity lexicon: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct Lexicon {
    organizations: Vec<String>,
    places: Vec<String>,
    products: Vec<String>,
    job_roles: Vec<String>,
}

/// Gazetteer-based identifier: entries from a JSON lexicon file are matched
/// as case-insensitive substrings, plus a capitalized-phrase rule for
/// organizations named with a corporate suffix.
pub struct LexiconIdentifier {
    lexicon: Lexicon,
}

impl LexiconIdentifier {
    pub fn from_file(path: &Path) -> Result<Self, LexiconError> {
        let raw = std::fs::read_to_string(path)?;
        let lexicon: Lexicon = serde_json::from_str(&raw)?;
        Ok(LexiconIdentifier { lexicon })
    }
}

impl EntityIdentifier for LexiconIdentifier {
    fn identify(&self, text: &str) -> Vec<Entity> {
        let lower = text.to_lowercase();
        let categories = [
            (&self.lexicon.organizations, EntityLabel::Organization),
            (&self.lexicon.places, EntityLabel::Place),
            (&self.lexicon.products, EntityLabel::Product),
            (&self.lexicon.job_roles, EntityLabel::JobRole),
        ];

        let mut entities = Vec::new();
        for (entries, label) in categories {
            for entry in entries {
                if lower.contains(&entry.to_lowercase()) {
                    entities.push(Entity {
                        label,
                        text: entry.clone(),
                    });
                }
            }
        }
        entities.extend(suffix_organizations(text));
        entities
    }
}

const ORG_SUFFIXES: &[&str] = &["Inc", "Ltd", "LLC", "GmbH", "Labs", "Technologies", "Solutions"];

// "Vandelay Industries Inc" style names: up to two capitalized words
// followed by a corporate suffix.
fn suffix_organizations(text: &str) -> Vec<Entity> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut entities = Vec::new();

    for (i, word) in words.iter().enumerate() {
        let bare = word.trim_matches(|c: char| !c.is_alphanumeric());
        if !ORG_SUFFIXES.contains(&bare) {
            continue;
        }
        let mut start = i;
        while start > 0 && i - start < 2 {
            let prev = words[start - 1].trim_matches(|c: char| !c.is_alphanumeric());
            let capitalized = prev.chars().next().map_or(false, char::is_uppercase);
            if !capitalized {
                break;
            }
            start -= 1;
        }
        if start < i {
            let name: Vec<&str> = words[start..i]
                .iter()
                .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
                .collect();
            entities.push(Entity {
                label: EntityLabel::Organization,
                text: format!("{} {}", name.join(" "), bare),
            });
        }
    }
    entities
}

/// Fixed identifier used when the lexicon cannot be loaded. Keeps the
/// pipeline live with a small generic keyword set instead of failing the
/// whole request.
pub struct FallbackIdentifier;

impl EntityIdentifier for FallbackIdentifier {
    fn identify(&self, _text: &str) -> Vec<Entity> {
        vec![
            Entity {
                label: EntityLabel::JobRole,
                text: "Software Engineer".to_string(),
            },
            Entity {
                label: EntityLabel::JobRole,
                text: "Developer".to_string(),
            },
            Entity {
                label: EntityLabel::Place,
                text: "Remote".to_string(),
            },
        ]
    }

    fn degraded(&self) -> bool {
        true
    }
}

/// Startup selection: lexicon identifier when the lexicon loads, fixed
/// fallback otherwise. Lexicon failure is logged, not fatal.
pub fn select_identifier(path: &Path) -> Box<dyn EntityIdentifier> {
    match LexiconIdentifier::from_file(path) {
        Ok(identifier) => {
            info!("Entity lexicon loaded from {:?}", path);
            Box::new(identifier)
        }
        Err(e) => {
            warn!("Entity lexicon unavailable ({}). Running in degraded mode with the fallback keyword set.", e);
            Box::new(FallbackIdentifier)
        }
    }
}
