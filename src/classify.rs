//! Textual heuristics over fetched page text. These are substring
//! classifiers, not date parsers.

/// True when the page text reads like a freshly posted opening: an explicit
/// freshness phrase, or a day count of one week or less ("3 days ago",
/// "3d ago").
///
/// Known limitation, accepted: "new" matches inside unrelated words such as
/// "renewal".
pub fn is_recent(text: &str) -> bool {
    let text = text.to_lowercase();

    if text.contains("just posted") || text.contains("new") || text.contains("24 hours") {
        return true;
    }

    (1..=7).any(|days| text.contains(&format!("{} day", days)) || text.contains(&format!("{}d", days)))
}

/// True when any configured hiring-signal term occurs in the page text.
pub fn is_relevant(text: &str, signals: &[String]) -> bool {
    let text = text.to_lowercase();
    signals.iter().any(|signal| text.contains(&signal.to_lowercase()))
}
