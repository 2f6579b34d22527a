use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use log::warn;

/// Runtime configuration. Every field has a compiled default and can be
/// overridden through a `JOBSCOUT_*` environment variable.
///
/// The skill and hiring-signal vocabularies are carried here as explicit
/// data so the extractor and coordinator receive them as arguments instead
/// of reaching for process-wide constants.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub frontend_origin: String,
    pub publish_endpoint: String,
    pub publish_timeout: Duration,
    pub search_limit: usize,
    pub fetch_timeout: Duration,
    /// Inclusive bounds (seconds) for the randomized pacing delay before
    /// each page fetch.
    pub fetch_delay_range: (u64, u64),
    /// Overall deadline for one scrape run; `None` means no deadline.
    pub run_deadline: Option<Duration>,
    pub lexicon_path: PathBuf,
    pub skill_vocabulary: Vec<String>,
    pub hiring_signals: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let run_deadline = match std::env::var("JOBSCOUT_RUN_DEADLINE_SECS") {
            Ok(raw) => match raw.parse::<u64>() {
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(_) => {
                    warn!("Ignoring unparsable JOBSCOUT_RUN_DEADLINE_SECS={}", raw);
                    None
                }
            },
            Err(_) => None,
        };

        Config {
            bind_address: env_or("JOBSCOUT_BIND", "0.0.0.0:8000"),
            frontend_origin: env_or("JOBSCOUT_FRONTEND_ORIGIN", "http://localhost:3000"),
            publish_endpoint: env_or("JOBSCOUT_PUBLISH_ENDPOINT", "http://localhost:8080/jobs-data"),
            publish_timeout: Duration::from_secs(env_parse("JOBSCOUT_PUBLISH_TIMEOUT_SECS", 30)),
            search_limit: env_parse("JOBSCOUT_SEARCH_LIMIT", 5),
            fetch_timeout: Duration::from_secs(env_parse("JOBSCOUT_FETCH_TIMEOUT_SECS", 20)),
            fetch_delay_range: (
                env_parse("JOBSCOUT_FETCH_DELAY_MIN_SECS", 2),
                env_parse("JOBSCOUT_FETCH_DELAY_MAX_SECS", 5),
            ),
            run_deadline,
            lexicon_path: PathBuf::from(env_or("JOBSCOUT_LEXICON_PATH", "data/entity_lexicon.json")),
            skill_vocabulary: default_skill_vocabulary(),
            hiring_signals: default_hiring_signals(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_address: "0.0.0.0:8000".to_string(),
            frontend_origin: "http://localhost:3000".to_string(),
            publish_endpoint: "http://localhost:8080/jobs-data".to_string(),
            publish_timeout: Duration::from_secs(30),
            search_limit: 5,
            fetch_timeout: Duration::from_secs(20),
            fetch_delay_range: (2, 5),
            run_deadline: None,
            lexicon_path: PathBuf::from("data/entity_lexicon.json"),
            skill_vocabulary: default_skill_vocabulary(),
            hiring_signals: default_hiring_signals(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: FromStr + Copy>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring unparsable {}={}", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}

/// Curated technical-skill vocabulary matched as case-insensitive
/// substrings of the resume text.
pub fn default_skill_vocabulary() -> Vec<String> {
    [
        "Python",
        "JavaScript",
        "TypeScript",
        "React",
        "Angular",
        "Vue",
        "Node.js",
        "Rust",
        "SQL",
        "MongoDB",
        "PostgreSQL",
        "AWS",
        "Azure",
        "Docker",
        "Kubernetes",
        "Terraform",
        "GraphQL",
        "Machine Learning",
        "Data Science",
        "API",
        "FastAPI",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Terms whose presence marks a page as a hiring page. Matched
/// case-insensitively against the fetched page text.
pub fn default_hiring_signals() -> Vec<String> {
    ["apply now", "vacancy", "hiring", "job", "careers"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
