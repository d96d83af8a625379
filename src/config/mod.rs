use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_SEARCH_PATH: &str = "/buscar";
const DEFAULT_RESULTS_SELECTOR: &str = "#resultado";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the search service lives and how to find the results container
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Root of the service; `GET` here returns the server-rendered page
    pub base_url: String,
    /// Path of the JSON search endpoint
    pub search_path: String,
    /// CSS selector of the results container in the server-rendered page
    pub results_selector: String,
    /// Per-request timeout of the HTTP client
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            search_path: DEFAULT_SEARCH_PATH.to_string(),
            results_selector: DEFAULT_RESULTS_SELECTOR.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load from the environment, reading a `.env` file first if one exists
    pub fn load() -> Self {
        if dotenvy::dotenv().is_ok() {
            debug!("Loaded .env file");
        }
        Self::from_env()
    }

    /// Load from `UNIT_SEARCH_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let base_url = lookup("UNIT_SEARCH_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);

        let search_path = lookup("UNIT_SEARCH_PATH")
            .map(|path| {
                if path.starts_with('/') {
                    path
                } else {
                    format!("/{}", path)
                }
            })
            .unwrap_or(defaults.search_path);

        let results_selector =
            lookup("UNIT_SEARCH_RESULTS_SELECTOR").unwrap_or(defaults.results_selector);

        let timeout = match lookup("UNIT_SEARCH_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) => Duration::from_secs(secs),
                Err(_) => {
                    warn!("Ignoring invalid UNIT_SEARCH_TIMEOUT_SECS: {}", raw);
                    defaults.timeout
                }
            },
            None => defaults.timeout,
        };

        Self {
            base_url,
            search_path,
            results_selector,
            timeout,
        }
    }

    /// Full URL of the search endpoint
    pub fn search_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.search_path)
    }

    /// Full URL of the server-rendered page
    pub fn page_url(&self) -> String {
        format!("{}/", self.base_url.trim_end_matches('/'))
    }
}
