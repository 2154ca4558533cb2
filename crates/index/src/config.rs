use std::time::Duration;

/// Index connection settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Base URL of the index, e.g. `http://localhost:9200`.
    pub base_url: String,
    /// Upper bound on a single index round-trip.
    pub timeout: Duration,
}

impl IndexConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `SEARCH_INDEX_URL`          | `http://localhost:9200` |
    /// | `SEARCH_INDEX_TIMEOUT_SECS` | `5`                     |
    pub fn from_env() -> Self {
        let base_url = std::env::var("SEARCH_INDEX_URL")
            .unwrap_or_else(|_| "http://localhost:9200".into())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs: u64 = std::env::var("SEARCH_INDEX_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("SEARCH_INDEX_TIMEOUT_SECS must be a valid u64");

        Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}
