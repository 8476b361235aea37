//! Compiler configuration.
//!
//! All configuration is driven by environment variables.

/// Default chrono format for timestamps produced by macros.
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Configuration shared by the compiler and the command-line driver.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RqeConfig {
    /// chrono format string for timestamp macros.
    pub time_format: String,
    /// Log level filter.
    pub log_level: String,
    /// Column whitelist, when one is configured.
    pub columns: Option<Vec<String>>,
}

impl Default for RqeConfig {
    fn default() -> Self {
        Self {
            time_format: DEFAULT_TIME_FORMAT.to_owned(),
            log_level: "info".to_owned(),
            columns: None,
        }
    }
}

impl RqeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("RQE_TIME_FORMAT") {
            config.time_format = v;
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Ok(v) = std::env::var("RQE_COLUMNS") {
            config.columns = parse_columns(&v);
        }

        config
    }
}

/// Split a comma-separated column list; blank input yields `None`.
#[must_use]
pub fn parse_columns(raw: &str) -> Option<Vec<String>> {
    let columns: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_owned)
        .collect();
    if columns.is_empty() {
        None
    } else {
        Some(columns)
    }
}
