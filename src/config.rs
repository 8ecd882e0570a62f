use crate::ranking::{RankStrategy, ResultLimit};
use crate::snippet::{DEFAULT_INDICATOR, DEFAULT_SNIPPET_LENGTH};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Scoring and result limit
    pub ranking: RankingConfig,

    /// Snippet window selection
    pub snippet: SnippetConfig,

    /// Report format and destination
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    pub strategy: RankStrategy,
    /// Negative means unlimited.
    pub result_limit: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnippetConfig {
    /// Target window length in bytes.
    pub length: usize,
    /// Snippets kept per document.
    pub count: usize,
    pub indicator: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" | "default" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(Error::Config(format!("Unknown output format: '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Write the report here instead of stdout.
    pub file: Option<PathBuf>,
    pub no_color: bool,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            strategy: RankStrategy::Weighted,
            result_limit: -1,
        }
    }
}

impl Default for SnippetConfig {
    fn default() -> Self {
        Self {
            length: DEFAULT_SNIPPET_LENGTH,
            count: 1,
            indicator: DEFAULT_INDICATOR.to_string(),
        }
    }
}

impl RankingConfig {
    pub fn limit(&self) -> ResultLimit {
        ResultLimit::from(self.result_limit)
    }
}

impl Config {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from any key lookup, starting from defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(strategy) = lookup("RANK_STRATEGY") {
            config.ranking.strategy = strategy.parse()?;
        }

        if let Some(limit) = lookup("RESULT_LIMIT") {
            config.ranking.result_limit = parse_number("RESULT_LIMIT", &limit)?;
        }

        // Snippet configuration
        if let Some(length) = lookup("SNIPPET_LENGTH") {
            config.snippet.length = parse_number("SNIPPET_LENGTH", &length)?;
        }

        if let Some(count) = lookup("SNIPPET_COUNT") {
            config.snippet.count = parse_number("SNIPPET_COUNT", &count)?;
        }

        if let Some(indicator) = lookup("SNIPPET_INDICATOR") {
            config.snippet.indicator = indicator;
        }

        // Output configuration
        if let Some(format) = lookup("OUTPUT_FORMAT") {
            config.output.format = format.parse()?;
        }

        if let Some(file) = lookup("OUTPUT_FILE").filter(|f| !f.is_empty()) {
            config.output.file = Some(PathBuf::from(file));
        }

        config.output.no_color = lookup("NO_COLOR").is_some()
            || lookup("TERM").as_deref() == Some("dumb")
            || !atty::is(atty::Stream::Stdout);

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{key} must be a number, got '{value}'")))
}
