use anyhow::{Context, Result};
use std::env;

pub const ENV_API_KEY: &str = "AIRTABLE_API_KEY";
pub const ENV_BASE_ID: &str = "BASE_ID";
pub const ENV_TABLE_NAME: &str = "TABLE_NAME";

/// Settings for the one table this process reports on. The table name is
/// stored raw; percent-encoding happens at URL construction time.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_id: String,
    pub table_name: String,
}

impl Config {
    /// Read settings from the process environment. Callers load `.env` (if
    /// any) before this runs.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .with_context(|| format!("{key} is not set"))
        };
        Ok(Self {
            api_key: get(ENV_API_KEY)?,
            base_id: get(ENV_BASE_ID)?,
            table_name: get(ENV_TABLE_NAME)?,
        })
    }

    /// Memo key for the fetch cache: one entry per (endpoint, credential,
    /// table) triple.
    pub fn cache_key(&self, endpoint: &str) -> (String, String, String) {
        (
            endpoint.to_string(),
            self.api_key.clone(),
            self.table_name.clone(),
        )
    }
}
