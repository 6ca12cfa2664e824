use super::{fetch_all_records, PageSource, RawRecord};
use anyhow::Result;
use std::collections::HashMap;
use tracing::{debug, info};

/// One entry per (endpoint, credential, table) triple.
pub type CacheKey = (String, String, String);

/// Explicit per-process memo of fetched tables, owned by the entry point.
/// Failed fetches are never stored, so the next call retries from scratch.
#[derive(Default)]
pub struct FetchCache {
    entries: HashMap<CacheKey, Vec<RawRecord>>,
}

impl FetchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached records for `key`, fetching through `source` on a
    /// miss.
    pub async fn get_or_fetch<S: PageSource>(
        &mut self,
        key: &CacheKey,
        source: &S,
    ) -> Result<Vec<RawRecord>> {
        if let Some(records) = self.entries.get(key) {
            debug!(table = %key.2, records = records.len(), "cache hit");
            return Ok(records.clone());
        }
        let records = fetch_all_records(source).await?;
        info!(table = %key.2, records = records.len(), "fetched table");
        self.entries.insert(key.clone(), records.clone());
        Ok(records)
    }

    /// Drop one entry so the next `get_or_fetch` hits the network again.
    /// The manual refresh action routes through here.
    pub fn invalidate(&mut self, key: &CacheKey) {
        if self.entries.remove(key).is_some() {
            info!(table = %key.2, "cache entry invalidated");
        }
    }
}
