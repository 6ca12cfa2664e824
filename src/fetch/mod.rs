use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

pub mod api;
pub mod cache;

pub use api::ApiPageSource;
pub use cache::FetchCache;

/// One record from the list-records endpoint: an opaque id plus a field map.
/// Field values stay raw JSON until normalization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRecord {
    pub id: String,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

/// One page of the paginated listing. `offset` is the continuation cursor;
/// its absence marks the end of the table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordPage {
    #[serde(default)]
    pub records: Vec<RawRecord>,
    pub offset: Option<String>,
}

/// Transport seam for the pagination walk.
#[async_trait]
pub trait PageSource {
    async fn fetch_page(&self, offset: Option<&str>) -> Result<RecordPage>;
}

/// Walk the offset chain until a page arrives without a cursor, accumulating
/// records in arrival order. Any page error aborts the whole walk; partial
/// pages are discarded rather than surfaced.
pub async fn fetch_all_records<S: PageSource>(source: &S) -> Result<Vec<RawRecord>> {
    let mut all = Vec::new();
    let mut offset: Option<String> = None;
    loop {
        let page = source.fetch_page(offset.as_deref()).await?;
        debug!(
            records = page.records.len(),
            more = page.offset.is_some(),
            "page received"
        );
        all.extend(page.records);
        match page.offset {
            Some(next) => offset = Some(next),
            None => break,
        }
    }
    Ok(all)
}
