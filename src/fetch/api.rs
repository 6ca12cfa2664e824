use super::{PageSource, RecordPage};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://api.airtable.com/v0";

/// `PageSource` backed by the live HTTP API.
#[derive(Debug)]
pub struct ApiPageSource {
    client: Client,
    url: Url,
    api_key: String,
}

impl ApiPageSource {
    /// Build the list-records URL `{endpoint}/{base_id}/{table}`. Pushing the
    /// table as a path segment percent-encodes non-ASCII and reserved
    /// characters, so Korean table names are safe.
    pub fn new(
        client: Client,
        endpoint: &str,
        api_key: &str,
        base_id: &str,
        table: &str,
    ) -> Result<Self> {
        let mut url =
            Url::parse(endpoint).with_context(|| format!("invalid endpoint `{endpoint}`"))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("endpoint `{endpoint}` cannot carry a path"))?
            .push(base_id)
            .push(table);
        Ok(Self {
            client,
            url,
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl PageSource for ApiPageSource {
    async fn fetch_page(&self, offset: Option<&str>) -> Result<RecordPage> {
        let mut req = self.client.get(self.url.clone()).bearer_auth(&self.api_key);
        if let Some(cursor) = offset {
            req = req.query(&[("offset", cursor)]);
        }
        let page = req
            .send()
            .await
            .with_context(|| format!("GET {} failed", self.url))?
            .error_for_status()
            .with_context(|| format!("non-success status from {}", self.url))?
            .json::<RecordPage>()
            .await
            .with_context(|| format!("decoding records page from {}", self.url))?;
        Ok(page)
    }
}
