//! Record counting and paginated retrieval

use serde_json::Value as JsonValue;

use super::OpenFemaClient;
use crate::error::{Error, Result};
use crate::models::{Dataset, Query, RecordTable};

/// openFEMA serves at most this many records per request
pub const PAGE_SIZE: u64 = 10_000;

/// `$skip` offsets needed to cover `count` records
pub fn page_offsets(count: u64) -> impl Iterator<Item = u64> {
    (0..count).step_by(PAGE_SIZE as usize)
}

/// Read `metadata.count`; the rest of the envelope is ignored
fn total_count(json: &JsonValue) -> Result<u64> {
    json.get("metadata")
        .and_then(|m| m.get("count"))
        .and_then(JsonValue::as_u64)
        .ok_or_else(|| Error::MissingField("metadata.count".to_string()))
}

impl OpenFemaClient {
    /// Determine how many records satisfy a query's filters
    pub async fn record_count(&self, query: &Query) -> Result<u64> {
        let url = format!("{}&$top=1", query.count_url(self.base_url()));
        let json = self.get_response(&url).await?;
        total_count(&json)
    }

    /// Retrieve all `count` records for an already built query URL
    pub async fn all_records(&self, url: &str, dataset: Dataset, count: u64) -> Result<RecordTable> {
        if count <= PAGE_SIZE {
            let json = self.get_response(&format!("{}&$top={}", url, count)).await?;
            return RecordTable::from_json(&json, dataset);
        }

        tracing::info!(
            count,
            pages = count.div_ceil(PAGE_SIZE),
            "more than {} records, paginating",
            PAGE_SIZE
        );
        self.paginate_records(url, dataset, count).await
    }

    /// Fetch `count` records one page at a time, in offset order.
    ///
    /// The first failing page aborts the whole fetch.
    pub async fn paginate_records(
        &self,
        url: &str,
        dataset: Dataset,
        count: u64,
    ) -> Result<RecordTable> {
        let mut pages = Vec::new();

        for skip in page_offsets(count) {
            let page_url = format!("{}&$skip={}&$top={}", url, skip, PAGE_SIZE);
            let json = self.get_response(&page_url).await?;
            let page = RecordTable::from_json(&json, dataset)?;
            tracing::debug!(skip, rows = page.len(), "fetched page");
            pages.push(page);
        }

        Ok(RecordTable::concat(pages))
    }

    /// Count the matches for a query, then retrieve all of them
    pub async fn fetch(&self, query: &Query) -> Result<RecordTable> {
        let count = self.record_count(query).await?;
        tracing::info!(dataset = %query.dataset, count, "matching records");

        let url = query.build_url(self.base_url());
        self.all_records(&url, query.dataset, count).await
    }
}
