//! Data models for openFEMA queries and results

mod dataset;
mod query;
mod table;

pub use dataset::{endpoint, Dataset, DEFAULT_BASE_URL};
pub use query::{build_url, filter_clause, select_clause, FilterValue, Filters, Query, INLINE_COUNT};
pub use table::RecordTable;
