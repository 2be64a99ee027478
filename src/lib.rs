//! openfema - query openFEMA datasets and collect the results into tables
//!
//! The flow is always the same:
//! - build a [`Query`] for one of the supported [`Dataset`]s
//! - ask the API how many records match ([`OpenFemaClient::record_count`])
//! - pull them all, one 10,000-record page at a time ([`OpenFemaClient::all_records`])
//!
//! ```no_run
//! use openfema::{Dataset, OpenFemaClient, Query};
//!
//! # async fn run() -> openfema::Result<()> {
//! let client = OpenFemaClient::new()?;
//! let query = Query::new(Dataset::HousingAssistanceOwners)
//!     .filter("state", "PR")
//!     .select(["county", "zipCode", "approvedForFemaAssistance"]);
//!
//! let table = client.fetch(&query).await?;
//! println!("{} rows, columns: {:?}", table.len(), table.columns());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod error;
pub mod export;
pub mod models;

pub use api::{OpenFemaClient, PAGE_SIZE};
pub use error::{Error, Result};
pub use models::{
    build_url, endpoint, filter_clause, select_clause, Dataset, FilterValue, Filters, Query,
    RecordTable,
};
