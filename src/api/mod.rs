//! API module for openFEMA REST interactions

mod client;
mod data;

pub use client::OpenFemaClient;
pub use data::{page_offsets, PAGE_SIZE};
