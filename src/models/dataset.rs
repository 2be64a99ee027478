//! Supported openFEMA datasets and their endpoints

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Root of the public openFEMA API.
pub const DEFAULT_BASE_URL: &str = "https://www.fema.gov/api/open";

/// API version a dataset is published under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApiVersion {
    V1,
    V2,
}

impl ApiVersion {
    fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        }
    }
}

/// An openFEMA dataset this crate knows how to query.
///
/// The name doubles as the key of the record array in every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    HousingAssistanceOwners,
    HousingAssistanceRenters,
    IndividualsAndHouseholdsProgramValidRegistrations,
}

impl Dataset {
    /// Every supported dataset, in lookup order
    pub const ALL: [Dataset; 3] = [
        Dataset::HousingAssistanceOwners,
        Dataset::HousingAssistanceRenters,
        Dataset::IndividualsAndHouseholdsProgramValidRegistrations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HousingAssistanceOwners => "HousingAssistanceOwners",
            Self::HousingAssistanceRenters => "HousingAssistanceRenters",
            Self::IndividualsAndHouseholdsProgramValidRegistrations => {
                "IndividualsAndHouseholdsProgramValidRegistrations"
            }
        }
    }

    fn api_version(&self) -> ApiVersion {
        match self {
            Self::HousingAssistanceOwners | Self::HousingAssistanceRenters => ApiVersion::V2,
            Self::IndividualsAndHouseholdsProgramValidRegistrations => ApiVersion::V1,
        }
    }

    /// Top-level JSON key holding the records of a response
    pub fn record_key(&self) -> &'static str {
        self.as_str()
    }

    /// Endpoint on the public openFEMA host
    pub fn endpoint(&self) -> String {
        self.endpoint_at(DEFAULT_BASE_URL)
    }

    /// Endpoint resolved against another API root (e.g. a mirror or a test server)
    pub fn endpoint_at(&self, base_url: &str) -> String {
        format!(
            "{}/{}/{}",
            base_url.trim_end_matches('/'),
            self.api_version().as_str(),
            self.as_str()
        )
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|d| d.as_str()).collect()
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dataset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| Error::UnsupportedDataset {
                name: s.to_string(),
                allowed: Self::names(),
            })
    }
}

/// Resolve the endpoint URL for a dataset name.
pub fn endpoint(name: &str) -> crate::Result<String> {
    Ok(name.parse::<Dataset>()?.endpoint())
}
