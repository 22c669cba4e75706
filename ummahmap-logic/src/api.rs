use serde::{Deserialize, Serialize};

use crate::{heading::Degrees, prayer::Timings};

/// Body of every non-success API response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    /// Upstream response, when the failure came from a third party service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            raw: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct QiblaResponse {
    pub bearing_deg: Degrees,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Where to scrape prayer times from, and how to find them in the page
pub struct ScrapeRequest {
    pub url: String,
    /// Matches each row holding one prayer
    pub row_selector: String,
    /// Matches the prayer name within a row
    pub name_selector: String,
    /// Matches the time within a row
    pub time_selector: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScrapedTimings {
    pub timings: Timings,
    /// The page the timings were read from
    pub source: String,
}
