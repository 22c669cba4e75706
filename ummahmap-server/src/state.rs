use std::time::Duration;

use anyhow::Context;
use log::{debug, warn};
use reqwest::Url;
use serde_json::Value;

use crate::Result;

pub const ALADHAN_TIMINGS_URL: &str = "https://api.aladhan.com/v1/timings";
pub const PLACES_NEARBY_URL: &str = "https://maps.googleapis.com/maps/api/place/nearbysearch/json";

/// How long to wait on any third party service
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct ServerState {
    http: reqwest::Client,
    google_key: Option<String>,
    pub aladhan_url: String,
    pub places_url: String,
}

impl ServerState {
    pub fn new(google_key: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            http,
            google_key: google_key.filter(|k| !k.trim().is_empty()),
            aladhan_url: ALADHAN_TIMINGS_URL.to_string(),
            places_url: PLACES_NEARBY_URL.to_string(),
        })
    }

    /// Read the Google Maps key from `GOOGLE_MAPS_API_KEY`
    pub fn from_env() -> Result<Self> {
        let key = std::env::var("GOOGLE_MAPS_API_KEY").ok();
        if key.is_none() {
            warn!("GOOGLE_MAPS_API_KEY is not set, nearest mosque lookups will fail");
        }
        Self::new(key)
    }

    pub fn google_key(&self) -> Option<&str> {
        self.google_key.as_deref()
    }

    /// GET `base` with the given query and parse the body as JSON, whatever the status
    pub async fn get_json(&self, base: &str, params: &[(&str, String)]) -> Result<Value> {
        let url = Url::parse_with_params(base, params).context("Invalid upstream URL")?;
        debug!("Upstream GET {}", url.path());
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .context("Upstream request failed")?;
        let body = resp.bytes().await.context("Failed to read upstream body")?;
        serde_json::from_slice(&body).context("Upstream returned invalid JSON")
    }

    /// GET an arbitrary page as text, failing on non-success statuses
    pub async fn get_page(&self, url: Url) -> Result<String> {
        self.http
            .get(url)
            .send()
            .await
            .context("Could not reach page")?
            .error_for_status()
            .context("Page returned an error")?
            .text()
            .await
            .context("Failed to read page")
    }
}
