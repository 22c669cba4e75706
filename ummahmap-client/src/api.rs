use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::Url;
use serde::de::DeserializeOwned;

use ummahmap_logic::{
    BearingSource, Degrees, ErrorBody, Location, NearestMosque, PrayerQuery, PrayerTimes,
    QiblaResponse, ScrapeRequest, ScrapedTimings, UserFacingError,
};

use crate::server::SERVER_HTTP_URL;

type ApiResult<T> = Result<T, UserFacingError>;

/// Client for the UmmahMap HTTP API
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
}

/// Pull the server's error text out of a failed response, if there is any
fn error_from_body(body: &[u8]) -> UserFacingError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(body) => UserFacingError::request(body.error),
        Err(_) => UserFacingError::Request(None),
    }
}

fn loc_params(loc: Location) -> [(&'static str, String); 2] {
    [("lat", loc.lat.to_string()), ("lng", loc.lng.to_string())]
}

impl ApiClient {
    /// Make a client talking to the server at `base`, e.g. `http://localhost:5000`
    pub fn new(base: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            http,
            base: base.into().trim_end_matches('/').to_string(),
        })
    }

    /// Make a client talking to the server this was built for
    pub fn compiled() -> Result<Self> {
        Self::new(SERVER_HTTP_URL)
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn endpoint<K: AsRef<str>, V: AsRef<str>>(
        &self,
        path: &str,
        params: impl IntoIterator<Item = (K, V)>,
    ) -> ApiResult<Url> {
        let url = format!("{}{path}", self.base);
        Url::parse_with_params(&url, params)
            .map_err(|why| UserFacingError::request(format!("Invalid server URL {url}: {why}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        debug!("GET {url}");
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|why| UserFacingError::request(why.to_string()))?;
        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|why| UserFacingError::request(why.to_string()))?;

        if !status.is_success() {
            let err = error_from_body(&body);
            warn!("Request failed with {status}: {err}");
            return Err(err);
        }

        serde_json::from_slice(&body)
            .map_err(|why| UserFacingError::request(format!("Malformed response: {why}")))
    }

    /// Bearing from `loc` to the qibla in degrees
    pub async fn qibla_bearing(&self, loc: Location) -> ApiResult<Degrees> {
        let url = self.endpoint("/api/qibla", loc_params(loc))?;
        let QiblaResponse { bearing_deg } = self.get_json(url).await?;
        if bearing_deg.is_finite() {
            Ok(bearing_deg)
        } else {
            Err(UserFacingError::request("Malformed response: bearing is not a number"))
        }
    }

    pub async fn prayer_times(&self, query: PrayerQuery) -> ApiResult<PrayerTimes> {
        let params = [
            ("lat", query.lat.to_string()),
            ("lng", query.lng.to_string()),
            ("method", query.method.0.to_string()),
            ("school", u8::from(query.school).to_string()),
        ];
        let url = self.endpoint("/api/prayer_times", params)?;
        self.get_json(url).await
    }

    pub async fn nearest_mosque(&self, loc: Location) -> ApiResult<NearestMosque> {
        let url = self.endpoint("/api/nearest_mosque", loc_params(loc))?;
        self.get_json(url).await
    }

    pub async fn prayer_times_from_website(&self, req: &ScrapeRequest) -> ApiResult<ScrapedTimings> {
        let params = [
            ("url", req.url.as_str()),
            ("row_selector", req.row_selector.as_str()),
            ("name_selector", req.name_selector.as_str()),
            ("time_selector", req.time_selector.as_str()),
        ];
        let url = self.endpoint("/api/prayer_times_from_website", params)?;
        self.get_json(url).await
    }
}

impl BearingSource for ApiClient {
    async fn fetch_bearing(&self, location: Location) -> ApiResult<Degrees> {
        self.qibla_bearing(location).await
    }
}
