use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use log::{error, info, warn};
use reqwest::Url;
use serde::Deserialize;
use ummahmap_logic::{
    CalculationMethod, ErrorBody, Location, NearestMosque, PrayerTimes, QiblaResponse, School,
    ScrapedTimings, qibla_bearing,
};

use crate::{
    scrape::{ScrapeError, scrape_timings},
    state::ServerState,
    upstream::{nearest_from_places, shape_timings},
};

type SharedState = Arc<ServerState>;

/// An error response, rendered as `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, body: ErrorBody) -> Self {
        Self { status, body }
    }

    pub fn bad_request(msg: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorBody::new(msg))
    }

    pub fn not_found(msg: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, ErrorBody::new(msg))
    }

    pub fn bad_gateway(body: ErrorBody) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, body)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &ErrorBody {
        &self.body
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(why: anyhow::Error) -> Self {
        error!("Upstream error: {why:?}");
        Self::bad_gateway(ErrorBody::new(format!("{why:#}")))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Parse a query value leniently, anything unparseable counts as missing
fn parse_param<T: std::str::FromStr>(raw: &Option<String>) -> Option<T> {
    raw.as_deref().and_then(|s| s.trim().parse().ok())
}

#[derive(Debug, Default, Deserialize)]
pub struct LocQuery {
    lat: Option<String>,
    lng: Option<String>,
}

impl LocQuery {
    fn location(&self) -> Option<Location> {
        let lat = parse_param::<f64>(&self.lat).filter(|l| l.is_finite())?;
        let lng = parse_param::<f64>(&self.lng).filter(|l| l.is_finite())?;
        Some(Location::new(lat, lng))
    }
}

const MISSING_LOCATION: &str = "Missing lat/lng";
const INVALID_SCHOOL: &str = "Invalid school, expected 0 (Shafi) or 1 (Hanafi)";

/// Absent means the default school, anything given must be a school AlAdhan knows
fn school_param(raw: &Option<String>) -> Result<School, ApiError> {
    match raw.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(School::default()),
        Some(s) => s
            .parse::<u8>()
            .ok()
            .and_then(|n| School::try_from(n).ok())
            .ok_or_else(|| {
                warn!("Rejecting prayer times request with school {s:?}");
                ApiError::bad_request(INVALID_SCHOOL)
            }),
    }
}

async fn qibla(Query(query): Query<LocQuery>) -> ApiResult<QiblaResponse> {
    let loc = query
        .location()
        .ok_or_else(|| ApiError::bad_request(MISSING_LOCATION))?;
    Ok(Json(QiblaResponse {
        bearing_deg: qibla_bearing(loc),
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct PrayerTimesQuery {
    #[serde(flatten)]
    loc: LocQuery,
    method: Option<String>,
    school: Option<String>,
}

async fn prayer_times(
    State(state): State<SharedState>,
    Query(query): Query<PrayerTimesQuery>,
) -> ApiResult<PrayerTimes> {
    let loc = query
        .loc
        .location()
        .ok_or_else(|| ApiError::bad_request(MISSING_LOCATION))?;
    let method = parse_param::<u8>(&query.method)
        .map(CalculationMethod)
        .unwrap_or_default();
    let school = school_param(&query.school)?;

    let params = [
        ("latitude", loc.lat.to_string()),
        ("longitude", loc.lng.to_string()),
        ("method", method.0.to_string()),
        ("school", u8::from(school).to_string()),
    ];
    let body = state.get_json(&state.aladhan_url, &params).await?;
    shape_timings(body).map(Json)
}

async fn nearest_mosque(
    State(state): State<SharedState>,
    Query(query): Query<LocQuery>,
) -> ApiResult<NearestMosque> {
    let (Some(loc), Some(key)) = (query.location(), state.google_key()) else {
        return Err(ApiError::bad_request(
            "Missing lat/lng or GOOGLE_MAPS_API_KEY",
        ));
    };

    let params = [
        ("key", key.to_string()),
        ("location", format!("{},{}", loc.lat, loc.lng)),
        ("rankby", "distance".to_string()),
        ("type", "mosque".to_string()),
    ];
    let body = state.get_json(&state.places_url, &params).await?;
    let mosque = nearest_from_places(body)?;
    info!("Nearest mosque to {loc:?} is {}", mosque.name);
    Ok(Json(mosque))
}

#[derive(Debug, Default, Deserialize)]
pub struct ScrapeQuery {
    url: Option<String>,
    row_selector: Option<String>,
    name_selector: Option<String>,
    time_selector: Option<String>,
}

fn required(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

async fn prayer_times_from_website(
    State(state): State<SharedState>,
    Query(query): Query<ScrapeQuery>,
) -> ApiResult<ScrapedTimings> {
    let (Some(url), Some(row), Some(name), Some(time)) = (
        required(&query.url),
        required(&query.row_selector),
        required(&query.name_selector),
        required(&query.time_selector),
    ) else {
        return Err(ApiError::bad_request("Missing url or selectors"));
    };

    let page_url = Url::parse(url)
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https"))
        .ok_or_else(|| ApiError::bad_request("Invalid url"))?;

    let html = state.get_page(page_url).await?;

    let timings = scrape_timings(&html, row, name, time).map_err(|why| match why {
        ScrapeError::InvalidSelector(sel) => {
            ApiError::bad_request(&format!("Invalid CSS selector {sel}"))
        }
        ScrapeError::NoMatches => {
            ApiError::not_found("No prayer times found with the given selectors")
        }
    })?;

    Ok(Json(ScrapedTimings {
        timings,
        source: url.to_string(),
    }))
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/api/qibla", get(qibla))
        .route("/api/prayer_times", get(prayer_times))
        .route("/api/nearest_mosque", get(nearest_mosque))
        .route(
            "/api/prayer_times_from_website",
            get(prayer_times_from_website),
        )
        .with_state(Arc::new(state))
}
