use log::warn;
use serde::Deserialize;
use serde_json::Value;
use ummahmap_logic::{
    ErrorBody, GregorianDate, HijriDate, MethodInfo, NearestMosque, PrayerTimes, Timings,
};

use crate::routes::ApiError;

#[derive(Deserialize)]
struct AladhanDate {
    #[serde(default)]
    hijri: Option<HijriDate>,
    #[serde(default)]
    gregorian: Option<GregorianDate>,
}

#[derive(Deserialize)]
struct AladhanMeta {
    #[serde(default)]
    timezone: Option<String>,
    #[serde(default)]
    method: Option<MethodInfo>,
}

#[derive(Deserialize)]
struct AladhanData {
    timings: Timings,
    date: AladhanDate,
    meta: AladhanMeta,
}

/// Reshape an AlAdhan `/v1/timings` response into [PrayerTimes]
pub fn shape_timings(body: Value) -> Result<PrayerTimes, ApiError> {
    if body.get("code").and_then(Value::as_i64) != Some(200) {
        warn!("AlAdhan returned an error: {body}");
        return Err(ApiError::bad_gateway(ErrorBody {
            error: "Failed to fetch prayer times".to_string(),
            raw: Some(body),
        }));
    }

    let data = body.get("data").cloned().unwrap_or(Value::Null);
    let data = serde_json::from_value::<AladhanData>(data).map_err(|why| {
        warn!("Unexpected AlAdhan response shape: {why}");
        ApiError::bad_gateway(ErrorBody::new("Failed to fetch prayer times"))
    })?;

    Ok(PrayerTimes {
        timings: data.timings,
        hijri: data.date.hijri,
        gregorian: data.date.gregorian,
        timezone: data.meta.timezone,
        method: data.meta.method,
    })
}

#[derive(Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Deserialize)]
struct Place {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    place_id: Option<String>,
    #[serde(default)]
    vicinity: Option<String>,
    #[serde(default)]
    formatted_address: Option<String>,
    geometry: Geometry,
}

#[derive(Deserialize)]
struct PlacesResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    results: Vec<Place>,
}

/// Pick the closest mosque out of a Places nearby search ranked by distance
pub fn nearest_from_places(body: Value) -> Result<NearestMosque, ApiError> {
    let resp = serde_json::from_value::<PlacesResponse>(body).map_err(|why| {
        warn!("Unexpected Places response shape: {why}");
        ApiError::bad_gateway(ErrorBody::new("Failed to search for mosques"))
    })?;

    let Some(place) = resp.results.into_iter().next() else {
        if let Some(status) = resp.status.filter(|s| s != "OK" && s != "ZERO_RESULTS") {
            warn!("Places search returned status {status}");
        }
        return Err(ApiError::not_found("No mosques found nearby"));
    };

    let address = place
        .vicinity
        .filter(|a| !a.is_empty())
        .or(place.formatted_address)
        .unwrap_or_default();

    Ok(NearestMosque::new(
        place.name.unwrap_or_default(),
        place.place_id,
        address,
        place.geometry.location.lat,
        place.geometry.location.lng,
    ))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::*;

    #[test]
    fn aladhan_success() {
        let body = json!({
            "code": 200,
            "status": "OK",
            "data": {
                "timings": {
                    "Fajr": "05:12", "Sunrise": "06:30", "Dhuhr": "12:01", "Asr": "15:20",
                    "Sunset": "17:43", "Maghrib": "17:45", "Isha": "19:02", "Imsak": "05:02",
                    "Midnight": "00:01"
                },
                "date": {
                    "readable": "14 Mar 2025",
                    "hijri": {
                        "date": "14-09-1446", "day": "14", "year": "1446",
                        "weekday": {"en": "Al Juma'a", "ar": "الجمعة"},
                        "month": {"number": 9, "en": "Ramaḍān", "ar": "رَمَضان", "days": 30}
                    },
                    "gregorian": {"date": "14-03-2025", "day": "14"}
                },
                "meta": {
                    "latitude": 40.7128,
                    "timezone": "America/New_York",
                    "method": {"id": 2, "name": "Islamic Society of North America (ISNA)"}
                }
            }
        });

        let times = shape_timings(body).unwrap();
        assert_eq!(times.timings.isha.as_deref(), Some("19:02"));
        assert_eq!(times.timezone.as_deref(), Some("America/New_York"));
        assert_eq!(
            times.method.and_then(|m| m.name).as_deref(),
            Some("Islamic Society of North America (ISNA)")
        );
        assert_eq!(times.gregorian.and_then(|g| g.date).as_deref(), Some("14-03-2025"));
        assert_eq!(times.hijri.and_then(|h| h.month).map(|m| m.en).as_deref(), Some("Ramaḍān"));

        let serialized = serde_json::to_value(&times.timings).unwrap();
        assert!(serialized.get("Midnight").is_none());
        assert_eq!(serialized["Fajr"], "05:12");
    }

    #[test]
    fn aladhan_failure() {
        let body = json!({"code": 400, "status": "BAD_REQUEST", "data": "Invalid latitude"});
        let err = shape_timings(body.clone()).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.body().error, "Failed to fetch prayer times");
        assert_eq!(err.body().raw, Some(body));
    }

    #[test]
    fn places_first_result() {
        let body = json!({
            "status": "OK",
            "results": [
                {
                    "name": "Masjid Al-Noor",
                    "place_id": "abc123",
                    "formatted_address": "12 Elm St, Springfield",
                    "geometry": {"location": {"lat": 40.1, "lng": -74.2}}
                },
                {
                    "name": "Further Masjid",
                    "vicinity": "99 Far Rd",
                    "geometry": {"location": {"lat": 41.0, "lng": -75.0}}
                }
            ]
        });
        let mosque = nearest_from_places(body).unwrap();
        assert_eq!(mosque.name, "Masjid Al-Noor");
        assert_eq!(mosque.place_id.as_deref(), Some("abc123"));
        assert_eq!(mosque.address, "12 Elm St, Springfield");
        assert_eq!(
            mosque.maps_directions_url,
            "https://www.google.com/maps/dir/?api=1&destination=40.1,-74.2"
        );
    }

    #[test]
    fn places_prefers_vicinity() {
        let body = json!({"results": [{
            "name": "Masjid",
            "vicinity": "1 Short St",
            "formatted_address": "1 Short St, Long Town, Country",
            "geometry": {"location": {"lat": 1.0, "lng": 2.0}}
        }]});
        assert_eq!(nearest_from_places(body).unwrap().address, "1 Short St");
    }

    #[test]
    fn places_empty() {
        let err = nearest_from_places(json!({"status": "ZERO_RESULTS", "results": []})).unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.body().error, "No mosques found nearby");
    }
}
