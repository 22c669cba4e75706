use serde::{Deserialize, Serialize};

use crate::location::Location;

/// Google Maps link that opens turn-by-turn directions to the given point
pub fn directions_url(lat: f64, lng: f64) -> String {
    format!("https://www.google.com/maps/dir/?api=1&destination={lat},{lng}")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// The closest mosque to the user
pub struct NearestMosque {
    pub name: String,
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub maps_directions_url: String,
}

impl NearestMosque {
    pub fn new(name: String, place_id: Option<String>, address: String, lat: f64, lng: f64) -> Self {
        Self {
            name,
            place_id,
            address,
            lat,
            lng,
            maps_directions_url: directions_url(lat, lng),
        }
    }

    pub fn location(&self) -> Location {
        Location::new(self.lat, self.lng)
    }

    /// Coordinates as shown under the mosque name, e.g. `(40.71280, -74.00600)`
    pub fn coordinates_label(&self) -> String {
        format!("({:.5}, {:.5})", self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels() {
        let mosque = NearestMosque::new(
            "Islamic Center".to_string(),
            None,
            "1 Main St".to_string(),
            40.7128,
            -74.006,
        );
        assert_eq!(mosque.coordinates_label(), "(40.71280, -74.00600)");
        assert_eq!(
            mosque.maps_directions_url,
            "https://www.google.com/maps/dir/?api=1&destination=40.7128,-74.006"
        );
    }
}
