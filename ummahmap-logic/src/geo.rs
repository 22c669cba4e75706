use crate::{
    heading::{Degrees, normalize},
    location::Location,
};

/// The Kaaba in Mecca
pub const KAABA: Location = Location::new(21.422487, 39.826206);

/// Initial great-circle bearing when travelling from `from` to `to`
pub fn initial_bearing(from: Location, to: Location) -> Degrees {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let d_lambda = (to.lng - from.lng).to_radians();

    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
    normalize(y.atan2(x).to_degrees())
}

/// Direction of the qibla from the given location
pub fn qibla_bearing(from: Location) -> Degrees {
    initial_bearing(from, KAABA)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Degrees, expected: Degrees) {
        assert!(
            (actual - expected).abs() < 0.5,
            "Expected bearing near {expected}, got {actual}"
        );
    }

    #[test]
    fn known_cities() {
        // New York
        assert_close(qibla_bearing(Location::new(40.7128, -74.0060)), 58.5);
        // London
        assert_close(qibla_bearing(Location::new(51.5074, -0.1278)), 119.0);
        // Jakarta
        assert_close(qibla_bearing(Location::new(-6.2088, 106.8456)), 295.1);
    }

    #[test]
    fn due_directions() {
        assert_close(
            initial_bearing(Location::new(0.0, 0.0), Location::new(10.0, 0.0)),
            0.0,
        );
        assert_close(
            initial_bearing(Location::new(0.0, 0.0), Location::new(0.0, 10.0)),
            90.0,
        );
        assert_close(
            initial_bearing(Location::new(10.0, 0.0), Location::new(0.0, 0.0)),
            180.0,
        );
        assert_close(
            initial_bearing(Location::new(0.0, 10.0), Location::new(0.0, 0.0)),
            270.0,
        );
    }
}
