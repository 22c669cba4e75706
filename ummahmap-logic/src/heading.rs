use serde::{Deserialize, Deserializer, Serialize};

/// An angle in degrees, 0 = north, increasing clockwise
pub type Degrees = f64;

const FULL_TURN: Degrees = 360.0;

/// Map any angle into `[0, 360)`, wrapping negative values around
pub fn normalize(d: Degrees) -> Degrees {
    let wrapped = d.rem_euclid(FULL_TURN);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= FULL_TURN { 0.0 } else { wrapped }
}

/// Treat any JSON value that isn't a finite number as missing
fn numeric_field<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Degrees>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(de)?;
    Ok(value
        .and_then(|v| v.as_f64())
        .filter(|v| v.is_finite()))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A single reading from a device orientation sensor.
///
/// Some devices report a north-referenced compass heading directly
/// (`webkitCompassHeading`), others only report the raw `alpha` rotation
/// which runs counter-clockwise.
pub struct OrientationEvent {
    #[serde(
        default,
        rename = "webkitCompassHeading",
        deserialize_with = "numeric_field"
    )]
    pub compass_heading: Option<Degrees>,
    #[serde(default, deserialize_with = "numeric_field")]
    pub alpha: Option<Degrees>,
    /// Whether this came from an absolute (earth-referenced) orientation source
    #[serde(default)]
    pub absolute: bool,
}

impl OrientationEvent {
    pub fn from_compass(heading: Degrees) -> Self {
        Self {
            compass_heading: Some(heading),
            ..Default::default()
        }
    }

    pub fn from_alpha(alpha: Degrees) -> Self {
        Self {
            alpha: Some(alpha),
            ..Default::default()
        }
    }
}

/// Get the heading the device is facing from a sensor event, preferring the compass heading
pub fn extract_heading(event: &OrientationEvent) -> Option<Degrees> {
    let finite = |v: &Degrees| v.is_finite();
    if let Some(heading) = event.compass_heading.filter(finite) {
        Some(heading)
    } else {
        event
            .alpha
            .filter(finite)
            .map(|alpha| normalize(FULL_TURN - alpha))
    }
}

/// How far the needle should be rotated from the device's facing to point at `target_bearing`.
/// Without a heading the absolute bearing is returned as-is.
pub fn compute_display_angle(target_bearing: Degrees, device_heading: Option<Degrees>) -> Degrees {
    match device_heading {
        Some(heading) => normalize(target_bearing - heading),
        None => target_bearing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_range() {
        for d in [-1080.5, -360.0, -359.9, -1.0, -1e-20, 0.0, 0.5, 359.999, 360.0, 725.0, 1e9] {
            let n = normalize(d);
            assert!((0.0..360.0).contains(&n), "normalize({d}) = {n} out of range");
        }
    }

    #[test]
    fn normalize_wraps_full_turns() {
        for d in [-45.0, 0.0, 12.25, 200.0] {
            for k in -3..=3 {
                let shifted = d + 360.0 * k as f64;
                assert!(
                    (normalize(shifted) - normalize(d)).abs() < 1e-9,
                    "normalize({shifted}) != normalize({d})"
                );
            }
        }
        assert_eq!(normalize(-40.0), 320.0);
        assert_eq!(normalize(360.0), 0.0);
    }

    #[test]
    fn display_angle_without_heading() {
        assert_eq!(compute_display_angle(58.5, None), 58.5);
        assert_eq!(compute_display_angle(0.0, None), 0.0);
    }

    #[test]
    fn display_angle_relative() {
        assert_eq!(compute_display_angle(90.0, Some(45.0)), 45.0);
        assert_eq!(compute_display_angle(10.0, Some(350.0)), 20.0);
        assert_eq!(compute_display_angle(0.0, Some(0.0)), 0.0);
        assert_eq!(compute_display_angle(45.0, Some(90.0)), 315.0);
    }

    #[test]
    fn heading_from_alpha() {
        assert_eq!(extract_heading(&OrientationEvent::from_alpha(30.0)), Some(330.0));
        assert_eq!(extract_heading(&OrientationEvent::from_alpha(0.0)), Some(0.0));
        assert_eq!(extract_heading(&OrientationEvent::from_alpha(400.0)), Some(320.0));
    }

    #[test]
    fn heading_prefers_compass() {
        let event = OrientationEvent {
            compass_heading: Some(12.0),
            alpha: Some(30.0),
            absolute: true,
        };
        assert_eq!(extract_heading(&event), Some(12.0));
    }

    #[test]
    fn heading_absent() {
        assert_eq!(extract_heading(&OrientationEvent::default()), None);
        let nan = OrientationEvent::from_compass(f64::NAN);
        assert_eq!(extract_heading(&nan), None);
    }

    #[test]
    fn parse_browser_events() {
        let ios: OrientationEvent =
            serde_json::from_str(r#"{"webkitCompassHeading": 271.5, "alpha": 88.0}"#).unwrap();
        assert_eq!(extract_heading(&ios), Some(271.5));

        let android: OrientationEvent =
            serde_json::from_str(r#"{"alpha": 90, "absolute": true}"#).unwrap();
        assert!(android.absolute);
        assert_eq!(extract_heading(&android), Some(270.0));

        let junk: OrientationEvent =
            serde_json::from_str(r#"{"webkitCompassHeading": "north", "alpha": null}"#).unwrap();
        assert_eq!(extract_heading(&junk), None);
    }
}
