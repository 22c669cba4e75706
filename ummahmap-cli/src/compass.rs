use std::path::Path;

use anyhow::{Context, Result};
use futures::Stream;
use log::{error, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use ummahmap_logic::{
    BearingSource, Compass, Degrees, Location, LocationError, LocationService, NeedleRenderer,
    OrientationEvent, UserFacingError,
};

/// Location given on the command line. Without one, geolocation is unsupported.
pub struct FixedLocation(pub Option<Location>);

impl LocationService for FixedLocation {
    async fn current_location(&self) -> Result<Location, LocationError> {
        self.0.ok_or(LocationError::Unsupported)
    }
}

/// Draws the needle as a line of text per update
pub struct TerminalNeedle;

impl NeedleRenderer for TerminalNeedle {
    fn rotate_needle(&self, angle: Degrees) {
        println!("Needle: {angle:.1}°");
    }

    fn show_bearing(&self, bearing: Degrees) {
        println!("Qibla bearing: {bearing:.1}°");
    }
}

/// Read orientation events, one JSON object per line, until EOF. Lines that don't parse are
/// skipped.
pub fn orientation_events<R: AsyncBufRead + Unpin>(
    reader: R,
) -> impl Stream<Item = OrientationEvent> {
    futures::stream::unfold(reader.lines(), |mut lines| async move {
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<OrientationEvent>(line) {
                        Ok(event) => return Some((event, lines)),
                        Err(why) => warn!("Ignoring bad orientation event {line:?}: {why}"),
                    }
                }
                Ok(None) => return None,
                Err(why) => {
                    error!("Failed to read orientation events: {why}");
                    return None;
                }
            }
        }
    })
}

pub type EventSource = Box<dyn AsyncBufRead + Unpin>;

/// Open the event file, or stdin if there isn't one
pub async fn open_events(path: Option<&Path>) -> Result<EventSource> {
    Ok(match path {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    })
}

/// Get the qibla bearing, then turn the needle for every event after it. Events aren't read
/// at all if the bearing can't be found.
pub async fn track_qibla<L: LocationService, B: BearingSource, R: NeedleRenderer>(
    compass: &Compass<L, B, R>,
    events: impl Stream<Item = OrientationEvent>,
) -> Result<Degrees, UserFacingError> {
    let bearing = compass.refresh_bearing().await?;
    compass.run(events).await;
    Ok(bearing)
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use futures::StreamExt;
    use ummahmap_logic::{Capability, extract_heading};

    use super::*;

    const HOME: Location = Location::new(51.5074, -0.1278);

    /// Answers like a slow server would
    struct SlowBearings(Degrees);

    impl BearingSource for SlowBearings {
        async fn fetch_bearing(&self, _location: Location) -> Result<Degrees, UserFacingError> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(self.0)
        }
    }

    #[derive(Default, Clone)]
    struct Recorder(Arc<Mutex<Vec<Degrees>>>);

    impl Recorder {
        fn angles(&self) -> Vec<Degrees> {
            self.0.lock().unwrap().clone()
        }
    }

    impl NeedleRenderer for Recorder {
        fn rotate_needle(&self, angle: Degrees) {
            self.0.lock().unwrap().push(angle);
        }

        fn show_bearing(&self, _bearing: Degrees) {}
    }

    #[tokio::test]
    async fn reads_event_lines() {
        let input: &[u8] = b"{\"alpha\": 30}\n\nnot json\n{\"webkitCompassHeading\": 12.5}\n{}\n";
        let headings = orientation_events(input)
            .map(|ev| extract_heading(&ev))
            .collect::<Vec<_>>()
            .await;
        assert_eq!(headings, [Some(330.0), Some(12.5), None]);
    }

    #[tokio::test]
    async fn no_location() {
        assert_eq!(
            FixedLocation(None).current_location().await,
            Err(LocationError::Unsupported)
        );
    }

    #[tokio::test]
    async fn every_event_drawn_after_slow_bearing() {
        let recorder = Recorder::default();
        let compass = Compass::new(
            FixedLocation(Some(HOME)),
            SlowBearings(30.0),
            recorder.clone(),
        );
        let events = futures::stream::iter([
            OrientationEvent::from_compass(10.0),
            OrientationEvent::from_compass(20.0),
            OrientationEvent::from_compass(30.0),
        ]);

        let bearing = track_qibla(&compass, events).await.unwrap();

        assert_eq!(bearing, 30.0);
        assert_eq!(recorder.angles(), [30.0, 20.0, 10.0, 0.0]);
    }

    #[tokio::test]
    async fn stops_without_location() {
        let recorder = Recorder::default();
        let compass = Compass::new(FixedLocation(None), SlowBearings(30.0), recorder.clone());

        let res = tokio::time::timeout(
            Duration::from_secs(1),
            track_qibla(&compass, futures::stream::pending::<OrientationEvent>()),
        )
        .await
        .expect("Kept waiting on events after the bearing failed");

        assert_eq!(res, Err(UserFacingError::Unsupported(Capability::Geolocation)));
        assert!(recorder.angles().is_empty());
    }
}
