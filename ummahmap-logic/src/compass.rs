use std::future::Future;

use futures::{Stream, StreamExt};
use log::{debug, info, warn};
use tokio::sync::RwLock;

use crate::{
    error::UserFacingError,
    heading::{Degrees, OrientationEvent, compute_display_angle, extract_heading, normalize},
    location::{Location, LocationService, acquire_location},
};

/// Where a [QiblaSession] is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompassPhase {
    /// No bearing has been fetched yet, the needle isn't drawn
    Uninitialized,
    /// Bearing is known but no heading sample has arrived, the needle points at the absolute
    /// bearing
    BearingKnown,
    /// Bearing is known and the needle is relative to the device's facing
    Tracking,
}

/// The state of one compass session. Only the most recent bearing and heading are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QiblaSession {
    bearing: Option<Degrees>,
    heading: Option<Degrees>,
}

impl QiblaSession {
    pub fn phase(&self) -> CompassPhase {
        match (self.bearing, self.heading) {
            (None, _) => CompassPhase::Uninitialized,
            (Some(_), None) => CompassPhase::BearingKnown,
            (Some(_), Some(_)) => CompassPhase::Tracking,
        }
    }

    pub fn bearing(&self) -> Option<Degrees> {
        self.bearing
    }

    pub fn heading(&self) -> Option<Degrees> {
        self.heading
    }

    /// The angle the needle should currently be drawn at, if it should be drawn at all
    pub fn display_angle(&self) -> Option<Degrees> {
        self.bearing
            .map(|bearing| compute_display_angle(bearing, self.heading))
    }

    /// Replace the target bearing, returns the new display angle
    pub fn set_bearing(&mut self, bearing: Degrees) -> Degrees {
        let bearing = normalize(bearing);
        self.bearing = Some(bearing);
        compute_display_angle(bearing, self.heading)
    }

    /// Take in a new sensor reading. Returns the new display angle if the needle needs to be
    /// redrawn. Events with no usable heading are ignored entirely.
    pub fn apply_event(&mut self, event: &OrientationEvent) -> Option<Degrees> {
        let heading = extract_heading(event)?;
        self.heading = Some(heading);
        self.display_angle()
    }
}

pub trait BearingSource {
    /// Look up the bearing to the qibla from the given location
    fn fetch_bearing(
        &self,
        location: Location,
    ) -> impl Future<Output = Result<Degrees, UserFacingError>>;
}

/// Something that can draw the compass needle
pub trait NeedleRenderer {
    /// Rotate the needle to `angle` degrees clockwise
    fn rotate_needle(&self, angle: Degrees);
    /// Show the absolute bearing to the user
    fn show_bearing(&self, bearing: Degrees);
}

/// A compass session, gets location with [LocationService], looks up the bearing with
/// [BearingSource] and draws with [NeedleRenderer]
pub struct Compass<L: LocationService, B: BearingSource, R: NeedleRenderer> {
    session: RwLock<QiblaSession>,
    location: L,
    bearings: B,
    renderer: R,
}

impl<L: LocationService, B: BearingSource, R: NeedleRenderer> Compass<L, B, R> {
    pub fn new(location: L, bearings: B, renderer: R) -> Self {
        Self {
            session: RwLock::new(QiblaSession::default()),
            location,
            bearings,
            renderer,
        }
    }

    pub async fn snapshot(&self) -> QiblaSession {
        *self.session.read().await
    }

    /// Get the current location and look up the bearing for it. On failure the session and
    /// needle are left as they were.
    pub async fn refresh_bearing(&self) -> Result<Degrees, UserFacingError> {
        let location = acquire_location(&self.location).await?;
        debug!("Got location {location:?}, fetching bearing");
        let bearing = self
            .bearings
            .fetch_bearing(location)
            .await
            .inspect_err(|why| warn!("Failed to fetch qibla bearing: {why}"))?;

        let mut session = self.session.write().await;
        let angle = session.set_bearing(bearing);
        let bearing = session.bearing().unwrap_or(bearing);
        drop(session);

        info!("Qibla bearing is {bearing:.1}");
        self.renderer.show_bearing(bearing);
        self.renderer.rotate_needle(angle);
        Ok(bearing)
    }

    /// Handle one orientation reading, redrawing the needle if the bearing is known
    pub async fn handle_event(&self, event: &OrientationEvent) {
        let angle = self.session.write().await.apply_event(event);
        if let Some(angle) = angle {
            self.renderer.rotate_needle(angle);
        }
    }

    /// Consume orientation readings until the stream ends
    pub async fn run(&self, events: impl Stream<Item = OrientationEvent>) {
        let mut events = std::pin::pin!(events);
        while let Some(event) = events.next().await {
            self.handle_event(&event).await;
        }
        debug!("Orientation stream ended");
    }
}
