mod api;
mod compass;
mod error;
mod geo;
mod heading;
mod location;
mod mosque;
mod prayer;
mod quotes;
mod settings;

pub use api::{ErrorBody, QiblaResponse, ScrapeRequest, ScrapedTimings};
pub use compass::{BearingSource, Compass, CompassPhase, NeedleRenderer, QiblaSession};
pub use error::{Capability, UserFacingError};
pub use geo::{KAABA, initial_bearing, qibla_bearing};
pub use heading::{Degrees, OrientationEvent, compute_display_angle, extract_heading, normalize};
pub use location::{LOCATION_TIMEOUT, Location, LocationError, LocationService, acquire_location};
pub use mosque::{NearestMosque, directions_url};
pub use prayer::{
    GregorianDate, HIJRI_UNAVAILABLE, HijriDate, HijriMonth, Localized, MethodInfo, Prayer,
    PrayerCard, PrayerSummary, PrayerTimes, Timings, format_gregorian, hijri_label, prayer_cards,
    strip_diacritics,
};
pub use quotes::{QUOTE_INTERVAL, QUOTES, QuoteRotator, random_quote};
pub use settings::{CalculationMethod, PrayerQuery, School};

pub mod prelude {
    use anyhow::Error as AnyhowError;
    use std::result::Result as StdResult;
    pub type Result<T = (), E = AnyhowError> = StdResult<T, E>;
    pub use anyhow::Context;
}
