mod compass;

use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info};
use ummahmap_client::ApiClient;
use ummahmap_logic::{
    CalculationMethod, Compass, HIJRI_UNAVAILABLE, Location, LocationService, NearestMosque,
    PrayerQuery, PrayerSummary, PrayerTimes, QuoteRotator, School, ScrapeRequest,
    UserFacingError, acquire_location, hijri_label, prayer_cards, prelude::*, random_quote,
};

use crate::compass::{FixedLocation, TerminalNeedle, open_events, orientation_events, track_qibla};

#[derive(Parser)]
#[command(name = "ummahmap", about = "Prayer times, nearest mosque and qibla compass")]
struct Cli {
    /// Latitude of the current location
    #[arg(long, global = true, allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude of the current location
    #[arg(long, global = true, allow_negative_numbers = true)]
    lng: Option<f64>,

    /// Base URL of the UmmahMap server, defaults to the one this was built against
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum SchoolValue {
    Shafi,
    Hanafi,
}

impl From<SchoolValue> for School {
    fn from(value: SchoolValue) -> Self {
        match value {
            SchoolValue::Shafi => School::Shafi,
            SchoolValue::Hanafi => School::Hanafi,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show an inspirational quote
    Quote {
        /// Keep showing a new quote every 5 minutes until interrupted
        #[arg(long)]
        rotate: bool,
    },
    /// Show today's Hijri date
    Hijri,
    /// Show today's prayer times for the current location
    PrayerTimes {
        /// AlAdhan calculation method id
        #[arg(long, default_value_t = CalculationMethod::ISNA.0)]
        method: u8,
        /// Juristic school used for Asr
        #[arg(long, value_enum, default_value_t = SchoolValue::Shafi)]
        school: SchoolValue,
    },
    /// Find the nearest mosque to the current location
    Nearest,
    /// Read prayer times off a mosque's website
    Scrape {
        /// Page listing the prayer times
        url: String,
        /// CSS selector matching one row per prayer
        row_selector: String,
        /// CSS selector for the prayer name within a row
        name_selector: String,
        /// CSS selector for the time within a row
        time_selector: String,
    },
    /// Point a compass needle at the qibla, reading orientation events as JSON lines
    Qibla {
        /// File to read events from, stdin if not given
        #[arg(long)]
        events: Option<PathBuf>,
    },
}

type CommandResult = Result<(), UserFacingError>;

async fn show_quotes(rotate: bool) {
    if !rotate {
        println!("{}", random_quote());
        return;
    }

    let rotator = QuoteRotator::default();
    let cancel = rotator.cancel_token();
    tokio::join!(rotator.run(|quote| println!("{quote}")), async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupted, stopping quotes");
        }
        cancel.cancel();
    });
}

async fn show_hijri(api: &ApiClient, location: &impl LocationService) {
    let times = match acquire_location(location).await {
        Ok(loc) => api.prayer_times(PrayerQuery::at(loc)).await.ok(),
        Err(_) => None,
    };
    let label = times
        .and_then(|t| t.hijri)
        .map(|h| hijri_label(&h))
        .unwrap_or_else(|| HIJRI_UNAVAILABLE.to_string());
    println!("{label}");
}

fn print_prayer_times(times: &PrayerTimes) {
    for card in prayer_cards(&times.timings) {
        println!("{:<8} {}", card.prayer.name(), card.time);
    }
    let summary = PrayerSummary::new(times);
    println!();
    println!("Timezone: {}", summary.timezone);
    println!("Method: {}", summary.method);
    println!("Today: {} | Hijri: {}", summary.today, summary.hijri);
}

async fn show_prayer_times(
    api: &ApiClient,
    location: &impl LocationService,
    method: u8,
    school: School,
) -> CommandResult {
    let loc = acquire_location(location).await?;
    let query = PrayerQuery {
        method: CalculationMethod(method),
        school,
        ..PrayerQuery::at(loc)
    };
    let times = api.prayer_times(query).await?;
    print_prayer_times(&times);
    Ok(())
}

fn print_mosque(mosque: &NearestMosque) {
    println!("{}", mosque.name);
    if !mosque.address.is_empty() {
        println!("{}", mosque.address);
    }
    println!("{}", mosque.coordinates_label());
    println!("Open Directions (Google Maps): {}", mosque.maps_directions_url);
}

async fn show_nearest(api: &ApiClient, location: &impl LocationService) -> CommandResult {
    let loc = acquire_location(location).await?;
    let mosque = api.nearest_mosque(loc).await?;
    print_mosque(&mosque);
    Ok(())
}

const SELECTOR_TIP: &str = "Tip: update the CSS selectors to match the mosque website.";

async fn show_scraped(api: &ApiClient, req: ScrapeRequest) -> CommandResult {
    match api.prayer_times_from_website(&req).await {
        Ok(scraped) => {
            let pretty = serde_json::to_string_pretty(&scraped)
                .map_err(|why| UserFacingError::request(why.to_string()))?;
            println!("{pretty}");
            Ok(())
        }
        Err(why) => {
            println!("{SELECTOR_TIP}");
            Err(why)
        }
    }
}

async fn run_qibla(
    api: ApiClient,
    location: FixedLocation,
    events: Option<PathBuf>,
) -> Result<CommandResult> {
    let events = orientation_events(open_events(events.as_deref()).await?);
    let compass = Compass::new(location, api, TerminalNeedle);

    let res = track_qibla(&compass, events).await;

    let session = compass.snapshot().await;
    info!("Compass finished in {:?}", session.phase());
    Ok(res.map(|_| ()))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    colog::init();

    let cli = Cli::parse();

    let api = match cli.server {
        Some(base) => ApiClient::new(base)?,
        None => ApiClient::compiled()?,
    };
    debug!("Using server at {}", api.base_url());

    let location = FixedLocation(cli.lat.zip(cli.lng).map(|(lat, lng)| Location::new(lat, lng)));

    let res = match cli.command {
        Commands::Quote { rotate } => {
            show_quotes(rotate).await;
            Ok(())
        }
        Commands::Hijri => {
            show_hijri(&api, &location).await;
            Ok(())
        }
        Commands::PrayerTimes { method, school } => {
            show_prayer_times(&api, &location, method, school.into()).await
        }
        Commands::Nearest => show_nearest(&api, &location).await,
        Commands::Scrape {
            url,
            row_selector,
            name_selector,
            time_selector,
        } => {
            let req = ScrapeRequest {
                url,
                row_selector,
                name_selector,
                time_selector,
            };
            show_scraped(&api, req).await
        }
        Commands::Qibla { events } => run_qibla(api, location, events).await?,
    };

    Ok(match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(why) => {
            eprintln!("{}", why.status_line());
            ExitCode::FAILURE
        }
    })
}
