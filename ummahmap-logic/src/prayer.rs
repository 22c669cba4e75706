use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// The daily prayers (and sunrise) in the order they happen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Prayer {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl Prayer {
    pub const ALL: [Prayer; 6] = [
        Self::Fajr,
        Self::Sunrise,
        Self::Dhuhr,
        Self::Asr,
        Self::Maghrib,
        Self::Isha,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Fajr => "Fajr",
            Self::Sunrise => "Sunrise",
            Self::Dhuhr => "Dhuhr",
            Self::Asr => "Asr",
            Self::Maghrib => "Maghrib",
            Self::Isha => "Isha",
        }
    }

    /// Match a label as mosque websites tend to write it, e.g. "Zuhr" or "ISHA'A"
    pub fn from_label(label: &str) -> Option<Self> {
        let key = strip_diacritics(label)
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_ascii_lowercase();

        match key.as_str() {
            "fajr" | "fajar" | "fajir" | "subh" => Some(Self::Fajr),
            "sunrise" | "shuruq" | "shurooq" | "shorouk" => Some(Self::Sunrise),
            "dhuhr" | "zuhr" | "duhr" | "dhuhur" | "zohr" | "thuhr" => Some(Self::Dhuhr),
            "asr" | "asar" => Some(Self::Asr),
            "maghrib" | "magrib" | "maghreb" => Some(Self::Maghrib),
            "isha" | "ishaa" | "esha" => Some(Self::Isha),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
/// Time of each prayer as a display string (usually `HH:MM`)
pub struct Timings {
    #[serde(default)]
    pub fajr: Option<String>,
    #[serde(default)]
    pub sunrise: Option<String>,
    #[serde(default)]
    pub dhuhr: Option<String>,
    #[serde(default)]
    pub asr: Option<String>,
    #[serde(default)]
    pub maghrib: Option<String>,
    #[serde(default)]
    pub isha: Option<String>,
}

impl Timings {
    pub fn get(&self, prayer: Prayer) -> Option<&str> {
        let slot = match prayer {
            Prayer::Fajr => &self.fajr,
            Prayer::Sunrise => &self.sunrise,
            Prayer::Dhuhr => &self.dhuhr,
            Prayer::Asr => &self.asr,
            Prayer::Maghrib => &self.maghrib,
            Prayer::Isha => &self.isha,
        };
        slot.as_deref()
    }

    pub fn set(&mut self, prayer: Prayer, time: String) {
        let slot = match prayer {
            Prayer::Fajr => &mut self.fajr,
            Prayer::Sunrise => &mut self.sunrise,
            Prayer::Dhuhr => &mut self.dhuhr,
            Prayer::Asr => &mut self.asr,
            Prayer::Maghrib => &mut self.maghrib,
            Prayer::Isha => &mut self.isha,
        };
        *slot = Some(time);
    }

    pub fn is_empty(&self) -> bool {
        Prayer::ALL.iter().all(|p| self.get(*p).is_none())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Localized {
    #[serde(default)]
    pub en: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HijriMonth {
    #[serde(default)]
    pub number: Option<u8>,
    pub en: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
/// Hijri date as reported by AlAdhan
pub struct HijriDate {
    /// `DD-MM-YYYY`
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub month: Option<HijriMonth>,
    #[serde(default)]
    pub weekday: Option<Localized>,
}

impl HijriDate {
    fn weekday(&self) -> Option<&str> {
        self.weekday
            .as_ref()
            .and_then(|w| w.en.as_deref())
            .filter(|w| !w.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GregorianDate {
    /// `DD-MM-YYYY`
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MethodInfo {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
/// Prayer times for today at some location
pub struct PrayerTimes {
    #[serde(default)]
    pub timings: Timings,
    #[serde(default)]
    pub hijri: Option<HijriDate>,
    #[serde(default)]
    pub gregorian: Option<GregorianDate>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub method: Option<MethodInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrayerCard {
    pub prayer: Prayer,
    pub time: String,
}

/// One card per prayer that has a time, in daily order
pub fn prayer_cards(timings: &Timings) -> Vec<PrayerCard> {
    Prayer::ALL
        .iter()
        .filter_map(|&prayer| {
            timings
                .get(prayer)
                .filter(|t| !t.trim().is_empty())
                .map(|time| PrayerCard {
                    prayer,
                    time: time.to_string(),
                })
        })
        .collect()
}

/// Drop combining accents, "Ramaḍān" becomes "Ramadan"
pub fn strip_diacritics(s: &str) -> String {
    s.nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect()
}

pub const HIJRI_UNAVAILABLE: &str = "Hijri: Unable to load";

/// Header line for the Hijri date, e.g. `Hijri: Al Juma'a, 14 Ramadan 1446 AH`
pub fn hijri_label(hijri: &HijriDate) -> String {
    let (Some(month), Some(day), Some(year)) = (&hijri.month, &hijri.day, &hijri.year) else {
        return HIJRI_UNAVAILABLE.to_string();
    };
    let month = strip_diacritics(&month.en);
    match hijri.weekday() {
        Some(weekday) => format!("Hijri: {weekday}, {day} {month} {year} AH"),
        None => format!("Hijri: {day} {month} {year} AH"),
    }
}

/// Turn AlAdhan's `DD-MM-YYYY` into `MM/DD/YY`
pub fn format_gregorian(date: &str) -> Option<String> {
    NaiveDate::parse_from_str(date.trim(), "%d-%m-%Y")
        .ok()
        .map(|d| d.format("%m/%d/%y").to_string())
}

const MISSING: &str = "—";

/// The metadata shown below the prayer cards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrayerSummary {
    pub timezone: String,
    pub method: String,
    pub today: String,
    pub hijri: String,
}

impl PrayerSummary {
    pub fn new(times: &PrayerTimes) -> Self {
        let or_missing = |s: Option<String>| {
            s.filter(|s| !s.is_empty())
                .unwrap_or_else(|| MISSING.to_string())
        };

        let hijri = times.hijri.as_ref();
        let hijri_date = hijri.and_then(|h| h.date.clone()).filter(|d| !d.is_empty());
        let hijri = match (hijri.and_then(HijriDate::weekday), hijri_date) {
            (Some(weekday), Some(date)) => format!("{weekday}, {date}"),
            (Some(weekday), None) => format!("{weekday}, {MISSING}"),
            (None, date) => or_missing(date),
        };

        Self {
            timezone: or_missing(times.timezone.clone()),
            method: or_missing(times.method.as_ref().and_then(|m| m.name.clone())),
            today: or_missing(
                times
                    .gregorian
                    .as_ref()
                    .and_then(|g| g.date.as_deref())
                    .and_then(format_gregorian),
            ),
            hijri,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PrayerTimes {
        serde_json::from_str(
            r#"{
                "timings": {"Fajr": "05:12", "Sunrise": "06:30", "Dhuhr": "12:01",
                            "Asr": "15:20", "Maghrib": "17:45", "Isha": ""},
                "hijri": {"date": "14-09-1446", "day": "14", "year": "1446",
                          "month": {"number": 9, "en": "Ramaḍān"},
                          "weekday": {"en": "Al Juma'a"}},
                "gregorian": {"date": "14-03-2025"},
                "timezone": "America/New_York",
                "method": {"id": 2, "name": "Islamic Society of North America (ISNA)"}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn cards_in_order() {
        let mut timings = sample().timings;
        timings.fajr = None;
        let names = prayer_cards(&timings)
            .into_iter()
            .map(|c| c.prayer.name())
            .collect::<Vec<_>>();
        assert_eq!(names, ["Sunrise", "Dhuhr", "Asr", "Maghrib"]);
    }

    #[test]
    fn hijri() {
        let times = sample();
        assert_eq!(
            hijri_label(times.hijri.as_ref().unwrap()),
            "Hijri: Al Juma'a, 14 Ramadan 1446 AH"
        );
        assert_eq!(hijri_label(&HijriDate::default()), HIJRI_UNAVAILABLE);
        assert_eq!(strip_diacritics("Dhū al-Qaʿdah"), "Dhu al-Qaʿdah");
        assert_eq!(strip_diacritics("Shawwāl"), "Shawwal");
    }

    #[test]
    fn gregorian() {
        assert_eq!(format_gregorian("14-03-2025").as_deref(), Some("03/14/25"));
        assert_eq!(format_gregorian("2025-03-14"), None);
        assert_eq!(format_gregorian(""), None);
    }

    #[test]
    fn summary() {
        let summary = PrayerSummary::new(&sample());
        assert_eq!(summary.timezone, "America/New_York");
        assert_eq!(summary.today, "03/14/25");
        assert_eq!(summary.hijri, "Al Juma'a, 14-09-1446");

        let empty = PrayerSummary::new(&PrayerTimes::default());
        assert_eq!(empty.timezone, "—");
        assert_eq!(empty.method, "—");
        assert_eq!(empty.today, "—");
        assert_eq!(empty.hijri, "—");
    }

    #[test]
    fn website_labels() {
        assert_eq!(Prayer::from_label("  Zuhr "), Some(Prayer::Dhuhr));
        assert_eq!(Prayer::from_label("ISHA'A"), Some(Prayer::Isha));
        assert_eq!(Prayer::from_label("Shurūq"), Some(Prayer::Sunrise));
        assert_eq!(Prayer::from_label("Jumuah"), None);
    }
}
