use log::debug;
use scraper::{ElementRef, Html, Selector};
use ummahmap_logic::{Prayer, Timings};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeError {
    InvalidSelector(String),
    NoMatches,
}

fn parse_selector(raw: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(raw).map_err(|why| ScrapeError::InvalidSelector(format!("{raw}: {why:?}")))
}

/// All text under an element with whitespace collapsed
fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Read prayer times out of a page. Each element matching `row` should hold one prayer, with its
/// name under `name` and its time under `time`. Rows whose name isn't a known prayer are skipped,
/// and the first row for a prayer wins.
pub fn scrape_timings(html: &str, row: &str, name: &str, time: &str) -> Result<Timings, ScrapeError> {
    let row_sel = parse_selector(row)?;
    let name_sel = parse_selector(name)?;
    let time_sel = parse_selector(time)?;

    let doc = Html::parse_document(html);
    let mut timings = Timings::default();

    for row in doc.select(&row_sel) {
        let label = row.select(&name_sel).next().map(element_text);
        let value = row.select(&time_sel).next().map(element_text);
        let (Some(label), Some(value)) = (label, value) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        match Prayer::from_label(&label) {
            Some(prayer) if timings.get(prayer).is_none() => timings.set(prayer, value),
            Some(_) => {}
            None => debug!("Skipping unknown prayer row {label:?}"),
        }
    }

    if timings.is_empty() {
        Err(ScrapeError::NoMatches)
    } else {
        Ok(timings)
    }
}
