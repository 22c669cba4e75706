use std::time::Duration;

use log::debug;
use tokio_util::sync::CancellationToken;

pub const QUOTES: [&str; 5] = [
    "Indeed, with hardship comes ease. (Qur'an 94:6)",
    "So remember Me; I will remember you. (Qur'an 2:152)",
    "Allah does not burden a soul beyond that it can bear. (Qur'an 2:286)",
    "The best among you are those who have the best manners. (Hadith)",
    "Whoever relies upon Allah - then He is sufficient for him. (Qur'an 65:3)",
];

/// How often the displayed quote changes
pub const QUOTE_INTERVAL: Duration = Duration::from_secs(5 * 60);

pub fn random_quote() -> &'static str {
    QUOTES[rand::random_range(0..QUOTES.len())]
}

/// Periodically picks a new random quote until stopped
pub struct QuoteRotator {
    interval: Duration,
    cancel: CancellationToken,
}

impl Default for QuoteRotator {
    fn default() -> Self {
        Self::new(QUOTE_INTERVAL)
    }
}

impl QuoteRotator {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            cancel: CancellationToken::new(),
        }
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Show a quote right away, then a new one every interval
    pub async fn run(&self, mut show: impl FnMut(&'static str)) {
        let mut interval = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => {
                    debug!("Quote rotation stopped");
                    break;
                }

                _ = interval.tick() => {
                    show(random_quote());
                }
            }
        }
    }
}
