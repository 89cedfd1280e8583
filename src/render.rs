use crate::display::BoostEntry;
use crate::sound::Notifier;
use async_trait::async_trait;
use chrono::Utc;
use log::{info, warn};

/// Health of the boost feed as seen by the poller.
#[derive(Clone, Debug, PartialEq)]
pub enum FeedStatus {
    Connecting,
    Polling,
    Error(String),
}

impl FeedStatus {
    pub fn display_text(&self) -> String {
        match self {
            FeedStatus::Connecting => "Connecting".to_string(),
            FeedStatus::Polling => "Polling".to_string(),
            FeedStatus::Error(msg) => format!("Error: {}", msg),
        }
    }
}

/// Receives every boost the poller admits, newest last.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, entry: &BoostEntry);

    async fn status(&self, _status: FeedStatus) {}
}

/// Writes boosts to the log instead of a window.
pub struct ConsoleRenderer {
    notifier: Notifier,
}

impl ConsoleRenderer {
    pub fn new(notifier: Notifier) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl Renderer for ConsoleRenderer {
    async fn render(&self, entry: &BoostEntry) {
        info!("{} ({})", entry.headline(), entry.pretty_date(Utc::now()));
        info!("  {} [{}] at {}", entry.podcast_episode(), entry.event.app, entry.iso_timestamp());

        if !entry.event.message.is_empty() {
            info!("  {}", entry.event.message);
        }

        self.notifier.play();
    }

    async fn status(&self, status: FeedStatus) {
        match status {
            FeedStatus::Error(msg) => warn!("Boost feed error: {}", msg),
            other => info!("Boost feed {}", other.display_text().to_lowercase()),
        }
    }
}
