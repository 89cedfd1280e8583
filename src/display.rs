use crate::boosts::BoostEvent;
use chrono::{DateTime, SecondsFormat, Utc};

pub const DEFAULT_ICON_BASE_URL: &str = "https://podcastindex.org/api/images/";

/// Icon file for the podcast apps we know about.
pub fn app_icon_file(app: &str) -> Option<&'static str> {
    match app {
        "Fountain" => Some("fountain.png"),
        "Podfriend" => Some("podfriend.jpg"),
        "Castamatic" => Some("castamatic.png"),
        "Curiocaster" => Some("curiocaster.png"),
        _ => None,
    }
}

pub fn app_icon_url(icon_base_url: &str, app: &str) -> Option<String> {
    app_icon_file(app).map(|file| format!("{}{}", icon_base_url, file))
}

/// A boost together with everything needed to show it.
#[derive(Debug, Clone, PartialEq)]
pub struct BoostEntry {
    pub event: BoostEvent,
    pub sats: i64,
    pub icon_url: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl BoostEntry {
    pub fn from_event(event: BoostEvent, icon_base_url: &str) -> Self {
        let sats = event.sats();
        let icon_url = app_icon_url(icon_base_url, &event.app);
        let timestamp = DateTime::from_timestamp(event.time, 0).unwrap_or_default();

        Self {
            event,
            sats,
            icon_url,
            timestamp,
        }
    }

    pub fn index(&self) -> &str {
        &self.event.index
    }

    pub fn headline(&self) -> String {
        format!("{} sats from {}", self.sats, self.event.sender)
    }

    pub fn podcast_episode(&self) -> String {
        format!("{} - {}", self.event.podcast, self.event.episode)
    }

    /// ISO-8601 in UTC with milliseconds, e.g. `2023-11-14T22:13:20.000Z`.
    pub fn iso_timestamp(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn pretty_date(&self, now: DateTime<Utc>) -> String {
        pretty_date(self.timestamp, now)
    }
}

/// Relative, human friendly age of `timestamp` as seen from `now`.
pub fn pretty_date(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - timestamp).num_seconds();

    if diff < 60 {
        return "just now".to_string();
    }

    let day_diff = diff / 86_400;

    match day_diff {
        0 if diff < 120 => "1 minute ago".to_string(),
        0 if diff < 3_600 => format!("{} minutes ago", diff / 60),
        0 if diff < 7_200 => "1 hour ago".to_string(),
        0 => format!("{} hours ago", diff / 3_600),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{} days ago", day_diff),
        7..=30 => format!("{} weeks ago", (day_diff + 6) / 7),
        _ => timestamp.format("%Y-%m-%d").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn boost(app: &str, time: i64) -> BoostEvent {
        BoostEvent {
            index: "10".to_string(),
            action: 2,
            value_msat_total: Some(21000),
            sender: "alice".to_string(),
            app: app.to_string(),
            podcast: "Podcasting 2.0".to_string(),
            episode: "Episode 150".to_string(),
            time,
            ..Default::default()
        }
    }

    #[test]
    fn test_known_app_icons() {
        assert_eq!(
            app_icon_url(DEFAULT_ICON_BASE_URL, "Fountain").as_deref(),
            Some("https://podcastindex.org/api/images/fountain.png")
        );
        assert_eq!(app_icon_file("Podfriend"), Some("podfriend.jpg"));
        assert_eq!(app_icon_file("Castamatic"), Some("castamatic.png"));
        assert_eq!(app_icon_file("Curiocaster"), Some("curiocaster.png"));
    }

    #[test]
    fn test_unknown_app_has_no_icon() {
        assert_eq!(app_icon_url(DEFAULT_ICON_BASE_URL, "Breez"), None);
        assert_eq!(app_icon_file("fountain"), None);
        assert_eq!(app_icon_file(""), None);
    }

    #[test]
    fn test_entry_display_fields() {
        let entry = BoostEntry::from_event(boost("Fountain", 1700000000), DEFAULT_ICON_BASE_URL);

        assert_eq!(entry.sats, 21);
        assert_eq!(entry.headline(), "21 sats from alice");
        assert_eq!(entry.podcast_episode(), "Podcasting 2.0 - Episode 150");
        assert_eq!(entry.icon_url.as_deref(), Some("https://podcastindex.org/api/images/fountain.png"));
        assert_eq!(entry.iso_timestamp(), "2023-11-14T22:13:20.000Z");
    }

    #[test]
    fn test_pretty_date_buckets() {
        let now = DateTime::from_timestamp(1700000000, 0).unwrap();
        let ago = |secs: i64| pretty_date(now - Duration::seconds(secs), now);

        assert_eq!(ago(0), "just now");
        assert_eq!(ago(-30), "just now");
        assert_eq!(ago(59), "just now");
        assert_eq!(ago(60), "1 minute ago");
        assert_eq!(ago(150), "2 minutes ago");
        assert_eq!(ago(3_600), "1 hour ago");
        assert_eq!(ago(3 * 3_600), "3 hours ago");
        assert_eq!(ago(86_400), "Yesterday");
        assert_eq!(ago(3 * 86_400), "3 days ago");
        assert_eq!(ago(7 * 86_400), "1 weeks ago");
        assert_eq!(ago(8 * 86_400), "2 weeks ago");
        assert_eq!(ago(40 * 86_400), "2023-10-05");
    }
}
