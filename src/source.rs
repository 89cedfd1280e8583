use crate::boosts::BoostEvent;
use crate::cursor::Cursor;
use crate::errors::FeedError;
use async_trait::async_trait;
use log::debug;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use std::time::Duration;

/// Where boosts come from.
#[async_trait]
pub trait BoostSource: Send + Sync {
    /// Every boost the backend knows about that is newer than `cursor`.
    async fn fetch_since(&self, cursor: &Cursor) -> Result<Vec<BoostEvent>, FeedError>;
}

/// Helipad-style backend reached over HTTP.
pub struct HttpBoostSource {
    client: Client,
    base_url: Url,
}

impl HttpBoostSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FeedError> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }

        let base_url = Url::parse(&base).map_err(|e| FeedError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = Client::builder()
            .user_agent(concat!("boostfeed/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn url_for(&self, path: &str) -> Result<Url, FeedError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| FeedError::InvalidUrl(format!("{}: {}", path, e)))
    }

    /// Raw bytes of a static asset served next to the feed, e.g. the
    /// notification sound.
    pub async fn fetch_asset(&self, path: &str) -> Result<Vec<u8>, FeedError> {
        let url = self.url_for(path)?;
        debug!("Fetching asset {}", url);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FeedError::Status(response.status().as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl BoostSource for HttpBoostSource {
    async fn fetch_since(&self, cursor: &Cursor) -> Result<Vec<BoostEvent>, FeedError> {
        let url = self.url_for("boosts")?;
        debug!("Fetching boosts from {} since {}", url, cursor);

        let response = self
            .client
            .get(url)
            .query(&[("index", cursor.as_query())])
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FeedError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        let boosts: Vec<BoostEvent> = serde_json::from_slice(&body)?;

        debug!("Received {} boosts", boosts.len());

        Ok(boosts)
    }
}
