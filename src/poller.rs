use crate::config::Config;
use crate::cursor::{Cursor, CursorOrder};
use crate::display::BoostEntry;
use crate::feed::FeedState;
use crate::render::{FeedStatus, Renderer};
use crate::source::BoostSource;
use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Keeps the rendered boost list in sync with the backend.
pub struct Poller<S, R> {
    source: S,
    renderer: R,
    state: Arc<Mutex<FeedState>>,
    order: CursorOrder,
    icon_base_url: String,
    interval: Duration,
}

impl<S: BoostSource, R: Renderer> Poller<S, R> {
    pub fn new(source: S, renderer: R, config: &Config) -> Self {
        Self {
            source,
            renderer,
            state: Arc::new(Mutex::new(FeedState::new(config.cursor_order, config.history_limit))),
            order: config.cursor_order,
            icon_base_url: config.icon_base_url.clone(),
            interval: config.poll_interval(),
        }
    }

    pub fn state(&self) -> Arc<Mutex<FeedState>> {
        self.state.clone()
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, FeedState>> {
        self.state.lock().map_err(|_| anyhow!("Boost feed state is poisoned"))
    }

    /// Index of the newest rendered boost, empty before the first one.
    pub fn cursor(&self) -> Result<Cursor> {
        Ok(self.lock_state()?.cursor().clone())
    }

    /// Fetch boosts newer than the cursor and render the new ones.
    /// Returns how many were rendered.
    pub async fn poll(&self) -> Result<usize> {
        let last_index = self.cursor()?;

        let events = self.source.fetch_since(&last_index).await
            .with_context(|| format!("Failed to fetch boosts since {}", last_index))?;

        let received = events.len();
        let admitted: Vec<BoostEntry> = events
            .into_iter()
            .filter(|event| event.is_boost() && self.order.is_newer(&event.index, &last_index))
            .map(|event| BoostEntry::from_event(event, &self.icon_base_url))
            .collect();

        debug!("Received {} boosts, {} admitted since {}", received, admitted.len(), last_index);

        let applied = {
            let mut state = self.lock_state()?;
            state.apply(admitted)
        };

        for entry in &applied {
            info!("Boost {}: {}", entry.index(), entry.headline());
            self.renderer.render(entry).await;
        }

        Ok(applied.len())
    }

    /// Poll right away and then once per interval until cancelled. A poll
    /// only starts after the previous one has finished.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut last_status = FeedStatus::Connecting;
        self.renderer.status(last_status.clone()).await;

        info!("Polling for boosts every {} ms", self.interval.as_millis());

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                result = self.poll() => result,
            };

            let status = match result {
                Ok(_) => FeedStatus::Polling,
                Err(e) => {
                    warn!("Unable to poll boosts: {:#}", e);
                    FeedStatus::Error(format!("{:#}", e))
                }
            };

            if status != last_status {
                self.renderer.status(status.clone()).await;
                last_status = status;
            }
        }

        info!("Boost polling stopped");
    }
}
