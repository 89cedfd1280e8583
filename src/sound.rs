use crate::config::Config;
use crate::source::HttpBoostSource;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use rodio::{Decoder, OutputStream, Sink};
use std::io::Cursor;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

/// Handle for playing the boost notification sound.
///
/// The rodio output stream can't leave the thread that opened it, so playback
/// happens on a dedicated audio thread and this handle just queues requests.
#[derive(Clone, Debug, Default)]
pub struct Notifier {
    tx: Option<mpsc::Sender<()>>,
}

impl Notifier {
    pub fn silent() -> Self {
        Self { tx: None }
    }

    pub fn spawn(sound: Vec<u8>) -> Self {
        let (tx, rx) = mpsc::channel::<()>();
        let sound: Arc<[u8]> = sound.into();

        let spawned = thread::Builder::new()
            .name("boostfeed-audio".to_string())
            .spawn(move || audio_loop(sound, rx));

        match spawned {
            Ok(_) => Self { tx: Some(tx) },
            Err(e) => {
                warn!("Unable to start audio thread: {}", e);
                Self::silent()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    pub fn play(&self) {
        if let Some(tx) = &self.tx {
            if tx.send(()).is_err() {
                debug!("Audio thread is gone, skipping notification sound");
            }
        }
    }
}

fn audio_loop(sound: Arc<[u8]>, rx: mpsc::Receiver<()>) {
    let (_stream, handle) = match OutputStream::try_default() {
        Ok(output) => output,
        Err(e) => {
            warn!("No audio output available: {}", e);
            return;
        }
    };

    let sink = match Sink::try_new(&handle) {
        Ok(sink) => sink,
        Err(e) => {
            warn!("Unable to create audio sink: {}", e);
            return;
        }
    };

    while rx.recv().is_ok() {
        if !take_request(&rx, sink.empty()) {
            continue;
        }

        if let Err(e) = queue_sound(&sink, sound.clone()) {
            warn!("Unable to play notification sound: {:#}", e);
        }
    }
}

/// Called after one request was received. Folds any requests that piled up
/// behind it into that one and says whether to start the sound, which only
/// happens when nothing is playing.
fn take_request(rx: &mpsc::Receiver<()>, idle: bool) -> bool {
    let skipped = rx.try_iter().count();

    if !idle {
        debug!("Notification sound already playing, dropped {} requests", skipped + 1);
        return false;
    }

    if skipped > 0 {
        debug!("Collapsed {} notification sound requests", skipped + 1);
    }

    true
}

fn queue_sound(sink: &Sink, sound: Arc<[u8]>) -> Result<()> {
    let source = Decoder::new(Cursor::new(sound))
        .context("Failed to decode notification sound")?;

    sink.append(source);

    Ok(())
}

/// Read the notification sound from `sound_file` if set, otherwise download
/// it from the backend.
pub async fn load_sound(config: &Config, source: &HttpBoostSource) -> Result<Vec<u8>> {
    if let Some(path) = &config.sound_file {
        let bytes = tokio::fs::read(path).await
            .with_context(|| format!("Failed to read sound file {}", path.display()))?;
        info!("Loaded notification sound from {}", path.display());
        return Ok(bytes);
    }

    let bytes = source.fetch_asset(&config.sound_path).await
        .with_context(|| format!("Failed to download notification sound {}", config.sound_path))?;
    info!("Downloaded notification sound {} ({} bytes)", config.sound_path, bytes.len());

    Ok(bytes)
}

/// Build the notifier for this run. Any failure just means no sound.
pub async fn build_notifier(config: &Config, source: &HttpBoostSource) -> Notifier {
    if !config.sound {
        info!("Notification sound disabled");
        return Notifier::silent();
    }

    match load_sound(config, source).await {
        Ok(bytes) => Notifier::spawn(bytes),
        Err(e) => {
            warn!("Running without notification sound: {:#}", e);
            Notifier::silent()
        }
    }
}
