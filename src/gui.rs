use crate::display::BoostEntry;
use crate::render::{FeedStatus, Renderer};
use crate::sound::Notifier;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use eframe::egui;
use egui::{Color32, RichText, Ui, ViewportBuilder};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::mpsc;

impl FeedStatus {
    pub fn color(&self) -> Color32 {
        match self {
            FeedStatus::Connecting => Color32::from_rgb(150, 150, 150), // Light grey for dark background
            FeedStatus::Polling => Color32::from_rgb(100, 255, 100), // Bright green
            FeedStatus::Error(_) => Color32::from_rgb(255, 100, 100), // Bright red for dark background
        }
    }
}

// Message types for communication between the poller and the GUI
#[derive(Debug)]
pub enum GuiMessage {
    UpdateStatus(FeedStatus),
    BoostReceived(BoostEntry),
}

/// Renderer that feeds the window and plays the notification sound.
pub struct GuiRenderer {
    tx: mpsc::Sender<GuiMessage>,
    notifier: Notifier,
}

impl GuiRenderer {
    pub fn new(tx: mpsc::Sender<GuiMessage>, notifier: Notifier) -> Self {
        Self { tx, notifier }
    }
}

#[async_trait]
impl Renderer for GuiRenderer {
    async fn render(&self, entry: &BoostEntry) {
        let _ = self.tx.send(GuiMessage::BoostReceived(entry.clone())).await;
        self.notifier.play();
    }

    async fn status(&self, status: FeedStatus) {
        let _ = self.tx.send(GuiMessage::UpdateStatus(status)).await;
    }
}

// Main application state
pub struct BoostFeedApp {
    title: String,
    status: FeedStatus,
    boosts: VecDeque<BoostEntry>,
    history_limit: usize,
    rx: mpsc::Receiver<GuiMessage>,
    scroll_to_top: bool,
}

impl BoostFeedApp {
    pub fn new(title: String, history_limit: usize, rx: mpsc::Receiver<GuiMessage>) -> Self {
        BoostFeedApp {
            title,
            status: FeedStatus::Connecting,
            boosts: VecDeque::new(),
            history_limit: history_limit.max(1),
            rx,
            scroll_to_top: false,
        }
    }

    fn process_messages(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            match message {
                GuiMessage::UpdateStatus(status) => {
                    self.status = status;
                },
                GuiMessage::BoostReceived(entry) => {
                    self.boosts.push_front(entry);
                    self.boosts.truncate(self.history_limit);
                    self.scroll_to_top = true;
                }
            }
        }
    }

    fn render_boost(ui: &mut Ui, entry: &BoostEntry) {
        let now = Utc::now();

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());

            ui.horizontal(|ui| {
                if let Some(icon) = icon_image(entry) {
                    ui.add(icon).on_hover_text(entry.event.app.as_str());
                }
                else if !entry.event.app.is_empty() {
                    ui.label(entry.event.app.as_str());
                }

                ui.label(RichText::new(format!("{} sats", entry.sats)).strong().size(18.0));
                ui.label(RichText::new(format!("from {}", entry.event.sender)).small());
            });

            ui.label(RichText::new(entry.pretty_date(now)).weak())
                .on_hover_text(entry.iso_timestamp());

            ui.label(RichText::new(entry.podcast_episode()).small());
            ui.separator();

            if !entry.event.message.is_empty() {
                ui.label(entry.event.message.as_str());
            }
        });
    }
}

const ICON_SIZE: f32 = 24.0;

/// App icon for the boost, fetched by the image loaders the first time it is
/// drawn. None when the app isn't in the icon table.
fn icon_image(entry: &BoostEntry) -> Option<egui::Image<'_>> {
    let url = entry.icon_url.as_deref()?;

    Some(
        egui::Image::new(url)
            .fit_to_exact_size(egui::vec2(ICON_SIZE, ICON_SIZE))
            .rounding(4.0),
    )
}

impl eframe::App for BoostFeedApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_messages();

        // Keep draining the channel and refreshing the relative dates
        ctx.request_repaint_after(Duration::from_millis(250));

        egui::TopBottomPanel::top("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(self.title.as_str());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(RichText::new(self.status.display_text()).color(self.status.color()));
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.boosts.is_empty() {
                ui.label("No boosts yet");
                return;
            }

            let mut scroll = egui::ScrollArea::vertical().auto_shrink([false, false]);

            if self.scroll_to_top {
                scroll = scroll.vertical_scroll_offset(0.0);
                self.scroll_to_top = false;
            }

            scroll.show(ui, |ui| {
                for entry in &self.boosts {
                    Self::render_boost(ui, entry);
                    ui.add_space(6.0);
                }
            });
        });
    }
}

// Function to launch the GUI
pub fn run_gui(title: String, history_limit: usize, rx: mpsc::Receiver<GuiMessage>) -> Result<()> {
    let app = BoostFeedApp::new(title.clone(), history_limit, rx);

    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size([480.0, 720.0])
            .with_min_inner_size([320.0, 300.0])
            .with_title(title.clone()),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(|cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);

            let mut style = (*cc.egui_ctx.style()).clone();
            style.text_styles.insert(
                egui::TextStyle::Body,
                egui::FontId::new(16.0, egui::FontFamily::Proportional),
            );
            style.text_styles.insert(
                egui::TextStyle::Heading,
                egui::FontId::new(22.0, egui::FontFamily::Proportional),
            );

            // Set dark mode visuals
            style.visuals = egui::style::Visuals::dark();
            style.visuals.panel_fill = Color32::from_rgb(20, 20, 20);
            style.visuals.window_fill = Color32::from_rgb(15, 15, 15);
            style.visuals.override_text_color = Some(Color32::from_rgb(220, 220, 220));

            cc.egui_ctx.set_style(style);

            Box::new(app)
        }),
    )
    .map_err(|e| anyhow!("GUI error: {}", e))?;

    Ok(())
}
