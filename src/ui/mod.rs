// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Top-level egui application shell.
//! Handles the navigation bar, page dispatch, and the background worker pool.

pub mod components;

use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;
use egui_phosphor::regular;
use tracing::debug;

use crate::config::AppConfig;
use crate::logic::api::InboxApi;
use crate::models::route::Route;
use crate::mvu::{self, AppModel, Command, Msg};
use crate::ui::components::feed::FeedMsg;
use crate::ui::components::{address_form, dashboard, feed, search, services};

/// Stateful egui application for browsing disposable inboxes.
pub struct TempInboxApp {
    model: AppModel,
    inbox: Vec<Msg>,
    cmd_tx: crossbeam_channel::Sender<Command>,
    msg_rx: crossbeam_channel::Receiver<Msg>,
    auto_refresh_interval: Duration,
    /// Start of the current auto-refresh period; `None` while the timer is idle.
    last_tick: Option<Instant>,
    window_title: String,
}

impl TempInboxApp {
    /// Spawn the worker pool and build the initial model.
    ///
    /// Workers request a repaint on `ctx` after each finished command so
    /// results show up without waiting for input.
    pub fn new(ctx: &egui::Context, config: &AppConfig, api: Arc<dyn InboxApi>) -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<Command>();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<Msg>();

        let threads = std::thread::available_parallelism()
            .map(|n| n.get().max(2))
            .unwrap_or(2);
        for _ in 0..threads {
            let cmd_rx = cmd_rx.clone();
            let msg_tx = msg_tx.clone();
            let api = Arc::clone(&api);
            let ctx = ctx.clone();
            std::thread::spawn(move || {
                for cmd in cmd_rx.iter() {
                    let msg = mvu::run_command(cmd, api.as_ref());
                    let _ = msg_tx.send(msg);
                    ctx.request_repaint();
                }
            });
        }
        debug!(threads, "worker pool started");

        Self {
            model: AppModel::new(config),
            inbox: Vec::new(),
            cmd_tx,
            msg_rx,
            auto_refresh_interval: config.feed.auto_refresh_interval(),
            last_tick: None,
            window_title: String::new(),
        }
    }
}

impl eframe::App for TempInboxApp {
    /// Drain worker results, apply pending messages, then render the frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_spacing(ctx);

        while let Ok(msg) = self.msg_rx.try_recv() {
            self.model.pending_commands = self.model.pending_commands.saturating_sub(1);
            self.inbox.push(msg);
        }
        self.drive_feed_timer(ctx);

        for msg in std::mem::take(&mut self.inbox) {
            let mut commands = Vec::new();
            mvu::update(&mut self.model, msg, &mut commands);
            for cmd in commands {
                if self.cmd_tx.send(cmd).is_ok() {
                    self.model.pending_commands += 1;
                }
            }
        }
        self.sync_window_title(ctx);

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            self.render_nav_bar(ui);
            ui.add_space(4.0);
        });

        self.render_error_modal(ctx);

        egui::TopBottomPanel::bottom("status_panel")
            .resizable(false)
            .show(ctx, |ui| {
                self.render_status(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| self.render_page(ui));
        });

        if !self.inbox.is_empty() {
            ctx.request_repaint();
        }
    }

    /// Required by eframe 0.34; all rendering happens in `update`, which eframe still calls first.
    fn ui(&mut self, _ui: &mut egui::Ui, _frame: &mut eframe::Frame) {}
}

impl TempInboxApp {
    fn ensure_spacing(&self, ctx: &egui::Context) {
        ctx.style_mut(|style| {
            style.spacing.item_spacing = egui::vec2(6.0, 6.0);
        });
    }

    /// Emit a feed tick every interval while the feed page is shown with auto-refresh on.
    fn drive_feed_timer(&mut self, ctx: &egui::Context) {
        let active = self.model.route == Route::Feed && self.model.feed.auto_refresh();
        if !active {
            self.last_tick = None;
            return;
        }

        let now = Instant::now();
        let started = *self.last_tick.get_or_insert(now);
        let elapsed = now.duration_since(started);
        if elapsed >= self.auto_refresh_interval {
            self.inbox.push(Msg::Feed(FeedMsg::Tick));
            self.last_tick = Some(now);
            ctx.request_repaint_after(self.auto_refresh_interval);
        } else {
            ctx.request_repaint_after(self.auto_refresh_interval - elapsed);
        }
    }

    fn sync_window_title(&mut self, ctx: &egui::Context) {
        let title = format!("TempInbox - {}", self.model.route.title());
        if title != self.window_title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.window_title = title;
        }
    }

    /// Back/home/search/feed buttons, the path bar, and the theme switch.
    fn render_nav_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading(format!("{} TempInbox", regular::ENVELOPE_SIMPLE));
            ui.separator();

            let can_go_back = !self.model.history.is_empty();
            if ui
                .add_enabled(can_go_back, egui::Button::new(regular::ARROW_LEFT))
                .on_hover_text("Back")
                .clicked()
            {
                self.inbox.push(Msg::Back);
            }
            if ui
                .button(regular::HOUSE)
                .on_hover_text("Choose a service")
                .clicked()
            {
                self.inbox.push(Msg::Navigate(Route::ServicePicker));
            }
            let on_search = self.model.route == Route::Search;
            if ui
                .selectable_label(on_search, format!("{} Search", regular::MAGNIFYING_GLASS))
                .clicked()
            {
                self.inbox.push(Msg::Navigate(Route::Search));
            }
            let on_feed = self.model.route == Route::Feed;
            if ui
                .selectable_label(on_feed, format!("{} Feed", regular::TRAY))
                .clicked()
            {
                self.inbox.push(Msg::Navigate(Route::Feed));
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add_space(2.0);
                egui::widgets::global_theme_preference_switch(ui);
                ui.separator();

                let mut path = self.model.path_input.clone();
                let resp = ui.add(
                    egui::TextEdit::singleline(&mut path)
                        .hint_text("/path")
                        .desired_width(ui.available_width().min(360.0)),
                );
                if resp.changed() {
                    self.inbox.push(Msg::PathInputChanged(path.clone()));
                }
                if resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    self.inbox.push(Msg::NavigatePath(path));
                }
            });
        });
    }

    /// Dispatch the central panel on the current route.
    fn render_page(&mut self, ui: &mut egui::Ui) {
        match &self.model.route {
            Route::ServicePicker => {
                let msgs = services::view(ui, &self.model.services);
                self.inbox.extend(msgs.into_iter().map(Msg::Services));
            }
            Route::Verification { .. } => {
                let msgs = address_form::view(ui, &self.model.address_form, &self.model.links);
                self.inbox.extend(msgs.into_iter().map(Msg::AddressForm));
            }
            Route::Dashboard { .. } => {
                let msgs = dashboard::view(ui, &self.model.dashboard);
                self.inbox.extend(msgs.into_iter().map(Msg::Dashboard));
            }
            Route::Search => {
                let msgs = search::view(ui, &self.model.search);
                self.inbox.extend(msgs.into_iter().map(Msg::Search));
            }
            Route::Feed => {
                let msgs = feed::view(ui, &self.model.feed);
                self.inbox.extend(msgs.into_iter().map(Msg::Feed));
            }
            Route::NotFound { path } => {
                let path = path.clone();
                self.render_not_found(ui, &path);
            }
        }
    }

    fn render_not_found(&mut self, ui: &mut egui::Ui, path: &str) {
        ui.vertical_centered(|ui| {
            ui.add_space(48.0);
            ui.label(egui::RichText::new("404").size(48.0).strong());
            ui.heading("Page not found");
            ui.label(
                egui::RichText::new(format!("Nothing lives at {path}"))
                    .color(egui::Color32::from_gray(110)),
            );
            ui.add_space(12.0);
            if ui
                .button(format!("{} Go home", regular::HOUSE))
                .clicked()
            {
                self.inbox.push(Msg::Navigate(Route::ServicePicker));
            }
        });
    }

    /// Render a simple modal window for error messages.
    fn render_error_modal(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.model.error.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        self.inbox.push(Msg::DismissError);
                    }
                });
        }
    }

    /// Render latest status message when present.
    fn render_status(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if let Some(text) = &self.model.status {
                ui.label(egui::RichText::new(text).color(egui::Color32::from_gray(110)));
            }
            if self.model.pending_commands > 0 {
                ui.add(egui::Spinner::new().size(14.0)).on_hover_text(format!(
                    "{} task(s) running in background",
                    self.model.pending_commands
                ));
            }
        });
    }
}
