// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Demo feed page: generated emails with stats, filters and auto-refresh.

use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use eframe::egui;
use egui_phosphor::regular;

use crate::config::FeedConfig;
use crate::logic::mock_feed::{relative_time, sort_newest_first};
use crate::logic::search::{FeedFilter, feed_stats};
use crate::models::feed::{DateRange, EmailKind, FeedEmail, KindFilter};
use crate::ui::components::toggle::labeled_toggle;

#[derive(Clone, Debug, Default)]
pub struct FeedModel {
    initial_count: usize,
    new_email_chance: f64,
    refresh_delay: Duration,
    auto_refresh_secs: u64,
    emails: Vec<FeedEmail>,
    filter: FeedFilter,
    show_filters: bool,
    auto_refresh: bool,
    last_refresh: Option<DateTime<Utc>>,
    is_loading: bool,
    is_refreshing: bool,
    /// A tick is in flight; further ticks are skipped until it lands.
    tick_pending: bool,
    selected: Option<String>,
}

#[derive(Clone, Debug)]
pub enum FeedMsg {
    /// Generate the initial batch if the feed is still empty.
    Init,
    Loaded {
        emails: Vec<FeedEmail>,
        at: DateTime<Utc>,
    },
    Refresh,
    Refreshed {
        emails: Vec<FeedEmail>,
        at: DateTime<Utc>,
    },
    ToggleAutoRefresh,
    /// Auto-refresh timer fired.
    Tick,
    TickResult {
        email: Option<FeedEmail>,
        at: DateTime<Utc>,
    },
    QueryChanged(String),
    KindChanged(KindFilter),
    DateChanged(DateRange),
    ToggleFilters,
    ClearFilters,
    Open(String),
    CloseDetail,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FeedCommand {
    Generate { count: usize },
    RefreshBatch { delay: Duration },
    Tick { chance: f64 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedEvent {
    Status(String),
}

impl FeedModel {
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            initial_count: config.initial_count,
            new_email_chance: config.new_email_chance,
            refresh_delay: config.refresh_delay(),
            auto_refresh_secs: config.auto_refresh_secs,
            ..Default::default()
        }
    }

    #[cfg(test)]
    pub fn emails(&self) -> &[FeedEmail] {
        &self.emails
    }

    #[cfg(test)]
    pub fn filter(&self) -> &FeedFilter {
        &self.filter
    }

    pub fn auto_refresh(&self) -> bool {
        self.auto_refresh
    }

    #[cfg(test)]
    pub fn is_refreshing(&self) -> bool {
        self.is_refreshing
    }

    #[cfg(test)]
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.last_refresh
    }

    pub fn selected(&self) -> Option<&FeedEmail> {
        let id = self.selected.as_ref()?;
        self.emails.iter().find(|e| &e.id == id)
    }
}

pub fn update(
    model: &mut FeedModel,
    msg: FeedMsg,
    cmds: &mut Vec<FeedCommand>,
) -> Option<FeedEvent> {
    match msg {
        FeedMsg::Init => {
            if model.emails.is_empty() && !model.is_loading {
                model.is_loading = true;
                cmds.push(FeedCommand::Generate {
                    count: model.initial_count,
                });
            }
        }
        FeedMsg::Loaded { emails, at } => {
            model.is_loading = false;
            model.emails = emails;
            sort_newest_first(&mut model.emails);
            model.last_refresh = Some(at);
        }
        FeedMsg::Refresh => {
            if !model.is_refreshing {
                model.is_refreshing = true;
                cmds.push(FeedCommand::RefreshBatch {
                    delay: model.refresh_delay,
                });
            }
        }
        FeedMsg::Refreshed { emails, at } => {
            model.is_refreshing = false;
            let count = emails.len();
            model.emails.extend(emails);
            sort_newest_first(&mut model.emails);
            model.last_refresh = Some(at);
            let plural = if count == 1 { "" } else { "s" };
            return Some(FeedEvent::Status(format!(
                "Emails Refreshed: {count} new email{plural} found"
            )));
        }
        FeedMsg::ToggleAutoRefresh => {
            model.auto_refresh = !model.auto_refresh;
            let text = if model.auto_refresh {
                format!(
                    "Auto-refresh Enabled: checking for new emails every {} seconds",
                    model.auto_refresh_secs
                )
            } else {
                "Auto-refresh Disabled: automatic updates are off".to_string()
            };
            return Some(FeedEvent::Status(text));
        }
        FeedMsg::Tick => {
            if model.auto_refresh && !model.tick_pending {
                model.tick_pending = true;
                cmds.push(FeedCommand::Tick {
                    chance: model.new_email_chance,
                });
            }
        }
        FeedMsg::TickResult { email, at } => {
            model.tick_pending = false;
            model.last_refresh = Some(at);
            let email = email?;
            let text = format!("New Email Received: {}: {}", email.sender, email.subject);
            model.emails.insert(0, email);
            return Some(FeedEvent::Status(text));
        }
        FeedMsg::QueryChanged(query) => model.filter.query = query,
        FeedMsg::KindChanged(kind) => model.filter.kind = kind,
        FeedMsg::DateChanged(date) => model.filter.date = date,
        FeedMsg::ToggleFilters => model.show_filters = !model.show_filters,
        FeedMsg::ClearFilters => model.filter = FeedFilter::default(),
        FeedMsg::Open(id) => {
            if let Some(email) = model.emails.iter_mut().find(|e| e.id == id) {
                email.is_read = true;
                model.selected = Some(id);
            }
        }
        FeedMsg::CloseDetail => model.selected = None,
    }
    None
}

pub fn view(ui: &mut egui::Ui, model: &FeedModel) -> Vec<FeedMsg> {
    let mut msgs = Vec::new();
    let now = Utc::now();

    render_header(ui, model, &mut msgs);
    ui.add_space(8.0);
    render_stats(ui, model, now);
    ui.add_space(8.0);
    render_filters(ui, model, &mut msgs);
    ui.add_space(8.0);

    if let Some(email) = model.selected() {
        render_detail(ui, email, now, &mut msgs);
        return msgs;
    }

    if model.is_loading {
        ui.horizontal(|ui| {
            ui.add(egui::Spinner::new().size(14.0));
            ui.label("Generating emails...");
        });
        return msgs;
    }

    let visible = model.filter.apply(&model.emails, now);
    ui.label(
        egui::RichText::new(format!(
            "Showing {} of {} emails",
            visible.len(),
            model.emails.len()
        ))
        .small()
        .color(egui::Color32::from_gray(110)),
    );
    ui.add_space(4.0);

    if visible.is_empty() {
        render_empty(ui, model, &mut msgs);
    }
    for email in visible {
        if render_card(ui, email, now) {
            msgs.push(FeedMsg::Open(email.id.clone()));
        }
        ui.add_space(4.0);
    }

    msgs
}

fn render_header(ui: &mut egui::Ui, model: &FeedModel, msgs: &mut Vec<FeedMsg>) {
    ui.horizontal(|ui| {
        ui.heading(format!("{} Email Feed", regular::TRAY));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let label = if model.is_refreshing {
                "Refreshing...".to_string()
            } else {
                format!("{} Refresh", regular::ARROWS_CLOCKWISE)
            };
            if ui
                .add_enabled(!model.is_refreshing, egui::Button::new(label))
                .clicked()
            {
                msgs.push(FeedMsg::Refresh);
            }
            let mut auto = model.auto_refresh;
            if labeled_toggle(ui, &mut auto, "Auto-refresh").changed() {
                msgs.push(FeedMsg::ToggleAutoRefresh);
            }
        });
    });
}

fn render_stats(ui: &mut egui::Ui, model: &FeedModel, now: DateTime<Utc>) {
    let stats = feed_stats(&model.emails, now);
    let last = model
        .last_refresh
        .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".into());

    ui.columns(4, |cols| {
        stat_card(&mut cols[0], regular::ENVELOPE, "Total Emails", stats.total.to_string());
        stat_card(&mut cols[1], regular::ENVELOPE_SIMPLE, "Unread", stats.unread.to_string());
        stat_card(&mut cols[2], regular::CALENDAR, "Today", stats.today.to_string());
        stat_card(&mut cols[3], regular::CLOCK, "Last Refresh", last);
    });
}

fn stat_card(ui: &mut egui::Ui, icon: &str, label: &str, value: String) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(
            egui::RichText::new(format!("{icon} {label}"))
                .small()
                .color(egui::Color32::from_gray(110)),
        );
        ui.label(egui::RichText::new(value).strong().size(18.0));
    });
}

fn render_filters(ui: &mut egui::Ui, model: &FeedModel, msgs: &mut Vec<FeedMsg>) {
    ui.horizontal(|ui| {
        let mut query = model.filter.query.clone();
        let resp = ui.add(
            egui::TextEdit::singleline(&mut query)
                .hint_text("Search emails by subject, sender, or content...")
                .desired_width((ui.available_width() - 160.0).max(120.0)),
        );
        if resp.changed() {
            msgs.push(FeedMsg::QueryChanged(query));
        }

        let active = model.filter.active_count();
        let label = if active > 0 {
            format!("{} Filters ({active})", regular::FUNNEL)
        } else {
            format!("{} Filters", regular::FUNNEL)
        };
        if ui.selectable_label(model.show_filters, label).clicked() {
            msgs.push(FeedMsg::ToggleFilters);
        }
        if active > 0 && ui.button(format!("{} Clear", regular::X)).clicked() {
            msgs.push(FeedMsg::ClearFilters);
        }
    });

    if !model.show_filters {
        return;
    }

    ui.horizontal(|ui| {
        ui.label("Email Type:");
        let mut kind = model.filter.kind;
        egui::ComboBox::from_id_salt("feed_kind_filter")
            .selected_text(kind.map_or("All Types", EmailKind::label))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut kind, None, "All Types");
                for k in EmailKind::ALL {
                    ui.selectable_value(&mut kind, Some(k), k.label());
                }
            });
        if kind != model.filter.kind {
            msgs.push(FeedMsg::KindChanged(kind));
        }

        ui.add_space(12.0);
        ui.label("Date Range:");
        let mut date = model.filter.date;
        egui::ComboBox::from_id_salt("feed_date_filter")
            .selected_text(date.label())
            .show_ui(ui, |ui| {
                for range in DateRange::ALL {
                    ui.selectable_value(&mut date, range, range.label());
                }
            });
        if date != model.filter.date {
            msgs.push(FeedMsg::DateChanged(date));
        }
    });
}

fn kind_color(kind: EmailKind) -> egui::Color32 {
    match kind {
        EmailKind::Circular => egui::Color32::from_rgb(37, 99, 235),
        EmailKind::Notice => egui::Color32::from_rgb(234, 88, 12),
        EmailKind::Newsletter => egui::Color32::from_rgb(22, 163, 74),
        EmailKind::Announcement => egui::Color32::from_rgb(147, 51, 234),
    }
}

/// Returns true when the card was clicked.
fn render_card(ui: &mut egui::Ui, email: &FeedEmail, now: DateTime<Utc>) -> bool {
    let muted = egui::Color32::from_gray(110);
    let mut frame = egui::Frame::group(ui.style());
    if !email.is_read {
        frame = frame.fill(ui.visuals().selection.bg_fill.gamma_multiply(0.15));
    }
    let card = frame.show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            let name = egui::RichText::new(&email.sender);
            ui.label(if email.is_read { name } else { name.strong() });
            ui.label(
                egui::RichText::new(email.kind.label())
                    .small()
                    .color(kind_color(email.kind)),
            );
            if !email.is_read {
                ui.label(egui::RichText::new(regular::CIRCLE).small().color(kind_color(email.kind)));
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(relative_time(email.timestamp, now))
                        .small()
                        .color(muted),
                );
            });
        });
        let subject = egui::RichText::new(&email.subject);
        ui.label(if email.is_read { subject } else { subject.strong() });
        ui.add(egui::Label::new(egui::RichText::new(&email.preview).small().color(muted)).truncate());
    });
    card.response
        .interact(egui::Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand)
        .clicked()
}

fn render_detail(ui: &mut egui::Ui, email: &FeedEmail, now: DateTime<Utc>, msgs: &mut Vec<FeedMsg>) {
    if ui
        .button(format!("{} Back to Feed", regular::ARROW_LEFT))
        .clicked()
    {
        msgs.push(FeedMsg::CloseDetail);
    }
    ui.add_space(8.0);
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        let muted = egui::Color32::from_gray(110);
        ui.label(
            egui::RichText::new(email.kind.label())
                .small()
                .color(kind_color(email.kind)),
        );
        ui.heading(&email.subject);
        ui.label(
            egui::RichText::new(format!("From: {} <{}>", email.sender, email.sender_email))
                .small()
                .color(muted),
        );
        ui.label(
            egui::RichText::new(format!(
                "{} ({})",
                email.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                relative_time(email.timestamp, now)
            ))
            .small()
            .color(muted),
        );
        ui.separator();
        ui.add(egui::Label::new(email.preview.as_str()).wrap());
    });
}

fn render_empty(ui: &mut egui::Ui, model: &FeedModel, msgs: &mut Vec<FeedMsg>) {
    ui.vertical_centered(|ui| {
        ui.add_space(24.0);
        ui.label(egui::RichText::new(regular::ENVELOPE_OPEN).size(32.0));
        ui.heading("No emails found");
        let hint = if model.filter.is_active() {
            "Try adjusting your filters or search query."
        } else {
            "New emails will appear here."
        };
        ui.label(egui::RichText::new(hint).color(egui::Color32::from_gray(110)));
        if model.filter.is_active() && ui.button("Clear filters").clicked() {
            msgs.push(FeedMsg::ClearFilters);
        }
    });
}
