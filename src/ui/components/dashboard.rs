// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Inbox dashboard for a single address: list view plus message detail.

use std::path::PathBuf;

use eframe::egui;
use egui_phosphor::regular;

use crate::models::email::FetchedEmail;
use crate::ui::components::email_body::{self, EmailBodyMsg};
use crate::utils::{RenderedBody, render_body};

/// Dashboard state; `selected` switches the page into detail view.
#[derive(Clone, Debug, Default)]
pub struct DashboardModel {
    address: String,
    emails: Vec<FetchedEmail>,
    selected: Option<(FetchedEmail, RenderedBody)>,
    is_loading: bool,
    error: Option<String>,
}

/// Messages emitted by the dashboard view or produced by its commands.
#[derive(Clone, Debug)]
pub enum DashboardMsg {
    Refresh,
    Loaded {
        address: String,
        result: Result<Vec<FetchedEmail>, String>,
    },
    Select(usize),
    BackToInbox,
    /// Leave the dashboard for the service picker.
    Exit,
    CopyAddress,
    Body(EmailBodyMsg),
}

/// Side effects requested by the dashboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DashboardCommand {
    Fetch { address: String },
    OpenInBrowser(FetchedEmail),
    Save { path: PathBuf, email: FetchedEmail },
}

/// Outcome the parent reacts to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DashboardEvent {
    Exit,
    Status(String),
}

impl DashboardModel {
    #[cfg(test)]
    pub fn address(&self) -> &str {
        &self.address
    }

    #[cfg(test)]
    pub fn emails(&self) -> &[FetchedEmail] {
        &self.emails
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[cfg(test)]
    pub fn selected(&self) -> Option<&FetchedEmail> {
        self.selected.as_ref().map(|(email, _)| email)
    }

    /// Reset for `address` and start the initial fetch.
    pub fn enter(&mut self, address: String, cmds: &mut Vec<DashboardCommand>) {
        *self = Self {
            address,
            ..Default::default()
        };
        start_fetch(self, cmds);
    }
}

/// Apply a message to the model, collecting commands. Returns an event when the parent must act.
pub fn update(
    model: &mut DashboardModel,
    msg: DashboardMsg,
    cmds: &mut Vec<DashboardCommand>,
) -> Option<DashboardEvent> {
    match msg {
        DashboardMsg::Refresh => {
            if !model.is_loading {
                start_fetch(model, cmds);
            }
            None
        }
        DashboardMsg::Loaded { address, result } => {
            if address != model.address {
                // Response for an inbox we already navigated away from.
                return None;
            }
            model.is_loading = false;
            match result {
                Ok(emails) => model.emails = emails,
                Err(err) => model.error = Some(err),
            }
            None
        }
        DashboardMsg::Select(index) => {
            model.selected = model
                .emails
                .get(index)
                .map(|email| (email.clone(), render_body(&email.body)));
            None
        }
        DashboardMsg::BackToInbox => {
            model.selected = None;
            None
        }
        DashboardMsg::Exit => Some(DashboardEvent::Exit),
        DashboardMsg::CopyAddress => Some(DashboardEvent::Status(format!(
            "Copied {} to clipboard.",
            model.address
        ))),
        DashboardMsg::Body(body_msg) => {
            let (email, _) = model.selected.as_ref()?;
            match body_msg {
                EmailBodyMsg::OpenInBrowser => {
                    cmds.push(DashboardCommand::OpenInBrowser(email.clone()));
                    None
                }
                EmailBodyMsg::SaveTo(path) => {
                    cmds.push(DashboardCommand::Save {
                        path,
                        email: email.clone(),
                    });
                    None
                }
                EmailBodyMsg::SaveCancelled => Some(DashboardEvent::Status("Save cancelled.".into())),
            }
        }
    }
}

fn start_fetch(model: &mut DashboardModel, cmds: &mut Vec<DashboardCommand>) {
    if model.address.is_empty() {
        return;
    }
    model.is_loading = true;
    model.error = None;
    cmds.push(DashboardCommand::Fetch {
        address: model.address.clone(),
    });
}

/// Render the list or detail view and return triggered messages.
pub fn view(ui: &mut egui::Ui, model: &DashboardModel) -> Vec<DashboardMsg> {
    let mut msgs = Vec::new();

    if model.address.is_empty() {
        ui.label(
            egui::RichText::new("Error: No email address provided.")
                .color(ui.visuals().error_fg_color),
        );
        return msgs;
    }

    match &model.selected {
        Some((email, body)) => render_detail(ui, email, body, &mut msgs),
        None => render_list(ui, model, &mut msgs),
    }

    msgs
}

fn render_list(ui: &mut egui::Ui, model: &DashboardModel, msgs: &mut Vec<DashboardMsg>) {
    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            ui.heading(format!("Inbox for {}", model.address));
            ui.label(
                egui::RichText::new(format!("{} message(s) found.", model.emails.len()))
                    .color(egui::Color32::from_gray(110)),
            );
        });
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let refresh = egui::Button::new(format!("{} Refresh", regular::ARROWS_CLOCKWISE));
            if ui.add_enabled(!model.is_loading, refresh).clicked() {
                msgs.push(DashboardMsg::Refresh);
            }
            if ui.button(format!("{} Back", regular::ARROW_LEFT)).clicked() {
                msgs.push(DashboardMsg::Exit);
            }
            if ui
                .button(regular::COPY)
                .on_hover_text("Copy address")
                .clicked()
            {
                ui.ctx().copy_text(model.address.clone());
                msgs.push(DashboardMsg::CopyAddress);
            }
        });
    });
    ui.add_space(8.0);

    if model.is_loading {
        ui.horizontal(|ui| {
            ui.add(egui::Spinner::new().size(14.0));
            ui.label("Loading emails...");
        });
    }
    if let Some(err) = &model.error {
        ui.label(egui::RichText::new(format!("Error: {err}")).color(ui.visuals().error_fg_color));
    }

    for (index, email) in model.emails.iter().enumerate() {
        let card = egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label(egui::RichText::new(&email.from).strong());
                    ui.label(egui::RichText::new(&email.subject).strong().size(15.0));
                    ui.label(
                        egui::RichText::new(&email.snippet)
                            .small()
                            .color(egui::Color32::from_gray(110)),
                    );
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                    ui.label(
                        egui::RichText::new(email.timestamp.display_local())
                            .small()
                            .color(egui::Color32::from_gray(110)),
                    );
                });
            });
        });
        if card
            .response
            .interact(egui::Sense::click())
            .on_hover_cursor(egui::CursorIcon::PointingHand)
            .clicked()
        {
            msgs.push(DashboardMsg::Select(index));
        }
        ui.add_space(4.0);
    }
}

fn render_detail(
    ui: &mut egui::Ui,
    email: &FetchedEmail,
    body: &RenderedBody,
    msgs: &mut Vec<DashboardMsg>,
) {
    if ui
        .button(format!("{} Back to Inbox", regular::ARROW_LEFT))
        .clicked()
    {
        msgs.push(DashboardMsg::BackToInbox);
    }
    ui.add_space(8.0);

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        let muted = egui::Color32::from_gray(110);
        ui.label(egui::RichText::new(format!("From: {}", email.from)).small().color(muted));
        ui.heading(&email.subject);
        ui.label(
            egui::RichText::new(format!("At: {}", email.timestamp.display_local()))
                .small()
                .color(muted),
        );
        ui.separator();
        let body_msgs = email_body::view(ui, email, body);
        msgs.extend(body_msgs.into_iter().map(DashboardMsg::Body));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(id: &str, body: &str) -> FetchedEmail {
        FetchedEmail {
            id: id.into(),
            subject: format!("subject {id}"),
            body: body.into(),
            ..Default::default()
        }
    }

    fn entered(address: &str) -> (DashboardModel, Vec<DashboardCommand>) {
        let mut model = DashboardModel::default();
        let mut cmds = Vec::new();
        model.enter(address.into(), &mut cmds);
        (model, cmds)
    }

    #[test]
    fn entering_starts_fetch_for_address() {
        let (model, cmds) = entered("me@brarov.tech");

        assert!(model.is_loading());
        assert_eq!(
            cmds,
            vec![DashboardCommand::Fetch {
                address: "me@brarov.tech".into()
            }]
        );
    }

    #[test]
    fn empty_address_does_not_fetch() {
        let (model, cmds) = entered("");

        assert!(cmds.is_empty());
        assert!(!model.is_loading());
    }

    #[test]
    fn loaded_replaces_emails_and_clears_loading() {
        let (mut model, _) = entered("me@brarov.tech");
        let mut cmds = Vec::new();

        update(
            &mut model,
            DashboardMsg::Loaded {
                address: "me@brarov.tech".into(),
                result: Ok(vec![email("1", ""), email("2", "")]),
            },
            &mut cmds,
        );

        assert_eq!(model.emails().len(), 2);
        assert!(!model.is_loading());
        assert!(model.error().is_none());
    }

    #[test]
    fn stale_response_is_ignored() {
        let (mut model, _) = entered("new@brarov.tech");
        let mut cmds = Vec::new();

        update(
            &mut model,
            DashboardMsg::Loaded {
                address: "old@brarov.tech".into(),
                result: Ok(vec![email("1", "")]),
            },
            &mut cmds,
        );

        assert!(model.emails().is_empty());
        assert!(model.is_loading());
    }

    #[test]
    fn failure_sets_error_and_refresh_clears_it() {
        let (mut model, _) = entered("me@brarov.tech");
        let mut cmds = Vec::new();

        update(
            &mut model,
            DashboardMsg::Loaded {
                address: "me@brarov.tech".into(),
                result: Err("Failed to fetch emails from server.".into()),
            },
            &mut cmds,
        );
        assert_eq!(model.error(), Some("Failed to fetch emails from server."));

        update(&mut model, DashboardMsg::Refresh, &mut cmds);
        assert!(model.error().is_none());
        assert_eq!(cmds.len(), 1);
    }

    #[test]
    fn refresh_is_ignored_while_loading() {
        let (mut model, _) = entered("me@brarov.tech");
        let mut cmds = Vec::new();

        update(&mut model, DashboardMsg::Refresh, &mut cmds);

        assert!(cmds.is_empty());
    }

    #[test]
    fn select_renders_sanitized_body_and_back_returns_to_list() {
        let (mut model, _) = entered("me@brarov.tech");
        let mut cmds = Vec::new();
        update(
            &mut model,
            DashboardMsg::Loaded {
                address: "me@brarov.tech".into(),
                result: Ok(vec![email("1", "<p>Hi</p><script>x()</script>")]),
            },
            &mut cmds,
        );

        update(&mut model, DashboardMsg::Select(0), &mut cmds);
        let (_, body) = model.selected.as_ref().unwrap();
        assert_eq!(body.text, "Hi");

        update(&mut model, DashboardMsg::BackToInbox, &mut cmds);
        assert!(model.selected().is_none());
    }

    #[test]
    fn body_actions_become_commands_for_selected_email() {
        let (mut model, _) = entered("me@brarov.tech");
        let mut cmds = Vec::new();
        update(
            &mut model,
            DashboardMsg::Loaded {
                address: "me@brarov.tech".into(),
                result: Ok(vec![email("7", "<p>x</p>")]),
            },
            &mut cmds,
        );
        update(&mut model, DashboardMsg::Select(0), &mut cmds);

        update(
            &mut model,
            DashboardMsg::Body(EmailBodyMsg::SaveTo(PathBuf::from("out.html"))),
            &mut cmds,
        );

        match cmds.pop() {
            Some(DashboardCommand::Save { path, email }) => {
                assert_eq!(path, PathBuf::from("out.html"));
                assert_eq!(email.id, "7");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
