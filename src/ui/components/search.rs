// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Domain-wide search: list receivers, or find emails by subject keyword.

use std::path::PathBuf;

use eframe::egui;
use egui_phosphor::regular;

use crate::logic::search::{filter_by_subject, unique_receivers};
use crate::models::email::FetchedEmail;
use crate::ui::components::email_body::{self, EmailBodyMsg};
use crate::utils::{RenderedBody, render_body};

/// Which form a domain fetch belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchPurpose {
    Receivers,
    /// Keyword is already trimmed and lowercased.
    Subject { keyword: String },
}

/// Search page state. Each form owns its own results, loading flag and error.
#[derive(Clone, Debug, Default)]
pub struct SearchModel {
    domains: Vec<String>,
    domain_input: String,
    selected_domain: String,
    subject: String,
    receivers: Vec<String>,
    subject_emails: Vec<FetchedEmail>,
    domain_loading: bool,
    subject_loading: bool,
    domain_error: Option<String>,
    subject_error: Option<String>,
    expanded: Option<(String, RenderedBody)>,
    /// Sequence number of the latest request; older responses are dropped.
    request_seq: u64,
}

#[derive(Clone, Debug)]
pub enum SearchMsg {
    DomainInputChanged(String),
    DomainSelected(String),
    SubjectChanged(String),
    SearchReceivers,
    SearchBySubject,
    Loaded {
        seq: u64,
        purpose: SearchPurpose,
        result: Result<Vec<FetchedEmail>, String>,
    },
    ToggleExpanded(String),
    OpenInbox(String),
    Body(EmailBodyMsg),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchCommand {
    FetchDomain {
        seq: u64,
        domain: String,
        purpose: SearchPurpose,
    },
    OpenInBrowser(FetchedEmail),
    Save { path: PathBuf, email: FetchedEmail },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchEvent {
    OpenInbox(String),
    Status(String),
}

impl SearchModel {
    /// New search page offering `domains`; the first is preselected.
    pub fn new(domains: Vec<String>) -> Self {
        let domains: Vec<String> = domains
            .into_iter()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();
        Self {
            selected_domain: domains.first().cloned().unwrap_or_default(),
            domains,
            ..Default::default()
        }
    }

    #[cfg(test)]
    pub fn receivers(&self) -> &[String] {
        &self.receivers
    }

    #[cfg(test)]
    pub fn subject_emails(&self) -> &[FetchedEmail] {
        &self.subject_emails
    }

    #[cfg(test)]
    pub fn domain_error(&self) -> Option<&str> {
        self.domain_error.as_deref()
    }

    #[cfg(test)]
    pub fn subject_error(&self) -> Option<&str> {
        self.subject_error.as_deref()
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        self.domain_loading || self.subject_loading
    }

    fn next_seq(&mut self) -> u64 {
        self.request_seq += 1;
        self.request_seq
    }
}

pub fn update(
    model: &mut SearchModel,
    msg: SearchMsg,
    cmds: &mut Vec<SearchCommand>,
) -> Option<SearchEvent> {
    match msg {
        SearchMsg::DomainInputChanged(text) => model.domain_input = text,
        SearchMsg::DomainSelected(domain) => model.selected_domain = domain,
        SearchMsg::SubjectChanged(text) => model.subject = text,
        SearchMsg::SearchReceivers => start_receiver_search(model, cmds),
        SearchMsg::SearchBySubject => start_subject_search(model, cmds),
        SearchMsg::Loaded {
            seq,
            purpose,
            result,
        } => {
            if seq != model.request_seq {
                return None;
            }
            apply_results(model, purpose, result);
        }
        SearchMsg::ToggleExpanded(id) => {
            let already_open = model.expanded.as_ref().is_some_and(|(open, _)| *open == id);
            model.expanded = if already_open {
                None
            } else {
                model
                    .subject_emails
                    .iter()
                    .find(|e| e.id == id)
                    .map(|e| (id, render_body(&e.body)))
            };
        }
        SearchMsg::OpenInbox(address) => return Some(SearchEvent::OpenInbox(address)),
        SearchMsg::Body(body_msg) => {
            let (id, _) = model.expanded.as_ref()?;
            let email = model.subject_emails.iter().find(|e| &e.id == id)?.clone();
            match body_msg {
                EmailBodyMsg::OpenInBrowser => cmds.push(SearchCommand::OpenInBrowser(email)),
                EmailBodyMsg::SaveTo(path) => cmds.push(SearchCommand::Save { path, email }),
                EmailBodyMsg::SaveCancelled => {
                    return Some(SearchEvent::Status("Save cancelled.".into()));
                }
            }
        }
    }
    None
}

/// Receivers form: typed domain wins over the dropdown selection.
fn start_receiver_search(model: &mut SearchModel, cmds: &mut Vec<SearchCommand>) {
    model.subject_emails.clear();
    model.subject_error = None;
    model.subject_loading = false;
    model.expanded = None;

    model.domain_error = None;
    model.receivers.clear();

    let typed = model.domain_input.trim();
    let domain = if typed.is_empty() {
        model.selected_domain.trim().to_string()
    } else {
        typed.to_string()
    };
    if domain.is_empty() {
        model.domain_error = Some("Please provide a domain to search.".into());
        return;
    }

    model.domain_loading = true;
    let seq = model.next_seq();
    cmds.push(SearchCommand::FetchDomain {
        seq,
        domain,
        purpose: SearchPurpose::Receivers,
    });
}

/// Subject form: dropdown domain plus a required keyword.
fn start_subject_search(model: &mut SearchModel, cmds: &mut Vec<SearchCommand>) {
    model.receivers.clear();
    model.domain_error = None;
    model.domain_loading = false;

    model.subject_error = None;
    model.subject_emails.clear();
    model.expanded = None;

    let domain = model.selected_domain.trim().to_string();
    let keyword = model.subject.trim().to_lowercase();
    if domain.is_empty() {
        model.subject_error = Some("Please select a domain.".into());
        return;
    }
    if keyword.is_empty() {
        model.subject_error = Some("Please enter a subject keyword.".into());
        return;
    }

    model.subject_loading = true;
    let seq = model.next_seq();
    cmds.push(SearchCommand::FetchDomain {
        seq,
        domain,
        purpose: SearchPurpose::Subject { keyword },
    });
}

fn apply_results(
    model: &mut SearchModel,
    purpose: SearchPurpose,
    result: Result<Vec<FetchedEmail>, String>,
) {
    let non_empty = |err: String, fallback: &str| {
        if err.trim().is_empty() {
            fallback.to_string()
        } else {
            err
        }
    };

    match purpose {
        SearchPurpose::Receivers => {
            model.domain_loading = false;
            match result {
                Ok(emails) => model.receivers = unique_receivers(&emails),
                Err(err) => {
                    model.domain_error = Some(non_empty(err, "Failed to fetch domain emails"));
                }
            }
        }
        SearchPurpose::Subject { keyword } => {
            model.subject_loading = false;
            match result {
                Ok(emails) => model.subject_emails = filter_by_subject(emails, &keyword),
                Err(err) => {
                    model.subject_error = Some(non_empty(err, "Failed to fetch filtered emails"));
                }
            }
        }
    }
}

/// Render both search forms and their result lists.
pub fn view(ui: &mut egui::Ui, model: &SearchModel) -> Vec<SearchMsg> {
    let mut msgs = Vec::new();

    render_receiver_form(ui, model, &mut msgs);
    ui.add_space(12.0);
    render_subject_form(ui, model, &mut msgs);
    ui.add_space(12.0);

    for err in [&model.domain_error, &model.subject_error].into_iter().flatten() {
        egui::Frame::group(ui.style())
            .fill(ui.visuals().error_fg_color.gamma_multiply(0.12))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.colored_label(ui.visuals().error_fg_color, err);
            });
    }

    ui.add_space(8.0);
    render_receivers(ui, model, &mut msgs);
    ui.add_space(12.0);
    render_subject_results(ui, model, &mut msgs);

    msgs
}

fn render_receiver_form(ui: &mut egui::Ui, model: &SearchModel, msgs: &mut Vec<SearchMsg>) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.heading("Search Receivers by Domain");
        ui.add_space(4.0);
        ui.label("Domain:");
        let mut input = model.domain_input.clone();
        let resp = ui.add(
            egui::TextEdit::singleline(&mut input)
                .hint_text("Enter domain (e.g., example.com)")
                .desired_width(f32::INFINITY),
        );
        if resp.changed() {
            msgs.push(SearchMsg::DomainInputChanged(input));
        }
        let submitted = resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        let label = if model.domain_loading {
            "Searching...".to_string()
        } else {
            format!("{} Find Receivers", regular::USERS)
        };
        let clicked = ui
            .add_enabled(!model.domain_loading, egui::Button::new(label))
            .clicked();
        if (clicked || submitted) && !model.domain_loading {
            msgs.push(SearchMsg::SearchReceivers);
        }
    });
}

fn render_subject_form(ui: &mut egui::Ui, model: &SearchModel, msgs: &mut Vec<SearchMsg>) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.heading("Search Full Emails by Domain and Subject");
        ui.add_space(4.0);

        ui.label("Select Domain:");
        let mut selected = model.selected_domain.clone();
        egui::ComboBox::from_id_salt("search_domain_select")
            .selected_text(selected.clone())
            .show_ui(ui, |ui| {
                for domain in &model.domains {
                    ui.selectable_value(&mut selected, domain.clone(), domain);
                }
            });
        if selected != model.selected_domain {
            msgs.push(SearchMsg::DomainSelected(selected));
        }

        ui.label("Subject Keyword:");
        let mut subject = model.subject.clone();
        let resp = ui.add(
            egui::TextEdit::singleline(&mut subject)
                .hint_text("Enter subject keyword")
                .desired_width(f32::INFINITY),
        );
        if resp.changed() {
            msgs.push(SearchMsg::SubjectChanged(subject));
        }
        let submitted = resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        let label = if model.subject_loading {
            "Searching...".to_string()
        } else {
            format!("{} Search Emails", regular::MAGNIFYING_GLASS)
        };
        let clicked = ui
            .add_enabled(!model.subject_loading, egui::Button::new(label))
            .clicked();
        if (clicked || submitted) && !model.subject_loading {
            msgs.push(SearchMsg::SearchBySubject);
        }
    });
}

fn render_receivers(ui: &mut egui::Ui, model: &SearchModel, msgs: &mut Vec<SearchMsg>) {
    ui.strong(format!("Receiver List ({})", model.receivers.len()));
    ui.add_space(4.0);
    for receiver in &model.receivers {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(receiver);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .small_button(format!("{} Open inbox", regular::ENVELOPE_OPEN))
                        .clicked()
                    {
                        msgs.push(SearchMsg::OpenInbox(receiver.clone()));
                    }
                });
            });
        });
    }
    if !model.domain_loading && model.receivers.is_empty() {
        ui.label(
            egui::RichText::new("No receivers found for this domain.")
                .color(egui::Color32::from_gray(110)),
        );
    }
}

fn render_subject_results(ui: &mut egui::Ui, model: &SearchModel, msgs: &mut Vec<SearchMsg>) {
    ui.strong(format!("Email Results ({})", model.subject_emails.len()));
    ui.add_space(4.0);
    let muted = egui::Color32::from_gray(110);

    for email in &model.subject_emails {
        let expanded = model
            .expanded
            .as_ref()
            .filter(|(id, _)| *id == email.id)
            .map(|(_, body)| body);

        let card = egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            let header = ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label(format!("From: {}", email.from));
                    ui.label(format!("To: {}", email.to));
                    ui.label(egui::RichText::new(&email.subject).strong());
                    ui.label(egui::RichText::new(&email.snippet).small().color(muted));
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                    ui.vertical(|ui| {
                        ui.label(
                            egui::RichText::new(email.timestamp.display_local())
                                .small()
                                .color(muted),
                        );
                        let hint = if expanded.is_some() {
                            "Click to collapse"
                        } else {
                            "Click to expand"
                        };
                        ui.label(egui::RichText::new(hint).small().color(muted));
                    });
                });
            });

            if let Some(body) = expanded {
                ui.separator();
                let body_msgs = email_body::view(ui, email, body);
                msgs.extend(body_msgs.into_iter().map(SearchMsg::Body));
            }
            header.response
        });

        if card
            .inner
            .interact(egui::Sense::click())
            .on_hover_cursor(egui::CursorIcon::PointingHand)
            .clicked()
        {
            msgs.push(SearchMsg::ToggleExpanded(email.id.clone()));
        }
        ui.add_space(4.0);
    }

    if !model.subject_loading && model.subject_emails.is_empty() {
        ui.label(egui::RichText::new("No emails found for this domain and subject.").color(muted));
    }
}
