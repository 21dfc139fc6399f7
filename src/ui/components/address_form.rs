// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Address entry page reached from a service card.

use eframe::egui;
use egui_phosphor::regular;

use crate::config::ContactLink;
use crate::models::address::validate_address;
use crate::models::route::Route;
use crate::ui::components::services::accent_or_default;

#[derive(Clone, Debug, Default)]
pub struct AddressFormModel {
    service: String,
    /// `#rrggbb` carried over from the picked card; empty means default.
    accent: String,
    input: String,
    error: Option<String>,
}

#[derive(Clone, Debug)]
pub enum AddressFormMsg {
    InputChanged(String),
    Submit,
    OpenLink(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddressFormEvent {
    Navigate(Route),
    OpenLink(String),
}

impl AddressFormModel {
    /// Prepare the form for `service`, keeping typed input only for the same service.
    /// Without an accent the default colour is used.
    pub fn reset(&mut self, service: &str, accent: Option<String>) {
        if self.service != service {
            self.input.clear();
        }
        self.service = service.to_string();
        self.accent = accent.unwrap_or_default();
        self.error = None;
    }

    #[cfg(test)]
    pub fn service(&self) -> &str {
        &self.service
    }

    #[cfg(test)]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

pub fn update(model: &mut AddressFormModel, msg: AddressFormMsg) -> Option<AddressFormEvent> {
    match msg {
        AddressFormMsg::InputChanged(text) => {
            model.input = text;
            None
        }
        AddressFormMsg::Submit => match validate_address(&model.input) {
            Ok(address) => {
                let route = Route::Dashboard {
                    address: address.to_string(),
                };
                model.error = None;
                Some(AddressFormEvent::Navigate(route))
            }
            Err(err) => {
                model.error = Some(err.message().to_string());
                None
            }
        },
        AddressFormMsg::OpenLink(url) => Some(AddressFormEvent::OpenLink(url)),
    }
}

pub fn view(ui: &mut egui::Ui, model: &AddressFormModel, links: &[ContactLink]) -> Vec<AddressFormMsg> {
    let mut msgs = Vec::new();
    let accent = accent_or_default(&model.accent);

    ui.vertical_centered(|ui| {
        ui.set_max_width(420.0);
        ui.add_space(24.0);
        ui.label(
            egui::RichText::new(&model.service)
                .size(36.0)
                .strong()
                .color(accent),
        );
        ui.add_space(8.0);
        ui.heading("Enter your email address");
        ui.add_space(12.0);

        let mut input = model.input.clone();
        let resp = ui.add(
            egui::TextEdit::singleline(&mut input)
                .hint_text("you@example.com")
                .desired_width(f32::INFINITY),
        );
        if resp.changed() {
            msgs.push(AddressFormMsg::InputChanged(input));
        }
        let submitted = resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        if let Some(err) = &model.error {
            ui.colored_label(ui.visuals().error_fg_color, err);
        }
        ui.add_space(8.0);

        let submit = egui::Button::new(
            egui::RichText::new(format!("{} Open inbox", regular::ENVELOPE_OPEN))
                .color(egui::Color32::WHITE),
        )
        .fill(accent)
        .min_size(egui::vec2(ui.available_width(), 32.0));
        if ui.add(submit).clicked() || submitted {
            msgs.push(AddressFormMsg::Submit);
        }

        if !links.is_empty() {
            ui.add_space(16.0);
            ui.separator();
            ui.horizontal_wrapped(|ui| {
                for link in links {
                    if ui
                        .button(format!("{} {}", regular::ARROW_SQUARE_OUT, link.label))
                        .on_hover_text(&link.url)
                        .clicked()
                    {
                        msgs.push(AddressFormMsg::OpenLink(link.url.clone()));
                    }
                }
            });
        }
    });

    msgs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submit(input: &str) -> (AddressFormModel, Option<AddressFormEvent>) {
        let mut model = AddressFormModel::default();
        model.reset("NF", Some("#b91c1c".into()));
        update(&mut model, AddressFormMsg::InputChanged(input.into()));
        let event = update(&mut model, AddressFormMsg::Submit);
        (model, event)
    }

    #[test]
    fn empty_input_is_rejected() {
        let (model, event) = submit("   ");
        assert!(event.is_none());
        assert_eq!(model.error(), Some("Please enter your email address."));
    }

    #[test]
    fn malformed_input_is_rejected() {
        let (model, event) = submit("not-an-address");
        assert!(event.is_none());
        assert_eq!(model.error(), Some("Please enter a valid email address."));
    }

    #[test]
    fn valid_input_navigates_with_trimmed_address() {
        let (model, event) = submit("  me@brarov.tech ");
        assert!(model.error().is_none());
        assert_eq!(
            event,
            Some(AddressFormEvent::Navigate(Route::Dashboard {
                address: "me@brarov.tech".into()
            }))
        );
    }

    #[test]
    fn successful_submit_clears_previous_error() {
        let mut model = AddressFormModel::default();
        update(&mut model, AddressFormMsg::Submit);
        assert!(model.error().is_some());

        update(&mut model, AddressFormMsg::InputChanged("a@b.co".into()));
        update(&mut model, AddressFormMsg::Submit);
        assert!(model.error().is_none());
    }

    #[test]
    fn reset_for_another_service_clears_input() {
        let mut model = AddressFormModel::default();
        model.reset("NF", None);
        update(&mut model, AddressFormMsg::InputChanged("a@b.co".into()));

        model.reset("NF", None);
        assert_eq!(model.input(), "a@b.co");

        model.reset("PV", None);
        assert_eq!(model.input(), "");
        assert_eq!(model.service(), "PV");
    }
}
