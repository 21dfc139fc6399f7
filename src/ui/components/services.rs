// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Landing page: one coloured card per configured service.

use eframe::egui;

use crate::config::ServiceCard;

/// Fallback accent when a configured colour cannot be parsed.
pub const DEFAULT_ACCENT: egui::Color32 = egui::Color32::from_rgb(0xb9, 0x1c, 0x1c);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServicesMsg {
    Picked { name: String, color: String },
}

/// Parse `#rrggbb` (leading `#` optional).
pub fn parse_hex_color(raw: &str) -> Option<egui::Color32> {
    let hex = raw.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(egui::Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}

pub fn accent_or_default(raw: &str) -> egui::Color32 {
    parse_hex_color(raw).unwrap_or(DEFAULT_ACCENT)
}

pub fn view(ui: &mut egui::Ui, services: &[ServiceCard]) -> Vec<ServicesMsg> {
    let mut msgs = Vec::new();

    ui.vertical_centered(|ui| {
        ui.add_space(24.0);
        ui.heading("Choose a service");
        ui.add_space(16.0);
    });

    ui.horizontal_wrapped(|ui| {
        for service in services {
            let accent = accent_or_default(&service.color);
            let button = egui::Button::new(
                egui::RichText::new(&service.name)
                    .size(28.0)
                    .strong()
                    .color(egui::Color32::WHITE),
            )
            .fill(accent)
            .corner_radius(12.0)
            .min_size(egui::vec2(160.0, 120.0));

            if ui
                .add(button)
                .on_hover_text(format!("Open {} inbox", service.name))
                .clicked()
            {
                msgs.push(ServicesMsg::Picked {
                    name: service.name.clone(),
                    color: service.color.clone(),
                });
            }
        }
    });

    msgs
}
