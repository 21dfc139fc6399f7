// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Read-only viewer for a sanitized email body, shared by dashboard and search.

use std::path::PathBuf;

use eframe::egui;
use egui_phosphor::regular;

use crate::logic::export::{ensure_extension, suggested_file_name};
use crate::models::email::FetchedEmail;
use crate::utils::RenderedBody;

/// Actions the viewer asks its parent to perform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmailBodyMsg {
    OpenInBrowser,
    SaveTo(PathBuf),
    SaveCancelled,
}

/// Render body text, extracted links, and the export buttons.
pub fn view(ui: &mut egui::Ui, email: &FetchedEmail, body: &RenderedBody) -> Vec<EmailBodyMsg> {
    let mut msgs = Vec::new();

    ui.horizontal(|ui| {
        if ui
            .button(format!("{} Open in browser", regular::GLOBE))
            .on_hover_text("View the sanitized HTML with its original layout")
            .clicked()
        {
            msgs.push(EmailBodyMsg::OpenInBrowser);
        }
        if ui
            .button(format!("{} Save…", regular::FLOPPY_DISK))
            .clicked()
        {
            let dialog = rfd::FileDialog::new()
                .set_title("Save email")
                .add_filter("HTML document", &["html", "htm"])
                .set_file_name(suggested_file_name(&email.subject));
            match dialog.save_file() {
                Some(path) => msgs.push(EmailBodyMsg::SaveTo(ensure_extension(path, "html"))),
                None => msgs.push(EmailBodyMsg::SaveCancelled),
            }
        }
    });
    ui.add_space(6.0);

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        if body.text.is_empty() {
            ui.label(
                egui::RichText::new("(empty message)")
                    .italics()
                    .color(egui::Color32::from_gray(110)),
            );
        } else {
            ui.add(egui::Label::new(body.text.as_str()).wrap().selectable(true));
        }
    });

    if !body.links.is_empty() {
        ui.add_space(6.0);
        egui::CollapsingHeader::new(format!("Links ({})", body.links.len()))
            .id_salt(("email_links", &email.id))
            .default_open(true)
            .show(ui, |ui| {
                for link in &body.links {
                    ui.hyperlink_to(format!("{} {link}", regular::LINK), link);
                }
            });
    }

    msgs
}
