// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Shared helper utilities reused by UI and business logic.

pub mod html;
pub mod sanitize_component;

/// Sanitize an email body and flatten it for display.
pub use html::{RenderedBody, render_body};
/// Sanitize user-provided strings into filesystem-safe file stems.
pub use sanitize_component::sanitize_component;
