// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Page components, each with its own model, messages and view.

pub mod address_form;
pub mod dashboard;
pub mod email_body;
pub mod feed;
pub mod search;
pub mod services;
pub mod toggle;
