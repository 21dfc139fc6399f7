// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Path-based routing table for the application pages.

use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Characters left untouched in path segments (mirrors `encodeURIComponent`).
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// One navigable page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Route {
    /// `/`
    #[default]
    ServicePicker,
    /// `/:name/verification`
    Verification { service: String },
    /// `/dashboard/:emailAddress`
    Dashboard { address: String },
    /// `/search`
    Search,
    /// `/feed`
    Feed,
    /// Anything else; keeps the requested path for display.
    NotFound { path: String },
}

impl Route {
    /// Resolve a path into a route. Static segments win over parameters, so
    /// `/dashboard/x` is always the dashboard, never a verification page.
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim();
        let without_query = trimmed
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let segments: Vec<&str> = without_query.split('/').filter(|s| !s.is_empty()).collect();

        let not_found = || Self::NotFound {
            path: trimmed.to_string(),
        };

        match segments.as_slice() {
            [] => Self::ServicePicker,
            ["search"] => Self::Search,
            ["feed"] => Self::Feed,
            ["dashboard", address] => match decode_segment(address) {
                Some(address) => Self::Dashboard { address },
                None => not_found(),
            },
            [service, "verification"] => match decode_segment(service) {
                Some(service) => Self::Verification { service },
                None => not_found(),
            },
            _ => not_found(),
        }
    }

    /// Canonical path for this route with parameters percent-encoded.
    pub fn to_path(&self) -> String {
        match self {
            Self::ServicePicker => "/".to_string(),
            Self::Verification { service } => format!("/{}/verification", encode_segment(service)),
            Self::Dashboard { address } => format!("/dashboard/{}", encode_segment(address)),
            Self::Search => "/search".to_string(),
            Self::Feed => "/feed".to_string(),
            Self::NotFound { path } => path.clone(),
        }
    }

    /// Short page title for the top bar.
    pub fn title(&self) -> &'static str {
        match self {
            Self::ServicePicker => "Choose a Service",
            Self::Verification { .. } => "Enter Email",
            Self::Dashboard { .. } => "Inbox",
            Self::Search => "Search",
            Self::Feed => "Email Feed",
            Self::NotFound { .. } => "Not Found",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}

/// Percent-encode a single path segment.
pub fn encode_segment(raw: &str) -> String {
    utf8_percent_encode(raw, SEGMENT).to_string()
}

fn decode_segment(raw: &str) -> Option<String> {
    percent_decode_str(raw)
        .decode_utf8()
        .ok()
        .map(|s| s.into_owned())
}
