// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Client-side filtering over fetched email lists.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::models::email::FetchedEmail;
use crate::models::feed::{DateRange, FeedEmail, KindFilter, is_same_local_day};

/// Unique, non-empty receiver addresses in first-seen order.
pub fn unique_receivers(emails: &[FetchedEmail]) -> Vec<String> {
    let mut seen = HashSet::new();
    emails
        .iter()
        .map(|e| e.to.as_str())
        .filter(|to| !to.is_empty())
        .filter(|to| seen.insert(*to))
        .map(str::to_string)
        .collect()
}

/// Keep emails whose subject contains `keyword`, ignoring case.
///
/// Emails without a subject never match. The keyword is expected to be
/// trimmed already; an empty keyword matches every email with a subject.
pub fn filter_by_subject(emails: Vec<FetchedEmail>, keyword: &str) -> Vec<FetchedEmail> {
    let needle = keyword.to_lowercase();
    emails
        .into_iter()
        .filter(|e| !e.subject.is_empty() && e.subject.to_lowercase().contains(&needle))
        .collect()
}

/// Free-text, type, and date criteria applied to the demo feed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FeedFilter {
    pub query: String,
    pub kind: KindFilter,
    pub date: DateRange,
}

impl FeedFilter {
    /// Number of criteria that narrow the feed (shown as a badge).
    pub fn active_count(&self) -> usize {
        [
            !self.query.trim().is_empty(),
            self.kind.is_some(),
            self.date != DateRange::All,
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    pub fn is_active(&self) -> bool {
        self.active_count() > 0
    }

    pub fn matches(&self, email: &FeedEmail, now: DateTime<Utc>) -> bool {
        let query = self.query.trim().to_lowercase();
        let text_ok = query.is_empty()
            || email.subject.to_lowercase().contains(&query)
            || email.sender.to_lowercase().contains(&query)
            || email.preview.to_lowercase().contains(&query);
        let kind_ok = self.kind.is_none_or(|k| k == email.kind);
        text_ok && kind_ok && self.date.contains(email.timestamp, now)
    }

    /// Borrow the feed emails that pass this filter, preserving order.
    pub fn apply<'a>(&self, emails: &'a [FeedEmail], now: DateTime<Utc>) -> Vec<&'a FeedEmail> {
        emails.iter().filter(|e| self.matches(e, now)).collect()
    }
}

/// Summary counters for the feed stats cards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub total: usize,
    pub unread: usize,
    pub today: usize,
}

pub fn feed_stats(emails: &[FeedEmail], now: DateTime<Utc>) -> FeedStats {
    FeedStats {
        total: emails.len(),
        unread: emails.iter().filter(|e| !e.is_read).count(),
        today: emails
            .iter()
            .filter(|e| is_same_local_day(e.timestamp, now))
            .count(),
    }
}
