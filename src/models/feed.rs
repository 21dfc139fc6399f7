// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Demo feed records and the filters applied over them.

use chrono::{DateTime, Duration, Local, Utc};

/// Category badge shown on feed cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EmailKind {
    Circular,
    Notice,
    Newsletter,
    Announcement,
}

impl EmailKind {
    pub const ALL: [EmailKind; 4] = [
        EmailKind::Circular,
        EmailKind::Notice,
        EmailKind::Newsletter,
        EmailKind::Announcement,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Circular => "Circular",
            Self::Notice => "Notice",
            Self::Newsletter => "Newsletter",
            Self::Announcement => "Announcement",
        }
    }
}

/// A generated placeholder email for the demo feed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedEmail {
    pub id: String,
    pub sender: String,
    pub sender_email: String,
    pub subject: String,
    pub preview: String,
    pub timestamp: DateTime<Utc>,
    pub kind: EmailKind,
    pub is_read: bool,
}

/// Type filter; `None` means all types.
pub type KindFilter = Option<EmailKind>;

/// Date window used by the feed filter bar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DateRange {
    #[default]
    All,
    Today,
    Week,
    Month,
}

impl DateRange {
    pub const ALL: [DateRange; 4] = [
        DateRange::All,
        DateRange::Today,
        DateRange::Week,
        DateRange::Month,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All Time",
            Self::Today => "Today",
            Self::Week => "This Week",
            Self::Month => "This Month",
        }
    }

    /// Whether `ts` falls inside this window relative to `now`.
    ///
    /// `Today` means the same local calendar day; `Week` and `Month` are
    /// rolling 7- and 30-day windows.
    pub fn contains(self, ts: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            Self::All => true,
            Self::Today => is_same_local_day(ts, now),
            Self::Week => now.signed_duration_since(ts) <= Duration::days(7),
            Self::Month => now.signed_duration_since(ts) <= Duration::days(30),
        }
    }
}

/// Compare two instants by their local calendar date.
pub fn is_same_local_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.with_timezone(&Local).date_naive() == b.with_timezone(&Local).date_naive()
}
