// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Randomized placeholder emails for the demo feed.

use chrono::{DateTime, Duration, Utc};

use crate::models::feed::{EmailKind, FeedEmail};

const SENDER_DOMAIN: &str = "knit.ac.in";
const MAX_AGE_MS: i64 = 7 * 24 * 60 * 60 * 1000;

const SENDERS: [&str; 8] = [
    "Dr. Raj Kumar",
    "Prof. Priya Sharma",
    "Admin Office",
    "IT Department",
    "Examination Cell",
    "Training & Placement",
    "Library",
    "Hostel Warden",
];

const SUBJECTS: [&str; 8] = [
    "Important Circular: Academic Calendar Update",
    "Notice: Examination Schedule Released",
    "Newsletter: Monthly Campus Updates",
    "Announcement: New Course Registration Open",
    "Circular: Fee Payment Deadline Extended",
    "Notice: Guest Lecture by Industry Expert",
    "Newsletter: Student Achievement Recognition",
    "Announcement: Infrastructure Development Update",
];

const PREVIEWS: [&str; 8] = [
    "This is to inform all students and faculty about the updated academic calendar for the current semester...",
    "The examination schedule has been finalized and uploaded to the official portal. Students are advised to check...",
    "We are pleased to share the latest updates from our campus including new facilities, achievements, and upcoming events...",
    "Registration for the new elective courses has begun. Students can access the portal using their credentials...",
    "Due to technical difficulties, the fee payment deadline has been extended by one week. Please ensure timely payment...",
    "We are organizing a guest lecture by a renowned industry expert. All students are encouraged to attend...",
    "Congratulations to our students for their outstanding performance in various competitions and academic achievements...",
    "The campus infrastructure development project is progressing well. New facilities will be available soon...",
];

/// Placeholder email generator backed by a seedable RNG.
pub struct MockFeedGenerator {
    rng: fastrand::Rng,
}

impl Default for MockFeedGenerator {
    fn default() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }
}

impl MockFeedGenerator {
    #[cfg(test)]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// One email with id `email-<n>`, stamped somewhere in the 7 days before `now`.
    /// Roughly 70% come out already read.
    pub fn email(&mut self, n: i64, now: DateTime<Utc>) -> FeedEmail {
        let sender = pick(&mut self.rng, &SENDERS);
        let age = Duration::milliseconds(self.rng.i64(0..MAX_AGE_MS));

        FeedEmail {
            id: format!("email-{n}"),
            sender: sender.to_string(),
            sender_email: sender_address(sender),
            subject: pick(&mut self.rng, &SUBJECTS).to_string(),
            preview: pick(&mut self.rng, &PREVIEWS).to_string(),
            timestamp: now - age,
            kind: pick(&mut self.rng, &EmailKind::ALL),
            is_read: self.rng.f64() > 0.3,
        }
    }

    /// `count` emails numbered from 1, newest first.
    pub fn initial(&mut self, count: usize, now: DateTime<Utc>) -> Vec<FeedEmail> {
        let mut emails: Vec<FeedEmail> = (1..=count as i64).map(|n| self.email(n, now)).collect();
        sort_newest_first(&mut emails);
        emails
    }

    /// Auto-refresh tick: a new email with probability `chance`.
    ///
    /// Tick emails are stamped with their arrival time so they land at the top.
    pub fn tick(&mut self, chance: f64, now: DateTime<Utc>) -> Option<FeedEmail> {
        if self.rng.f64() < chance {
            let mut email = self.email(now.timestamp_millis(), now);
            email.timestamp = now;
            Some(email)
        } else {
            None
        }
    }

    /// Manual refresh: between one and three new emails.
    pub fn refresh_batch(&mut self, now: DateTime<Utc>) -> Vec<FeedEmail> {
        let count = self.rng.i64(1..=3);
        let base = now.timestamp_millis();
        (0..count).map(|i| self.email(base + i, now)).collect()
    }
}

/// Lowercase the display name and replace every non `a-z` character with `.`.
fn sender_address(name: &str) -> String {
    let local: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() { c } else { '.' })
        .collect();
    format!("{local}@{SENDER_DOMAIN}")
}

fn pick<T: Copy>(rng: &mut fastrand::Rng, items: &[T]) -> T {
    items[rng.usize(..items.len())]
}

pub fn sort_newest_first(emails: &mut [FeedEmail]) {
    emails.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// Coarse relative time, e.g. "3 hours ago".
pub fn relative_time(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(ts);
    if delta < Duration::minutes(1) {
        return "less than a minute ago".to_string();
    }
    let (amount, unit) = if delta < Duration::hours(1) {
        (delta.num_minutes(), "minute")
    } else if delta < Duration::days(1) {
        (delta.num_hours(), "hour")
    } else if delta < Duration::days(30) {
        (delta.num_days(), "day")
    } else {
        (delta.num_days() / 30, "month")
    };
    let plural = if amount == 1 { "" } else { "s" };
    format!("{amount} {unit}{plural} ago")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_address_replaces_non_letters() {
        assert_eq!(sender_address("Dr. Raj Kumar"), "dr..raj.kumar@knit.ac.in");
        assert_eq!(
            sender_address("Training & Placement"),
            "training...placement@knit.ac.in"
        );
    }

    #[test]
    fn initial_batch_is_sorted_and_within_a_week() {
        let now = Utc::now();
        let mut generator = MockFeedGenerator::with_seed(7);

        let emails = generator.initial(25, now);

        assert_eq!(emails.len(), 25);
        assert!(emails.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
        assert!(emails.iter().all(|e| now - e.timestamp <= Duration::days(7)));
        assert!(emails.iter().any(|e| e.id == "email-1"));
        assert!(emails.iter().any(|e| e.id == "email-25"));
    }

    #[test]
    fn tick_respects_chance_bounds() {
        let now = Utc::now();
        let mut generator = MockFeedGenerator::with_seed(1);

        assert!(generator.tick(0.0, now).is_none());
        let email = generator.tick(1.0, now).unwrap();
        assert_eq!(email.timestamp, now);
    }

    #[test]
    fn refresh_batch_has_one_to_three_emails() {
        let now = Utc::now();
        let mut generator = MockFeedGenerator::with_seed(99);
        for _ in 0..20 {
            let batch = generator.refresh_batch(now);
            assert!((1..=3).contains(&batch.len()));
        }
    }

    #[test]
    fn relative_time_formats_units() {
        let now = Utc::now();
        assert_eq!(relative_time(now, now), "less than a minute ago");
        assert_eq!(relative_time(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(relative_time(now - Duration::hours(5), now), "5 hours ago");
        assert_eq!(relative_time(now - Duration::days(2), now), "2 days ago");
    }
}
