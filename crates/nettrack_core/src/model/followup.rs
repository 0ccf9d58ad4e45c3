//! Follow-up scheduling and status classification.
//!
//! # Invariants
//! - The default policy schedules the next follow-up 7 days after an
//!   interaction.
//! - Status is computed on UTC day boundaries.

use crate::model::contact::Contact;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Milliseconds in one day.
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

const DEFAULT_INTERVAL_DAYS: u32 = 7;
const UPCOMING_WINDOW_DAYS: i64 = 7;

/// Decides how far after an interaction the next follow-up falls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowupPolicy {
    pub default_interval_days: u32,
    /// Per-tag overrides. The contact's first tag with an entry wins.
    pub tag_intervals: BTreeMap<String, u32>,
}

impl Default for FollowupPolicy {
    fn default() -> Self {
        Self {
            default_interval_days: DEFAULT_INTERVAL_DAYS,
            tag_intervals: BTreeMap::new(),
        }
    }
}

impl FollowupPolicy {
    /// Returns the interval in days that applies to `contact`.
    pub fn interval_days_for(&self, contact: &Contact) -> u32 {
        contact
            .tags
            .iter()
            .find_map(|tag| self.tag_intervals.get(tag).copied())
            .unwrap_or(self.default_interval_days)
    }

    /// Returns the follow-up timestamp for an interaction dated `date`.
    pub fn next_followup(&self, contact: &Contact, date: i64) -> i64 {
        date.saturating_add(i64::from(self.interval_days_for(contact)).saturating_mul(DAY_MS))
    }
}

/// Follow-up urgency relative to a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FollowupStatus {
    /// Follow-up day is before today.
    Overdue,
    /// Follow-up day is today.
    Due,
    /// Follow-up falls within the next 7 days.
    Upcoming,
    /// No follow-up scheduled, or further out than the upcoming window.
    None,
}

impl FollowupStatus {
    /// Classifies `next_followup` against `today` (both epoch ms).
    pub fn classify(next_followup: Option<i64>, today: i64) -> Self {
        let Some(next) = next_followup else {
            return Self::None;
        };
        let days = day_index(next) - day_index(today);
        if days < 0 {
            Self::Overdue
        } else if days == 0 {
            Self::Due
        } else if days <= UPCOMING_WINDOW_DAYS {
            Self::Upcoming
        } else {
            Self::None
        }
    }

    /// Classifies a contact's follow-up against `today`.
    pub fn of(contact: &Contact, today: i64) -> Self {
        Self::classify(contact.next_followup, today)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::Due => "due",
            Self::Upcoming => "upcoming",
            Self::None => "none",
        }
    }
}

impl Display for FollowupStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FollowupStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "overdue" => Ok(Self::Overdue),
            "due" => Ok(Self::Due),
            "upcoming" => Ok(Self::Upcoming),
            "none" => Ok(Self::None),
            other => Err(format!(
                "unknown follow-up status `{other}`; expected overdue|due|upcoming|none"
            )),
        }
    }
}

fn day_index(epoch_ms: i64) -> i64 {
    epoch_ms.div_euclid(DAY_MS)
}
