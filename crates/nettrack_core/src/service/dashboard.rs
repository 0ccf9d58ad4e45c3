//! Follow-up dashboard summary.

use crate::model::{Contact, FollowupStatus};
use std::cmp::Reverse;

const RECENT_LIMIT: usize = 5;

/// Counts and highlights shown on the progress dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total_contacts: usize,
    pub due_today: usize,
    pub overdue: usize,
    pub upcoming: usize,
    /// Up to five contacts with the latest `last_interaction`, newest first.
    pub recent: Vec<Contact>,
}

/// Summarizes `contacts` relative to `today` (epoch ms).
pub fn summarize(contacts: &[Contact], today: i64) -> DashboardSummary {
    let mut due_today = 0;
    let mut overdue = 0;
    let mut upcoming = 0;
    for contact in contacts {
        match FollowupStatus::of(contact, today) {
            FollowupStatus::Due => due_today += 1,
            FollowupStatus::Overdue => overdue += 1,
            FollowupStatus::Upcoming => upcoming += 1,
            FollowupStatus::None => {}
        }
    }

    let mut recent = contacts
        .iter()
        .filter(|contact| contact.last_interaction.is_some())
        .collect::<Vec<_>>();
    recent.sort_by_key(|contact| Reverse(contact.last_interaction));
    recent.truncate(RECENT_LIMIT);

    DashboardSummary {
        total_contacts: contacts.len(),
        due_today,
        overdue,
        upcoming,
        recent: recent.into_iter().cloned().collect(),
    }
}
