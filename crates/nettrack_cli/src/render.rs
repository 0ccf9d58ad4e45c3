//! Plain-text rendering of records for terminal output.

use crate::dates::{format_date, format_optional};
use nettrack_core::{Contact, DashboardSummary, FollowupPolicy, FollowupStatus, Interaction};
use std::fmt::Write;

/// One-line summary used by `list` and the dashboard.
pub fn contact_line(contact: &Contact, today: i64) -> String {
    let mut line = format!("{}  {}", contact.id, contact.name);
    if let Some(company) = &contact.company {
        let _ = write!(line, " @ {company}");
    }
    if !contact.tags.is_empty() {
        let _ = write!(line, "  [{}]", contact.tags.join(", "));
    }
    if let Some(next) = contact.next_followup {
        let _ = write!(
            line,
            "  follow-up {} ({})",
            format_date(next),
            FollowupStatus::of(contact, today)
        );
    }
    line
}

pub fn contact_detail(contact: &Contact, timeline: &[&Interaction], today: i64) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", contact.name);
    let _ = writeln!(out, "  id: {}", contact.id);
    let fields = [
        ("email", &contact.email),
        ("phone", &contact.phone),
        ("company", &contact.company),
        ("role", &contact.role),
        ("linkedin", &contact.linkedin),
        ("website", &contact.website),
        ("how met", &contact.how_met),
        ("location", &contact.location),
        ("birthday", &contact.birthday),
        ("notes", &contact.notes),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            let _ = writeln!(out, "  {label}: {value}");
        }
    }
    if !contact.tags.is_empty() {
        let _ = writeln!(out, "  tags: {}", contact.tags.join(", "));
    }
    let _ = writeln!(
        out,
        "  last interaction: {}",
        format_optional(contact.last_interaction)
    );
    let _ = writeln!(
        out,
        "  next follow-up: {} ({})",
        format_optional(contact.next_followup),
        FollowupStatus::of(contact, today)
    );

    if timeline.is_empty() {
        let _ = writeln!(out, "  no interactions");
    } else {
        let _ = writeln!(out, "  interactions:");
        for interaction in timeline {
            let _ = writeln!(out, "    {}", interaction_line(interaction));
        }
    }
    out
}

pub fn interaction_line(interaction: &Interaction) -> String {
    format!(
        "{}  {}  {}  {}",
        format_date(interaction.date),
        interaction.kind,
        interaction.summary,
        interaction.id
    )
}

pub fn dashboard(
    summary: &DashboardSummary,
    namespace: &str,
    policy: &FollowupPolicy,
    today: i64,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "namespace: {namespace}");
    let _ = write!(out, "follow-up every {} days", policy.default_interval_days);
    if policy.tag_intervals.is_empty() {
        let _ = writeln!(out);
    } else {
        let overrides = policy
            .tag_intervals
            .iter()
            .map(|(tag, days)| format!("{tag}={days}"))
            .collect::<Vec<_>>();
        let _ = writeln!(out, " ({})", overrides.join(", "));
    }
    let _ = writeln!(out, "contacts: {}", summary.total_contacts);
    let _ = writeln!(out, "due today: {}", summary.due_today);
    let _ = writeln!(out, "overdue: {}", summary.overdue);
    let _ = writeln!(out, "upcoming (7 days): {}", summary.upcoming);
    if !summary.recent.is_empty() {
        let _ = writeln!(out, "recent:");
        for contact in &summary.recent {
            let _ = writeln!(out, "  {}", contact_line(contact, today));
        }
    }
    out
}
