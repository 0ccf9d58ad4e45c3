//! Contact domain model.
//!
//! # Responsibility
//! - Define the persisted contact record and its creation/patch shapes.
//! - Normalize free-text tags.
//!
//! # Invariants
//! - `id` is stable and never reused for another contact.
//! - `name` is never blank.
//! - `tags` hold no blanks and no exact duplicates; display order is kept.
//! - Timestamps are Unix epoch milliseconds.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a tracked contact.
pub type ContactId = Uuid;

/// Contact validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactValidationError {
    /// `name` is empty or whitespace only.
    BlankName,
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "contact name is required"),
        }
    }
}

impl Error for ContactValidationError {}

/// Persisted contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Free-text, case-sensitive labels in display order.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub how_met: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Free text; not interpreted as a date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    /// Date of the most recent logged interaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_interaction: Option<i64>,
    /// Date the next follow-up is due.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_followup: Option<i64>,
}

impl Contact {
    /// Builds a stored record from creation fields and an assigned id.
    ///
    /// Tags are normalized on the way in.
    pub fn from_new(id: ContactId, fields: NewContact) -> Self {
        Self {
            id,
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            company: fields.company,
            role: fields.role,
            tags: normalize_tags(&fields.tags),
            linkedin: fields.linkedin,
            website: fields.website,
            how_met: fields.how_met,
            notes: fields.notes,
            location: fields.location,
            birthday: fields.birthday,
            last_interaction: fields.last_interaction,
            next_followup: fields.next_followup,
        }
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        if self.name.trim().is_empty() {
            return Err(ContactValidationError::BlankName);
        }
        Ok(())
    }

    /// Returns whether this contact carries `tag` (exact, case-sensitive).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|value| value == tag)
    }
}

/// Creation fields for a contact. The store assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub role: Option<String>,
    pub tags: Vec<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
    pub how_met: Option<String>,
    pub notes: Option<String>,
    pub location: Option<String>,
    pub birthday: Option<String>,
    pub last_interaction: Option<i64>,
    pub next_followup: Option<i64>,
}

impl NewContact {
    /// Creation fields with only a name set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Partial update for a contact.
///
/// Outer `None` leaves a field untouched. For optional fields,
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub company: Option<Option<String>>,
    pub role: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub linkedin: Option<Option<String>>,
    pub website: Option<Option<String>>,
    pub how_met: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub birthday: Option<Option<String>>,
    pub last_interaction: Option<Option<i64>>,
    pub next_followup: Option<Option<i64>>,
}

impl ContactPatch {
    /// Returns whether applying this patch would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merges the present fields into `contact`.
    pub fn apply_to(&self, contact: &mut Contact) {
        if let Some(name) = &self.name {
            contact.name = name.clone();
        }
        merge(&mut contact.email, &self.email);
        merge(&mut contact.phone, &self.phone);
        merge(&mut contact.company, &self.company);
        merge(&mut contact.role, &self.role);
        if let Some(tags) = &self.tags {
            contact.tags = normalize_tags(tags);
        }
        merge(&mut contact.linkedin, &self.linkedin);
        merge(&mut contact.website, &self.website);
        merge(&mut contact.how_met, &self.how_met);
        merge(&mut contact.notes, &self.notes);
        merge(&mut contact.location, &self.location);
        merge(&mut contact.birthday, &self.birthday);
        merge(&mut contact.last_interaction, &self.last_interaction);
        merge(&mut contact.next_followup, &self.next_followup);
    }
}

fn merge<T: Clone>(target: &mut Option<T>, update: &Option<Option<T>>) {
    if let Some(value) = update {
        *target = value.clone();
    }
}

/// Trims tags, drops blanks and exact duplicates, keeps first-seen order.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let trimmed = tag.trim();
        if trimmed.is_empty() || normalized.iter().any(|seen| seen == trimmed) {
            continue;
        }
        normalized.push(trimmed.to_string());
    }
    normalized
}

/// Splits comma-separated form input (`"VC, Friend"`) into normalized tags.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let parts = raw.split(',').map(str::to_string).collect::<Vec<_>>();
    normalize_tags(&parts)
}
