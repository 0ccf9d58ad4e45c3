//! Interaction domain model.
//!
//! # Invariants
//! - `contact_id` names an existing contact while the interaction is stored.
//! - `summary` is never blank.

use crate::model::contact::ContactId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier of a logged interaction.
pub type InteractionId = Uuid;

/// Closed set of interaction channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionKind {
    Meeting,
    Call,
    Email,
    Other,
}

impl InteractionKind {
    pub const ALL: [InteractionKind; 4] = [Self::Meeting, Self::Call, Self::Email, Self::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Meeting => "Meeting",
            Self::Call => "Call",
            Self::Email => "Email",
            Self::Other => "Other",
        }
    }
}

impl Display for InteractionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionKind {
    type Err = String;

    /// Parses a kind label, ignoring ASCII case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                format!("unknown interaction type `{trimmed}`; expected meeting|call|email|other")
            })
    }
}

/// Interaction validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionValidationError {
    /// `summary` is empty or whitespace only.
    BlankSummary,
}

impl Display for InteractionValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankSummary => write!(f, "interaction summary is required"),
        }
    }
}

impl Error for InteractionValidationError {}

/// Persisted interaction record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: InteractionId,
    #[serde(rename = "contactId")]
    pub contact_id: ContactId,
    /// Unix epoch milliseconds.
    pub date: i64,
    /// Serialized as `type` to match the stored document schema.
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    pub summary: String,
}

impl Interaction {
    /// Builds a stored record from creation fields and an assigned id.
    pub fn from_new(id: InteractionId, fields: NewInteraction) -> Self {
        Self {
            id,
            contact_id: fields.contact_id,
            date: fields.date,
            kind: fields.kind,
            summary: fields.summary,
        }
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), InteractionValidationError> {
        if self.summary.trim().is_empty() {
            return Err(InteractionValidationError::BlankSummary);
        }
        Ok(())
    }
}

/// Creation fields for an interaction. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInteraction {
    pub contact_id: ContactId,
    pub date: i64,
    pub kind: InteractionKind,
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::InteractionKind;

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("call".parse::<InteractionKind>(), Ok(InteractionKind::Call));
        assert_eq!(
            " MEETING ".parse::<InteractionKind>(),
            Ok(InteractionKind::Meeting)
        );
        assert!("lunch".parse::<InteractionKind>().is_err());
    }

    #[test]
    fn kind_serializes_as_label() {
        let json = serde_json::to_string(&InteractionKind::Email).unwrap();
        assert_eq!(json, "\"Email\"");
    }
}
