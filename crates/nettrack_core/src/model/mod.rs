//! Domain model for tracked contacts and the interactions logged against them.
//!
//! # Responsibility
//! - Define canonical records persisted by the record store.
//! - Own field-level validation and follow-up scheduling rules.
//!
//! # Invariants
//! - Every record is identified by a stable UUID that is never reused.
//! - Interactions reference contacts by id; contacts never own interactions.

pub mod contact;
pub mod followup;
pub mod interaction;

use std::error::Error;
use std::fmt::{Display, Formatter};

pub use contact::{
    normalize_tags, parse_tags, Contact, ContactId, ContactPatch, ContactValidationError,
    NewContact,
};
pub use followup::{FollowupPolicy, FollowupStatus, DAY_MS};
pub use interaction::{
    Interaction, InteractionId, InteractionKind, InteractionValidationError, NewInteraction,
};

/// Validation failure for any record kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    Contact(ContactValidationError),
    Interaction(InteractionValidationError),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Contact(err) => write!(f, "{err}"),
            Self::Interaction(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RecordValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Contact(err) => Some(err),
            Self::Interaction(err) => Some(err),
        }
    }
}

impl From<ContactValidationError> for RecordValidationError {
    fn from(value: ContactValidationError) -> Self {
        Self::Contact(value)
    }
}

impl From<InteractionValidationError> for RecordValidationError {
    fn from(value: InteractionValidationError) -> Self {
        Self::Interaction(value)
    }
}
