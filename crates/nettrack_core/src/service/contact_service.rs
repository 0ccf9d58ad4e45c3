//! Contact use-case service.
//!
//! # Responsibility
//! - Normalize form input (trim, blank-to-absent, tag parsing).
//! - Log interactions atomically with follow-up scheduling.
//! - Serve list, timeline, autocomplete and dashboard reads.
//!
//! # Invariants
//! - Service APIs never bypass record store validation or persistence.
//! - Unknown ids on edit/remove are silent no-ops.

use crate::model::{
    normalize_tags, Contact, ContactId, ContactPatch, FollowupPolicy, Interaction, InteractionId,
    InteractionKind, NewContact, NewInteraction, RecordValidationError,
};
use crate::query::{ContactQuery, ContactSort, InteractionQuery};
use crate::service::dashboard::{summarize, DashboardSummary};
use crate::store::{KeyValueStore, RecordStore, StoreDocument, StoreError};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for contact use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Required field missing or blank.
    Validation(RecordValidationError),
    /// Referenced contact does not exist.
    ContactNotFound(ContactId),
    /// Persistence-layer failure.
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ContactNotFound(id) => write!(f, "contact not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::ContactNotFound(_) => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Validation(err) => Self::Validation(err),
            StoreError::ContactNotFound(id) => Self::ContactNotFound(id),
            other => Self::Store(other),
        }
    }
}

/// Raw contact form input. Also the JSON shape accepted by bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInput {
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
}

impl ContactInput {
    /// Trims every field; blank optional fields become absent.
    pub fn into_new_contact(self) -> NewContact {
        NewContact {
            name: self.name.trim().to_string(),
            email: clean(self.email),
            phone: clean(self.phone),
            company: clean(self.company),
            role: clean(self.role),
            tags: normalize_tags(&self.tags),
            linkedin: clean(self.linkedin),
            website: clean(self.website),
            how_met: clean(self.how_met),
            notes: clean(self.notes),
            location: clean(self.location),
            birthday: clean(self.birthday),
            last_interaction: None,
            next_followup: None,
        }
    }
}

/// Trims an optional form value and drops it when blank.
pub fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

/// Contact service facade over an explicitly provided record store.
pub struct ContactService<S: KeyValueStore> {
    store: RecordStore<S>,
    policy: FollowupPolicy,
}

impl<S: KeyValueStore> ContactService<S> {
    pub fn new(store: RecordStore<S>, policy: FollowupPolicy) -> Self {
        Self { store, policy }
    }

    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    pub fn policy(&self) -> &FollowupPolicy {
        &self.policy
    }

    /// Creates one contact from form input.
    pub fn create_contact(&mut self, input: ContactInput) -> ServiceResult<Contact> {
        Ok(self.store.add_contact(input.into_new_contact())?)
    }

    /// Creates many contacts with a single write; all or nothing.
    pub fn import_contacts(&mut self, inputs: Vec<ContactInput>) -> ServiceResult<Vec<Contact>> {
        let batch = inputs
            .into_iter()
            .map(ContactInput::into_new_contact)
            .collect();
        Ok(self.store.add_contacts(batch)?)
    }

    /// Applies a partial update. `Ok(None)` when `id` is unknown.
    pub fn edit_contact(
        &mut self,
        id: ContactId,
        patch: &ContactPatch,
    ) -> ServiceResult<Option<Contact>> {
        Ok(self.store.update_contact(id, patch)?)
    }

    /// Removes a contact and its interactions. `Ok(false)` when unknown.
    pub fn remove_contact(&mut self, id: ContactId) -> ServiceResult<bool> {
        Ok(self.store.delete_contact(id)?)
    }

    /// Records an interaction and reschedules the contact's follow-up.
    ///
    /// # Errors
    /// - `Validation` when `summary` is blank.
    /// - `ContactNotFound` when `contact_id` is unknown.
    pub fn log_interaction(
        &mut self,
        contact_id: ContactId,
        date: i64,
        kind: InteractionKind,
        summary: impl Into<String>,
    ) -> ServiceResult<(Interaction, Contact)> {
        let fields = NewInteraction {
            contact_id,
            date,
            kind,
            summary: summary.into().trim().to_string(),
        };
        Ok(self.store.log_interaction(fields, &self.policy)?)
    }

    /// Removes one interaction. `Ok(false)` when unknown.
    pub fn remove_interaction(&mut self, id: InteractionId) -> ServiceResult<bool> {
        Ok(self.store.delete_interaction(id)?)
    }

    /// Replaces every stored record with an exported document. Undoable.
    pub fn replace_all(&mut self, document: StoreDocument) -> ServiceResult<()> {
        Ok(self.store.replace_document(document)?)
    }

    pub fn contact(&self, id: ContactId) -> Option<&Contact> {
        self.store.contact(id)
    }

    /// Filters then orders contacts.
    pub fn list_contacts(&self, query: &ContactQuery, sort: ContactSort) -> Vec<&Contact> {
        let mut contacts = query.apply(self.store.contacts());
        sort.sort(&mut contacts);
        contacts
    }

    pub fn list_interactions(&self, query: &InteractionQuery) -> Vec<&Interaction> {
        query.apply(self.store.interactions())
    }

    /// A contact's interactions, newest first; equal dates keep insertion order.
    pub fn timeline(&self, contact_id: ContactId) -> Vec<&Interaction> {
        let mut interactions = self.store.interactions_for(contact_id);
        interactions.sort_by_key(|interaction| Reverse(interaction.date));
        interactions
    }

    /// Distinct tags across all contacts, sorted.
    pub fn known_tags(&self) -> Vec<String> {
        distinct(
            self.store
                .contacts()
                .iter()
                .flat_map(|contact| contact.tags.iter().map(String::as_str)),
        )
    }

    pub fn known_companies(&self) -> Vec<String> {
        distinct(
            self.store
                .contacts()
                .iter()
                .filter_map(|contact| contact.company.as_deref()),
        )
    }

    pub fn known_roles(&self) -> Vec<String> {
        distinct(
            self.store
                .contacts()
                .iter()
                .filter_map(|contact| contact.role.as_deref()),
        )
    }

    pub fn known_locations(&self) -> Vec<String> {
        distinct(
            self.store
                .contacts()
                .iter()
                .filter_map(|contact| contact.location.as_deref()),
        )
    }

    pub fn dashboard(&self, today: i64) -> DashboardSummary {
        summarize(self.store.contacts(), today)
    }

    pub fn undo(&mut self) -> ServiceResult<bool> {
        Ok(self.store.undo()?)
    }

    pub fn redo(&mut self) -> ServiceResult<bool> {
        Ok(self.store.redo()?)
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{clean, ContactInput};

    #[test]
    fn clean_drops_blank_values() {
        assert_eq!(clean(Some("  ".to_string())), None);
        assert_eq!(clean(Some(" x ".to_string())), Some("x".to_string()));
        assert_eq!(clean(None), None);
    }

    #[test]
    fn input_normalizes_all_fields() {
        let input = ContactInput {
            name: "  Ada Lovelace ".to_string(),
            company: Some("".to_string()),
            tags: vec![" VC ".to_string(), "".to_string(), "VC".to_string()],
            ..ContactInput::default()
        };
        let fields = input.into_new_contact();
        assert_eq!(fields.name, "Ada Lovelace");
        assert_eq!(fields.company, None);
        assert_eq!(fields.tags, vec!["VC".to_string()]);
    }
}
