//! Record store for contacts and interactions.
//!
//! # Responsibility
//! - Keep the authoritative in-process document of contacts/interactions.
//! - Restore it from, and rewrite it wholesale to, one key-value namespace.
//! - Provide synchronous mutation entry points and snapshot undo/redo.
//!
//! # Invariants
//! - A mutation reaches memory only after its write succeeded.
//! - Deleting a contact deletes every interaction referencing it.
//! - New ids never collide with an id already in the document.
//! - Update/delete of an unknown id is a silent no-op.

use super::history::{History, DEFAULT_HISTORY_CAPACITY};
use super::kv::{KeyValueStore, KvError};
use crate::model::{
    Contact, ContactId, ContactPatch, FollowupPolicy, Interaction, InteractionId, NewContact,
    NewInteraction, RecordValidationError,
};
use log::{debug, info, warn};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Namespace key the document is stored under unless configured otherwise.
pub const DEFAULT_NAMESPACE: &str = "network-tracker-storage";
/// Document schema version written by this build.
pub const DOCUMENT_VERSION: u32 = 1;

pub type StoreResult<T> = Result<T, StoreError>;

/// Record store failures.
#[derive(Debug)]
pub enum StoreError {
    Validation(RecordValidationError),
    /// An interaction referenced a contact that is not stored.
    ContactNotFound(ContactId),
    Kv(KvError),
    Encode(serde_json::Error),
    /// The stored document was written by a newer build.
    UnsupportedDocumentVersion {
        found: u32,
        supported: u32,
    },
    /// A replacement document broke referential or identity rules.
    InvalidDocument(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ContactNotFound(id) => write!(f, "contact not found: {id}"),
            Self::Kv(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode store document: {err}"),
            Self::UnsupportedDocumentVersion { found, supported } => write!(
                f,
                "stored document version {found} is newer than supported {supported}"
            ),
            Self::InvalidDocument(message) => write!(f, "invalid store document: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Kv(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::ContactNotFound(_)
            | Self::UnsupportedDocumentVersion { .. }
            | Self::InvalidDocument(_) => None,
        }
    }
}

impl From<RecordValidationError> for StoreError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<KvError> for StoreError {
    fn from(value: KvError) -> Self {
        Self::Kv(value)
    }
}

/// Serialized shape persisted under the namespace key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default = "legacy_document_version")]
    pub version: u32,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION,
            contacts: Vec::new(),
            interactions: Vec::new(),
        }
    }
}

impl StoreDocument {
    pub fn contact(&self, id: ContactId) -> Option<&Contact> {
        self.contacts.iter().find(|contact| contact.id == id)
    }

    fn contact_index(&self, id: ContactId) -> Option<usize> {
        self.contacts.iter().position(|contact| contact.id == id)
    }

    fn id_in_use(&self, id: Uuid) -> bool {
        self.contacts.iter().any(|contact| contact.id == id)
            || self
                .interactions
                .iter()
                .any(|interaction| interaction.id == id)
    }

    /// Returns a random id not yet used by any stored record.
    fn fresh_id(&self) -> Uuid {
        loop {
            let candidate = Uuid::new_v4();
            if !self.id_in_use(candidate) {
                return candidate;
            }
        }
    }

    /// Checks record validity, id uniqueness and that every interaction
    /// references a stored contact.
    pub fn check_integrity(&self) -> StoreResult<()> {
        let mut seen = HashSet::new();
        for contact in &self.contacts {
            contact.validate().map_err(RecordValidationError::from)?;
            if !seen.insert(contact.id) {
                return Err(StoreError::InvalidDocument(format!(
                    "duplicate id {}",
                    contact.id
                )));
            }
        }
        let contact_ids = seen.clone();
        for interaction in &self.interactions {
            interaction.validate().map_err(RecordValidationError::from)?;
            if !seen.insert(interaction.id) {
                return Err(StoreError::InvalidDocument(format!(
                    "duplicate id {}",
                    interaction.id
                )));
            }
            if !contact_ids.contains(&interaction.contact_id) {
                return Err(StoreError::InvalidDocument(format!(
                    "interaction {} references missing contact {}",
                    interaction.id, interaction.contact_id
                )));
            }
        }
        Ok(())
    }

    /// Drops interactions whose contact is not stored. Returns how many.
    fn prune_orphans(&mut self) -> usize {
        let contact_ids = self
            .contacts
            .iter()
            .map(|contact| contact.id)
            .collect::<HashSet<_>>();
        let before = self.interactions.len();
        self.interactions
            .retain(|interaction| contact_ids.contains(&interaction.contact_id));
        before - self.interactions.len()
    }
}

fn legacy_document_version() -> u32 {
    1
}

/// Reads only the version and which collections are present.
#[derive(Deserialize)]
struct DocumentHeader {
    #[serde(default = "legacy_document_version")]
    version: u32,
    #[serde(default)]
    contacts: Option<IgnoredAny>,
    #[serde(default)]
    interactions: Option<IgnoredAny>,
}

/// Contact/interaction store persisted through a [`KeyValueStore`].
///
/// Constructed explicitly and passed to its callers; there is no global
/// instance.
pub struct RecordStore<S: KeyValueStore> {
    kv: S,
    namespace: String,
    document: StoreDocument,
    history: History,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Restores the document stored under `namespace`.
    ///
    /// - Missing key: empty store.
    /// - Malformed document: empty store plus a warning. The stored value is
    ///   left untouched until the next mutation rewrites it.
    ///
    /// # Errors
    /// - `Kv` when the backend read fails or the namespace is blank.
    /// - `UnsupportedDocumentVersion` when a newer build wrote the document.
    pub fn open(kv: S, namespace: impl Into<String>) -> StoreResult<Self> {
        let namespace = namespace.into();
        let document = match kv.get(&namespace)? {
            Some(raw) => decode_document(&raw)?,
            None => StoreDocument::default(),
        };

        info!(
            "event=store_open module=store status=ok contacts={} interactions={}",
            document.contacts.len(),
            document.interactions.len()
        );

        Ok(Self {
            kv,
            namespace,
            document,
            history: History::with_capacity(DEFAULT_HISTORY_CAPACITY),
        })
    }

    /// Restores the document stored under [`DEFAULT_NAMESPACE`].
    pub fn open_default(kv: S) -> StoreResult<Self> {
        Self::open(kv, DEFAULT_NAMESPACE)
    }

    /// Sets how many prior states `undo` can reach. Discards existing history.
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history = History::with_capacity(capacity);
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn document(&self) -> &StoreDocument {
        &self.document
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.document.contacts
    }

    pub fn interactions(&self) -> &[Interaction] {
        &self.document.interactions
    }

    pub fn contact(&self, id: ContactId) -> Option<&Contact> {
        self.document.contact(id)
    }

    pub fn interaction(&self, id: InteractionId) -> Option<&Interaction> {
        self.document
            .interactions
            .iter()
            .find(|interaction| interaction.id == id)
    }

    /// Interactions referencing `contact_id`, in insertion order.
    pub fn interactions_for(&self, contact_id: ContactId) -> Vec<&Interaction> {
        self.document
            .interactions
            .iter()
            .filter(|interaction| interaction.contact_id == contact_id)
            .collect()
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    pub fn into_kv(self) -> S {
        self.kv
    }

    pub fn can_undo(&self) -> bool {
        self.history.peek_undo().is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.history.peek_redo().is_some()
    }

    /// Creates a contact with a fresh id and returns the stored record.
    ///
    /// No uniqueness is enforced on name or email.
    pub fn add_contact(&mut self, fields: NewContact) -> StoreResult<Contact> {
        let contact = Contact::from_new(self.fresh_id(), fields);
        contact.validate().map_err(RecordValidationError::from)?;

        let mut next = self.document.clone();
        next.contacts.push(contact.clone());
        self.commit(next)?;

        debug!(
            "event=contact_add module=store status=ok contact_id={}",
            contact.id
        );
        Ok(contact)
    }

    /// Creates several contacts with one write. Nothing is stored when any
    /// of them is invalid.
    pub fn add_contacts(&mut self, batch: Vec<NewContact>) -> StoreResult<Vec<Contact>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let mut next = self.document.clone();
        let mut created = Vec::with_capacity(batch.len());
        for fields in batch {
            let contact = Contact::from_new(next.fresh_id(), fields);
            contact.validate().map_err(RecordValidationError::from)?;
            next.contacts.push(contact.clone());
            created.push(contact);
        }
        self.commit(next)?;

        debug!(
            "event=contact_add_batch module=store status=ok count={}",
            created.len()
        );
        Ok(created)
    }

    /// Merges `patch` into the contact with `id`.
    ///
    /// Returns `Ok(None)` without writing when `id` is unknown.
    ///
    /// # Errors
    /// - `Validation` when the merged record is invalid (blank name).
    pub fn update_contact(
        &mut self,
        id: ContactId,
        patch: &ContactPatch,
    ) -> StoreResult<Option<Contact>> {
        let Some(index) = self.document.contact_index(id) else {
            debug!("event=contact_update module=store status=skipped reason=not_found contact_id={id}");
            return Ok(None);
        };

        let mut updated = self.document.contacts[index].clone();
        patch.apply_to(&mut updated);
        updated.validate().map_err(RecordValidationError::from)?;
        if updated == self.document.contacts[index] {
            return Ok(Some(updated));
        }

        let mut next = self.document.clone();
        next.contacts[index] = updated.clone();
        self.commit(next)?;

        debug!("event=contact_update module=store status=ok contact_id={id}");
        Ok(Some(updated))
    }

    /// Removes the contact and every interaction referencing it.
    ///
    /// Returns `Ok(false)` without writing when `id` is unknown.
    pub fn delete_contact(&mut self, id: ContactId) -> StoreResult<bool> {
        if self.document.contact_index(id).is_none() {
            debug!("event=contact_delete module=store status=skipped reason=not_found contact_id={id}");
            return Ok(false);
        }

        let mut next = self.document.clone();
        next.contacts.retain(|contact| contact.id != id);
        let before = next.interactions.len();
        next.interactions
            .retain(|interaction| interaction.contact_id != id);
        let cascaded = before - next.interactions.len();
        self.commit(next)?;

        debug!(
            "event=contact_delete module=store status=ok contact_id={} cascaded_interactions={}",
            id, cascaded
        );
        Ok(true)
    }

    /// Appends an interaction without touching its contact.
    ///
    /// Prefer [`RecordStore::log_interaction`], which also schedules the
    /// contact's follow-up.
    ///
    /// # Errors
    /// - `Validation` when the summary is blank.
    /// - `ContactNotFound` when the referenced contact is not stored.
    pub fn add_interaction(&mut self, fields: NewInteraction) -> StoreResult<Interaction> {
        let interaction = self.prepare_interaction(fields)?;

        let mut next = self.document.clone();
        next.interactions.push(interaction.clone());
        self.commit(next)?;

        debug!(
            "event=interaction_add module=store status=ok interaction_id={} contact_id={}",
            interaction.id, interaction.contact_id
        );
        Ok(interaction)
    }

    /// Appends an interaction and updates the owning contact in one write.
    ///
    /// The contact's `last_interaction` becomes the interaction date and its
    /// `next_followup` is scheduled by `policy`.
    pub fn log_interaction(
        &mut self,
        fields: NewInteraction,
        policy: &FollowupPolicy,
    ) -> StoreResult<(Interaction, Contact)> {
        let interaction = self.prepare_interaction(fields)?;
        let index = self
            .document
            .contact_index(interaction.contact_id)
            .ok_or(StoreError::ContactNotFound(interaction.contact_id))?;

        let mut next = self.document.clone();
        let contact = &mut next.contacts[index];
        let followup = policy.next_followup(contact, interaction.date);
        contact.last_interaction = Some(interaction.date);
        contact.next_followup = Some(followup);
        let contact = contact.clone();
        next.interactions.push(interaction.clone());
        self.commit(next)?;

        debug!(
            "event=interaction_log module=store status=ok interaction_id={} contact_id={}",
            interaction.id, contact.id
        );
        Ok((interaction, contact))
    }

    /// Removes one interaction. Returns `Ok(false)` when `id` is unknown.
    ///
    /// The contact's follow-up fields are left as they are.
    pub fn delete_interaction(&mut self, id: InteractionId) -> StoreResult<bool> {
        if self.interaction(id).is_none() {
            debug!("event=interaction_delete module=store status=skipped reason=not_found interaction_id={id}");
            return Ok(false);
        }

        let mut next = self.document.clone();
        next.interactions.retain(|interaction| interaction.id != id);
        self.commit(next)?;

        debug!("event=interaction_delete module=store status=ok interaction_id={id}");
        Ok(true)
    }

    /// Replaces the whole document after an integrity check. Undoable.
    pub fn replace_document(&mut self, mut document: StoreDocument) -> StoreResult<()> {
        if document.version > DOCUMENT_VERSION {
            return Err(StoreError::UnsupportedDocumentVersion {
                found: document.version,
                supported: DOCUMENT_VERSION,
            });
        }
        document.version = DOCUMENT_VERSION;
        document.check_integrity()?;
        self.commit(document)?;

        info!(
            "event=store_replace module=store status=ok contacts={} interactions={}",
            self.document.contacts.len(),
            self.document.interactions.len()
        );
        Ok(())
    }

    /// Restores the state before the last mutation.
    ///
    /// Returns `Ok(false)` when there is nothing to undo.
    pub fn undo(&mut self) -> StoreResult<bool> {
        let Some(previous) = self.history.peek_undo().cloned() else {
            return Ok(false);
        };
        self.write(&previous)?;
        let current = std::mem::replace(&mut self.document, previous);
        self.history.commit_undo(current);

        debug!(
            "event=store_undo module=store status=ok remaining={}",
            self.history.undo_depth()
        );
        Ok(true)
    }

    /// Re-applies the last undone state.
    ///
    /// Returns `Ok(false)` when there is nothing to redo.
    pub fn redo(&mut self) -> StoreResult<bool> {
        let Some(following) = self.history.peek_redo().cloned() else {
            return Ok(false);
        };
        self.write(&following)?;
        let current = std::mem::replace(&mut self.document, following);
        self.history.commit_redo(current);

        debug!(
            "event=store_redo module=store status=ok remaining={}",
            self.history.redo_depth()
        );
        Ok(true)
    }

    fn prepare_interaction(&self, fields: NewInteraction) -> StoreResult<Interaction> {
        let interaction = Interaction::from_new(self.fresh_id(), fields);
        interaction
            .validate()
            .map_err(RecordValidationError::from)?;
        if self.document.contact_index(interaction.contact_id).is_none() {
            return Err(StoreError::ContactNotFound(interaction.contact_id));
        }
        Ok(interaction)
    }

    fn fresh_id(&self) -> Uuid {
        self.document.fresh_id()
    }

    fn commit(&mut self, next: StoreDocument) -> StoreResult<()> {
        self.write(&next)?;
        let previous = std::mem::replace(&mut self.document, next);
        self.history.record(previous);
        Ok(())
    }

    fn write(&mut self, document: &StoreDocument) -> StoreResult<()> {
        let encoded = serde_json::to_string(document).map_err(StoreError::Encode)?;
        self.kv.set(&self.namespace, &encoded)?;
        Ok(())
    }
}

/// Decodes a stored document, falling back to empty on malformed input.
///
/// Malformed means: not JSON of the expected shape, neither collection
/// present, or records breaking validation or id uniqueness. Orphan
/// interactions alone are repaired, not rejected.
fn decode_document(raw: &str) -> StoreResult<StoreDocument> {
    let header = match serde_json::from_str::<DocumentHeader>(raw) {
        Ok(header) => header,
        Err(err) => return Ok(malformed_json(&err)),
    };

    if header.version > DOCUMENT_VERSION {
        return Err(StoreError::UnsupportedDocumentVersion {
            found: header.version,
            supported: DOCUMENT_VERSION,
        });
    }
    if header.contacts.is_none() && header.interactions.is_none() {
        return Ok(fallback_empty("missing_collections"));
    }

    let mut document = match serde_json::from_str::<StoreDocument>(raw) {
        Ok(document) => document,
        Err(err) => return Ok(malformed_json(&err)),
    };

    let pruned = document.prune_orphans();
    if pruned > 0 {
        warn!("event=store_open module=store status=repaired orphan_interactions={pruned}");
    }
    document.version = DOCUMENT_VERSION;
    if document.check_integrity().is_err() {
        return Ok(fallback_empty("invalid_records"));
    }
    Ok(document)
}

fn malformed_json(err: &serde_json::Error) -> StoreDocument {
    warn!(
        "event=store_open module=store status=fallback reason=malformed_document error_line={} error_column={}",
        err.line(),
        err.column()
    );
    StoreDocument::default()
}

// Record errors can echo user text, so only the reason is logged.
fn fallback_empty(reason: &str) -> StoreDocument {
    warn!("event=store_open module=store status=fallback reason={reason}");
    StoreDocument::default()
}

#[cfg(test)]
mod tests {
    use super::{decode_document, StoreDocument, StoreError};

    #[test]
    fn decode_falls_back_to_empty_for_garbage() {
        let document = decode_document("{not json").unwrap();
        assert_eq!(document, StoreDocument::default());
    }

    #[test]
    fn decode_falls_back_to_empty_for_wrong_shape() {
        let document = decode_document(r#"{"contacts": 42}"#).unwrap();
        assert_eq!(document, StoreDocument::default());
    }

    #[test]
    fn decode_reads_documents_without_version() {
        let document = decode_document(r#"{"contacts": [], "interactions": []}"#).unwrap();
        assert_eq!(document.version, 1);
    }

    #[test]
    fn decode_treats_documents_without_collections_as_malformed() {
        assert_eq!(decode_document("{}").unwrap(), StoreDocument::default());
        let foreign = r#"{"state": {"contacts": [1]}, "version": 0}"#;
        assert_eq!(decode_document(foreign).unwrap(), StoreDocument::default());
    }

    #[test]
    fn decode_falls_back_to_empty_for_invalid_records() {
        let raw = r#"{"contacts": [{"id": "0c8b0c55-3c7e-4b42-9a53-1d0c9d3f2a10", "name": " "}]}"#;
        assert_eq!(decode_document(raw).unwrap(), StoreDocument::default());
    }

    #[test]
    fn decode_rejects_newer_versions() {
        let err = decode_document(r#"{"version": 7}"#).unwrap_err();
        assert!(matches!(
            err,
            StoreError::UnsupportedDocumentVersion {
                found: 7,
                supported: 1
            }
        ));
    }

    #[test]
    fn decode_prunes_orphan_interactions() {
        let raw = r#"{
            "contacts": [],
            "interactions": [{
                "id": "9f0f4a52-52f4-4b8d-8a43-3d5b8a0f7f11",
                "contactId": "0c8b0c55-3c7e-4b42-9a53-1d0c9d3f2a10",
                "date": 0,
                "type": "Call",
                "summary": "hello"
            }]
        }"#;
        let document = decode_document(raw).unwrap();
        assert!(document.interactions.is_empty());
    }
}
