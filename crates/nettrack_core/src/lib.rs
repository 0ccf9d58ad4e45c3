//! Core domain logic for the network tracker.
//! This crate is the single source of truth for contact and interaction invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod service;
pub mod store;

pub use config::{ConfigError, ConfigResult, TrackerConfig};
pub use logging::{
    default_log_level, init_logging, init_logging_from, logging_status, LoggingStatus,
};
pub use model::{
    Contact, ContactId, ContactPatch, FollowupPolicy, FollowupStatus, Interaction, InteractionId,
    InteractionKind, NewContact, NewInteraction, RecordValidationError, DAY_MS,
};
pub use query::{ContactQuery, ContactSort, Filter, InteractionQuery};
pub use service::contact_service::{ContactInput, ContactService, ServiceError, ServiceResult};
pub use service::dashboard::DashboardSummary;
pub use store::{
    KeyValueStore, MemoryKeyValueStore, RecordStore, SqliteKeyValueStore, StoreDocument,
    StoreError, StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
