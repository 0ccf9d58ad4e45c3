use nettrack_core::db::open_db_in_memory;
use nettrack_core::{
    ContactInput, ContactPatch, ContactQuery, ContactService, ContactSort, FollowupPolicy,
    InteractionKind, InteractionQuery, MemoryKeyValueStore, RecordStore, ServiceError,
    SqliteKeyValueStore, DAY_MS,
};
use uuid::Uuid;

const JAN_1: i64 = 1_704_067_200_000;

fn service() -> ContactService<MemoryKeyValueStore> {
    let store = RecordStore::open_default(MemoryKeyValueStore::new()).unwrap();
    ContactService::new(store, FollowupPolicy::default())
}

fn input(name: &str, company: Option<&str>, tags: &[&str]) -> ContactInput {
    ContactInput {
        name: name.to_string(),
        company: company.map(str::to_string),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        ..ContactInput::default()
    }
}

#[test]
fn create_contact_trims_and_drops_blank_fields() {
    let mut service = service();
    let contact = service
        .create_contact(ContactInput {
            name: "  Alice ".to_string(),
            email: Some("   ".to_string()),
            tags: vec!["VC ".to_string(), "VC".to_string()],
            ..ContactInput::default()
        })
        .unwrap();
    assert_eq!(contact.name, "Alice");
    assert_eq!(contact.email, None);
    assert_eq!(contact.tags, vec!["VC".to_string()]);
}

#[test]
fn create_contact_maps_validation_errors() {
    let mut service = service();
    let err = service.create_contact(input(" ", None, &[])).unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[test]
fn log_interaction_reschedules_and_timeline_is_newest_first() {
    let mut service = service();
    let alice = service.create_contact(input("Alice", None, &[])).unwrap();

    service
        .log_interaction(alice.id, JAN_1, InteractionKind::Call, "first")
        .unwrap();
    let (_, contact) = service
        .log_interaction(alice.id, JAN_1 + 3 * DAY_MS, InteractionKind::Email, " second ")
        .unwrap();

    assert_eq!(contact.last_interaction, Some(JAN_1 + 3 * DAY_MS));
    assert_eq!(contact.next_followup, Some(JAN_1 + 10 * DAY_MS));
    let summaries = service
        .timeline(alice.id)
        .iter()
        .map(|interaction| interaction.summary.as_str())
        .collect::<Vec<_>>();
    assert_eq!(summaries, vec!["second", "first"]);
}

#[test]
fn log_interaction_for_unknown_contact_is_not_found() {
    let mut service = service();
    let missing = Uuid::new_v4();
    let err = service
        .log_interaction(missing, JAN_1, InteractionKind::Other, "hello")
        .unwrap_err();
    assert!(matches!(err, ServiceError::ContactNotFound(id) if id == missing));
}

#[test]
fn list_contacts_filters_then_sorts() {
    let mut service = service();
    service.create_contact(input("bob", Some("Acme"), &[])).unwrap();
    service.create_contact(input("Zed", Some("Other"), &[])).unwrap();
    service.create_contact(input("Alice", Some("ACME"), &[])).unwrap();

    let query = ContactQuery {
        company: Some("acme".to_string()),
        ..ContactQuery::default()
    };
    let listed = service
        .list_contacts(&query, ContactSort::Name)
        .iter()
        .map(|contact| contact.name.clone())
        .collect::<Vec<_>>();
    assert_eq!(listed, vec!["Alice".to_string(), "bob".to_string()]);
}

#[test]
fn autocomplete_lists_are_distinct_and_sorted() {
    let mut service = service();
    service
        .create_contact(input("A", Some("Globex"), &["VC", "Friend"]))
        .unwrap();
    service
        .create_contact(input("B", Some("Acme"), &["VC"]))
        .unwrap();
    service.create_contact(input("C", None, &[])).unwrap();

    assert_eq!(service.known_tags(), vec!["Friend", "VC"]);
    assert_eq!(service.known_companies(), vec!["Acme", "Globex"]);
    assert!(service.known_roles().is_empty());
}

#[test]
fn import_contacts_writes_all_records() {
    let mut service = service();
    let created = service
        .import_contacts(vec![input("A", None, &[]), input("B", None, &[])])
        .unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(service.store().contacts().len(), 2);
    assert!(service.undo().unwrap());
    assert!(service.store().contacts().is_empty());
    assert!(service.redo().unwrap());
    assert_eq!(service.store().contacts().len(), 2);
}

#[test]
fn dashboard_counts_statuses_and_lists_recent_contacts() {
    let mut service = service();
    let today = JAN_1 + 10 * DAY_MS;
    let overdue = service.create_contact(input("Overdue", None, &[])).unwrap();
    let due = service.create_contact(input("Due", None, &[])).unwrap();
    service.create_contact(input("Quiet", None, &[])).unwrap();

    service
        .log_interaction(overdue.id, JAN_1, InteractionKind::Call, "old")
        .unwrap();
    service
        .log_interaction(due.id, JAN_1 + 3 * DAY_MS, InteractionKind::Call, "newer")
        .unwrap();

    let summary = service.dashboard(today);
    assert_eq!(summary.total_contacts, 3);
    assert_eq!(summary.overdue, 1);
    assert_eq!(summary.due_today, 1);
    assert_eq!(summary.upcoming, 0);
    let recent = summary
        .recent
        .iter()
        .map(|contact| contact.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(recent, vec!["Due", "Overdue"]);
}

#[test]
fn edit_and_remove_work_against_sqlite_backend() {
    let conn = open_db_in_memory().unwrap();
    let store = RecordStore::open_default(SqliteKeyValueStore::new(&conn)).unwrap();
    let mut service = ContactService::new(store, FollowupPolicy::default());

    let alice = service.create_contact(input("Alice", None, &[])).unwrap();
    let patch = ContactPatch {
        role: Some(Some("Partner".to_string())),
        ..ContactPatch::default()
    };
    let edited = service.edit_contact(alice.id, &patch).unwrap().unwrap();
    assert_eq!(edited.role.as_deref(), Some("Partner"));

    assert!(service.remove_contact(alice.id).unwrap());
    assert!(!service.remove_contact(alice.id).unwrap());
    assert!(service.edit_contact(alice.id, &patch).unwrap().is_none());
}

#[test]
fn list_interactions_applies_every_query_field() {
    let mut service = service();
    let alice = service.create_contact(input("Alice", None, &[])).unwrap();
    let bob = service.create_contact(input("Bob", None, &[])).unwrap();
    service
        .log_interaction(alice.id, JAN_1, InteractionKind::Call, "Pitch review")
        .unwrap();
    service
        .log_interaction(alice.id, JAN_1 + 5 * DAY_MS, InteractionKind::Email, "pitch deck")
        .unwrap();
    service
        .log_interaction(bob.id, JAN_1 + DAY_MS, InteractionKind::Call, "intro")
        .unwrap();

    assert_eq!(service.list_interactions(&InteractionQuery::default()).len(), 3);

    let for_alice = InteractionQuery {
        contact_id: Some(alice.id),
        text: Some("PITCH".to_string()),
        ..InteractionQuery::default()
    };
    let summaries = service
        .list_interactions(&for_alice)
        .into_iter()
        .map(|interaction| interaction.summary.as_str())
        .collect::<Vec<_>>();
    assert_eq!(summaries, vec!["Pitch review", "pitch deck"]);

    let calls_in_range = InteractionQuery {
        kind: Some(InteractionKind::Call),
        from: Some(JAN_1 + DAY_MS),
        to: Some(JAN_1 + 5 * DAY_MS),
        ..InteractionQuery::default()
    };
    let matched = service.list_interactions(&calls_in_range);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].contact_id, bob.id);
}

#[test]
fn known_locations_are_distinct_sorted_and_skip_blanks() {
    let mut service = service();
    for (name, location) in [
        ("Alice", Some("Berlin")),
        ("Bob", Some(" Austin ")),
        ("Carol", Some("Berlin")),
        ("Dan", Some("   ")),
        ("Eve", None),
    ] {
        service
            .create_contact(ContactInput {
                name: name.to_string(),
                location: location.map(str::to_string),
                ..ContactInput::default()
            })
            .unwrap();
    }
    assert_eq!(
        service.known_locations(),
        vec!["Austin".to_string(), "Berlin".to_string()]
    );
}
