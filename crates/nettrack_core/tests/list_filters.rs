use nettrack_core::{
    Contact, ContactQuery, Filter, FollowupStatus, Interaction, InteractionKind,
    InteractionQuery, NewContact, DAY_MS,
};
use uuid::Uuid;

fn contact(name: &str, company: Option<&str>, tags: &[&str]) -> Contact {
    let mut fields = NewContact::named(name);
    fields.company = company.map(str::to_string);
    fields.tags = tags.iter().map(|tag| tag.to_string()).collect();
    Contact::from_new(Uuid::new_v4(), fields)
}

fn roster() -> Vec<Contact> {
    vec![
        contact("Alice", Some("Acme Capital"), &["VC", "Friend"]),
        contact("Bob", Some("Globex"), &["vc"]),
        contact("Carol", None, &[]),
        contact("Dan", Some("acme labs"), &["Banking"]),
    ]
}

fn names<'a>(contacts: &[&'a Contact]) -> Vec<&'a str> {
    contacts.iter().map(|contact| contact.name.as_str()).collect()
}

#[test]
fn empty_filters_return_every_item_in_order() {
    let contacts = roster();
    let all = ContactQuery::default().apply(&contacts);
    assert_eq!(names(&all), vec!["Alice", "Bob", "Carol", "Dan"]);

    let blank = ContactQuery {
        text: Some("   ".to_string()),
        tag: Some(String::new()),
        company: Some(" ".to_string()),
        ..ContactQuery::default()
    };
    assert!(blank.filter().is_empty());
    assert_eq!(blank.apply(&contacts).len(), contacts.len());
}

#[test]
fn tag_filter_is_exact_and_case_sensitive() {
    let contacts = roster();
    let query = ContactQuery {
        tag: Some("VC".to_string()),
        ..ContactQuery::default()
    };
    assert_eq!(names(&query.apply(&contacts)), vec!["Alice"]);
}

#[test]
fn company_filter_ignores_case_and_skips_missing_values() {
    let contacts = roster();
    let query = ContactQuery {
        company: Some("ACME".to_string()),
        ..ContactQuery::default()
    };
    assert_eq!(names(&query.apply(&contacts)), vec!["Alice", "Dan"]);
}

#[test]
fn filters_combine_as_conjunction() {
    let contacts = roster();
    let query = ContactQuery {
        company: Some("acme".to_string()),
        tag: Some("Banking".to_string()),
        ..ContactQuery::default()
    };
    assert_eq!(names(&query.apply(&contacts)), vec!["Dan"]);
}

#[test]
fn status_filter_matches_followup_classification() {
    let today = 100 * DAY_MS;
    let mut contacts = roster();
    contacts[0].next_followup = Some(today - DAY_MS);
    contacts[1].next_followup = Some(today + 3 * DAY_MS);
    contacts[2].next_followup = Some(today + 60 * DAY_MS);

    let upcoming = ContactQuery {
        status: Some(FollowupStatus::Upcoming),
        today,
        ..ContactQuery::default()
    };
    assert_eq!(names(&upcoming.apply(&contacts)), vec!["Bob"]);

    let none = ContactQuery {
        status: Some(FollowupStatus::None),
        today,
        ..ContactQuery::default()
    };
    assert_eq!(names(&none.apply(&contacts)), vec!["Carol", "Dan"]);
}

#[test]
fn interaction_query_filters_by_contact_kind_range_and_text() {
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let interaction = |contact_id, date, kind, summary: &str| Interaction {
        id: Uuid::new_v4(),
        contact_id,
        date,
        kind,
        summary: summary.to_string(),
    };
    let interactions = vec![
        interaction(alice, 10, InteractionKind::Call, "Quarterly sync"),
        interaction(alice, 20, InteractionKind::Meeting, "Lunch"),
        interaction(bob, 30, InteractionKind::Call, "Intro call"),
        interaction(alice, 40, InteractionKind::Call, "Follow-up"),
    ];

    let query = InteractionQuery {
        contact_id: Some(alice),
        kind: Some(InteractionKind::Call),
        from: Some(10),
        to: Some(40),
        ..InteractionQuery::default()
    };
    let dates = query
        .apply(&interactions)
        .iter()
        .map(|interaction| interaction.date)
        .collect::<Vec<_>>();
    assert_eq!(dates, vec![10, 40]);

    let text = InteractionQuery {
        text: Some("CALL".to_string()),
        ..InteractionQuery::default()
    };
    assert_eq!(text.apply(&interactions).len(), 1);
}

#[derive(Debug)]
struct Deal {
    stage: &'static str,
    amount: u32,
}

#[test]
fn filter_works_for_any_record_type() {
    let deals = vec![
        Deal {
            stage: "open",
            amount: 10,
        },
        Deal {
            stage: "won",
            amount: 50,
        },
        Deal {
            stage: "open",
            amount: 90,
        },
    ];
    let filter = Filter::<Deal>::new()
        .equals(Some("open"), |deal: &Deal| Some(deal.stage))
        .in_range(Some(20), None, |deal: &Deal| Some(deal.amount));
    let matched = filter.apply(&deals);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].amount, 90);
}
