//! Ready-made queries for the contact and interaction list views.

use crate::model::{Contact, ContactId, FollowupStatus, Interaction, InteractionKind};
use crate::query::filter::Filter;
use std::cmp::Reverse;
use std::str::FromStr;

/// Contact list filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactQuery {
    /// Matches name, company or any tag, ignoring case.
    pub text: Option<String>,
    /// Exact, case-sensitive tag.
    pub tag: Option<String>,
    /// Company substring, ignoring case.
    pub company: Option<String>,
    pub status: Option<FollowupStatus>,
    /// Reference time (epoch ms) used for `status`.
    pub today: i64,
}

impl ContactQuery {
    pub fn filter(&self) -> Filter<'static, Contact> {
        let today = self.today;
        Filter::<Contact>::new()
            .contains_text_any(self.text.as_deref(), |contact| {
                let mut fields = vec![contact.name.as_str()];
                fields.extend(contact.company.as_deref());
                fields.extend(contact.tags.iter().map(String::as_str));
                fields
            })
            .includes(self.tag.as_deref(), |contact| contact.tags.as_slice())
            .contains_text(self.company.as_deref(), |contact| contact.company.as_deref())
            .equals(self.status, move |contact| {
                Some(FollowupStatus::of(contact, today))
            })
    }

    pub fn apply<'c>(&self, contacts: &'c [Contact]) -> Vec<&'c Contact> {
        self.filter().apply(contacts)
    }
}

/// Interaction list filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionQuery {
    pub contact_id: Option<ContactId>,
    pub kind: Option<InteractionKind>,
    /// Inclusive lower bound on `date`.
    pub from: Option<i64>,
    /// Inclusive upper bound on `date`.
    pub to: Option<i64>,
    /// Summary substring, ignoring case.
    pub text: Option<String>,
}

impl InteractionQuery {
    pub fn filter(&self) -> Filter<'static, Interaction> {
        Filter::<Interaction>::new()
            .equals(self.contact_id, |interaction| Some(interaction.contact_id))
            .equals(self.kind, |interaction| Some(interaction.kind))
            .in_range(self.from, self.to, |interaction| Some(interaction.date))
            .contains_text(self.text.as_deref(), |interaction| {
                Some(interaction.summary.as_str())
            })
    }

    pub fn apply<'i>(&self, interactions: &'i [Interaction]) -> Vec<&'i Interaction> {
        self.filter().apply(interactions)
    }
}

/// Display order for contact lists. All orders are stable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContactSort {
    #[default]
    Insertion,
    /// Name, ignoring case.
    Name,
    /// Most recent interaction first; never-contacted last.
    LastInteraction,
    /// Soonest follow-up first; unscheduled last.
    NextFollowup,
}

impl ContactSort {
    pub fn sort(self, contacts: &mut [&Contact]) {
        match self {
            Self::Insertion => {}
            Self::Name => contacts.sort_by_cached_key(|contact| contact.name.to_lowercase()),
            Self::LastInteraction => {
                contacts.sort_by_key(|contact| Reverse(contact.last_interaction))
            }
            Self::NextFollowup => contacts
                .sort_by_key(|contact| (contact.next_followup.is_none(), contact.next_followup)),
        }
    }
}

impl FromStr for ContactSort {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "insertion" | "added" => Ok(Self::Insertion),
            "name" => Ok(Self::Name),
            "last_interaction" | "last-interaction" | "recent" => Ok(Self::LastInteraction),
            "next_followup" | "next-followup" | "followup" => Ok(Self::NextFollowup),
            other => Err(format!(
                "unknown sort `{other}`; expected insertion|name|last-interaction|next-followup"
            )),
        }
    }
}
