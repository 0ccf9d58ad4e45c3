//! Subcommand definitions and their execution against the contact service.

use crate::dates;
use crate::render;
use clap::{Args, Subcommand};
use log::info;
use nettrack_core::model::parse_tags;
use nettrack_core::service::contact_service::clean;
use nettrack_core::{
    core_version, ContactId, ContactInput, ContactPatch, ContactQuery, ContactService,
    ContactSort, FollowupStatus, InteractionId, InteractionKind, KeyValueStore, StoreDocument,
};
use std::error::Error;
use std::path::PathBuf;

pub type CommandResult = Result<(), Box<dyn Error>>;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the version
    Version,
    /// Add a contact
    Add {
        name: String,
        #[command(flatten)]
        fields: ContactFields,
    },
    /// Change some fields of a contact; pass "" to clear an optional field
    Edit {
        id: ContactId,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: ContactFields,
    },
    /// Remove a contact and its interactions
    Remove { id: ContactId },
    /// Log an interaction and reschedule the contact's follow-up
    Log {
        contact_id: ContactId,
        /// meeting, call, email or other
        #[arg(long)]
        kind: InteractionKind,
        #[arg(long)]
        summary: String,
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Remove one interaction
    Unlog { id: InteractionId },
    /// List contacts
    List {
        /// Matches name, company or tag
        #[arg(long)]
        text: Option<String>,
        /// Exact tag
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        company: Option<String>,
        /// overdue, due, upcoming or none
        #[arg(long)]
        status: Option<FollowupStatus>,
        /// insertion, name, last-interaction or next-followup
        #[arg(long, default_value = "insertion")]
        sort: ContactSort,
        #[arg(long)]
        json: bool,
    },
    /// Show a contact with its interaction timeline
    Show {
        id: ContactId,
        #[arg(long)]
        json: bool,
    },
    /// Follow-up counts and recent contacts
    Dashboard,
    /// Print the whole store as JSON
    Export,
    /// Import contacts from a JSON array, or restore an export with --replace
    Import {
        file: PathBuf,
        #[arg(long)]
        replace: bool,
    },
    /// Revert the last change made in this session
    Undo,
    /// Re-apply the last undone change
    Redo,
    /// Read commands from stdin against one open store
    Shell,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Version => "version",
            Self::Add { .. } => "add",
            Self::Edit { .. } => "edit",
            Self::Remove { .. } => "remove",
            Self::Log { .. } => "log",
            Self::Unlog { .. } => "unlog",
            Self::List { .. } => "list",
            Self::Show { .. } => "show",
            Self::Dashboard => "dashboard",
            Self::Export => "export",
            Self::Import { .. } => "import",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::Shell => "shell",
        }
    }
}

/// Optional contact fields shared by `add` and `edit`.
#[derive(Args, Debug, Default)]
pub struct ContactFields {
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    company: Option<String>,
    #[arg(long)]
    role: Option<String>,
    /// Comma-separated, e.g. "VC, Friend"
    #[arg(long)]
    tags: Option<String>,
    #[arg(long)]
    linkedin: Option<String>,
    #[arg(long)]
    website: Option<String>,
    #[arg(long)]
    how_met: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    birthday: Option<String>,
}

impl ContactFields {
    fn into_input(self, name: String) -> ContactInput {
        ContactInput {
            name,
            email: self.email,
            phone: self.phone,
            company: self.company,
            role: self.role,
            tags: self.tags.as_deref().map(parse_tags).unwrap_or_default(),
            linkedin: self.linkedin,
            website: self.website,
            how_met: self.how_met,
            notes: self.notes,
            location: self.location,
            birthday: self.birthday,
        }
    }

    /// A blank value clears the field.
    fn into_patch(self, name: Option<String>) -> ContactPatch {
        let set = |value: Option<String>| value.map(|raw| clean(Some(raw)));
        ContactPatch {
            name: name.map(|raw| raw.trim().to_string()),
            email: set(self.email),
            phone: set(self.phone),
            company: set(self.company),
            role: set(self.role),
            tags: self.tags.as_deref().map(parse_tags),
            linkedin: set(self.linkedin),
            website: set(self.website),
            how_met: set(self.how_met),
            notes: set(self.notes),
            location: set(self.location),
            birthday: set(self.birthday),
            ..ContactPatch::default()
        }
    }
}

/// Runs one command and prints its result to stdout.
pub fn execute<S: KeyValueStore>(service: &mut ContactService<S>, command: Command) -> CommandResult {
    let command_name = command.name();
    let today = dates::today()?;

    match command {
        Command::Version => println!("nettrack {}", core_version()),
        Command::Add { name, fields } => {
            let contact = service.create_contact(fields.into_input(name))?;
            println!("added {}", render::contact_line(&contact, today));
        }
        Command::Edit { id, name, fields } => {
            let patch = fields.into_patch(name);
            if patch.is_empty() {
                return Err("nothing to change; pass at least one field".into());
            }
            match service.edit_contact(id, &patch)? {
                Some(contact) => println!("updated {}", render::contact_line(&contact, today)),
                None => println!("no contact with id {id}"),
            }
        }
        Command::Remove { id } => {
            if service.remove_contact(id)? {
                println!("removed {id}");
            } else {
                println!("no contact with id {id}");
            }
        }
        Command::Log {
            contact_id,
            kind,
            summary,
            date,
        } => {
            let date = match date {
                Some(raw) => dates::parse_date(&raw)?,
                None => today,
            };
            let (interaction, contact) = service.log_interaction(contact_id, date, kind, summary)?;
            println!("logged {}", render::interaction_line(&interaction));
            println!(
                "next follow-up for {}: {}",
                contact.name,
                dates::format_optional(contact.next_followup)
            );
        }
        Command::Unlog { id } => {
            if service.remove_interaction(id)? {
                println!("removed interaction {id}");
            } else {
                println!("no interaction with id {id}");
            }
        }
        Command::List {
            text,
            tag,
            company,
            status,
            sort,
            json,
        } => {
            let query = ContactQuery {
                text,
                tag,
                company,
                status,
                today,
            };
            let contacts = service.list_contacts(&query, sort);
            if json {
                println!("{}", serde_json::to_string_pretty(&contacts)?);
            } else {
                for contact in contacts {
                    println!("{}", render::contact_line(contact, today));
                }
            }
        }
        Command::Show { id, json } => {
            let contact = service
                .contact(id)
                .ok_or_else(|| format!("no contact with id {id}"))?;
            let timeline = service.timeline(id);
            if json {
                let value = serde_json::json!({
                    "contact": contact,
                    "interactions": timeline,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print!("{}", render::contact_detail(contact, &timeline, today));
            }
        }
        Command::Dashboard => {
            print!(
                "{}",
                render::dashboard(
                    &service.dashboard(today),
                    service.store().namespace(),
                    service.policy(),
                    today,
                )
            );
        }
        Command::Export => {
            println!("{}", serde_json::to_string_pretty(service.store().document())?);
        }
        Command::Import { file, replace } => {
            let raw = std::fs::read_to_string(&file)?;
            if replace {
                let document: StoreDocument = serde_json::from_str(&raw)?;
                let count = document.contacts.len();
                service.replace_all(document)?;
                println!("replaced store with {count} contacts");
            } else {
                let inputs: Vec<ContactInput> = serde_json::from_str(&raw)?;
                let created = service.import_contacts(inputs)?;
                println!("imported {} contacts", created.len());
            }
        }
        Command::Undo => {
            if service.undo()? {
                println!("undone");
            } else {
                println!("nothing to undo");
            }
        }
        Command::Redo => {
            if service.redo()? {
                println!("redone");
            } else {
                println!("nothing to redo");
            }
        }
        Command::Shell => return Err("`shell` cannot be nested".into()),
    }

    info!("event=cli_command module=cli status=ok command={command_name}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::ContactFields;

    #[test]
    fn blank_edit_values_clear_and_tags_are_parsed() {
        let fields = ContactFields {
            email: Some("  ".to_string()),
            company: Some(" Acme ".to_string()),
            tags: Some("VC, ,Friend".to_string()),
            ..ContactFields::default()
        };
        let patch = fields.into_patch(None);
        assert_eq!(patch.email, Some(None));
        assert_eq!(patch.company, Some(Some("Acme".to_string())));
        assert_eq!(
            patch.tags,
            Some(vec!["VC".to_string(), "Friend".to_string()])
        );
        assert_eq!(patch.name, None);
        assert_eq!(patch.phone, None);
    }

    #[test]
    fn empty_fields_make_an_empty_patch() {
        assert!(ContactFields::default().into_patch(None).is_empty());
    }
}
