//! Person CLI commands

use clap::Subcommand;

use crate::display::format_person_list;
use crate::error::SplitResult;
use crate::services::PersonService;
use crate::storage::Storage;

/// Person subcommands
#[derive(Subcommand)]
pub enum PersonCommands {
    /// Add someone to the ledger
    Add {
        /// Display name, unique regardless of case
        name: String,
    },
    /// List everyone in the ledger
    List,
    /// Rename a person
    Rename {
        /// Person name or ID
        person: String,
        /// New name
        name: String,
    },
    /// Remove a person who has no expenses or settlements
    Remove {
        /// Person name or ID
        person: String,
    },
}

/// Handle a person command
pub fn handle_person_command(storage: &Storage, cmd: PersonCommands) -> SplitResult<()> {
    let service = PersonService::new(storage);

    match cmd {
        PersonCommands::Add { name } => {
            let person = service.create(&name)?;
            println!("Added {} ({})", person.name, person.id);
        }

        PersonCommands::List => {
            let people = service.list()?;
            print!("{}", format_person_list(&people));
        }

        PersonCommands::Rename { person, name } => {
            let old_name = service.resolve(&person)?.name;
            let renamed = service.rename(&person, &name)?;
            println!("Renamed {} to {}", old_name, renamed.name);
        }

        PersonCommands::Remove { person } => {
            let removed = service.remove(&person)?;
            println!("Removed {}", removed.name);
        }
    }

    Ok(())
}
