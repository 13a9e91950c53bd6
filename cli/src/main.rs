use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use contacts_core::config::{ENV_API_URL, ENV_TIMEOUT_MS};
use contacts_core::validation::strip_whitespace;
use contacts_core::{
    format_phone_number, name_helper_text, phone_helper_text, validate_field, Config, Contact,
    ContactFormData, ContactId, ContactPatch, ContactStore, Field, StoreOutcome, TracingNotifier,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "contacts", about = "Manage contacts against the contacts API or offline")]
struct Cli {
    /// Base URL of the contacts API; empty runs offline [env: CONTACTS_API_URL]
    #[arg(long)]
    api_url: Option<String>,

    /// Availability probe timeout in milliseconds [env: CONTACTS_API_TIMEOUT_MS]
    #[arg(long)]
    timeout_ms: Option<String>,

    /// Print results as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the contact list
    List,
    /// Report whether the remote API is reachable
    Status,
    /// Add a contact
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
    },
    /// Change the name and/or phone number of a contact
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Delete a contact
    Delete { id: String },
    /// Show validation feedback for a name
    CheckName { value: String },
    /// Show validation feedback for a phone number
    CheckPhone { value: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("contacts_core=info".parse()?))
        .init();

    let cli = Cli::parse();

    // Pure validation commands don't need a store.
    match &cli.command {
        Command::CheckName { value } => {
            let error = validate_field(Field::Name, value);
            println!("{}", name_helper_text(value, error));
            return finish(error.is_none());
        }
        Command::CheckPhone { value } => {
            let error = validate_field(Field::PhoneNumber, &strip_whitespace(value));
            println!("{}", format_phone_number(value));
            println!("{}", phone_helper_text(value, error));
            return finish(error.is_none());
        }
        _ => {}
    }

    let config = Config::from_env_with(|key| match key {
        ENV_API_URL => cli.api_url.clone(),
        ENV_TIMEOUT_MS => cli.timeout_ms.clone(),
        _ => None,
    })?;
    info!(remote = config.remote_enabled(), "starting contact store");
    let store = ContactStore::builder(config)
        .notifier(Arc::new(TracingNotifier))
        .init()
        .await;
    if let Some(error) = store.load_error() {
        eprintln!("warning: {error}");
    }

    match cli.command {
        Command::List => print_contacts(&store.contacts().await, cli.json)?,
        Command::Status => {
            let available = store.is_remote_available().await;
            println!("{}", if available { "remote" } else { "offline" });
        }
        Command::Add { name, phone } => {
            let outcome = store.add(&ContactFormData::new(name, phone)).await;
            report(outcome, cli.json)?;
        }
        Command::Update { id, name, phone } => {
            let numero = match phone {
                Some(phone) => Some(parse_phone(&phone)?),
                None => None,
            };
            let patch = ContactPatch { nom: name, numero };
            if patch.is_empty() {
                bail!("nothing to update: pass --name and/or --phone");
            }
            let outcome = store.update(&ContactId::from(id.as_str()), &patch).await;
            report(outcome, cli.json)?;
        }
        Command::Delete { id } => match store.delete(&ContactId::from(id.as_str())).await {
            StoreOutcome::Ok(true) => println!("deleted {id}"),
            StoreOutcome::Ok(false) => println!("no contact with id {id}"),
            other => report(other, cli.json)?,
        },
        Command::CheckName { .. } | Command::CheckPhone { .. } => {}
    }
    Ok(())
}

fn finish(valid: bool) -> Result<()> {
    if !valid {
        bail!("invalid input");
    }
    Ok(())
}

fn parse_phone(raw: &str) -> Result<u32> {
    let digits = strip_whitespace(raw);
    if let Some(error) = validate_field(Field::PhoneNumber, &digits) {
        bail!("{error}");
    }
    Ok(digits.parse()?)
}

fn print_contacts(contacts: &[Contact], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(contacts)?);
        return Ok(());
    }
    for c in contacts {
        let phone = format_phone_number(&c.numero.to_string());
        println!("{:>14}  {:<24}  {phone}", c.id.to_string(), c.nom);
    }
    Ok(())
}

fn report<T: std::fmt::Debug>(outcome: StoreOutcome<T>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.report())?);
    }
    match outcome {
        StoreOutcome::Ok(value) => {
            if !json {
                println!("{value:?}");
            }
            Ok(())
        }
        StoreOutcome::ValidationFailed(errors) => {
            for (field, message) in &errors {
                eprintln!("{field}: {message}");
            }
            bail!("validation failed")
        }
        StoreOutcome::RemoteFailed(reason) => bail!("remote API error: {reason}"),
        StoreOutcome::NotFound(id) => bail!("no contact with id {id}"),
    }
}
