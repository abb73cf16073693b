//! `contacts` - CLI for contactlist
//!
//! This binary lists, searches, adds, deletes and calls contacts kept in the
//! local contacts database.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use contactlist::cli::{
    AddCommand, CallCommand, Cli, Command, ConfigCommand, DeleteCommand, ListCommand,
    OutputFormat, ShowCommand,
};
use contactlist::{
    init_logging, initiate_call, Config, Contact, ContactId, ContactStore, DeleteOutcome,
    Dialer, ListController, RecordingDialer, Storage,
};

// Platform-specific imports using conditional compilation
#[cfg(target_os = "linux")]
use contactlist_linux as platform;

#[cfg(target_os = "macos")]
use contactlist_mac as platform;

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Hands call addresses to the desktop's URL handler.
#[derive(Debug)]
struct PlatformDialer;

impl Dialer for PlatformDialer {
    fn name(&self) -> &'static str {
        platform::platform_name()
    }

    fn dial(&self, address: &str) -> Result<(), String> {
        platform::open_url(address).map_err(|e| e.to_string())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> CliResult {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
        command => run(&config, command).await,
    }
}

async fn run(config: &Config, command: Command) -> CliResult {
    platform::init()?;
    let storage = Storage::open(config.database_path())?
        .with_write_retries(config.storage.write_retries);

    match command {
        Command::List(cmd) => handle_list(Arc::new(storage), &cmd),
        Command::Add(cmd) => handle_add(&storage, cmd),
        Command::Show(cmd) => handle_show(&storage, &cmd),
        Command::Delete(cmd) => handle_delete(config, Arc::new(storage), &cmd).await,
        Command::Call(cmd) => handle_call(config, &storage, &cmd),
        Command::Status(cmd) => handle_status(&storage, cmd.json),
        Command::Config(cmd) => handle_config(config, cmd),
    }
}

fn handle_list(store: Arc<dyn ContactStore>, cmd: &ListCommand) -> CliResult {
    let mut controller = ListController::new(store)?;
    controller.set_search_text(cmd.search.as_str())?;

    match cmd.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(controller.contacts())?);
        }
        OutputFormat::Table => {
            println!("{:>6}  {:<20}  {:<20}  NUMBER", "ID", "NAME", "SECOND NAME");
            for contact in controller.contacts() {
                println!(
                    "{:>6}  {:<20}  {:<20}  {}",
                    contact.id, contact.name, contact.second_name, contact.number
                );
            }
        }
        OutputFormat::Plain => {
            for section in controller.sections() {
                println!("{}", section.title);
                for contact in section.contacts {
                    println!("  [{}] {}", contact.id, row_text(contact));
                }
            }
        }
    }

    if controller.contacts().is_empty() && cmd.format != OutputFormat::Json {
        if controller.filter().is_some() {
            println!("No contacts match \"{}\".", controller.search_text());
        } else {
            println!("No contacts yet.");
        }
    }
    Ok(())
}

fn row_text(contact: &Contact) -> String {
    if contact.second_name.is_empty() {
        contact.number.clone()
    } else {
        format!("{}  {}", contact.second_name, contact.number)
    }
}

fn handle_add(storage: &Storage, cmd: AddCommand) -> CliResult {
    let contact = storage.insert(&cmd.into())?;
    println!("Added contact {} ({}).", contact.id, contact.name);
    Ok(())
}

fn handle_show(storage: &Storage, cmd: &ShowCommand) -> CliResult {
    let Some(contact) = storage.get(cmd.id)? else {
        return Err(contactlist::Error::not_found(cmd.id).into());
    };

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&contact)?);
    } else {
        println!("Id:           {}", contact.id);
        println!("Name:         {}", contact.name);
        println!("Second name:  {}", contact.second_name);
        println!("Number:       {}", contact.number);
        println!("Added:        {}", contact.created_at.to_rfc3339());
    }
    Ok(())
}

async fn handle_delete(
    config: &Config,
    store: Arc<dyn ContactStore>,
    cmd: &DeleteCommand,
) -> CliResult {
    let yes = cmd.yes;
    delete_contact(
        store,
        cmd.id,
        config.confirm_delay(),
        |contact| if yes { Ok(true) } else { confirm_prompt(contact) },
        &mut io::stdout(),
    )
    .await
}

async fn delete_contact(
    store: Arc<dyn ContactStore>,
    id: ContactId,
    delay: Duration,
    confirm: impl FnOnce(&Contact) -> io::Result<bool>,
    out: &mut impl Write,
) -> CliResult {
    let Some(contact) = store.get(id)? else {
        writeln!(out, "Contact {id} was already deleted.")?;
        return Ok(());
    };

    let mut controller = ListController::new(store)?;
    controller.request_delete(contact.id);

    if !confirm(&contact)? {
        controller.cancel_delete();
        writeln!(out, "Cancelled.")?;
        return Ok(());
    }

    let result = controller
        .confirm_delete_deferred(delay)
        .await
        .map_err(|e| contactlist::Error::internal(format!("deletion task failed: {e}")))?;

    match controller.finish_delete(result) {
        Ok(DeleteOutcome::Deleted(contact)) => {
            writeln!(out, "Deleted {} ({}).", contact.name, contact.id)?;
        }
        Ok(DeleteOutcome::AlreadyGone(id)) => writeln!(out, "Contact {id} was already deleted.")?,
        Ok(DeleteOutcome::NothingPending) => {}
        Err(err) => {
            if let Some(notice) = controller.dismiss_notice() {
                writeln!(out, "{}", notice.message)?;
            }
            return Err(err.into());
        }
    }
    Ok(())
}

fn confirm_prompt(contact: &Contact) -> io::Result<bool> {
    let mut stdout = io::stdout();
    writeln!(stdout, "{} {}", contact.name, row_text(contact))?;
    write!(stdout, "Do you want to delete contact? [y/N] ")?;
    stdout.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
}

fn handle_call(config: &Config, storage: &Storage, cmd: &CallCommand) -> CliResult {
    let Some(contact) = storage.get(cmd.id)? else {
        return Err(contactlist::Error::not_found(cmd.id).into());
    };

    if cmd.dry_run || !config.dial.enabled {
        let dialer = RecordingDialer::new();
        initiate_call(&dialer, &config.dial.scheme, &contact.number);
        match dialer.addresses().first() {
            Some(address) => println!("{address}"),
            None => println!("Number {:?} cannot be dialed.", contact.number),
        }
    } else {
        initiate_call(&PlatformDialer, &config.dial.scheme, &contact.number);
    }
    Ok(())
}

fn handle_status(storage: &Storage, json: bool) -> CliResult {
    let stats = storage.stats()?;

    if json {
        let status = serde_json::json!({
            "platform": platform::platform_name(),
            "database_path": storage.path(),
            "total_contacts": stats.total_contacts,
            "last_added": stats.last_added,
            "db_size_bytes": stats.db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("contacts status");
        println!("---------------");
        println!("Platform:      {}", platform::platform_name());
        println!("Database:      {}", storage.path().display());
        println!("Contacts:      {}", stats.total_contacts);
        match stats.last_added {
            Some(at) => println!("Last added:    {}", at.to_rfc3339()),
            None => println!("Last added:    never"),
        }
        println!("Size (bytes):  {}", stats.db_size_bytes);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> CliResult {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Write retries:      {}", config.storage.write_retries);
                println!();
                println!("[Deletion]");
                println!("  Confirm delay (ms): {}", config.deletion.confirm_delay_ms);
                println!();
                println!("[Dial]");
                println!("  Scheme:             {}", config.dial.scheme);
                println!("  Enabled:            {}", config.dial.enabled);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
