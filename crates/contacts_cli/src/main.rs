//! Interactive contact list front end.
//!
//! # Responsibility
//! - Play the page's role: own the form inputs, forward clicks and submits to
//!   the core controller, redraw the view after every command.
//! - Resolve configuration from environment and command-line flags.

use clap::Parser;
use contacts_core::kv::open_sqlite;
use contacts_core::{
    core_version, init_logging, render_view, AppConfig, BannerMode, CardId, Controller,
    CorruptionPolicy, KeyValueStore, MemoryKeyValueStore, Presentation, RecordStore, Severity,
    SqliteKeyValueStore, StorageTarget, SubmitOutcome, ViewModel,
};
use log::warn;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

const HELP: &str = "\
commands:
  name <text>     type into the name input
  email <text>    type into the email input
  submit          submit the form (add or update)
  edit <n>        click Edit on card n
  delete <n>      click Delete on card n
  cancel          click the Add User button (leaves edit mode)
  list            redraw the page
  dismiss         close all visible banners
  reset           remove all stored contacts
  help            show this text
  quit            exit";

#[derive(Parser, Debug)]
#[command(name = "contacts", version, about = "Manage a local contact list")]
struct Args {
    /// SQLite file holding the contact list.
    #[arg(long, conflicts_with = "memory")]
    db: Option<PathBuf>,
    /// Keep contacts in memory only.
    #[arg(long)]
    memory: bool,
    #[arg(long)]
    storage_key: Option<String>,
    #[arg(long)]
    log_level: Option<String>,
    /// Absolute directory for rolling log files.
    #[arg(long)]
    log_dir: Option<PathBuf>,
    /// Banner display time in milliseconds.
    #[arg(long)]
    banner_ms: Option<u64>,
    /// Show one banner at a time instead of stacking them.
    #[arg(long)]
    queue_banners: bool,
    /// Read unparseable stored data as an empty list.
    #[arg(long)]
    reset_corrupt: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    SetName(String),
    SetEmail(String),
    Submit,
    Edit(usize),
    Delete(usize),
    Cancel,
    List,
    Dismiss,
    Reset,
    Help,
    Quit,
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("contacts: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    let config = resolve_config(AppConfig::from_env().map_err(|err| err.to_string())?, args)?;

    if let Some(target) = init_logging(&config).map_err(|err| err.to_string())? {
        eprintln!("logging at {} to {}", target.level, target.dir.display());
    }

    match &config.storage {
        StorageTarget::Memory => session(&config, MemoryKeyValueStore::new()),
        StorageTarget::Sqlite(path) => {
            let conn = open_sqlite(path)
                .map_err(|err| format!("failed to open `{}`: {err}", path.display()))?;
            let kv = SqliteKeyValueStore::try_new(&conn).map_err(|err| err.to_string())?;
            session(&config, kv)
        }
    }
}

fn resolve_config(mut config: AppConfig, args: Args) -> Result<AppConfig, String> {
    if args.memory {
        config.storage = StorageTarget::Memory;
    } else if let Some(path) = args.db {
        config.storage = StorageTarget::Sqlite(path);
    }
    if let Some(key) = args.storage_key {
        config.storage_key = key;
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }
    if let Some(dir) = args.log_dir {
        config.log_dir = Some(dir);
    }
    if let Some(ms) = args.banner_ms {
        if ms == 0 {
            return Err("--banner-ms must be greater than zero".to_string());
        }
        config.banner_ttl = Duration::from_millis(ms);
    }
    if args.queue_banners {
        config.banner_mode = BannerMode::Queue;
    }
    if args.reset_corrupt {
        config.corruption_policy = CorruptionPolicy::ResetToEmpty;
    }
    Ok(config)
}

fn session<K: KeyValueStore>(config: &AppConfig, kv: K) -> Result<(), String> {
    let store = RecordStore::with_key(kv, config.storage_key.clone())
        .with_corruption_policy(config.corruption_policy);
    let view = ViewModel::new()
        .with_banner_ttl(config.banner_ttl)
        .with_banner_mode(config.banner_mode);
    let mut controller = Controller::new(store, view);

    // Load failures are already shown as a banner; the page stays usable.
    if let Err(err) = controller.load() {
        warn!("event=page_load module=cli status=error error={err}");
    }

    println!("contacts {}\n{HELP}\n", core_version());
    redraw(&mut controller)?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.map_err(|err| format!("failed to read input: {err}"))?;
        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => println!("{HELP}"),
            Ok(command) => apply(&mut controller, command),
            Err(message) => println!("{message}"),
        }
        redraw(&mut controller)?;
    }

    Ok(())
}

fn apply<K: KeyValueStore>(controller: &mut Controller<K, ViewModel>, command: Command) {
    match command {
        Command::SetName(value) => controller.view_mut().form_mut().name = value,
        Command::SetEmail(value) => controller.view_mut().form_mut().email = value,
        Command::Submit => {
            let form = controller.view().form().clone();
            match controller.submit(&form.name, &form.email) {
                Ok(SubmitOutcome::Updated(0)) => {
                    warn!("event=submit module=cli status=noop reason=original_missing")
                }
                Ok(_) => {}
                Err(err) => warn!("event=submit module=cli status=error error={err}"),
            }
        }
        Command::Edit(number) => match card_id(controller, number) {
            Some(card) => {
                controller.begin_edit(card);
            }
            None => println!("no card #{number}"),
        },
        Command::Delete(number) => match card_id(controller, number) {
            Some(card) => {
                if let Err(err) = controller.delete(card) {
                    warn!("event=delete module=cli status=error error={err}");
                }
            }
            None => println!("no card #{number}"),
        },
        Command::Cancel => controller.cancel(),
        Command::List => {}
        Command::Dismiss => {
            let ids: Vec<_> = controller.view().banners().map(|banner| banner.id).collect();
            for id in ids {
                controller.view_mut().dismiss(id);
            }
        }
        Command::Reset => {
            if let Err(err) = controller.store().clear() {
                controller
                    .view_mut()
                    .notify(&format!("Storage error: {err}"), Severity::Danger);
                return;
            }
            if let Err(err) = controller.load() {
                warn!("event=reset module=cli status=error error={err}");
            }
        }
        Command::Help | Command::Quit => {}
    }
}

fn card_id<K: KeyValueStore>(
    controller: &Controller<K, ViewModel>,
    number: usize,
) -> Option<CardId> {
    let index = number.checked_sub(1)?;
    controller.view().card(index).map(|card| card.id)
}

fn redraw<K: KeyValueStore>(controller: &mut Controller<K, ViewModel>) -> Result<(), String> {
    controller.view_mut().dismiss_expired();
    print_page(&render_view(controller.view()))
        .map_err(|err| format!("failed to write output: {err}"))
}

fn print_page(page: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{page}")?;
    write!(stdout, "> ")?;
    stdout.flush()
}

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (verb, rest) = match line.trim_start().split_once(' ') {
        Some((verb, rest)) => (verb, rest),
        None => (line.trim(), ""),
    };

    match verb {
        "name" => Ok(Command::SetName(rest.to_string())),
        "email" => Ok(Command::SetEmail(rest.to_string())),
        "submit" => Ok(Command::Submit),
        "edit" => parse_card_number(rest).map(Command::Edit),
        "delete" => parse_card_number(rest).map(Command::Delete),
        "cancel" => Ok(Command::Cancel),
        "list" => Ok(Command::List),
        "dismiss" => Ok(Command::Dismiss),
        "reset" => Ok(Command::Reset),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command `{other}`; type `help`")),
    }
}

fn parse_card_number(raw: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(format!("expected a card number >= 1, got `{}`", raw.trim())),
        Ok(number) => Ok(number),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_command, resolve_config, Args, Command};
    use clap::Parser;
    use contacts_core::{AppConfig, BannerMode, CorruptionPolicy, StorageTarget};
    use std::time::Duration;

    #[test]
    fn parse_command_keeps_input_text_verbatim() {
        assert_eq!(
            parse_command("name Ann Lee").unwrap(),
            Command::SetName("Ann Lee".to_string())
        );
        assert_eq!(
            parse_command("email").unwrap(),
            Command::SetEmail(String::new())
        );
        assert_eq!(parse_command("delete 2").unwrap(), Command::Delete(2));
        assert_eq!(parse_command("exit").unwrap(), Command::Quit);
    }

    #[test]
    fn parse_command_rejects_bad_card_numbers_and_unknown_verbs() {
        assert!(parse_command("edit 0").is_err());
        assert!(parse_command("edit one").is_err());
        assert!(parse_command("frobnicate").is_err());
    }

    #[test]
    fn flags_override_environment_config() {
        let args = Args::parse_from([
            "contacts",
            "--memory",
            "--banner-ms",
            "750",
            "--queue-banners",
            "--reset-corrupt",
        ]);
        let config = resolve_config(AppConfig::default(), args).unwrap();

        assert_eq!(config.storage, StorageTarget::Memory);
        assert_eq!(config.banner_ttl, Duration::from_millis(750));
        assert_eq!(config.banner_mode, BannerMode::Queue);
        assert_eq!(config.corruption_policy, CorruptionPolicy::ResetToEmpty);
    }

    #[test]
    fn db_and_memory_flags_conflict() {
        assert!(Args::try_parse_from(["contacts", "--memory", "--db", "/tmp/x.db"]).is_err());
    }
}
