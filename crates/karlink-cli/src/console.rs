//! Line-based console commands read from stdin.

use std::io::{self, BufRead};
use std::thread::{self, JoinHandle};

use anyhow::{Result, bail};
use karlink_core::{Command, ItemCatalog, LinkHandle, SessionEvent};
use tracing::{debug, info, warn};

pub const HELP: &str = "\
/dolphin            show the Dolphin connection status
/deathlink          toggle death link
/give <item|code>   queue an item as if it had been received
/death              simulate an incoming death
/quit               stop the link";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Dolphin,
    DeathLink,
    Give(String),
    Death,
    Quit,
    Help,
}

/// Parse one console line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let Some(rest) = line.strip_prefix('/') else {
        bail!("Commands start with '/', try /help");
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "dolphin" => ConsoleCommand::Dolphin,
        "deathlink" => ConsoleCommand::DeathLink,
        "death" => ConsoleCommand::Death,
        "quit" | "exit" => ConsoleCommand::Quit,
        "help" => ConsoleCommand::Help,
        "give" if arg.is_empty() => bail!("Usage: /give <item name or code>"),
        "give" => ConsoleCommand::Give(arg.to_string()),
        other => bail!("Unknown command: /{}", other),
    };
    Ok(Some(command))
}

/// Look an item up by code or by case-insensitive name
pub fn resolve_item(catalog: &ItemCatalog, query: &str) -> Option<i64> {
    if let Ok(code) = query.parse::<i64>() {
        return catalog.get(code).map(|item| item.code);
    }
    catalog
        .iter()
        .find(|item| item.name.eq_ignore_ascii_case(query))
        .map(|item| item.code)
}

/// Spawn a thread that forwards stdin commands to the link until `/quit` or EOF.
pub fn spawn_console_reader(handle: LinkHandle, catalog: ItemCatalog) -> JoinHandle<()> {
    thread::spawn(move || {
        debug!("Console reader started");

        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            match parse_command(&line) {
                Ok(Some(ConsoleCommand::Quit)) => {
                    handle.shutdown();
                    break;
                }
                Ok(Some(command)) => dispatch(&handle, &catalog, command),
                Ok(None) => {}
                Err(e) => warn!("{}", e),
            }
            if handle.wake().is_shutdown() {
                break;
            }
        }

        debug!("Console reader stopped");
    })
}

fn dispatch(handle: &LinkHandle, catalog: &ItemCatalog, command: ConsoleCommand) {
    match command {
        ConsoleCommand::Dolphin => {
            handle.send(Command::ShowStatus);
        }
        ConsoleCommand::DeathLink => {
            handle.send(Command::ToggleDeathLink);
        }
        ConsoleCommand::Give(query) => match resolve_item(catalog, &query) {
            Some(code) => {
                handle.send(Command::Grant(code));
            }
            None => warn!("No item named {}", query),
        },
        ConsoleCommand::Death => {
            handle.session_event(SessionEvent::Death {
                source: "console".to_string(),
            });
        }
        ConsoleCommand::Help => info!("Commands:\n{}", HELP),
        ConsoleCommand::Quit => handle.shutdown(),
    }
}
