//! Command Shell Module
//!
//! Line-oriented commands used by the binary to drive a shared cache store.
//! Values entered through the shell are stored as `String`.

use std::str::FromStr;

use crate::cache::CacheStore;
use crate::error::{CacheError, Result};

/// Help text listing every command.
pub const HELP: &str = "\
commands:
  add <key> <value>      insert a new entry
  get <key>              read an entry
  update <key> <value>   replace an entry's value
  remove <key>           delete an entry
  clear                  delete all entries
  capacity <n>           change the capacity bound
  keys                   list keys, oldest first
  log                    print the change log as JSON lines
  info                   print capacity and statistics as JSON
  help                   show this text
  quit                   exit";

// == Command ==
/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { key: String, value: String },
    Get { key: String },
    Update { key: String, value: String },
    Remove { key: String },
    Clear,
    Capacity(usize),
    Keys,
    Log,
    Info,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CacheError;

    /// Parses `<verb> [key] [value...]`; the value is the rest of the line.
    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim_start();
        let (key, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        let value = value.trim_start();

        let need_key = || {
            if key.is_empty() {
                Err(CacheError::InvalidArgument(format!("{} needs a key", verb)))
            } else {
                Ok(key.to_string())
            }
        };
        let need_value = || {
            if value.is_empty() {
                Err(CacheError::InvalidArgument(format!("{} needs a value", verb)))
            } else {
                Ok(value.to_string())
            }
        };

        match verb.to_ascii_lowercase().as_str() {
            "add" | "set" => Ok(Command::Add {
                key: need_key()?,
                value: need_value()?,
            }),
            "get" => Ok(Command::Get { key: need_key()? }),
            "update" => Ok(Command::Update {
                key: need_key()?,
                value: need_value()?,
            }),
            "remove" | "del" => Ok(Command::Remove { key: need_key()? }),
            "clear" => Ok(Command::Clear),
            "capacity" => key
                .parse()
                .map(Command::Capacity)
                .map_err(|_| CacheError::InvalidArgument(format!("invalid capacity: {:?}", key))),
            "keys" => Ok(Command::Keys),
            "log" => Ok(Command::Log),
            "info" => Ok(Command::Info),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CacheError::InvalidArgument(format!(
                "unknown command: {:?}",
                other
            ))),
        }
    }
}

// == Execute ==
/// Runs a command and returns the text to print.
///
/// `Quit` returns an empty string; the caller decides when to stop.
pub fn execute(store: &CacheStore, command: Command) -> Result<String> {
    let output = match command {
        Command::Add { key, value } => {
            store.add(&key, value)?;
            format!("added {}", key)
        }
        Command::Get { key } => store.get::<String>(&key)?.to_string(),
        Command::Update { key, value } => {
            store.update(&key, value)?;
            format!("updated {}", key)
        }
        Command::Remove { key } => {
            store.remove(&key)?;
            format!("removed {}", key)
        }
        Command::Clear => {
            store.clear_all();
            "cleared".to_string()
        }
        Command::Capacity(n) => {
            store.set_capacity(n)?;
            format!("capacity {}", n)
        }
        Command::Keys => store.keys().join("\n"),
        Command::Log => store
            .change_log()
            .iter()
            .map(|record| to_json(&record))
            .collect::<Vec<_>>()
            .join("\n"),
        Command::Info => to_json(&store.info()),
        Command::Help => HELP.to_string(),
        Command::Quit => String::new(),
    };
    Ok(output)
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
}
