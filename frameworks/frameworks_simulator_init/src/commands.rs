//! Console Commands
//!
//! Parses one console line into a [`Command`].

use std::path::PathBuf;
use thiserror::Error;
use usecases_memory_management::{AllocationError, Strategy};

/// One console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `add <name> <size> <lifetime> [strategy]`
    Add {
        name: String,
        size: usize,
        lifetime: u32,
        strategy: Option<Strategy>,
    },
    /// `random`
    Random,
    /// `remove [id]`: a specific task, or the oldest one
    Remove(Option<u64>),
    Defrag,
    Blocks,
    Stats,
    List,
    Save(Option<PathBuf>),
    Load(Option<PathBuf>),
    Tick,
    Help,
    Quit,
}

/// Console parse errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("{arg} '{value}' is not a valid number")]
    InvalidNumber { arg: &'static str, value: String },
    #[error(transparent)]
    Strategy(#[from] AllocationError),
}

pub const HELP: &str = "\
commands:
  add <name> <size> <lifetime> [strategy]  allocate a task (strategy: first_fit, best_fit, worst_fit)
  random                                   allocate a random task with the default strategy
  remove [id]                              remove a task by id, or the oldest task
  defrag                                   compact the address space
  blocks                                   show the memory bar and free blocks
  stats                                    show occupancy statistics
  list                                     list tracked tasks, oldest first
  save [path]                              save tracked tasks to the snapshot file
  load [path]                              load tasks from the snapshot file
  tick                                     advance every task by one tick
  help                                     show this help
  quit                                     exit";

const ADD_USAGE: &str = "add <name> <size> <lifetime> [strategy]";

impl Command {
    /// Parse a console line; blank lines yield `Ok(None)`
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        let rest: Vec<&str> = words.collect();

        let command = match head.to_lowercase().as_str() {
            "add" => parse_add(&rest)?,
            "random" => no_args(&rest, "random", Command::Random)?,
            "remove" | "rm" => match rest.as_slice() {
                [] => Command::Remove(None),
                [id] => Command::Remove(Some(parse_number("id", id.trim_start_matches('#'))?)),
                _ => return Err(CommandError::Usage("remove [id]")),
            },
            "defrag" | "defragment" => no_args(&rest, "defrag", Command::Defrag)?,
            "blocks" => no_args(&rest, "blocks", Command::Blocks)?,
            "stats" => no_args(&rest, "stats", Command::Stats)?,
            "list" | "ls" => no_args(&rest, "list", Command::List)?,
            "save" => Command::Save(optional_path(&rest, "save [path]")?),
            "load" => Command::Load(optional_path(&rest, "load [path]")?),
            "tick" => no_args(&rest, "tick", Command::Tick)?,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn parse_add(args: &[&str]) -> Result<Command, CommandError> {
    let (name, size, lifetime, strategy) = match args {
        [name, size, lifetime] => (name, size, lifetime, None),
        [name, size, lifetime, strategy] => (name, size, lifetime, Some(strategy.parse()?)),
        _ => return Err(CommandError::Usage(ADD_USAGE)),
    };
    Ok(Command::Add {
        name: name.to_string(),
        size: parse_number("size", size)?,
        lifetime: parse_number("lifetime", lifetime)?,
        strategy,
    })
}

fn no_args(args: &[&str], usage: &'static str, command: Command) -> Result<Command, CommandError> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(CommandError::Usage(usage))
    }
}

fn optional_path(args: &[&str], usage: &'static str) -> Result<Option<PathBuf>, CommandError> {
    match args {
        [] => Ok(None),
        [path] => Ok(Some(PathBuf::from(path))),
        _ => Err(CommandError::Usage(usage)),
    }
}

fn parse_number<T: std::str::FromStr>(arg: &'static str, raw: &str) -> Result<T, CommandError> {
    raw.parse().map_err(|_| CommandError::InvalidNumber {
        arg,
        value: raw.to_string(),
    })
}
