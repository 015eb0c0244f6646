//
// registry.rs
// dicom-suite
//
// Ordered catalog of named commands: registration, lookup, execution, and module-grouped listing.
//
// Thales Matheus Mendonça Santos - March 2026

use std::collections::{BTreeMap, HashMap};
use std::io::{self, Write};
use std::path::PathBuf;

use thiserror::Error;

/// Fixed status returned by [`Registry::run`] when the requested name is absent.
pub const UNKNOWN_COMMAND_STATUS: i32 = 1;

/// Shared read-only data handed to every command action at execution time.
///
/// Built once per invocation by the CLI layer; the registry only forwards it.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub verbose: bool,
}

/// Type-erased command body returning a process-style status code.
pub type CommandAction = Box<dyn Fn(&CommandContext) -> i32 + Send + Sync>;

/// One invocable operation: lookup key, grouping label, summary, and body.
pub struct Command {
    pub name: String,
    pub module: String,
    pub description: String,
    pub action: CommandAction,
}

impl Command {
    pub fn new(
        name: impl Into<String>,
        module: impl Into<String>,
        description: impl Into<String>,
        action: impl Fn(&CommandContext) -> i32 + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            description: description.into(),
            action: Box::new(action),
        }
    }
}

/// Catalog metadata without the action, clonable for snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: String,
    pub module: String,
    pub description: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("command name must not be empty")]
    EmptyName,
    #[error("duplicate command registration skipped: {0}")]
    DuplicateName(String),
}

/// In-memory catalog of commands with insertion order preserved and O(1)
/// lookup by name.
///
/// Populated during startup, read-only from the moment dispatch begins.
#[derive(Default)]
pub struct Registry {
    ordered: Vec<Command>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under its name. The first registration of a name
    /// wins; a later duplicate is rejected and the existing entry is left
    /// untouched.
    pub fn register(&mut self, command: Command) -> Result<(), RegistrationError> {
        if command.name.is_empty() {
            return Err(RegistrationError::EmptyName);
        }
        if self.index.contains_key(&command.name) {
            return Err(RegistrationError::DuplicateName(command.name));
        }

        self.index.insert(command.name.clone(), self.ordered.len());
        self.ordered.push(command);
        Ok(())
    }

    pub fn exists(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Run the named command and pass its status through unchanged. An
    /// unknown name yields [`UNKNOWN_COMMAND_STATUS`] after a diagnostic
    /// instead of a fault, so callers can keep going.
    pub fn run(&self, name: &str, ctx: &CommandContext) -> i32 {
        match self.index.get(name) {
            Some(&pos) => (self.ordered[pos].action)(ctx),
            None => {
                tracing::error!("Unknown command: {name}");
                UNKNOWN_COMMAND_STATUS
            }
        }
    }

    /// Write the catalog grouped by module. Groups and the names inside them
    /// are sorted so the listing is stable across runs; the empty module
    /// label renders as "General".
    pub fn list(&self, out: &mut impl Write) -> io::Result<()> {
        let mut grouped: BTreeMap<&str, Vec<&Command>> = BTreeMap::new();
        for cmd in &self.ordered {
            grouped.entry(cmd.module.as_str()).or_default().push(cmd);
        }

        for (module, mut commands) in grouped {
            let label = if module.is_empty() { "General" } else { module };
            writeln!(out, "[{label}]")?;
            commands.sort_by(|a, b| a.name.cmp(&b.name));
            for cmd in commands {
                writeln!(out, "  - {}: {}", cmd.name, cmd.description)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    /// Snapshot of the catalog metadata in insertion order, for consumers
    /// that need the catalog without text rendering.
    pub fn commands(&self) -> Vec<CommandInfo> {
        self.ordered
            .iter()
            .map(|cmd| CommandInfo {
                name: cmd.name.clone(),
                module: cmd.module.clone(),
                description: cmd.description.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

/// Convert a backend operation's result into a command status, logging the
/// failure so one broken command does not take the rest of the suite down.
pub fn status_of(result: anyhow::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            tracing::error!("Command failed: {err:#}");
            1
        }
    }
}
