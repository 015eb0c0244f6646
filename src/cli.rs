//
// cli.rs
// dicom-suite
//
// Defines the CLI surface with Clap and drives the resolve-then-execute flow against the registry.
//
// Thales Matheus Mendonça Santos - March 2026

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;

use crate::dispatch;
use crate::fsutil;
use crate::registry::{CommandContext, Registry};
use crate::suites;

/// Directory searched for a default input when `--input` is omitted.
const DEFAULT_INPUT_DIR: &str = "input";

#[derive(Parser)]
#[command(name = "dicom-suite")]
#[command(about = "Suíte de comandos DICOM em Rust", long_about = None)]
pub struct Cli {
    /// Command to run (see --list for the catalog)
    pub command: Option<String>,

    /// DICOM file or directory; defaults to the first .dcm under ./input
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output directory, created when missing
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// List available commands grouped by module
    #[arg(short, long)]
    pub list: bool,

    /// Print extra details for commands
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parse the arguments, assemble the registry, and dispatch. The returned
/// status becomes the process exit code.
pub fn run() -> i32 {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let registry = dispatch::assemble(&suites::sources());

    if cli.list {
        return match registry.list(&mut io::stdout()) {
            Ok(()) => 0,
            Err(_) => 1,
        };
    }

    let Some(command) = cli.command else {
        print_usage(&registry, &mut io::stdout());
        return 1;
    };

    if !registry.exists(&command) {
        eprintln!("Unknown command: {command}");
        print_usage(&registry, &mut io::stdout());
        return 1;
    }

    let input_path = match cli.input {
        Some(path) => path,
        None => match fsutil::find_first_dicom(DEFAULT_INPUT_DIR) {
            Some(path) => {
                println!("Auto-detected input file: {:?}", path);
                path
            }
            None => {
                eprintln!("Error: no .dcm file provided and none found in {DEFAULT_INPUT_DIR}/");
                return 1;
            }
        },
    };

    if let Err(err) = fsutil::ensure_output_dir(&cli.output) {
        eprintln!("{err:#}");
        return 1;
    }

    let ctx = CommandContext {
        input_path,
        output_dir: cli.output,
        verbose: cli.verbose,
    };
    registry.run(&command, &ctx)
}

pub fn print_usage(registry: &Registry, out: &mut impl Write) {
    let _ = writeln!(out, "Usage: dicom-suite <command> [options]");
    let _ = writeln!(out, "Options:");
    let _ = writeln!(out, "  -i, --input <path>   DICOM file or directory");
    let _ = writeln!(out, "  -o, --output <dir>   Output directory (default: output)");
    let _ = writeln!(out, "  -l, --list           List available commands");
    let _ = writeln!(out, "  -v, --verbose        Print extra details for commands");
    let _ = writeln!(out);
    let _ = writeln!(out, "Commands:");
    let _ = registry.list(out);
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    // try_init so tests and repeated calls do not panic on double-init.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_text_includes_the_command_catalog() {
        let registry = dispatch::assemble(&suites::sources());

        let mut out = Vec::new();
        print_usage(&registry, &mut out);
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Usage: dicom-suite"));
        assert!(text.contains("[General]"));
        assert!(text.contains("  - all: Run every available module suite"));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
