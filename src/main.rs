//
// main.rs
// dicom-suite
//
// Process entry point: the CLI layer resolves a command and its status becomes the exit code.
//
// Thales Matheus Mendonça Santos - March 2026

use dicom_suite::cli;

fn main() {
    std::process::exit(cli::run());
}
