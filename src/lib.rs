//
// lib.rs
// dicom-suite
//
// Exposes the registry/dispatch core, the backend modules, and the CLI entry point.
//
// Thales Matheus Mendonça Santos - March 2026

pub mod cli;
pub mod dispatch;
pub mod fsutil;
pub mod models;
pub mod registry;
pub mod suites;

// Optional backends, compiled in through Cargo features.
#[cfg(feature = "anon")]
pub mod anonymize;
#[cfg(feature = "inspect")]
pub mod dump;
#[cfg(feature = "inspect")]
pub mod json;
#[cfg(feature = "inspect")]
pub mod metadata;
#[cfg(feature = "pixels")]
pub mod pixels;
#[cfg(feature = "inspect")]
pub mod scan;
#[cfg(feature = "transcode")]
pub mod transcode;
#[cfg(feature = "inspect")]
pub mod validate;

pub use registry::{Command, CommandContext, Registry};
