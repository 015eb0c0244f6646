//
// dispatch.rs
// dicom-suite
//
// Assembles the registry from explicit command sources and composes the best-effort "all" aggregate.
//
// Thales Matheus Mendonça Santos - March 2026

use std::sync::{Arc, Weak};

use crate::registry::{Command, CommandContext, Registry};

/// One backend's contribution to the catalog: its grouping label, the name
/// of its suite command, and a producer for the full command list.
///
/// Keeping these as plain values lets the top-level assembly collect them in
/// an explicit, ordered list instead of relying on scattered registration
/// side effects.
pub struct CommandSource {
    pub module: &'static str,
    pub suite: &'static str,
    pub commands: fn() -> Vec<Command>,
}

/// Suite commands the aggregate probes for, whether or not the matching
/// backend was compiled in.
pub const EXPECTED_SUITES: [&str; 4] =
    ["test-inspect", "test-anon", "test-transcode", "test-pixels"];

/// Build the registry from the given sources, then append the `all`
/// aggregate so it observes final suite availability.
///
/// Rejected registrations (duplicates, empty names) are logged and dropped;
/// the offending command is simply unavailable.
pub fn assemble(sources: &[CommandSource]) -> Arc<Registry> {
    Arc::new_cyclic(|handle: &Weak<Registry>| {
        let mut registry = Registry::new();

        for source in sources {
            for command in (source.commands)() {
                if let Err(err) = registry.register(command) {
                    tracing::warn!("Registration rejected in module {}: {err}", source.module);
                }
            }
        }

        let handle = handle.clone();
        let aggregate = Command::new(
            "all",
            "General",
            "Run every available module suite",
            move |ctx| match handle.upgrade() {
                Some(registry) => run_suites(&registry, &EXPECTED_SUITES, ctx),
                None => 1,
            },
        );
        if let Err(err) = registry.register(aggregate) {
            tracing::warn!("Registration rejected for aggregate: {err}");
        }

        registry
    })
}

/// Run each expected suite that exists and OR the statuses together. A
/// missing suite is skipped with a diagnostic, and a failing suite does not
/// stop the ones after it.
pub fn run_suites(registry: &Registry, expected: &[&str], ctx: &CommandContext) -> i32 {
    let mut status = 0;
    for suite in expected {
        if registry.exists(suite) {
            status |= registry.run(suite, ctx);
        } else {
            tracing::warn!("Module not available, skipping {suite}");
        }
    }
    status
}
