//
// suites.rs
// dicom-suite
//
// Declares each backend's command catalog and the ordered list of compiled-in sources.
//
// Thales Matheus Mendonça Santos - March 2026

use crate::dispatch::CommandSource;

#[cfg(any(
    feature = "inspect",
    feature = "anon",
    feature = "transcode",
    feature = "pixels"
))]
use crate::registry::{status_of, Command};

#[cfg(feature = "inspect")]
fn inspect_commands() -> Vec<Command> {
    use crate::{dump, json, metadata, scan, validate};

    vec![
        Command::new(
            "test-inspect",
            "Inspect",
            "Run every inspection command",
            |ctx| {
                let mut rc = 0;
                rc |= status_of(metadata::tags_report(ctx));
                rc |= status_of(dump::dump_report(ctx));
                rc |= status_of(validate::check(ctx));
                rc |= status_of(json::json_report(ctx));
                rc |= status_of(scan::scan_directory(ctx));
                rc
            },
        ),
        Command::new(
            "inspect:tags",
            "Inspect",
            "Inspect common tags and print patient identifiers",
            |ctx| status_of(metadata::tags_report(ctx)),
        ),
        Command::new(
            "inspect:dump",
            "Inspect",
            "Write a verbose dataset dump to text",
            |ctx| status_of(dump::dump_report(ctx)),
        ),
        Command::new(
            "inspect:validate",
            "Inspect",
            "Check required attributes and pixel data presence",
            |ctx| status_of(validate::check(ctx)),
        ),
        Command::new(
            "inspect:json",
            "Inspect",
            "Export the dataset as DICOM-JSON",
            |ctx| status_of(json::json_report(ctx)),
        ),
        Command::new(
            "inspect:scan",
            "Inspect",
            "Scan the input directory and index instances to CSV",
            |ctx| status_of(scan::scan_directory(ctx)),
        ),
    ]
}

#[cfg(feature = "anon")]
fn anon_commands() -> Vec<Command> {
    use crate::anonymize;

    vec![
        Command::new(
            "test-anon",
            "Anonymize",
            "Run every anonymization command",
            |ctx| {
                let mut rc = 0;
                rc |= status_of(anonymize::strip_phi(ctx));
                rc |= status_of(anonymize::regenerate_uids(ctx));
                rc
            },
        ),
        Command::new(
            "anon:strip",
            "Anonymize",
            "Strip PHI fields and write an anonymized copy",
            |ctx| status_of(anonymize::strip_phi(ctx)),
        ),
        Command::new(
            "anon:retag-uids",
            "Anonymize",
            "Regenerate Study/Series/SOP Instance UIDs and save a copy",
            |ctx| status_of(anonymize::regenerate_uids(ctx)),
        ),
    ]
}

#[cfg(feature = "transcode")]
fn transcode_commands() -> Vec<Command> {
    use crate::transcode;

    vec![
        Command::new(
            "test-transcode",
            "Transcode",
            "Run every transcoding command",
            |ctx| {
                let mut rc = 0;
                rc |= status_of(transcode::to_explicit_vr(ctx));
                rc |= status_of(transcode::to_implicit_vr(ctx));
                rc
            },
        ),
        Command::new(
            "transcode:explicit-vr",
            "Transcode",
            "Rewrite using Explicit VR Little Endian",
            |ctx| status_of(transcode::to_explicit_vr(ctx)),
        ),
        Command::new(
            "transcode:implicit-vr",
            "Transcode",
            "Rewrite using Implicit VR Little Endian",
            |ctx| status_of(transcode::to_implicit_vr(ctx)),
        ),
    ]
}

#[cfg(feature = "pixels")]
fn pixels_commands() -> Vec<Command> {
    use crate::pixels;

    vec![
        Command::new(
            "test-pixels",
            "Pixels",
            "Run every pixel data command",
            |ctx| {
                let mut rc = 0;
                rc |= status_of(pixels::stats_report(ctx));
                rc |= status_of(pixels::histogram_report(ctx));
                rc |= status_of(pixels::preview(ctx));
                rc
            },
        ),
        Command::new(
            "pixels:stats",
            "Pixels",
            "Compute min/max/mean pixel statistics",
            |ctx| status_of(pixels::stats_report(ctx)),
        ),
        Command::new(
            "pixels:histogram",
            "Pixels",
            "Bucket rescaled intensities into a histogram",
            |ctx| status_of(pixels::histogram_report(ctx)),
        ),
        Command::new(
            "pixels:preview",
            "Pixels",
            "Export an 8-bit PNG preview of the first frame",
            |ctx| status_of(pixels::preview(ctx)),
        ),
    ]
}

/// Every compiled-in backend, in registration order. Backends disabled at
/// build time simply do not appear here; the aggregate discovers that via
/// the registry at run time.
pub fn sources() -> Vec<CommandSource> {
    let mut sources = Vec::new();

    #[cfg(feature = "inspect")]
    sources.push(CommandSource {
        module: "Inspect",
        suite: "test-inspect",
        commands: inspect_commands,
    });

    #[cfg(feature = "anon")]
    sources.push(CommandSource {
        module: "Anonymize",
        suite: "test-anon",
        commands: anon_commands,
    });

    #[cfg(feature = "transcode")]
    sources.push(CommandSource {
        module: "Transcode",
        suite: "test-transcode",
        commands: transcode_commands,
    });

    #[cfg(feature = "pixels")]
    sources.push(CommandSource {
        module: "Pixels",
        suite: "test-pixels",
        commands: pixels_commands,
    });

    sources
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_source_declares_its_suite_command() {
        for source in sources() {
            let names: Vec<String> = (source.commands)()
                .into_iter()
                .map(|c| c.name)
                .collect();
            assert!(
                names.contains(&source.suite.to_string()),
                "module {} is missing its suite command {}",
                source.module,
                source.suite
            );
            assert!(names.iter().all(|n| !n.is_empty()));
        }
    }

    #[test]
    fn source_command_names_are_unique_across_backends() {
        let mut seen = std::collections::HashSet::new();
        for source in sources() {
            for command in (source.commands)() {
                assert!(seen.insert(command.name.clone()), "duplicate {}", command.name);
                assert_eq!(command.module, source.module);
            }
        }
    }
}
