//! CLI commands for linkheal: check, status, candidates.

use std::fmt::Write as _;
use std::path::Path;
use std::process::ExitCode;

use crate::config::Config;
use crate::engine;
use crate::error;
use crate::report::Report;
use crate::scanner::Corpus;
use crate::types::LinkRecord;

/// Flags shared by the analysis commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Override the config and compare paths case-insensitively.
    pub case_insensitive: bool,
    /// Print the report as JSON instead of text.
    pub json: bool,
}

/// Print the ordered candidates for one target, marking which exist.
///
/// # Errors
///
/// Returns errors from config or corpus loading.
pub fn candidates(root: &Path, source_file: &str, target: &str, options: RunOptions) -> Result<(), error::Error> {
    let config = load_config(root, options)?;
    let corpus = Corpus::load(root, &config)?;

    let mut winner_shown = false;
    for (candidate, exists) in engine::explain(&corpus, &config, Path::new(source_file), target) {
        let label = match (exists, winner_shown) {
            (false, _) => "absent ",
            (true, false) => "FOUND  ",
            (true, true) => "shadow ",
        };
        winner_shown |= exists;
        println!("{label} {}", candidate.display());
    }

    if !winner_shown {
        println!();
        println!("broken: no candidate exists");
    }
    return Ok(());
}

/// Analyse the corpus and report broken links.
///
/// Exit code priority: broken links (2) > skipped files (1) > clean (0).
///
/// # Errors
///
/// Returns errors from config loading, corpus loading, or JSON output.
pub fn check(root: &Path, options: RunOptions) -> Result<ExitCode, error::Error> {
    let report = run(root, options)?;

    if options.json {
        print_json(&report)?;
    } else {
        for entry in report.broken_entries() {
            println!("BROKEN  {}", describe(entry));
        }
        for skipped in report.files_skipped() {
            println!("SKIPPED {} ({})", skipped.path.display(), skipped.reason);
        }
        if !report.broken_entries().is_empty() || !report.files_skipped().is_empty() {
            println!();
        }
        print_summary(&report);
    }

    if report.broken_count() > 0 {
        return Ok(ExitCode::from(2));
    } else if !report.files_skipped().is_empty() {
        return Ok(ExitCode::from(1));
    } else {
        return Ok(ExitCode::SUCCESS);
    }
}

/// One-line description of a record: location, type, target, and path.
fn describe(record: &LinkRecord) -> String {
    let mut line = format!(
        "{}:{}  [{}]  {}",
        record.source_file.display(),
        record.line_number,
        record.link_type,
        record.raw_text,
    );
    if !record.anchor_text.is_empty() {
        let _ = write!(line, " \"{}\"", record.anchor_text);
    }
    let _ = write!(line, " -> {}", record.resolved_path_or_guess.display());
    return line;
}

/// Load the corpus config and apply command-line overrides.
///
/// # Errors
///
/// Returns errors from reading or parsing `.linkheal.toml`.
fn load_config(root: &Path, options: RunOptions) -> Result<Config, error::Error> {
    let mut config = Config::load(root)?;
    if options.case_insensitive {
        config.case_sensitive = false;
    }
    return Ok(config);
}

/// Serialize the report to stdout.
///
/// # Errors
///
/// Returns `Error::Json` if serialization fails.
fn print_json(report: &Report) -> Result<(), error::Error> {
    println!("{}", serde_json::to_string_pretty(report)?);
    return Ok(());
}

/// Print summary counts and the per-type roll-up.
fn print_summary(report: &Report) {
    println!(
        "{} links in {} files ({} scanned): {} valid, {} broken",
        report.total_found(),
        report.files_with_links_count(),
        report.files_scanned(),
        report.valid_count(),
        report.broken_count(),
    );
    for (link_type, counts) in report.by_type() {
        println!(
            "  {:<16} {:>6} found {:>6} broken",
            link_type.as_str(),
            counts.found,
            counts.broken,
        );
    }
    if report.ambiguous_count() > 0 {
        println!("{} links matched more than one candidate (first wins)", report.ambiguous_count());
    }
    if report.malformed_lines() > 0 {
        println!("{} malformed lines ignored", report.malformed_lines());
    }
    return;
}

/// Load config and corpus, then analyse.
///
/// # Errors
///
/// Returns errors from config loading, corpus loading, or matcher compilation.
fn run(root: &Path, options: RunOptions) -> Result<Report, error::Error> {
    let config = load_config(root, options)?;
    return engine::analyze_path(root, &config);
}

/// Show every deduplicated record and whether it resolved. Always exits 0.
///
/// # Errors
///
/// Returns errors from config loading, corpus loading, or JSON output.
pub fn status(root: &Path, options: RunOptions) -> Result<(), error::Error> {
    let report = run(root, options)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(report.records())?);
        return Ok(());
    }

    for record in report.records() {
        let label = if record.resolved { "VALID " } else { "BROKEN" };
        println!("{label}  {}", describe(record));
    }
    return Ok(());
}
