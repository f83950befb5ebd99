//! The analysis pipeline: extract -> generate candidates -> resolve -> aggregate.
//!
//! Extraction and resolution run per file in parallel with no shared
//! mutable state. The fold into a report is a single-threaded step so the
//! output order is deterministic.

use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use crate::candidates::CandidateGenerator;
use crate::config::Config;
use crate::error::Error;
use crate::extractor::{Extraction, Extractor};
use crate::report::{Report, RunSummary};
use crate::resolver;
use crate::scanner::Corpus;
use crate::types::ResolutionResult;

/// Analyse a loaded corpus.
///
/// # Errors
///
/// Returns `Error::InvalidPattern` if a matcher fails to compile. Nothing
/// after that point fails: unreadable files were already recorded as
/// skipped and unresolvable links are reported as broken.
pub fn analyze(corpus: &Corpus, config: &Config) -> Result<Report, Error> {
    let started = Instant::now();
    let extractor = Extractor::new(config)?;
    let generator = CandidateGenerator::new(corpus.root(), config);

    let documents: Vec<(&PathBuf, &String)> = corpus.documents().iter().collect();
    let extractions: Vec<Extraction> = documents
        .par_iter()
        .map(|(path, text)| return extractor.extract(path, text))
        .collect();

    let per_file: Vec<Vec<ResolutionResult<'_>>> = extractions
        .par_iter()
        .map(|extraction| {
            return extraction
                .occurrences
                .iter()
                .map(|occ| {
                    let candidates = generator.generate(&occ.source_file, &occ.raw_text);
                    return resolver::resolve(occ, candidates, corpus.index());
                })
                .collect();
        })
        .collect();

    let results: Vec<ResolutionResult<'_>> = per_file.into_iter().flatten().collect();
    let malformed_lines = extractions
        .iter()
        .map(|e| return e.malformed.len())
        .fold(0_usize, usize::saturating_add);

    let report = Report::build(
        &results,
        RunSummary {
            files_scanned: corpus.documents().len(),
            files_skipped: corpus.skipped().to_vec(),
            malformed_lines,
        },
    );

    tracing::info!(
        files = report.files_scanned(),
        links = report.total_found(),
        broken = report.broken_count(),
        skipped = report.files_skipped().len(),
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "analysis complete"
    );

    return Ok(report);
}

/// Load the corpus at `root` and analyse it.
///
/// # Errors
///
/// Returns errors from corpus loading or matcher compilation.
pub fn analyze_path(root: &Path, config: &Config) -> Result<Report, Error> {
    let corpus = Corpus::load(root, config)?;
    return analyze(&corpus, config);
}

/// Ordered candidates for one hypothetical occurrence, each paired with
/// whether it exists in the corpus index.
pub fn explain(corpus: &Corpus, config: &Config, source_file: &Path, raw_text: &str) -> Vec<(PathBuf, bool)> {
    let generator = CandidateGenerator::new(corpus.root(), config);
    return generator
        .generate(source_file, raw_text)
        .into_iter()
        .map(|candidate| {
            let exists = corpus.index().contains(&candidate);
            return (candidate, exists);
        })
        .collect();
}
