//! Path resolution: the first candidate present in the index wins.

use std::path::PathBuf;

use crate::index::FileIndex;
use crate::types::{LinkOccurrence, ResolutionResult};

/// Test ordered candidates against the index; the first existing one wins.
///
/// Every candidate is checked so that later hits are kept as
/// `alternatives` for auditing ambiguous resolutions. When nothing
/// exists, the first candidate is reported as the diagnostic guess so the
/// same broken link always yields the same output.
pub fn resolve<'a>(
    occurrence: &'a LinkOccurrence,
    candidates: Vec<PathBuf>,
    index: &FileIndex,
) -> ResolutionResult<'a> {
    let mut hits: Vec<PathBuf> = Vec::new();
    for candidate in &candidates {
        let Some(real) = index.lookup(candidate) else {
            continue;
        };
        if !hits.contains(&real) {
            hits.push(real);
        }
    }

    let mut hits = hits.into_iter();
    let Some(found) = hits.next() else {
        let guess = candidates.first().cloned().unwrap_or_default();
        return ResolutionResult {
            alternatives: Vec::new(),
            candidates_tried: candidates,
            occurrence,
            resolved: false,
            resolved_path: guess,
        };
    };

    let alternatives: Vec<PathBuf> = hits.collect();
    if !alternatives.is_empty() {
        tracing::debug!(
            file = %occurrence.source_file.display(),
            line = occurrence.line_number,
            target = %occurrence.raw_text,
            chosen = %found.display(),
            discarded = alternatives.len(),
            "ambiguous resolution, first candidate wins"
        );
    }

    return ResolutionResult {
        alternatives,
        candidates_tried: candidates,
        occurrence,
        resolved: true,
        resolved_path: found,
    };
}
