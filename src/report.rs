//! Aggregation: deduplicate resolution results and roll up counts.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::PathBuf;

use serde::Serialize;

use crate::types::{LinkRecord, LinkType, ResolutionResult, SkippedFile};

/// Identity of an occurrence for deduplication.
type DedupKey = (PathBuf, LinkType, String, u32);

/// Aggregate result of one analysis run. Every count is derived from the
/// records when the report is built and cannot be changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Resolved records where more than one candidate existed.
    ambiguous_count: usize,
    /// Number of broken records.
    broken_count: usize,
    /// Broken records ordered by source file, then line.
    broken_entries: Vec<LinkRecord>,
    /// Per-link-type roll-up.
    by_type: BTreeMap<LinkType, TypeCounts>,
    /// Documents that were read and scanned.
    files_scanned: usize,
    /// Documents excluded because they could not be read.
    files_skipped: Vec<SkippedFile>,
    /// Distinct source files with at least one occurrence.
    files_with_links_count: usize,
    /// Matcher-line pairs skipped as malformed.
    malformed_lines: usize,
    /// Every deduplicated record, same order as `broken_entries`.
    records: Vec<LinkRecord>,
    /// Deduplicated occurrence count.
    total_found: usize,
    /// Number of resolved records.
    valid_count: usize,
}

/// Everything the aggregator needs besides the resolution results.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Documents that were read and scanned.
    pub files_scanned: usize,
    /// Documents excluded because they could not be read.
    pub files_skipped: Vec<SkippedFile>,
    /// Matcher-line pairs skipped as malformed.
    pub malformed_lines: usize,
}

/// Found/valid/broken counts for one link type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeCounts {
    /// Broken occurrences of this type.
    pub broken: usize,
    /// Deduplicated occurrences of this type.
    pub found: usize,
    /// Resolved occurrences of this type.
    pub valid: usize,
}

impl Report {
    /// Resolved records where later candidates also existed.
    pub const fn ambiguous_count(&self) -> usize {
        return self.ambiguous_count;
    }

    /// Number of broken records.
    pub const fn broken_count(&self) -> usize {
        return self.broken_count;
    }

    /// Broken records, grouped by source file then ascending line.
    pub fn broken_entries(&self) -> &[LinkRecord] {
        return &self.broken_entries;
    }

    /// Fold resolution results into a report.
    ///
    /// Results with an identical `(source_file, link_type, raw_text,
    /// line_number)` collapse to the first one; anything differing in
    /// any of those stays separate. Records are ordered by source path
    /// text, then line, keeping extraction order within a line.
    pub fn build(results: &[ResolutionResult<'_>], summary: RunSummary) -> Self {
        let mut seen: HashSet<DedupKey> = HashSet::new();
        let mut records: Vec<LinkRecord> = Vec::new();
        let mut ambiguous_count = 0_usize;

        for result in results {
            let occ = result.occurrence;
            let key = (
                occ.source_file.clone(),
                occ.link_type,
                occ.raw_text.clone(),
                occ.line_number,
            );
            if !seen.insert(key) {
                continue;
            }
            if result.resolved && !result.alternatives.is_empty() {
                ambiguous_count = ambiguous_count.saturating_add(1);
            }
            records.push(LinkRecord::from_result(result));
        }

        records.sort_by(|a, b| {
            let a_path = a.source_file.to_string_lossy();
            let b_path = b.source_file.to_string_lossy();
            return a_path.cmp(&b_path).then(a.line_number.cmp(&b.line_number));
        });

        let mut by_type: BTreeMap<LinkType, TypeCounts> = BTreeMap::new();
        for record in &records {
            let counts = by_type.entry(record.link_type).or_default();
            counts.found = counts.found.saturating_add(1);
            if record.resolved {
                counts.valid = counts.valid.saturating_add(1);
            } else {
                counts.broken = counts.broken.saturating_add(1);
            }
        }

        let broken_entries: Vec<LinkRecord> = records.iter().filter(|r| return !r.resolved).cloned().collect();
        let files_with_links_count = records
            .iter()
            .map(|r| return &r.source_file)
            .collect::<BTreeSet<&PathBuf>>()
            .len();
        let total_found = records.len();
        let broken_count = broken_entries.len();

        return Self {
            ambiguous_count,
            broken_count,
            by_type,
            files_scanned: summary.files_scanned,
            files_skipped: summary.files_skipped,
            files_with_links_count,
            malformed_lines: summary.malformed_lines,
            total_found,
            valid_count: total_found.saturating_sub(broken_count),
            broken_entries,
            records,
        };
    }

    /// Found/valid/broken counts per link type.
    pub const fn by_type(&self) -> &BTreeMap<LinkType, TypeCounts> {
        return &self.by_type;
    }

    /// Documents that were read and scanned.
    pub const fn files_scanned(&self) -> usize {
        return self.files_scanned;
    }

    /// Documents excluded because they could not be read.
    pub fn files_skipped(&self) -> &[SkippedFile] {
        return &self.files_skipped;
    }

    /// Distinct source files with at least one occurrence.
    pub const fn files_with_links_count(&self) -> usize {
        return self.files_with_links_count;
    }

    /// Matcher-line pairs skipped as malformed.
    pub const fn malformed_lines(&self) -> usize {
        return self.malformed_lines;
    }

    /// Every deduplicated record in report order.
    pub fn records(&self) -> &[LinkRecord] {
        return &self.records;
    }

    /// Deduplicated occurrence count.
    pub const fn total_found(&self) -> usize {
        return self.total_found;
    }

    /// Number of resolved records.
    pub const fn valid_count(&self) -> usize {
        return self.valid_count;
    }
}
