//! Core domain types: occurrences, resolutions, and report records.
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Closed taxonomy of link syntaxes. Each matcher in the extractor owns
/// exactly one variant, so the same raw token can surface under several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    /// Token ending in a document extension outside any link syntax.
    BarePaths,
    /// Token prefixed with `docs/`, wrapped or not.
    DocsReferences,
    /// Path cited in prose: after a colon, in a list item, or in a
    /// reference-style definition.
    FileReferences,
    /// Inline `[anchor](target)` link.
    MarkdownLinks,
    /// Token starting with `./` or `../`.
    RelativePaths,
}

impl LinkType {
    /// Matchers in the order they run against each line.
    pub const EXTRACTION_ORDER: [Self; 5] = [
        Self::MarkdownLinks,
        Self::RelativePaths,
        Self::BarePaths,
        Self::FileReferences,
        Self::DocsReferences,
    ];

    /// The wire name used in reports.
    pub const fn as_str(self) -> &'static str {
        return match self {
            Self::BarePaths => "bare_paths",
            Self::DocsReferences => "docs_references",
            Self::FileReferences => "file_references",
            Self::MarkdownLinks => "markdown_links",
            Self::RelativePaths => "relative_paths",
        };
    }
}

impl std::fmt::Display for LinkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return f.write_str(self.as_str());
    }
}

/// One raw mention of a link-like token in one document at one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkOccurrence {
    /// Human-readable label, empty when the syntax has none.
    pub anchor_text: String,
    /// One-based line number within `source_file`.
    pub line_number: u32,
    /// Which matcher produced this occurrence.
    pub link_type: LinkType,
    /// The literal path portion that was matched.
    pub raw_text: String,
    /// Document containing the mention, relative to the corpus root.
    pub source_file: PathBuf,
}

/// Outcome of resolving one occurrence. Borrows the occurrence it
/// describes and lives only for a single aggregation pass.
#[derive(Debug, Clone)]
pub struct ResolutionResult<'a> {
    /// Existing candidates that lost to an earlier one (first wins).
    pub alternatives: Vec<PathBuf>,
    /// Every candidate tested, in generation order.
    pub candidates_tried: Vec<PathBuf>,
    /// The occurrence being resolved.
    pub occurrence: &'a LinkOccurrence,
    /// Whether any candidate exists in the corpus.
    pub resolved: bool,
    /// The matched absolute path, or the first candidate as a diagnostic guess.
    pub resolved_path: PathBuf,
}

/// Flat output record handed to report renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRecord {
    /// Label of the link, empty when the syntax has none.
    pub anchor_text: String,
    /// One-based line number within `source_file`.
    pub line_number: u32,
    /// Matcher that produced the occurrence.
    pub link_type: LinkType,
    /// Literal matched path text.
    pub raw_text: String,
    /// Whether the link resolved to a corpus file.
    pub resolved: bool,
    /// Absolute path found, or the best guess when broken.
    pub resolved_path_or_guess: PathBuf,
    /// Corpus-relative document containing the link.
    pub source_file: PathBuf,
}

impl LinkRecord {
    /// Flatten a resolution result into an owned record.
    pub fn from_result(result: &ResolutionResult<'_>) -> Self {
        let occurrence = result.occurrence;
        return Self {
            anchor_text: occurrence.anchor_text.clone(),
            line_number: occurrence.line_number,
            link_type: occurrence.link_type,
            raw_text: occurrence.raw_text.clone(),
            resolved: result.resolved,
            resolved_path_or_guess: result.resolved_path.clone(),
            source_file: occurrence.source_file.clone(),
        };
    }
}

/// A line one matcher could not parse. The line is skipped for that matcher only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedLine {
    /// One-based line number.
    pub line_number: u32,
    /// Matcher that gave up on the line.
    pub matcher: LinkType,
    /// Document containing the line.
    pub source_file: PathBuf,
}

/// A corpus document excluded from analysis because it could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    /// Corpus-relative path.
    pub path: PathBuf,
    /// Rendered read error.
    pub reason: String,
}
