//! Corpus loading: walk the root, read documents, index every file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Error;
use crate::index::FileIndex;
use crate::types::SkippedFile;

/// A snapshot of the documents under analysis and an index of every real
/// file under the root. Built fresh for each run.
#[derive(Debug, Clone)]
pub struct Corpus {
    /// Scanned documents by corpus-relative path.
    documents: BTreeMap<PathBuf, String>,
    /// Every file that can be a link target.
    index: FileIndex,
    /// Absolute corpus root.
    root: PathBuf,
    /// Documents that could not be read.
    skipped: Vec<SkippedFile>,
}

impl Corpus {
    /// Scanned documents by corpus-relative path, in path order.
    pub const fn documents(&self) -> &BTreeMap<PathBuf, String> {
        return &self.documents;
    }

    /// Build a corpus from an in-memory `{path: text}` mapping. Every
    /// document is also a resolution target.
    pub fn from_documents<I, P, S>(root: &Path, documents: I, case_sensitive: bool) -> Self
    where
        I: IntoIterator<Item = (P, S)>,
        P: Into<PathBuf>,
        S: Into<String>,
    {
        let documents: BTreeMap<PathBuf, String> = documents
            .into_iter()
            .map(|(path, text)| return (path.into(), text.into()))
            .collect();
        let index = FileIndex::from_paths(root, documents.keys(), case_sensitive);

        return Self {
            documents,
            index,
            root: root.to_path_buf(),
            skipped: Vec::new(),
        };
    }

    /// The index of every real file.
    pub const fn index(&self) -> &FileIndex {
        return &self.index;
    }

    /// Walk `root`, read every document the config selects, and index every
    /// file. Unreadable documents are logged, left out of both the documents
    /// and the index, and recorded as skipped.
    ///
    /// # Errors
    ///
    /// Returns `Error::RootNotFound` if `root` is not a directory, or
    /// `Error::Io` if it cannot be canonicalized.
    pub fn load(root: &Path, config: &Config) -> Result<Self, Error> {
        if !root.is_dir() {
            return Err(Error::RootNotFound { path: root.to_path_buf() });
        }
        let root = root.canonicalize()?;

        let mut documents: BTreeMap<PathBuf, String> = BTreeMap::new();
        let mut index = FileIndex::from_paths(&root, Vec::<PathBuf>::new(), config.case_sensitive);
        let mut skipped: Vec<SkippedFile> = Vec::new();

        let walker = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| return !is_ignored_dir_entry(e, config));

        for entry in walker {
            let entry = match entry {
                Err(e) => {
                    record_walk_error(&root, &e, &mut skipped);
                    continue;
                },
                Ok(entry) => entry,
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(&root).unwrap_or(entry.path()).to_path_buf();
            let selected = config.is_document(&relative) && config.should_scan(&relative.to_string_lossy());
            if !selected {
                index.insert(&relative);
                continue;
            }

            match read_document(&root, &relative) {
                Err(e) => {
                    tracing::warn!("{e}");
                    skipped.push(SkippedFile {
                        reason: e.to_string(),
                        path: relative,
                    });
                },
                Ok(text) => {
                    index.insert(&relative);
                    documents.insert(relative, text);
                },
            }
        }

        tracing::debug!(
            root = %root.display(),
            documents = documents.len(),
            indexed = index.len(),
            skipped = skipped.len(),
            "corpus loaded"
        );

        return Ok(Self { documents, index, root, skipped });
    }

    /// The absolute corpus root.
    pub fn root(&self) -> &Path {
        return &self.root;
    }

    /// Documents excluded because they could not be read.
    pub fn skipped(&self) -> &[SkippedFile] {
        return &self.skipped;
    }

    /// Add non-document files (images, sources) to the index.
    #[must_use]
    pub fn with_files<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            self.index.insert(path.as_ref());
        }
        return self;
    }
}

/// Whether a walk entry is a directory the config never descends into.
/// The root itself is always walked.
fn is_ignored_dir_entry(entry: &walkdir::DirEntry, config: &Config) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    return entry.file_name().to_str().is_some_and(|name| return config.is_ignored_dir(name));
}

/// Read one document as UTF-8 text.
///
/// # Errors
///
/// Returns `Error::CorpusRead` on permission, I/O, or encoding failures.
fn read_document(root: &Path, relative: &Path) -> Result<String, Error> {
    return std::fs::read_to_string(root.join(relative)).map_err(|source| {
        return Error::CorpusRead {
            path: relative.to_path_buf(),
            source,
        };
    });
}

/// Log a walk failure and record the affected path, if any, as skipped.
fn record_walk_error(root: &Path, e: &walkdir::Error, skipped: &mut Vec<SkippedFile>) {
    tracing::warn!("walk: {e}");
    if let Some(path) = e.path() {
        skipped.push(SkippedFile {
            path: path.strip_prefix(root).unwrap_or(path).to_path_buf(),
            reason: e.to_string(),
        });
    }
    return;
}
