//! In-memory set of every real file in the corpus, built once per run.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Read-only membership index over corpus-relative file paths.
/// Shared by all resolution workers without locking.
#[derive(Debug, Clone, Default)]
pub struct FileIndex {
    /// Whether lookups distinguish case.
    case_sensitive: bool,
    /// Lookup key (case-folded when insensitive) to the real relative path.
    entries: HashMap<String, PathBuf>,
    /// Absolute corpus root.
    root: PathBuf,
}

impl FileIndex {
    /// Whether the absolute path names a corpus file.
    pub fn contains(&self, absolute: &Path) -> bool {
        return self.lookup(absolute).is_some();
    }

    /// Build an index from corpus-relative paths.
    pub fn from_paths<I, P>(root: &Path, paths: I, case_sensitive: bool) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut index = Self {
            case_sensitive,
            entries: HashMap::new(),
            root: root.to_path_buf(),
        };
        for path in paths {
            index.insert(path.as_ref());
        }
        return index;
    }

    /// Add one corpus-relative path.
    pub fn insert(&mut self, relative: &Path) {
        if let Some(key) = self.key(relative) {
            self.entries.insert(key, relative.to_path_buf());
        }
        return;
    }

    /// Whether the index holds no files.
    pub fn is_empty(&self) -> bool {
        return self.entries.is_empty();
    }

    /// Lookup key for a relative path. `None` if the path has anything
    /// other than plain name components.
    fn key(&self, relative: &Path) -> Option<String> {
        let mut parts: Vec<&str> = Vec::new();
        for component in relative.components() {
            let Component::Normal(name) = component else {
                return None;
            };
            parts.push(name.to_str()?);
        }
        if parts.is_empty() {
            return None;
        }
        let joined = parts.join("/");
        if self.case_sensitive {
            return Some(joined);
        }
        return Some(joined.to_lowercase());
    }

    /// Number of indexed files.
    pub fn len(&self) -> usize {
        return self.entries.len();
    }

    /// Resolve an absolute path to the real absolute path of the indexed
    /// file. Under case-insensitive lookup the on-disk casing is returned.
    pub fn lookup(&self, absolute: &Path) -> Option<PathBuf> {
        let relative = absolute.strip_prefix(&self.root).ok()?;
        let key = self.key(relative)?;
        return self.entries.get(&key).map(|real| return self.root.join(real));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_sensitive_lookup_requires_exact_case() {
        let index = FileIndex::from_paths(Path::new("/c"), ["docs/Guide.md"], true);
        assert!(index.contains(Path::new("/c/docs/Guide.md")), "exact case");
        assert!(!index.contains(Path::new("/c/docs/guide.md")), "different case");
    }

    #[test]
    fn case_insensitive_lookup_returns_real_casing() {
        let index = FileIndex::from_paths(Path::new("/c"), ["docs/Guide.md"], false);
        assert_eq!(
            index.lookup(Path::new("/c/DOCS/guide.md")),
            Some(PathBuf::from("/c/docs/Guide.md")),
            "on-disk casing"
        );
    }

    #[test]
    fn paths_outside_root_are_absent() {
        let index = FileIndex::from_paths(Path::new("/c"), ["a.md"], true);
        assert!(!index.contains(Path::new("/a.md")), "outside root");
        assert!(!index.contains(Path::new("/c")), "the root itself");
    }

    #[test]
    fn non_plain_components_are_not_indexed() {
        let index = FileIndex::from_paths(Path::new("/c"), ["a.md", "../b.md"], true);
        assert_eq!(index.len(), 1, "only a.md");
        assert!(!index.is_empty(), "has entries");
    }
}
