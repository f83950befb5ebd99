//! Per-corpus configuration from `.linkheal.toml`.

use std::path::Path;

use crate::error::Error;

/// Name of the per-corpus configuration file.
pub const CONFIG_FILE_NAME: &str = ".linkheal.toml";

/// Corpus configuration loaded from `.linkheal.toml`.
/// Include/exclude patterns are path prefixes applied to scanned documents.
#[derive(Debug, Clone)]
pub struct Config {
    /// Segments recognised as the start of a corpus-relative suffix inside
    /// absolute authoring paths (`C:\...\docs\x.md` -> `docs/x.md`).
    pub anchor_segments: Vec<String>,
    /// Whether index lookups distinguish case.
    pub case_sensitive: bool,
    /// Extensions of documents that are scanned for links.
    pub document_extensions: Vec<String>,
    /// Path prefixes of documents never scanned.
    pub exclude: Vec<String>,
    /// Directory names never walked.
    pub ignore_dirs: Vec<String>,
    /// Path prefixes of documents to scan; empty scans everything.
    pub include: Vec<String>,
    /// Extensions that make a token look like a file citation.
    pub reference_extensions: Vec<String>,
    /// Historical repository names stripped from authored paths.
    pub repo_names: Vec<String>,
}

/// Raw TOML structure for `.linkheal.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct LinkhealTomlConfig {
    #[serde(default)]
    anchor_segments: Option<Vec<String>>,
    #[serde(default)]
    case_sensitive: Option<bool>,
    #[serde(default)]
    document_extensions: Option<Vec<String>>,
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    ignore_dirs: Option<Vec<String>>,
    #[serde(default)]
    include: Vec<String>,
    #[serde(default)]
    reference_extensions: Option<Vec<String>>,
    #[serde(default)]
    repo_names: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        return Self {
            anchor_segments: vec!["docs".to_string()],
            case_sensitive: true,
            document_extensions: vec!["md".to_string()],
            exclude: Vec::new(),
            ignore_dirs: [".git", "target", "node_modules"].map(String::from).to_vec(),
            include: Vec::new(),
            reference_extensions: [
                "md", "rs", "py", "toml", "json", "yaml", "yml", "txt", "sh", "ps1",
            ]
            .map(String::from)
            .to_vec(),
            repo_names: Vec::new(),
        };
    }
}

impl Config {
    /// Whether a path's extension marks it as a scannable document.
    pub fn is_document(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| return e.to_str()) else {
            return false;
        };
        return self.document_extensions.iter().any(|d| return d.eq_ignore_ascii_case(ext));
    }

    /// Whether a directory name is excluded from the tree walk.
    pub fn is_ignored_dir(&self, name: &str) -> bool {
        return self.ignore_dirs.iter().any(|d| return d == name);
    }

    /// Load config from `.linkheal.toml` in the given root directory.
    /// Returns defaults if the file doesn't exist. Returns an error if the
    /// file exists but is malformed; a written config is never silently ignored.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE_NAME);
        let content = match std::fs::read_to_string(&path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };
        return Self::parse(&content);
    }

    /// Parse config TOML, filling unspecified keys with defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` if the TOML is malformed or has unknown keys.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let raw: LinkhealTomlConfig = toml::from_str(content)?;
        let defaults = Self::default();
        return Ok(Self {
            anchor_segments: raw.anchor_segments.unwrap_or(defaults.anchor_segments),
            case_sensitive: raw.case_sensitive.unwrap_or(defaults.case_sensitive),
            document_extensions: raw.document_extensions.unwrap_or(defaults.document_extensions),
            exclude: raw.exclude,
            ignore_dirs: raw.ignore_dirs.unwrap_or(defaults.ignore_dirs),
            include: raw.include,
            reference_extensions: raw.reference_extensions.unwrap_or(defaults.reference_extensions),
            repo_names: raw.repo_names,
        });
    }

    /// Check whether a document path should be scanned.
    ///
    /// A path is included if no include patterns are set (scan everything),
    /// or if the path starts with at least one include pattern.
    /// An included path is then excluded if it starts with any exclude pattern.
    pub fn should_scan(&self, relative_path: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|p| return relative_path.starts_with(p.as_str()));

        if !included {
            return false;
        }

        return !self.exclude.iter().any(|p| return relative_path.starts_with(p.as_str()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.document_extensions, vec!["md"], "default document extension");
        assert_eq!(config.anchor_segments, vec!["docs"], "default anchor segment");
        assert!(config.case_sensitive, "case sensitive by default");
        assert!(config.is_ignored_dir(".git"), ".git is never walked");
    }

    #[test]
    fn explicit_keys_override_defaults() {
        let config = Config::parse(
            r#"
            case_sensitive = false
            repo_names = ["ai-dev-agent"]
            exclude = ["archive/"]
            "#,
        )
        .unwrap();
        assert!(!config.case_sensitive, "flag read from file");
        assert_eq!(config.repo_names, vec!["ai-dev-agent"], "repo names read from file");
        assert!(!config.should_scan("archive/old.md"), "excluded prefix");
        assert!(config.should_scan("docs/new.md"), "other paths still scanned");
    }

    #[test]
    fn unknown_key_is_an_error() {
        assert!(Config::parse("colour = true").is_err(), "typos must not be ignored");
    }

    #[test]
    fn include_restricts_scanning() {
        let config = Config::parse(r#"include = ["docs/"]"#).unwrap();
        assert!(config.should_scan("docs/a.md"), "inside include prefix");
        assert!(!config.should_scan("README.md"), "outside include prefix");
    }

    #[test]
    fn document_extension_match_ignores_case() {
        let config = Config::default();
        assert!(config.is_document(Path::new("docs/GUIDE.MD")), "upper-case extension");
        assert!(!config.is_document(Path::new("src/lib.rs")), "not a document");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(config.include.is_empty(), "scan everything");
    }
}
