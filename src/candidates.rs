//! Candidate path generation.
//!
//! Each historical rewrite is a standalone rule so it can be tested and
//! retired on its own. Rules run in order; the first-seen copy of each
//! candidate wins.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use crate::config::Config;

/// Rewrite rules in priority order.
pub const RULES: [(&str, Rule); 5] = [
    ("relative-to-source", relative_to_source),
    ("relative-to-root", relative_to_root),
    ("strip-repo-name", strip_repo_name),
    ("clamp-walk-up", clamp_walk_up),
    ("absolute-suffix", absolute_suffix),
];

/// A rewrite rule: one target in, zero or more absolute candidates out.
pub type Rule = fn(&CandidateGenerator, &Target) -> Vec<PathBuf>;

/// Produces ordered candidate paths for link targets under one corpus root.
#[derive(Debug, Clone)]
pub struct CandidateGenerator {
    /// Segments marking the start of a corpus-relative suffix.
    anchor_segments: Vec<String>,
    /// Repository names that may prefix or duplicate inside authored paths.
    repo_names: Vec<String>,
    /// Absolute corpus root.
    root: PathBuf,
}

/// A link target prepared for path arithmetic.
#[derive(Debug, Clone)]
pub struct Target {
    /// Authored as `/...`, `~/...`, or a drive path like `C:/...`.
    pub is_absolute: bool,
    /// Directory of the containing document, relative to the corpus root.
    pub source_dir: PathBuf,
    /// Target with wrappers, fragment, and query removed; `/` separators only.
    pub text: String,
}

impl CandidateGenerator {
    /// Ordered, de-duplicated candidates for one occurrence. Never empty.
    pub fn generate(&self, source_file: &Path, raw_text: &str) -> Vec<PathBuf> {
        let target = Target::new(source_file, raw_text);
        let mut seen: HashSet<PathBuf> = HashSet::new();
        let mut candidates = Vec::new();

        for (_, rule) in RULES {
            for candidate in rule(self, &target) {
                if seen.insert(candidate.clone()) {
                    candidates.push(candidate);
                }
            }
        }

        return candidates;
    }

    /// Whether a path segment names the repository.
    fn is_repo_name(&self, segment: &str) -> bool {
        return self.repo_names.iter().any(|r| return r == segment);
    }

    /// Build a generator for `root`. The root's own directory name always
    /// counts as a repository name.
    pub fn new(root: &Path, config: &Config) -> Self {
        let mut repo_names = config.repo_names.clone();
        if let Some(name) = root.file_name().and_then(|n| return n.to_str()) {
            if !repo_names.iter().any(|r| return r == name) {
                repo_names.push(name.to_string());
            }
        }
        return Self {
            anchor_segments: config.anchor_segments.clone(),
            repo_names,
            root: root.to_path_buf(),
        };
    }

    /// Join a `/`-separated suffix onto the root and normalize.
    fn under_root(&self, suffix: &str) -> PathBuf {
        return normalize_path(&self.root.join(suffix));
    }
}

impl Target {
    /// Prepare a raw link target found in `source_file`.
    pub fn new(source_file: &Path, raw_text: &str) -> Self {
        let trimmed = raw_text.trim().trim_start_matches('<').trim_end_matches('>');
        let path_part = trimmed.split(['#', '?']).next().unwrap_or(trimmed);
        let chosen = if path_part.is_empty() { trimmed } else { path_part };
        let text = chosen.replace('\\', "/");

        return Self {
            is_absolute: is_absolute_token(&text),
            source_dir: source_file.parent().unwrap_or(Path::new("")).to_path_buf(),
            text,
        };
    }

    /// Non-empty `/`-separated segments.
    fn segments(&self) -> impl Iterator<Item = &str> {
        return self.text.split('/').filter(|s| return !s.is_empty());
    }
}

/// Rule 5: absolute or drive paths keep only the suffix from the first
/// anchor segment (or the segment after a repository name) and retry it
/// under the root.
pub fn absolute_suffix(generator: &CandidateGenerator, target: &Target) -> Vec<PathBuf> {
    if !target.is_absolute {
        return Vec::new();
    }
    let segments: Vec<&str> = target.segments().collect();

    let anchored = segments
        .iter()
        .position(|s| return generator.anchor_segments.iter().any(|a| return a == s));
    if let Some(suffix) = anchored.and_then(|i| return segments.get(i..)) {
        return vec![generator.under_root(&suffix.join("/"))];
    }

    let after_repo = segments.iter().position(|s| return generator.is_repo_name(s));
    if let Some(suffix) = after_repo.and_then(|i| return segments.get(i.saturating_add(1)..)) {
        if !suffix.is_empty() {
            return vec![generator.under_root(&suffix.join("/"))];
        }
    }

    return Vec::new();
}

/// Rule 4: `../` chains that climb out of the corpus are clamped to the
/// root. Any `../` chain is also retried one level shallower, for links
/// written before their target moved up a directory.
pub fn clamp_walk_up(generator: &CandidateGenerator, target: &Target) -> Vec<PathBuf> {
    if target.is_absolute {
        return Vec::new();
    }
    let segments: Vec<&str> = target.segments().filter(|s| return *s != ".").collect();
    let ups = segments.iter().take_while(|s| return **s == "..").count();
    if ups == 0 {
        return Vec::new();
    }
    let rest = segments.get(ups..).unwrap_or_default();

    let mut candidates = Vec::new();
    let literal = normalize_path(&target.source_dir.join(&target.text));
    if literal.components().next() == Some(Component::ParentDir) {
        candidates.push(generator.under_root(&rest.join("/")));
    }

    let shallower: Vec<&str> = std::iter::repeat_n("..", ups.saturating_sub(1))
        .chain(rest.iter().copied())
        .collect();
    candidates.push(normalize_path(
        &generator.root.join(&target.source_dir).join(shallower.join("/")),
    ));

    return candidates;
}

/// Whether a `/`-normalized token is rooted: `/x`, `~/x`, or `C:/x`.
fn is_absolute_token(text: &str) -> bool {
    let drive = matches!(
        text.as_bytes(),
        [letter, b':', b'/', ..] if letter.is_ascii_alphabetic()
    );
    return drive || text.starts_with('/') || text.starts_with('~');
}

/// Collapse `.` and `..` components in a path without touching the filesystem.
/// `..` never climbs above a root; relative paths keep unmatched leading `..`.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        push_normalized_component(&mut components, component);
    }
    return components.iter().collect();
}

/// Handle a single path component during normalization.
fn push_normalized_component<'a>(components: &mut Vec<Component<'a>>, component: Component<'a>) {
    match component {
        Component::CurDir => {},
        Component::ParentDir => match components.last() {
            Some(Component::Normal(_)) => {
                components.pop();
            },
            Some(Component::RootDir | Component::Prefix(_)) => {},
            _ => components.push(component),
        },
        other => components.push(other),
    }
    return;
}

/// Rule 1: literal resolution against the containing document's directory.
/// Absolute tokens are taken as written.
pub fn relative_to_source(generator: &CandidateGenerator, target: &Target) -> Vec<PathBuf> {
    if target.is_absolute {
        return vec![normalize_path(Path::new(&target.text))];
    }
    return vec![normalize_path(
        &generator.root.join(&target.source_dir).join(&target.text),
    )];
}

/// Rule 2: resolution against the corpus root.
pub fn relative_to_root(generator: &CandidateGenerator, target: &Target) -> Vec<PathBuf> {
    if target.is_absolute {
        return Vec::new();
    }
    return vec![generator.under_root(&target.text)];
}

/// Rule 3: drop a leading repository-name segment and collapse nested
/// `<seg>/<repo>/<seg>` duplication (e.g. `docs/ai-dev-agent/docs`).
pub fn strip_repo_name(generator: &CandidateGenerator, target: &Target) -> Vec<PathBuf> {
    if target.is_absolute {
        return Vec::new();
    }
    let mut segments: Vec<&str> = target
        .segments()
        .skip_while(|s| return *s == "." || *s == "..")
        .collect();
    let mut changed = false;

    if segments.first().is_some_and(|s| return generator.is_repo_name(s)) {
        segments.remove(0);
        changed = true;
    }

    while let Some(start) = segments.windows(3).position(|w| {
        return matches!(w, [outer, repo, inner] if outer == inner && generator.is_repo_name(repo));
    }) {
        segments.drain(start..start.saturating_add(2));
        changed = true;
    }

    if !changed || segments.is_empty() {
        return Vec::new();
    }
    return vec![generator.under_root(&segments.join("/"))];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> CandidateGenerator {
        let config = Config {
            repo_names: vec!["ai-dev-agent".to_string()],
            ..Config::default()
        };
        return CandidateGenerator::new(Path::new("/corpus"), &config);
    }

    fn target(source: &str, raw: &str) -> Target {
        return Target::new(Path::new(source), raw);
    }

    #[test]
    fn target_strips_fragment_and_backslashes() {
        let t = target("docs/a.md", r"<..\guides\setup.md#install>");
        assert_eq!(t.text, "../guides/setup.md", "cleaned text");
        assert!(!t.is_absolute, "relative target");
    }

    #[test]
    fn drive_paths_are_absolute() {
        assert!(target("a.md", r"C:\Users\dev\repo\docs\a.md").is_absolute, "drive path");
        assert!(target("a.md", "/home/dev/docs/a.md").is_absolute, "unix path");
        assert!(!target("a.md", "docs/a.md").is_absolute, "relative path");
    }

    #[test]
    fn rule_relative_to_source() {
        let out = relative_to_source(&generator(), &target("docs/sub/a.md", "../guides/setup.md"));
        assert_eq!(out, vec![PathBuf::from("/corpus/docs/guides/setup.md")], "sibling-relative");
    }

    #[test]
    fn rule_relative_to_root() {
        let out = relative_to_root(&generator(), &target("docs/sub/a.md", "README.md"));
        assert_eq!(out, vec![PathBuf::from("/corpus/README.md")], "root-relative");
    }

    #[test]
    fn rule_strip_repo_name_prefix() {
        let out = strip_repo_name(&generator(), &target("a.md", "ai-dev-agent/docs/index.md"));
        assert_eq!(out, vec![PathBuf::from("/corpus/docs/index.md")], "prefix removed");
    }

    #[test]
    fn rule_strip_repo_name_nested_duplication() {
        let out = strip_repo_name(&generator(), &target("a.md", "docs/ai-dev-agent/docs/guide.md"));
        assert_eq!(out, vec![PathBuf::from("/corpus/docs/guide.md")], "duplication collapsed");
    }

    #[test]
    fn rule_strip_repo_name_ignores_plain_paths() {
        assert!(strip_repo_name(&generator(), &target("a.md", "docs/guide.md")).is_empty(), "no repo segment");
    }

    #[test]
    fn root_directory_name_is_a_repo_name() {
        let out = strip_repo_name(&generator(), &target("a.md", "corpus/docs/guide.md"));
        assert_eq!(out, vec![PathBuf::from("/corpus/docs/guide.md")], "root name stripped");
    }

    #[test]
    fn rule_clamp_walk_up_escaping_chain() {
        let out = clamp_walk_up(&generator(), &target("docs/a.md", "../../../guides/setup.md"));
        assert_eq!(
            out.first(),
            Some(&PathBuf::from("/corpus/guides/setup.md")),
            "clamped to root: {out:?}"
        );
    }

    #[test]
    fn rule_clamp_walk_up_one_level_shallower() {
        let out = clamp_walk_up(&generator(), &target("docs/guides/a.md", "../../notes/b.md"));
        assert_eq!(out, vec![PathBuf::from("/corpus/docs/notes/b.md")], "one level shallower only");
    }

    #[test]
    fn rule_clamp_walk_up_ignores_plain_paths() {
        assert!(clamp_walk_up(&generator(), &target("docs/a.md", "b.md")).is_empty(), "no ../ prefix");
    }

    #[test]
    fn rule_absolute_suffix_from_anchor_segment() {
        let out = absolute_suffix(
            &generator(),
            &target("a.md", r"C:\Users\dev\Projects\ai-dev-agent\docs\guides\setup.md"),
        );
        assert_eq!(out, vec![PathBuf::from("/corpus/docs/guides/setup.md")], "suffix from docs/");
    }

    #[test]
    fn rule_absolute_suffix_after_repo_name() {
        let out = absolute_suffix(&generator(), &target("a.md", "/home/dev/ai-dev-agent/README.md"));
        assert_eq!(out, vec![PathBuf::from("/corpus/README.md")], "suffix after repo name");
    }

    #[test]
    fn generate_orders_and_deduplicates() {
        let out = generator().generate(Path::new("README.md"), "docs/index.md");
        assert_eq!(out, vec![PathBuf::from("/corpus/docs/index.md")], "rules 1 and 2 coincide");
    }

    #[test]
    fn generate_keeps_rule_order() {
        let out = generator().generate(Path::new("docs/a.md"), "README.md");
        assert_eq!(
            out,
            vec![PathBuf::from("/corpus/docs/README.md"), PathBuf::from("/corpus/README.md")],
            "source-relative first"
        );
    }

    #[test]
    fn placeholders_still_get_candidates() {
        let out = generator().generate(Path::new("docs/a.md"), "{TYPE}_CATALOG.md");
        assert!(!out.is_empty(), "generator runs uniformly");
    }

    #[test]
    fn normalize_never_climbs_above_root() {
        assert_eq!(normalize_path(Path::new("/corpus/../../x")), PathBuf::from("/x"), "clamped at /");
        assert_eq!(normalize_path(Path::new("a/../../x")), PathBuf::from("../x"), "leading .. kept");
    }
}
