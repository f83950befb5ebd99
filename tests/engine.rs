use std::path::{Path, PathBuf};

use linkheal::{Config, Corpus, LinkType, Report, analyze};

fn run(corpus: &Corpus) -> Report {
    return analyze(corpus, &Config::default()).unwrap();
}

fn corpus(documents: &[(&str, &str)]) -> Corpus {
    return Corpus::from_documents(Path::new("/corpus"), documents.iter().copied(), true);
}

#[test]
fn sibling_relative_link_resolves_on_first_candidate() {
    let corpus = corpus(&[
        ("notes/today.md", "See [Guide](../guides/setup.md)."),
        ("guides/setup.md", "# Setup"),
    ]);
    let report = run(&corpus);

    let link = report
        .records()
        .iter()
        .find(|r| return r.link_type == LinkType::MarkdownLinks)
        .unwrap();
    assert!(link.resolved, "link resolves: {link:?}");
    assert_eq!(link.resolved_path_or_guess, PathBuf::from("/corpus/guides/setup.md"), "sibling-relative hit");
    assert_eq!(link.anchor_text, "Guide", "anchor kept");
}

#[test]
fn missing_bare_filename_guesses_root_relative_path() {
    let corpus = corpus(&[("index.md", "Start with README.md please")]);
    let report = run(&corpus);

    let bare = report
        .broken_entries()
        .iter()
        .find(|r| return r.link_type == LinkType::BarePaths)
        .unwrap();
    assert!(!bare.resolved, "README.md does not exist");
    assert_eq!(bare.resolved_path_or_guess, PathBuf::from("/corpus/README.md"), "root-relative guess");
}

#[test]
fn template_placeholder_never_resolves() {
    let corpus = corpus(&[
        ("docs/catalogs.md", "- [Catalog]({TYPE}_CATALOG.md)"),
        ("docs/API_CATALOG.md", "# API"),
    ]);
    let config = Config::default();
    let report = analyze(&corpus, &config).unwrap();

    let placeholder: Vec<_> = report
        .records()
        .iter()
        .filter(|r| return r.raw_text == "{TYPE}_CATALOG.md")
        .collect();
    assert!(!placeholder.is_empty(), "placeholder extracted");
    assert!(placeholder.iter().all(|r| return !r.resolved), "placeholders are broken: {placeholder:?}");

    let tried = linkheal::engine::explain(&corpus, &config, Path::new("docs/catalogs.md"), "{TYPE}_CATALOG.md");
    assert!(!tried.is_empty(), "candidates still generated");
    assert!(tried.iter().all(|(_, exists)| return !exists), "none exist");
}

#[test]
fn same_missing_target_from_five_files_gives_five_entries() {
    let documents: Vec<(String, String)> = (1..=5)
        .map(|i| return (format!("area{i}/notes.md"), "Back to [home](docs/index.md)".to_string()))
        .collect();
    let corpus = Corpus::from_documents(Path::new("/corpus"), documents, true);
    let report = run(&corpus);

    let entries: Vec<_> = report
        .broken_entries()
        .iter()
        .filter(|r| return r.link_type == LinkType::MarkdownLinks)
        .collect();
    assert_eq!(entries.len(), 5, "one per source file: {entries:?}");
    assert!(entries.iter().all(|r| return r.raw_text == "docs/index.md"), "same raw target");
    let sources: Vec<String> = entries.iter().map(|r| return r.source_file.display().to_string()).collect();
    assert_eq!(
        sources,
        vec!["area1/notes.md", "area2/notes.md", "area3/notes.md", "area4/notes.md", "area5/notes.md"],
        "ordered by source path"
    );
}

#[test]
fn badge_linked_readme_reports_both_links() {
    let corpus = corpus(&[
        ("README.md", "[![build](docs/badge.svg)](docs/ci.md)"),
        ("docs/ci.md", "# CI"),
    ])
    .with_files(["docs/badge.svg"]);
    let report = run(&corpus);

    let links = report.by_type().get(&LinkType::MarkdownLinks).copied().unwrap_or_default();
    assert_eq!(links.found, 2, "outer link and inner badge");
    assert_eq!(links.valid, 2, "both resolve");
    assert_eq!(report.malformed_lines(), 0, "nothing skipped");
}

#[test]
fn repeated_token_on_one_line_is_counted_once() {
    let corpus = corpus(&[("a.md", "[one](missing.md) and [two](missing.md)")]);
    let report = run(&corpus);

    assert_eq!(report.total_found(), 1, "identical tuple collapses: {:?}", report.records());
    assert_eq!(report.broken_entries().len(), 1, "one broken entry");
}

#[test]
fn counts_are_complete_and_consistent() {
    let corpus = corpus(&[
        ("README.md", "- [Docs](docs/index.md)\n- [Gone](docs/gone.md)\nSee ./missing.md"),
        ("docs/index.md", "Back to [readme](../README.md)"),
        ("docs/empty.md", "no links here"),
    ]);
    let report = run(&corpus);

    assert_eq!(report.total_found(), report.valid_count() + report.broken_count(), "total = valid + broken");
    assert_eq!(report.broken_count(), report.broken_entries().len(), "broken = entries");
    assert_eq!(report.files_with_links_count(), 2, "empty.md has no links");
    assert_eq!(report.files_scanned(), 3, "all documents scanned");
    let by_type_total: usize = report.by_type().values().map(|c| return c.found).sum();
    assert_eq!(by_type_total, report.total_found(), "roll-up covers every record");
}

#[test]
fn resolved_paths_exist_in_corpus() {
    let corpus = corpus(&[
        ("README.md", "[a](docs/a.md) [b](docs/b.md) docs/a.md"),
        ("docs/a.md", "[up](../README.md)"),
    ]);
    let report = run(&corpus);

    for record in report.records().iter().filter(|r| return r.resolved) {
        assert!(
            corpus.index().contains(&record.resolved_path_or_guess),
            "resolved path must be a corpus file: {record:?}"
        );
    }
}

#[test]
fn analysis_is_idempotent() {
    let corpus = corpus(&[
        ("a.md", "[x](b.md) ../c.md docs/d.md\n- e.md"),
        ("b.md", "[a](a.md)"),
        ("docs/d.md", "Location: `C:\\Users\\dev\\repo\\docs\\d.md`"),
    ]);
    assert_eq!(run(&corpus), run(&corpus), "same corpus, same report");
}

#[test]
fn windows_authoring_path_resolves_through_docs_suffix() {
    let corpus = corpus(&[
        ("README.md", "Path: C:\\Users\\dev\\Projects\\ai-dev-agent\\docs\\guides\\setup.md"),
        ("docs/guides/setup.md", "# Setup"),
    ]);
    let report = run(&corpus);

    let reference = report
        .records()
        .iter()
        .find(|r| return r.link_type == LinkType::FileReferences)
        .unwrap();
    assert!(reference.resolved, "suffix rewrite finds the file: {reference:?}");
}

#[test]
fn relocated_repo_prefix_is_stripped() {
    let documents = [
        ("README.md", "[Plan](ai-dev-agent/docs/plan.md)"),
        ("docs/plan.md", "# Plan"),
    ];
    let corpus = corpus(&documents);
    let config = Config {
        repo_names: vec!["ai-dev-agent".to_string()],
        ..Config::default()
    };
    let report = analyze(&corpus, &config).unwrap();

    assert_eq!(report.broken_count(), 0, "relocated link resolves: {:?}", report.broken_entries());
}

#[test]
fn case_insensitive_corpus_matches_other_casing() {
    let documents = [("README.md", "[Guide](docs/GUIDE.md)"), ("docs/guide.md", "# Guide")];
    let sensitive = Corpus::from_documents(Path::new("/corpus"), documents, true);
    let insensitive = Corpus::from_documents(Path::new("/corpus"), documents, false);

    assert!(run(&sensitive).broken_count() > 0, "case mismatch is broken when sensitive");
    assert_eq!(run(&insensitive).broken_count(), 0, "resolves when insensitive");
}

#[test]
fn non_document_targets_resolve_when_indexed() {
    let corpus = corpus(&[("README.md", "![logo](img/logo.png)")]).with_files(["img/logo.png"]);
    let report = run(&corpus);
    assert_eq!(report.broken_count(), 0, "image target found: {:?}", report.broken_entries());
}

#[test]
fn unreadable_file_is_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("good.md"), "[bad](bad.md)").unwrap();
    std::fs::write(dir.path().join("bad.md"), b"\xff\xfe").unwrap();

    let report = linkheal::analyze_path(dir.path(), &Config::default()).unwrap();
    assert_eq!(report.files_skipped().len(), 1, "bad.md skipped");
    assert_eq!(report.files_scanned(), 1, "good.md scanned");
    assert_eq!(report.broken_count(), 1, "link to unreadable file is broken");
}
