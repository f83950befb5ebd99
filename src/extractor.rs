//! Link extraction: five independent matchers run against every line.
//!
//! Matchers never share classification state. A single raw token can be
//! reported by several matchers on the same line, and each report is a
//! distinct occurrence.

use std::ops::Range;
use std::path::Path;

use regex::Regex;

use crate::config::Config;
use crate::error::Error;
use crate::types::{LinkOccurrence, LinkType, MalformedLine};

/// List item prefix: bullets or ordered markers.
const LIST_ITEM_PATTERN: &str = r"^\s*(?:[-*+]|\d+[.)])\s+";

/// Characters that only appear in globs, templates, or regex fragments.
const PLACEHOLDER_CHARS: &[char] = &['*', '{', '}', '?', '^', '$', '|', '<', '>'];

/// Reference-style definition `[label]: target`.
const REFERENCE_DEFINITION_PATTERN: &str = r"^\s{0,3}\[([^\]]+)\]:\s*<?([^\s>]+)>?";

/// Path-like token: a run of characters that are not delimiters.
const TOKEN_PATTERN: &str = r#"[^\s()\[\]<>"'`|,;]+"#;

/// Output of extracting one document.
#[derive(Debug, Default)]
pub struct Extraction {
    /// Lines a matcher gave up on.
    pub malformed: Vec<MalformedLine>,
    /// Occurrences in line-then-matcher order.
    pub occurrences: Vec<LinkOccurrence>,
}

/// Compiled matcher patterns. Built once per run and shared read-only
/// by every extraction worker.
#[derive(Debug)]
pub struct Extractor {
    /// Extensions a bare path must end in.
    document_extensions: Vec<String>,
    /// List item prefix pattern.
    list_item: Regex,
    /// Reference-style definition pattern.
    reference_definition: Regex,
    /// Extensions a file reference must end in.
    reference_extensions: Vec<String>,
    /// Path-like token pattern.
    token: Regex,
}

/// A single match produced by one matcher.
#[derive(Debug)]
struct Found {
    /// Label, empty if the syntax has none.
    anchor_text: String,
    /// Matched path text.
    raw_text: String,
}

/// An inline link parsed from a line.
#[derive(Debug)]
struct InlineLink {
    /// Text between the brackets.
    anchor: String,
    /// Byte span of the whole link syntax.
    span: Range<usize>,
    /// Text between the parentheses.
    target: String,
}

/// Everything the matchers need to know about one line, computed once.
#[derive(Debug)]
struct LineContext<'a> {
    /// Whether the line starts a list item.
    is_list_item: bool,
    /// The raw line.
    line: &'a str,
    /// Inline links, or `None` when the link syntax is unbalanced.
    links: Option<Vec<InlineLink>>,
    /// Path-like tokens in order of appearance.
    tokens: Vec<Token<'a>>,
}

/// A cleaned path-like token and where it came from.
#[derive(Debug)]
struct Token<'a> {
    /// Byte span of the uncleaned token in the line.
    span: Range<usize>,
    /// Token with emphasis and trailing punctuation removed.
    text: &'a str,
}

impl Extractor {
    /// Tokens ending in a document extension that sit outside link syntax
    /// and are not globs or templates.
    fn bare_paths(&self, ctx: &LineContext<'_>) -> Vec<Found> {
        let link_spans: Vec<&Range<usize>> = ctx
            .links
            .iter()
            .flatten()
            .map(|l| return &l.span)
            .collect();

        return ctx
            .tokens
            .iter()
            .filter(|t| return !link_spans.iter().any(|s| return overlaps(s, &t.span)))
            .filter(|t| return !is_url(t.text) && !is_placeholder(t.text))
            .filter(|t| return has_extension(t.text, &self.document_extensions))
            .filter(|t| return t.text.contains(['/', '\\']) || is_plain_filename(t.text))
            .map(|t| {
                return Found {
                    anchor_text: String::new(),
                    raw_text: t.text.to_string(),
                };
            })
            .collect();
    }

    /// Extract every occurrence from one document.
    /// A line that a matcher cannot parse is skipped for that matcher only.
    pub fn extract(&self, source_file: &Path, text: &str) -> Extraction {
        let mut extraction = Extraction::default();

        for (idx, line) in text.lines().enumerate() {
            let line_number = u32::try_from(idx.saturating_add(1)).unwrap_or(u32::MAX);

            if is_binary_garbage(line) {
                for matcher in LinkType::EXTRACTION_ORDER {
                    record_malformed(&mut extraction, source_file, line_number, matcher);
                }
                continue;
            }

            let ctx = self.line_context(line);
            for matcher in LinkType::EXTRACTION_ORDER {
                let Some(found) = self.run_matcher(matcher, &ctx) else {
                    record_malformed(&mut extraction, source_file, line_number, matcher);
                    continue;
                };
                extraction.occurrences.extend(found.into_iter().map(|f| {
                    return LinkOccurrence {
                        anchor_text: f.anchor_text,
                        line_number,
                        link_type: matcher,
                        raw_text: f.raw_text,
                        source_file: source_file.to_path_buf(),
                    };
                }));
            }
        }

        return extraction;
    }

    /// Tokens cited in prose: reference-style definitions, tokens following
    /// a colon, and tokens inside list items. Globs and placeholders are kept.
    fn file_references(&self, ctx: &LineContext<'_>) -> Vec<Found> {
        let mut found = Vec::new();
        let mut definition_span: Option<Range<usize>> = None;

        if let Some(cap) = self.reference_definition.captures(ctx.line) {
            if let (Some(label), Some(target)) = (cap.get(1), cap.get(2)) {
                definition_span = Some(target.range());
                if !is_url(target.as_str()) {
                    found.push(Found {
                        anchor_text: label.as_str().to_string(),
                        raw_text: target.as_str().to_string(),
                    });
                }
            }
        }

        for token in &ctx.tokens {
            if definition_span.as_ref().is_some_and(|d| return overlaps(d, &token.span)) {
                continue;
            }
            if is_url(token.text) || !has_extension(token.text, &self.reference_extensions) {
                continue;
            }
            if ctx.is_list_item || follows_colon(ctx.line, token.span.start) {
                found.push(Found {
                    anchor_text: String::new(),
                    raw_text: token.text.to_string(),
                });
            }
        }

        return found;
    }

    /// Build the per-line context shared by all matchers.
    fn line_context<'a>(&self, line: &'a str) -> LineContext<'a> {
        let tokens = self
            .token
            .find_iter(line)
            .filter_map(|m| {
                let text = clean_token(m.as_str());
                if text.is_empty() {
                    return None;
                }
                return Some(Token { span: m.range(), text });
            })
            .collect();

        return LineContext {
            is_list_item: self.list_item.is_match(line),
            line,
            links: parse_inline_links(line),
            tokens,
        };
    }

    /// Compile all matcher patterns for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPattern` if a built-in pattern fails to compile.
    pub fn new(config: &Config) -> Result<Self, Error> {
        return Ok(Self {
            document_extensions: config.document_extensions.clone(),
            list_item: compile(LIST_ITEM_PATTERN)?,
            reference_definition: compile(REFERENCE_DEFINITION_PATTERN)?,
            reference_extensions: config.reference_extensions.clone(),
            token: compile(TOKEN_PATTERN)?,
        });
    }

    /// Dispatch one matcher. `None` means the matcher gave up on the line.
    fn run_matcher(&self, matcher: LinkType, ctx: &LineContext<'_>) -> Option<Vec<Found>> {
        return match matcher {
            LinkType::BarePaths => Some(self.bare_paths(ctx)),
            LinkType::DocsReferences => Some(docs_references(ctx)),
            LinkType::FileReferences => Some(self.file_references(ctx)),
            LinkType::MarkdownLinks => ctx.links.as_deref().map(markdown_links),
            LinkType::RelativePaths => Some(relative_paths(ctx)),
        };
    }
}

/// Strip bold markers and trailing sentence punctuation from a raw token.
fn clean_token(raw: &str) -> &str {
    let stripped = raw.strip_prefix("**").unwrap_or(raw);
    return stripped.trim_end_matches(['.', ':', '!', '?', '*']);
}

/// Index of the `)` closing the `(` at `open`, counting nested parentheses.
fn closing_paren(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0_usize;
    for (offset, byte) in bytes.get(open..)?.iter().enumerate() {
        match byte {
            b'(' => depth = depth.saturating_add(1),
            b')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(open.saturating_add(offset));
                }
            },
            _ => {},
        }
    }
    return None;
}

/// Compile a regex, mapping failure into the crate error.
///
/// # Errors
///
/// Returns `Error::InvalidPattern` with the compiler's message.
fn compile(pattern: &str) -> Result<Regex, Error> {
    return Regex::new(pattern).map_err(|e| {
        return Error::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        };
    });
}

/// Tokens starting with `docs/`, whatever wraps them.
fn docs_references(ctx: &LineContext<'_>) -> Vec<Found> {
    return ctx
        .tokens
        .iter()
        .filter(|t| return t.text.starts_with("docs/") || t.text.starts_with("docs\\"))
        .map(|t| {
            return Found {
                anchor_text: String::new(),
                raw_text: t.text.to_string(),
            };
        })
        .collect();
}

/// Whether the text before `start`, ignoring whitespace and inline markup, ends with a colon.
fn follows_colon(line: &str, start: usize) -> bool {
    let Some(before) = line.get(..start) else {
        return false;
    };
    return before.trim_end_matches([' ', '\t', '*', '_', '`']).ends_with(':');
}

/// Whether the path portion of a token ends in one of the extensions.
fn has_extension(token: &str, extensions: &[String]) -> bool {
    let path = token.split(['#', '?']).next().unwrap_or(token);
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let Some((_, ext)) = file_name.rsplit_once('.') else {
        return false;
    };
    return extensions.iter().any(|e| return e.eq_ignore_ascii_case(ext));
}

/// Control or replacement characters mean the line is not text. Tabs,
/// carriage returns and form feeds are ordinary whitespace.
fn is_binary_garbage(line: &str) -> bool {
    return line
        .chars()
        .any(|c| return c == '\u{FFFD}' || (c.is_control() && !matches!(c, '\t' | '\r' | '\x0c')));
}

/// A filename with no directory part, e.g. `README.md`.
fn is_plain_filename(token: &str) -> bool {
    let mut chars = token.chars();
    let starts_alnum = chars.next().is_some_and(|c| return c.is_ascii_alphanumeric());
    return starts_alnum
        && token.chars().all(|c| return c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '#'));
}

/// Glob, template, or regex fragment rather than a path.
fn is_placeholder(token: &str) -> bool {
    return token.contains(PLACEHOLDER_CHARS);
}

/// External URLs and mail links are never local paths.
fn is_url(token: &str) -> bool {
    return token.contains("://") || token.starts_with("mailto:") || token.starts_with("www.");
}

/// The target inside a link's parentheses: an `<...>` destination, or the
/// first whitespace-separated word when a title follows.
fn link_destination(inner: &str) -> String {
    let inner = inner.trim();
    if inner.starts_with('<') {
        return inner
            .find('>')
            .and_then(|end| return inner.get(..=end))
            .unwrap_or(inner)
            .to_string();
    }
    return inner.split_whitespace().next().unwrap_or_default().to_string();
}

/// Every inline link whose target is local.
fn markdown_links(links: &[InlineLink]) -> Vec<Found> {
    return links
        .iter()
        .filter(|l| return !l.target.is_empty() && !l.target.starts_with('#') && !is_url(&l.target))
        .map(|l| {
            return Found {
                anchor_text: l.anchor.clone(),
                raw_text: l.target.clone(),
            };
        })
        .collect();
}

/// Whether two byte spans share any position.
fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    return a.start < b.end && b.start < a.end;
}

/// Inline `[anchor](target "title")` links, images included, in order of
/// their opening bracket. Brackets nest, so a badge image inside a link
/// yields both links and anchors may contain `[...]`. Returns `None` when
/// a `](` has no matching `[` or no closing `)`.
fn parse_inline_links(line: &str) -> Option<Vec<InlineLink>> {
    let bytes = line.as_bytes();
    let mut openers: Vec<usize> = Vec::new();
    let mut links: Vec<InlineLink> = Vec::new();
    let mut pos = 0_usize;

    while let Some(&byte) = bytes.get(pos) {
        let next = pos.saturating_add(1);
        match byte {
            b'\\' => {
                pos = next.saturating_add(1);
                continue;
            },
            b'[' => openers.push(pos),
            b']' if bytes.get(next) == Some(&b'(') => {
                let open = openers.pop()?;
                let close = closing_paren(bytes, next)?;
                let start = open
                    .checked_sub(1)
                    .filter(|bang| return bytes.get(*bang) == Some(&b'!'))
                    .unwrap_or(open);
                links.push(InlineLink {
                    anchor: line.get(open.saturating_add(1)..pos)?.to_string(),
                    span: start..close.saturating_add(1),
                    target: link_destination(line.get(next.saturating_add(1)..close)?),
                });
                pos = close.saturating_add(1);
                continue;
            },
            b']' => {
                openers.pop();
            },
            _ => {},
        }
        pos = next;
    }

    links.sort_by_key(|l| return l.span.start);
    return Some(links);
}

/// Record that `matcher` skipped a line.
fn record_malformed(extraction: &mut Extraction, source_file: &Path, line_number: u32, matcher: LinkType) {
    tracing::debug!(file = %source_file.display(), line = line_number, %matcher, "malformed line ignored");
    extraction.malformed.push(MalformedLine {
        line_number,
        matcher,
        source_file: source_file.to_path_buf(),
    });
    return;
}

/// Tokens beginning with `./` or `../`, inside link syntax or not.
fn relative_paths(ctx: &LineContext<'_>) -> Vec<Found> {
    return ctx
        .tokens
        .iter()
        .filter(|t| return t.text.starts_with("./") || t.text.starts_with("../"))
        .map(|t| {
            return Found {
                anchor_text: String::new(),
                raw_text: t.text.to_string(),
            };
        })
        .collect();
}
