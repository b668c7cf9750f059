//! Content filtering for decoded book text.
//!
//! Raw extractions carry title pages, running headers, bare page numbers and
//! footnote apparatus that read terribly aloud. The filter applies a fixed
//! pipeline of independently toggleable steps: frontmatter skip, repeated
//! line removal, page-number stripping, and footnote stripping.

use crate::config::FilterSettings;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

/// Only the first this-many lines are scanned for a chapter marker, which
/// caps worst-case cost on huge documents.
const FRONTMATTER_SCAN_LINES: usize = 1000;

static RE_CHAPTER_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(chapter\s+[0-9ivxlcdm]+\b|prologue\b|part\s+[0-9ivxlcdm]+\b|book\s+[0-9ivxlcdm]+\b)")
        .unwrap()
});
static RE_PAGE_NUMBER_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(page\s+\d+\s*(of\s*\d+)?|\d+)\s*$").unwrap());
static RE_INLINE_FOOTNOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(\d+|[ivxlcdm]+)\]").unwrap());
static RE_FOOTNOTE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\[(\d+|[ivxlcdm]+)\]|\d+[.)])\s+").unwrap());

/// Normalized lines longer than this are never treated as repeats, so long
/// body sentences that happen to recur are not mistaken for boilerplate.
const MAX_REPEAT_LINE_LEN: usize = 80;

#[derive(Debug, Clone)]
pub struct ContentFilter {
    settings: FilterSettings,
}

impl Default for ContentFilter {
    fn default() -> Self {
        ContentFilter::new(FilterSettings::default())
    }
}

impl ContentFilter {
    pub fn new(settings: FilterSettings) -> Self {
        ContentFilter { settings }
    }

    /// Run the full filtering pipeline over decoded text.
    ///
    /// Total over any input: empty text comes back unchanged, and every step
    /// is skipped independently via its settings toggle.
    pub fn filter_text(&self, text: &str) -> String {
        if text.is_empty() {
            return text.to_string();
        }

        let mut lines: Vec<&str> = text.lines().collect();

        if self.settings.skip_frontmatter {
            match find_content_start(&lines) {
                Some(start) => {
                    if start > 0 {
                        debug!(skipped_lines = start, "Dropped frontmatter before chapter marker");
                    }
                    lines.drain(..start);
                }
                None => {
                    // No marker found: fall back to dropping the first
                    // fraction of the text by character count, re-splitting
                    // into lines afterwards.
                    let n_chars =
                        (text.chars().count() as f64 * self.settings.frontmatter_skip_fraction)
                            as usize;
                    let offset = text
                        .char_indices()
                        .nth(n_chars)
                        .map(|(idx, _)| idx)
                        .unwrap_or(text.len());
                    debug!(skipped_chars = n_chars, "No chapter marker; dropped leading fraction");
                    lines = text[offset..].lines().collect();
                }
            }
        }

        if self.settings.skip_headers_footers {
            lines = remove_repeated_lines(lines, self.settings.repeat_threshold);
        }

        if self.settings.skip_page_numbers {
            lines.retain(|line| !RE_PAGE_NUMBER_LINE.is_match(line));
        }

        let mut joined = lines.join("\n");
        if self.settings.skip_footnotes {
            let stripped = RE_INLINE_FOOTNOTE.replace_all(&joined, "");
            joined = stripped
                .lines()
                .filter(|line| !self.is_footnote_line(line))
                .collect::<Vec<_>>()
                .join("\n");
        }
        joined
    }

    /// A marker-prefixed line is dropped only when short enough to be
    /// apparatus rather than enumerated body content.
    fn is_footnote_line(&self, line: &str) -> bool {
        let trimmed = line.trim();
        RE_FOOTNOTE_LINE.is_match(trimmed)
            && trimmed.chars().count() <= self.settings.footnote_max_len
    }
}

/// Index of the first line matching a chapter-like marker, scanning at most
/// [`FRONTMATTER_SCAN_LINES`] lines.
fn find_content_start(lines: &[&str]) -> Option<usize> {
    lines
        .iter()
        .take(FRONTMATTER_SCAN_LINES)
        .position(|line| RE_CHAPTER_MARKER.is_match(line))
}

/// Drop every occurrence of any normalized line repeated strictly more than
/// `threshold` times. Blank lines are never counted and never removed.
fn remove_repeated_lines(lines: Vec<&str>, threshold: usize) -> Vec<&str> {
    let normalized: Vec<String> = lines.iter().map(|line| normalize_line(line)).collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for norm in &normalized {
        if norm.is_empty() || norm.chars().count() > MAX_REPEAT_LINE_LEN {
            continue;
        }
        *counts.entry(norm.as_str()).or_insert(0) += 1;
    }

    let repeated: Vec<&str> = counts
        .into_iter()
        .filter(|(_, count)| *count > threshold)
        .map(|(line, _)| line)
        .collect();
    if repeated.is_empty() {
        return lines;
    }
    debug!(distinct = repeated.len(), "Removing repeated header/footer lines");

    lines
        .into_iter()
        .zip(&normalized)
        .filter(|(_, norm)| !repeated.contains(&norm.as_str()))
        .map(|(line, _)| line)
        .collect()
}

fn normalize_line(line: &str) -> String {
    line.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
