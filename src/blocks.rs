//! Position-aware classification of text fragments from paged documents.
//!
//! Binary-format decoders hand us one [`TextFragment`] per extracted visual
//! block, with a bounding box and page metadata. Fragments are sorted into
//! header/body/footer zones by vertical position, and text that repeats
//! across many fragments (running headers, page furniture) is dropped even
//! when it drifts into the body zone on some pages.

use crate::config::BlockSettings;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// A positioned run of text extracted from one page of a paged document.
///
/// `y0` is measured from the top of the page. Produced by an external
/// decoder; callers must not hand in fragments with `page_height <= 0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub page_height: f32,
    pub font_size: f32,
    pub page_index: usize,
}

/// Vertical zone of a fragment on its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Header,
    Body,
    Footer,
}

/// Classify a fragment by the vertical position of its top edge.
///
/// Boundary values belong to `Body`; only strict inequalities select the
/// header and footer zones.
pub fn classify_zone(fragment: &TextFragment, header_fraction: f32, footer_fraction: f32) -> Zone {
    debug_assert!(fragment.page_height > 0.0);
    let relative_y = fragment.y0 / fragment.page_height;

    if relative_y < header_fraction {
        Zone::Header
    } else if relative_y > 1.0 - footer_fraction {
        Zone::Footer
    } else {
        Zone::Body
    }
}

/// Normalize fragment text for repetition counting: trim, lowercase, and
/// collapse internal whitespace to single spaces.
pub fn normalize_fragment_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Collect normalized fragment texts occurring on at least `threshold`
/// fragments, regardless of page or zone.
///
/// This catches running headers and footers that sit inside the body zone on
/// some pages, e.g. a centered title that drifts between pages. Fragments
/// whose normalized text is empty are excluded from counting.
pub fn find_repeated_fragments(fragments: &[TextFragment], threshold: usize) -> HashSet<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for fragment in fragments {
        let normalized = normalize_fragment_text(&fragment.text);
        if normalized.is_empty() {
            continue;
        }
        *counts.entry(normalized).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count >= threshold)
        .map(|(text, _)| text)
        .collect()
}

/// Reduce positioned fragments to flat body text, one surviving fragment per
/// line, in reading order (page index, then vertical position, preserving the
/// decoder's order on ties).
pub fn flatten_fragments(fragments: &[TextFragment], settings: &BlockSettings) -> String {
    let repeated = find_repeated_fragments(fragments, settings.fragment_repeat_threshold);

    let mut ordered: Vec<&TextFragment> = fragments.iter().collect();
    ordered.sort_by(|a, b| {
        a.page_index
            .cmp(&b.page_index)
            .then(a.y0.total_cmp(&b.y0))
    });

    let mut kept = Vec::new();
    let mut dropped = 0usize;
    for fragment in ordered {
        let zone = classify_zone(
            fragment,
            settings.header_zone_fraction,
            settings.footer_zone_fraction,
        );
        if zone != Zone::Body || repeated.contains(&normalize_fragment_text(&fragment.text)) {
            dropped += 1;
            continue;
        }
        kept.push(fragment.text.as_str());
    }

    if dropped > 0 {
        debug!(dropped, kept = kept.len(), "Filtered positioned fragments");
    }
    kept.join("\n")
}
