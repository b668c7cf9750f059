//! Ingestion boundary between external decoders and the pipeline.
//!
//! Decoders hand in either a fully structured parse (title, author and
//! sentences already extracted) or raw text. The tagged [`ParsedDocument`]
//! is resolved exactly once here: structured parses bypass filtering and
//! segmentation entirely, raw text runs the full pipeline. Positioned
//! fragment lists are flattened through [`crate::blocks`] first and then
//! follow the raw-text path.

use crate::blocks::{TextFragment, flatten_fragments};
use crate::config::BlockSettings;
use crate::content_filter::ContentFilter;
use crate::segmenter::{Token, split_paragraphs, split_sentences, tokenize_paragraphs};
use serde::Serialize;
use tracing::info;
use unicode_normalization::UnicodeNormalization;

/// A decoder's output, resolved once at the ingestion boundary.
#[derive(Debug, Clone)]
pub enum ParsedDocument {
    /// Binary-format decoders that understand document structure hand the
    /// pieces over directly.
    Structured {
        title: String,
        author: Option<String>,
        sentences: Vec<String>,
    },
    /// Plain-text decoders hand over undifferentiated text.
    RawText(String),
}

/// The "current book" payload handed to the persistence collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct BookContent {
    pub title: String,
    pub author: Option<String>,
    pub sentences: Vec<String>,
}

/// Paragraphs and display tokens handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct TokenStream {
    pub paragraphs: Vec<String>,
    pub tokens: Vec<Token>,
}

/// Everything one import produces. Replaced wholesale on the next import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportedBook {
    pub content: BookContent,
    pub token_stream: TokenStream,
}

/// Run one document through the pipeline.
///
/// `source_name` is the decoder's best fallback title, typically the file
/// stem.
pub fn import_document(
    source_name: &str,
    document: ParsedDocument,
    filter: &ContentFilter,
) -> ImportedBook {
    match document {
        ParsedDocument::Structured {
            title,
            author,
            sentences,
        } => {
            info!(%title, sentences = sentences.len(), "Imported structured document");
            // Structure is already known; display paragraphs are the stored
            // sentences themselves.
            let paragraphs: Vec<String> = sentences.clone();
            let tokens = tokenize_paragraphs(&paragraphs);
            ImportedBook {
                content: BookContent {
                    title,
                    author,
                    sentences,
                },
                token_stream: TokenStream { paragraphs, tokens },
            }
        }
        ParsedDocument::RawText(text) => {
            let normalized: String = text.nfc().collect();
            let filtered = filter.filter_text(&normalized);
            let sentences = split_sentences(&filtered);
            let paragraphs = split_paragraphs(&filtered);
            let tokens = tokenize_paragraphs(&paragraphs);
            let title = extract_title(&normalized, source_name);
            info!(
                %title,
                sentences = sentences.len(),
                tokens = tokens.len(),
                "Imported raw text document"
            );
            ImportedBook {
                content: BookContent {
                    title,
                    author: None,
                    sentences,
                },
                token_stream: TokenStream { paragraphs, tokens },
            }
        }
    }
}

/// Import a positioned fragment list by flattening it to body text first.
pub fn import_fragments(
    source_name: &str,
    fragments: &[TextFragment],
    block_settings: &BlockSettings,
    filter: &ContentFilter,
) -> ImportedBook {
    let text = flatten_fragments(fragments, block_settings);
    import_document(source_name, ParsedDocument::RawText(text), filter)
}

/// Guess a title from the first lines of undecorated text.
///
/// The first line of plausible title length that is not obvious boilerplate
/// wins; otherwise the source name stands in.
fn extract_title(text: &str, fallback: &str) -> String {
    for line in text.lines().take(10) {
        let candidate = line.trim();
        let length = candidate.chars().count();
        if length <= 10 || length >= 100 {
            continue;
        }
        let lowered = candidate.to_lowercase();
        if ["chapter", "page", "table of contents"]
            .iter()
            .any(|skip| lowered.contains(skip))
        {
            continue;
        }
        return candidate.to_string();
    }
    fallback.to_string()
}
