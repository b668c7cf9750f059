//! Document normalization and playback synchronization for read-aloud books.
//!
//! The pipeline turns a decoded document (plain text, or positioned fragments
//! from a paged format) into a clean ordered sentence stream plus a display
//! token stream, then keeps a playback cursor in sync with estimated
//! per-sentence durations. Format decoding, persistence, speech synthesis and
//! the API surface are external collaborators.

pub mod blocks;
pub mod config;
pub mod content_filter;
pub mod ingest;
pub mod library;
pub mod playback;
pub mod segmenter;
pub mod session;

pub use blocks::{TextFragment, Zone, classify_zone, find_repeated_fragments, flatten_fragments};
pub use config::{AppConfig, BlockSettings, FilterSettings, PlaybackSettings, load_config};
pub use content_filter::ContentFilter;
pub use ingest::{BookContent, ImportedBook, ParsedDocument, TokenStream, import_document, import_fragments};
pub use library::{LibraryEntry, scan_library};
pub use playback::{compute_adaptive_speed, estimate_durations, locate_sentence, sentence_start_time};
pub use segmenter::{Token, split_paragraphs, split_sentences, tokenize_paragraphs};
pub use session::{PlaybackCursor, PlaybackLifecycle, PlaybackSession, PlaybackSnapshot};
