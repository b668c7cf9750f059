//! Sentence, paragraph and token segmentation of filtered text.
//!
//! Sentences are the unit of playback synchronization; tokens are the unit of
//! one-word-at-a-time display. Both are derived from the same filtered text,
//! so re-running segmentation on identical input always yields identical
//! boundaries.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Sentence terminators recognized by [`split_sentences`]. Latin and
/// full-width CJK punctuation only; other scripts fall back to per-line
/// splitting.
const SENTENCE_TERMINATORS: [char; 6] = ['.', '!', '?', '。', '！', '？'];

static RE_PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n+").unwrap());
static RE_WORD_OR_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9]+(?:['-][A-Za-z0-9]+)?|[.,;:!?]").unwrap());

/// One display unit of the token stream.
///
/// Trailing punctuation is attached to the preceding token instead of being
/// emitted on its own, so the display layer can render it without an extra
/// frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub text: String,
    pub punct: Option<char>,
    pub sentence_end: bool,
    pub paragraph_index: usize,
}

/// Split text into paragraphs separated by one or more blank lines.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    RE_PARAGRAPH_BREAK
        .split(text.trim())
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split text into sentences at terminator-then-whitespace boundaries.
///
/// Loosely formatted extractions often carry no terminal punctuation at all;
/// when splitting produces at most one piece, each non-blank physical line
/// becomes one sentence instead. Output sentences are always trimmed and
/// non-empty.
pub fn split_sentences(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = trimmed.chars().peekable();
    while let Some(ch) = chars.next() {
        current.push(ch);
        if SENTENCE_TERMINATORS.contains(&ch)
            && chars.peek().is_some_and(|next| next.is_whitespace())
        {
            push_trimmed(&mut sentences, &current);
            current.clear();
        }
    }
    push_trimmed(&mut sentences, &current);

    if sentences.len() <= 1 {
        return trimmed
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
    }
    sentences
}

fn push_trimmed(sentences: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        sentences.push(piece.to_string());
    }
}

/// Tokenize paragraphs into the display token stream.
///
/// Word-like runs (letters/digits, optionally joined by one interior
/// apostrophe or hyphen) become tokens; a lone `, ; : . ! ?` attaches to the
/// most recently emitted token, marking sentence ends for `.` `!` `?`.
/// Leading punctuation with nothing to attach to is dropped.
pub fn tokenize_paragraphs(paragraphs: &[String]) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    for (paragraph_index, paragraph) in paragraphs.iter().enumerate() {
        for piece in RE_WORD_OR_PUNCT.find_iter(paragraph) {
            let piece = piece.as_str();
            if let Some(punct) = as_attachable_punct(piece) {
                if let Some(last) = tokens.last_mut() {
                    last.punct = Some(punct);
                    if matches!(punct, '.' | '!' | '?') {
                        last.sentence_end = true;
                    }
                }
                continue;
            }
            tokens.push(Token {
                text: piece.to_string(),
                punct: None,
                sentence_end: false,
                paragraph_index,
            });
        }
    }
    tokens
}

fn as_attachable_punct(piece: &str) -> Option<char> {
    let mut chars = piece.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if matches!(ch, ',' | ';' | ':' | '.' | '!' | '?') => Some(ch),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraphs_split_on_blank_lines() {
        let text = "First paragraph\nstill first.\n\nSecond.\n\n   \n\nThird.";
        assert_eq!(
            split_paragraphs(text),
            vec!["First paragraph\nstill first.", "Second.", "Third."]
        );
    }

    #[test]
    fn paragraphs_of_empty_text_are_empty() {
        assert!(split_paragraphs("").is_empty());
        assert!(split_paragraphs("  \n \n ").is_empty());
    }

    #[test]
    fn sentences_split_after_terminator_and_whitespace() {
        let text = "One sentence. Another one! And a third? Then 3.5 stays whole.";
        assert_eq!(
            split_sentences(text),
            vec![
                "One sentence.",
                "Another one!",
                "And a third?",
                "Then 3.5 stays whole."
            ]
        );
    }

    #[test]
    fn fullwidth_terminators_also_split() {
        let text = "一文目です。 二文目です！ 三文目？ 終わり。";
        assert_eq!(split_sentences(text).len(), 4);
    }

    #[test]
    fn unpunctuated_text_falls_back_to_lines() {
        let text = "Page content without terminal punctuation\nSecond line";
        assert_eq!(
            split_sentences(text),
            vec![
                "Page content without terminal punctuation",
                "Second line"
            ]
        );
    }

    #[test]
    fn blank_lines_are_skipped_in_fallback() {
        let text = "first line\n\n\nsecond line\n   \nthird line";
        assert_eq!(split_sentences(text).len(), 3);
    }

    #[test]
    fn empty_input_yields_no_sentences() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   \n  ").is_empty());
    }

    #[test]
    fn sentences_are_trimmed_and_non_empty() {
        let text = "  Spaced out.   Next one.  ";
        let sentences = split_sentences(text);
        assert_eq!(sentences, vec!["Spaced out.", "Next one."]);
    }

    #[test]
    fn tokens_carry_attached_punctuation_and_paragraph_index() {
        let paragraphs = split_paragraphs("Hello world. Next, line.\n\nNew para!");
        assert_eq!(paragraphs, vec!["Hello world. Next, line.", "New para!"]);

        let tokens = tokenize_paragraphs(&paragraphs);
        let world = &tokens[1];
        assert_eq!(world.text, "world");
        assert_eq!(world.punct, Some('.'));
        assert!(world.sentence_end);

        let next = &tokens[2];
        assert_eq!(next.text, "Next");
        assert_eq!(next.punct, Some(','));
        assert!(!next.sentence_end);

        let last = tokens.last().unwrap();
        assert_eq!(last.text, "para");
        assert_eq!(last.punct, Some('!'));
        assert!(last.sentence_end);
        assert_eq!(last.paragraph_index, 1);
    }

    #[test]
    fn interior_apostrophes_and_hyphens_stay_in_one_token() {
        let paragraphs = vec!["Don't half-open the well-lit door".to_string()];
        let tokens = tokenize_paragraphs(&paragraphs);
        let texts: Vec<&str> = tokens.iter().map(|token| token.text.as_str()).collect();
        assert_eq!(texts, vec!["Don't", "half-open", "the", "well-lit", "door"]);
    }

    #[test]
    fn leading_punctuation_with_no_token_is_dropped() {
        let paragraphs = vec![": but why".to_string()];
        let tokens = tokenize_paragraphs(&paragraphs);
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].text, "but");
        assert_eq!(tokens[0].punct, None);
    }

    #[test]
    fn single_digit_words_are_tokens_not_punctuation() {
        let paragraphs = vec!["Take 5 now.".to_string()];
        let tokens = tokenize_paragraphs(&paragraphs);
        assert_eq!(tokens[1].text, "5");
        assert_eq!(tokens[2].punct, Some('.'));
    }

    #[test]
    fn punctuation_attaches_across_paragraph_boundaries_within_one_call() {
        // A paragraph that opens with punctuation attaches it to the last
        // token of the previous paragraph.
        let paragraphs = vec!["tail word".to_string(), "! leading".to_string()];
        let tokens = tokenize_paragraphs(&paragraphs);
        assert_eq!(tokens[1].text, "word");
        assert_eq!(tokens[1].punct, Some('!'));
        assert!(tokens[1].sentence_end);
    }
}
