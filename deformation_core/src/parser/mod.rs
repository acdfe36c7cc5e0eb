//! Prompt Parser - lightweight slot extraction from free-text prompts.
//!
//! The parser is deliberately conservative:
//! 1. **Setting**: the last locative preposition outside a quoted span splits
//!    the prompt into a subject clause and a setting clause
//! 2. **Mood**: only an explicit mood word seeds the base mood, otherwise "neutral"
//! 3. **Colors**: explicit color words are collected for palette remapping
//! 4. **Action and objects**: the first known action verb and every known
//!    object noun, for characters that treat them individually

use serde::{Deserialize, Serialize};

use crate::error::DeformationError;

/// Prepositions that can open a setting clause.
pub const LOCATIVE_PREPOSITIONS: [&str; 5] = ["in", "on", "at", "near", "inside"];

/// Mood words recognized in the raw prompt.
pub const MOOD_TOKENS: [&str; 14] = [
    "happy",
    "sad",
    "angry",
    "tense",
    "calm",
    "peaceful",
    "cheerful",
    "somber",
    "playful",
    "serious",
    "anxious",
    "mysterious",
    "melancholy",
    "joyful",
];

/// Color words collected for the chromatic dimension.
pub const COLOR_TOKENS: [&str; 14] = [
    "red", "blue", "green", "yellow", "orange", "purple", "pink", "black", "white", "gray",
    "grey", "brown", "gold", "silver",
];

/// Action verbs recognized in the raw prompt.
pub const ACTION_TOKENS: [&str; 23] = [
    "walking", "running", "standing", "sitting", "eating", "drinking", "looking", "holding",
    "wearing", "riding", "driving", "cooking", "reading", "writing", "talking", "singing",
    "dancing", "playing", "tasting", "smelling", "touching", "building", "creating",
];

/// Object nouns recognized in the raw prompt.
pub const OBJECT_TOKENS: [&str; 20] = [
    "cup", "bottle", "glass", "table", "chair", "book", "flower", "plant", "lamp", "window",
    "door", "painting", "mirror", "knife", "fork", "plate", "bowl", "pot", "pan", "mug",
];

/// Words that fold the following object into a compound noun ("coffee cup").
pub const COMPOUND_MODIFIERS: [&str; 7] = ["coffee", "soup", "wine", "water", "tea", "beer", "milk"];

/// Punctuation that may close a clause and is dropped where clauses are joined.
pub const CLAUSE_PUNCTUATION: [char; 9] =
    ['.', ',', ';', ':', '!', '?', '-', '\u{2013}', '\u{2014}'];

/// Base mood used when the prompt names none.
pub const NEUTRAL_MOOD: &str = "neutral";

const QUOTES: [char; 3] = ['"', '\u{201C}', '\u{201D}'];

/// Semantic slots extracted from a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedPrompt {
    /// The trimmed input.
    pub original: String,

    /// Head clause; the whole prompt when no setting was found.
    pub subject: String,

    /// Trailing locative clause, preposition included.
    pub setting: Option<String>,

    pub base_mood: String,

    /// Explicit color words in order of first appearance.
    pub colors: Vec<String>,

    /// First recognized action verb.
    pub action: Option<String>,

    /// Standalone object nouns in order of first appearance.
    pub objects: Vec<String>,
}

/// A whitespace-delimited word and where it starts in the prompt.
#[derive(Debug)]
struct Word {
    start: usize,
    normalized: String,
    quoted: bool,
}

/// Parse a raw prompt into slots.
pub fn parse(raw_prompt: &str) -> Result<ParsedPrompt, DeformationError> {
    let trimmed = raw_prompt.trim();
    if trimmed.is_empty() {
        return Err(DeformationError::EmptyPrompt);
    }

    // Drop closing punctuation so it does not trail into the setting.
    let text = match trimmed.trim_end_matches(|c: char| CLAUSE_PUNCTUATION.contains(&c) || c.is_whitespace()) {
        "" => trimmed,
        stripped => stripped,
    };

    let words = split_words(text);

    let (subject, setting) = match find_setting_start(&words) {
        Some(start) => (
            text[..start].trim().to_string(),
            Some(text[start..].trim().to_string()),
        ),
        None => (text.to_string(), None),
    };

    let base_mood = words
        .iter()
        .filter(|w| !w.quoted)
        .find(|w| MOOD_TOKENS.contains(&w.normalized.as_str()))
        .map(|w| w.normalized.clone())
        .unwrap_or_else(|| NEUTRAL_MOOD.to_string());

    let mut colors: Vec<String> = Vec::new();
    for word in words.iter().filter(|w| !w.quoted) {
        if COLOR_TOKENS.contains(&word.normalized.as_str()) && !colors.contains(&word.normalized) {
            colors.push(word.normalized.clone());
        }
    }

    let action = words
        .iter()
        .filter(|w| !w.quoted)
        .find(|w| ACTION_TOKENS.contains(&w.normalized.as_str()))
        .map(|w| w.normalized.clone());

    let mut objects: Vec<String> = Vec::new();
    for (i, word) in words.iter().enumerate().filter(|(_, w)| !w.quoted) {
        let compound = i > 0 && COMPOUND_MODIFIERS.contains(&words[i - 1].normalized.as_str());
        if OBJECT_TOKENS.contains(&word.normalized.as_str())
            && !compound
            && !objects.contains(&word.normalized)
        {
            objects.push(word.normalized.clone());
        }
    }

    Ok(ParsedPrompt {
        original: trimmed.to_string(),
        subject,
        setting,
        base_mood,
        colors,
        action,
        objects,
    })
}

/// Byte offset of the last usable locative preposition.
///
/// The preposition must not open the prompt and must be followed by at least
/// one more word.
fn find_setting_start(words: &[Word]) -> Option<usize> {
    words
        .iter()
        .enumerate()
        .rev()
        .find(|(i, w)| {
            *i > 0
                && *i + 1 < words.len()
                && !w.quoted
                && LOCATIVE_PREPOSITIONS.contains(&w.normalized.as_str())
        })
        .map(|(_, w)| w.start)
}

fn split_words(text: &str) -> Vec<Word> {
    // An unmatched final quote (an inch mark, a typo) opens no span.
    let mut toggles: Vec<usize> = text
        .char_indices()
        .filter(|(_, ch)| QUOTES.contains(ch))
        .map(|(idx, _)| idx)
        .collect();
    if toggles.len() % 2 == 1 {
        toggles.pop();
    }

    let mut words = Vec::new();
    let mut in_quote = false;
    let mut current: Option<(usize, bool)> = None;

    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some((start, quoted)) = current.take() {
                words.push(make_word(text, start, idx, quoted));
            }
            continue;
        }

        let entry = current.get_or_insert((idx, in_quote));
        if toggles.binary_search(&idx).is_ok() {
            in_quote = !in_quote;
            entry.1 = true;
        }
    }

    if let Some((start, quoted)) = current {
        words.push(make_word(text, start, text.len(), quoted));
    }

    words
}

fn make_word(text: &str, start: usize, end: usize, quoted: bool) -> Word {
    Word {
        start,
        normalized: text[start..end]
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase(),
        quoted,
    }
}
