//! Extraction of structured edit parameters from one line of free text.
//!
//! Three independent extractions (background color, clothing type,
//! clothing color), each driven by an ordered list of patterns where the
//! first accepted match wins. Free word order and partial sentences are
//! tolerated; genuinely ambiguous phrasing is not disambiguated.

use regex::Regex;
use tracing::debug;

use potret_core::RevisionUpdate;

use crate::lexicon;

/// A color-ish token: one word, optionally hyphenated.
const WORD: &str = r"[a-z]+(?:-[a-z]+)?";

/// Garment nouns that select a canonical clothing type. Longer
/// alternatives first so "t-shirt" is not matched as "shirt".
const TYPE_NOUNS: &str = "t-shirt|tshirt|tee|polo|suit|jacket|blazer|shirt";

/// Nouns that anchor a clothing-color phrase. Includes generic words
/// ("clothes", "outfit", "top") that name no specific garment.
const COLOR_NOUNS: &str = "t-shirt|tshirt|tee|polo|suit|jacket|blazer|shirt|clothes|outfit|top";

/// Articles and connectives that can land in a capture position when the
/// regex backtracks around them. Never a color or a garment.
const FILLER_WORDS: &[&str] = &["a", "an", "the", "my", "to", "in", "into", "and", "with"];

pub struct RevisionParser {
    background: Vec<Regex>,
    clothing_type: Vec<Regex>,
    clothing_color: Vec<Regex>,
}

impl RevisionParser {
    pub fn new() -> Self {
        let background = vec![
            // "change the background to red", "switch backdrop to grey"
            compile(&format!(
                r"(?i)\b(?:change|switch|set|make)\s+(?:the\s+)?(?:background|backdrop|bg)\s+(?:color\s+)?(?:to\s+)?({WORD})\b"
            )),
            // "white background", "a red backdrop"
            compile(&format!(
                r"(?i)\b({WORD})\s+(?:background|backdrop|bg)\b"
            )),
            // "background red", "background to red"
            compile(&format!(
                r"(?i)\b(?:background|backdrop|bg)\s+(?:color\s+)?(?:to\s+)?({WORD})\b"
            )),
        ];

        let clothing_type = vec![
            // "wear a black shirt", "change into a suit", "put on a blazer"
            compile(&format!(
                r"(?i)\b(?:wear(?:ing)?|put\s+on|change\s+(?:in)?to|switch\s+to|use)\s+(?:an?\s+|the\s+)?(?:{WORD}\s+)??({TYPE_NOUNS})\b"
            )),
            // "dressed in a polo"
            compile(&format!(
                r"(?i)\bdressed\s+in\s+(?:an?\s+|the\s+)?(?:{WORD}\s+)??({TYPE_NOUNS})\b"
            )),
        ];

        let clothing_color = vec![
            // "change clothes to red", "switch my shirt to navy"
            compile(&format!(
                r"(?i)\b(?:change|switch)\s+(?:the\s+|my\s+)?(?:{COLOR_NOUNS})\s+(?:color\s+)?(?:to\s+)?({WORD})\b"
            )),
            // "black shirt", "a navy polo"
            compile(&format!(
                r"(?i)\b(?:(?:an?|the|my)\s+)?({WORD})\s+(?:{COLOR_NOUNS})\b"
            )),
            // "shirt in red", "outfit black"
            compile(&format!(
                r"(?i)\b(?:{COLOR_NOUNS})\s+(?:in\s+|to\s+)?({WORD})\b"
            )),
        ];

        Self {
            background,
            clothing_type,
            clothing_color,
        }
    }

    /// Extract zero or more parameter updates from one line of text.
    /// Absence of a field means "do not change"; nothing is ever guessed.
    pub fn parse(&self, text: &str) -> RevisionUpdate {
        let mut update = RevisionUpdate::default();
        if text.trim().is_empty() {
            return update;
        }

        for pattern in &self.background {
            if let Some(token) = first_capture(pattern, text) {
                if is_filler(&token) {
                    continue;
                }
                update.background_color = Some(lexicon::normalize_color(&token));
                break;
            }
        }

        for pattern in &self.clothing_type {
            if let Some(token) = first_capture(pattern, text) {
                if let Some(canonical) = lexicon::normalize_clothing_type(&token) {
                    update.clothing_type = Some(canonical);
                    break;
                }
            }
        }

        for pattern in &self.clothing_color {
            if let Some(token) = first_capture(pattern, text) {
                // A garment word in a color position is a miscapture, not
                // a color. Color nouns are deliberately not checked here.
                if is_filler(&token) || lexicon::is_clothing_noun(&token) {
                    continue;
                }
                update.clothing_color = Some(lexicon::normalize_color(&token));
                break;
            }
        }

        debug!(text, ?update, "parsed revision request");
        update
    }
}

impl Default for RevisionParser {
    fn default() -> Self {
        Self::new()
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("invalid regex")
}

fn first_capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
}

fn is_filler(token: &str) -> bool {
    FILLER_WORDS.contains(&token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> RevisionUpdate {
        RevisionParser::new().parse(text)
    }

    #[test]
    fn background_change_phrase() {
        let update = parse("change background to red");
        assert_eq!(update.background_color.as_deref(), Some("red"));
        assert_eq!(update.clothing_type, None);
        assert_eq!(update.clothing_color, None);
        assert!(update.is_valid());
    }

    #[test]
    fn wear_a_colored_shirt() {
        let update = parse("wear a black shirt");
        assert_eq!(update.clothing_type.as_deref(), Some("formal shirt"));
        assert_eq!(update.clothing_color.as_deref(), Some("black"));
        assert_eq!(update.background_color, None);
    }

    #[test]
    fn combined_background_and_clothing_color() {
        let update = parse("white background black shirt");
        assert_eq!(update.background_color.as_deref(), Some("white"));
        assert_eq!(update.clothing_color.as_deref(), Some("black"));
        assert_eq!(update.clothing_type, None);
    }

    #[test]
    fn unrecognized_text_yields_empty_update() {
        for text in [
            "hello there",
            "make it look nicer please",
            "thanks!",
            "what can you do?",
            "",
        ] {
            let update = parse(text);
            assert_eq!(update, RevisionUpdate::default(), "text: {text:?}");
            assert!(!update.is_valid());
        }
    }

    #[test]
    fn background_word_order_variants() {
        assert_eq!(
            parse("background red").background_color.as_deref(),
            Some("red")
        );
        assert_eq!(
            parse("a green backdrop").background_color.as_deref(),
            Some("green")
        );
        assert_eq!(
            parse("set the bg to grey").background_color.as_deref(),
            Some("gray")
        );
    }

    #[test]
    fn clothing_type_variants() {
        assert_eq!(
            parse("change into a suit").clothing_type.as_deref(),
            Some("suit jacket")
        );
        assert_eq!(
            parse("put on a blazer").clothing_type.as_deref(),
            Some("blazer")
        );
        assert_eq!(
            parse("wearing a tee").clothing_type.as_deref(),
            Some("t-shirt")
        );
    }

    #[test]
    fn change_clothes_to_color() {
        let update = parse("change clothes to red");
        assert_eq!(update.clothing_color.as_deref(), Some("red"));
        assert_eq!(update.clothing_type, None);
    }

    #[test]
    fn color_aliases_normalized() {
        assert_eq!(
            parse("switch my shirt to navy").clothing_color.as_deref(),
            Some("blue")
        );
        assert_eq!(
            parse("crimson background").background_color.as_deref(),
            Some("red")
        );
    }

    #[test]
    fn garment_word_is_not_a_color() {
        // "polo" lands in the color position of "polo shirt" but names a
        // garment, so only the clothing type is set.
        let update = parse("wear a polo shirt");
        assert_eq!(update.clothing_type.as_deref(), Some("polo shirt"));
        assert_eq!(update.clothing_color, None);
    }

    #[test]
    fn all_three_fields_at_once() {
        let update = parse("red background, wear a white polo");
        assert_eq!(update.background_color.as_deref(), Some("red"));
        assert_eq!(update.clothing_type.as_deref(), Some("polo shirt"));
        assert_eq!(update.clothing_color.as_deref(), Some("white"));
    }

    #[test]
    fn unknown_color_passes_through() {
        assert_eq!(
            parse("change background to teal").background_color.as_deref(),
            Some("teal")
        );
    }

    #[test]
    fn extractions_are_independent() {
        // A clothing phrase alone must not invent a background.
        let update = parse("black t-shirt");
        assert_eq!(update.clothing_color.as_deref(), Some("black"));
        assert_eq!(update.background_color, None);
    }
}
