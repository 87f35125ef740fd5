//! Fixed lexicons mapping user-supplied tokens to canonical parameter
//! values.
//!
//! Color normalization passes unknown tokens through lower-cased, so the
//! generation prompt can still try names outside the lexicon. Clothing
//! nouns form a closed set: a token outside it is never a garment.

/// Color spelling variants and near-synonyms → canonical color names.
const COLOR_ALIASES: &[(&str, &str)] = &[
    ("grey", "gray"),
    ("charcoal", "gray"),
    ("silver", "gray"),
    ("navy", "blue"),
    ("crimson", "red"),
    ("scarlet", "red"),
    ("maroon", "red"),
    ("violet", "purple"),
    ("lilac", "purple"),
    ("tangerine", "orange"),
    ("cream", "white"),
    ("ivory", "white"),
    ("golden", "yellow"),
];

/// Clothing nouns → canonical garment categories.
const CLOTHING_TYPES: &[(&str, &str)] = &[
    ("shirt", "formal shirt"),
    ("t-shirt", "t-shirt"),
    ("tshirt", "t-shirt"),
    ("tee", "t-shirt"),
    ("polo", "polo shirt"),
    ("suit", "suit jacket"),
    ("jacket", "suit jacket"),
    ("blazer", "blazer"),
];

/// Lower-case and canonicalize a color token. Unknown tokens pass
/// through unchanged.
pub fn normalize_color(token: &str) -> String {
    let normalized = token.trim().to_ascii_lowercase();
    COLOR_ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or(normalized)
}

/// Map a clothing noun to its canonical garment category. Returns `None`
/// for tokens outside the closed set.
pub fn normalize_clothing_type(token: &str) -> Option<String> {
    let normalized = token.trim().to_ascii_lowercase();
    CLOTHING_TYPES
        .iter()
        .find(|(noun, _)| *noun == normalized)
        .map(|(_, canonical)| (*canonical).to_string())
}

/// True when the token is a known clothing noun. Used to reject garment
/// words captured in a color position ("polo shirt" must not set the
/// clothing color to "polo").
pub fn is_clothing_noun(token: &str) -> bool {
    let normalized = token.trim().to_ascii_lowercase();
    CLOTHING_TYPES.iter().any(|(noun, _)| *noun == normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_aliases_map_to_canonical_names() {
        assert_eq!(normalize_color("grey"), "gray");
        assert_eq!(normalize_color("Navy"), "blue");
        assert_eq!(normalize_color("CRIMSON"), "red");
    }

    #[test]
    fn unknown_colors_pass_through_lower_cased() {
        assert_eq!(normalize_color("Teal"), "teal");
        assert_eq!(normalize_color(" burgundy "), "burgundy");
    }

    #[test]
    fn clothing_types_are_a_closed_set() {
        assert_eq!(normalize_clothing_type("shirt").unwrap(), "formal shirt");
        assert_eq!(normalize_clothing_type("Tee").unwrap(), "t-shirt");
        assert_eq!(normalize_clothing_type("suit").unwrap(), "suit jacket");
        assert!(normalize_clothing_type("background").is_none());
        assert!(normalize_clothing_type("red").is_none());
    }

    #[test]
    fn clothing_noun_check() {
        assert!(is_clothing_noun("polo"));
        assert!(is_clothing_noun("T-Shirt"));
        assert!(!is_clothing_noun("black"));
    }
}
