//! Untrusted caption text sanitization
//!
//! ASS dialogue text treats `{`, `}` and `\` as markup: a caller-controlled
//! `{\...}` block injects override tags into the rendered track. Each
//! reserved character is replaced one-for-one with a visually similar
//! full-width substitute, so the output carries no raw reserved characters
//! while keeping its character count (downstream timing math stays valid).

/// Reserved-character substitution table
///
/// The substitute set is a parameter; the defaults are the full-width
/// equivalents `｛`, `｝`, `＼`.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    substitutions: Vec<(char, char)>,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self {
            substitutions: vec![('{', '｛'), ('}', '｝'), ('\\', '＼')],
        }
    }
}

impl Sanitizer {
    /// Build a sanitizer with a custom substitution table
    pub fn with_substitutions(substitutions: Vec<(char, char)>) -> Self {
        Self { substitutions }
    }

    /// Replace every reserved character with its substitute.
    ///
    /// Total over all inputs (empty in, empty out), idempotent, and
    /// character-count preserving: each substitution is one char for one
    /// char and nothing is dropped or merged.
    pub fn sanitize(&self, text: &str) -> String {
        text.chars()
            .map(|c| {
                self.substitutions
                    .iter()
                    .find(|(reserved, _)| *reserved == c)
                    .map(|(_, substitute)| *substitute)
                    .unwrap_or(c)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_reserved_characters() {
        let sanitizer = Sanitizer::default();
        let out = sanitizer.sanitize(r"Hello {\b1}World{\b0}");

        assert!(!out.contains('{'));
        assert!(!out.contains('}'));
        assert!(!out.contains('\\'));
        assert!(out.contains('｛'));
        assert!(out.contains('＼'));
    }

    #[test]
    fn test_preserves_character_count() {
        let sanitizer = Sanitizer::default();
        for input in [r"Hello {\b1}World{\b0}", "", "plain text", r"\\\\{{}}"] {
            let out = sanitizer.sanitize(input);
            assert_eq!(out.chars().count(), input.chars().count());
        }
    }

    #[test]
    fn test_idempotent() {
        let sanitizer = Sanitizer::default();
        for input in [r"{\an8}top text", "already clean", "｛＼｝"] {
            let once = sanitizer.sanitize(input);
            let twice = sanitizer.sanitize(&once);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_passes_through_non_reserved_characters() {
        let sanitizer = Sanitizer::default();
        let input = "émoji 🎬 and [brackets] pass through";
        assert_eq!(sanitizer.sanitize(input), input);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(Sanitizer::default().sanitize(""), "");
    }

    #[test]
    fn test_custom_substitution_table() {
        let sanitizer = Sanitizer::with_substitutions(vec![('{', '('), ('}', ')')]);
        assert_eq!(sanitizer.sanitize("{x}"), "(x)");
        // Backslash not in the custom table, so it passes through.
        assert_eq!(sanitizer.sanitize(r"\n"), r"\n");
    }
}
