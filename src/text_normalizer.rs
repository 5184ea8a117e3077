use crate::models::FieldValue;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// Splits text into words on Unicode word boundaries.
///
/// This is the one tokenizer shared by normalization and phrase search, so the
/// words of a normalized record always line up with the words the search
/// engine sees when it re-tokenizes the text around a match.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.unicode_words().collect()
}

pub struct TextNormalizer {
    punctuation_pattern: Regex,
}

impl TextNormalizer {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(TextNormalizer {
            // POSIX classes are ASCII-only: exactly !"#$%&'()*+,-./:;<=>?@[\]^_`{|}~
            punctuation_pattern: Regex::new(r"[[:punct:]]")?,
        })
    }

    /// Normalizes a raw cell. Missing and numeric cells are not searchable.
    pub fn normalize(&self, raw: &FieldValue) -> Option<String> {
        match raw {
            FieldValue::Text(text) => Some(self.normalize_text(text)),
            FieldValue::Number(_) | FieldValue::Missing => None,
        }
    }

    pub fn normalize_text(&self, text: &str) -> String {
        let stripped = self.punctuation_pattern.replace_all(text, "");
        let lowered = stripped.to_lowercase();
        tokenize(&lowered).join(" ")
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new().expect("Failed to create TextNormalizer")
    }
}
