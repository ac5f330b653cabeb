use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;
use crate::analysis::token::Token;

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;

    fn name(&self) -> &str;
}

/// Splits into words after folding accents (NFD) and dropping every
/// character that is not an ASCII letter, so "Don't" and "café" become
/// "Dont" and "cafe".
#[derive(Debug, Clone, Default)]
pub struct StandardTokenizer;

impl StandardTokenizer {
    pub fn clean(text: &str) -> String {
        text.nfd()
            .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
            .collect()
    }
}

impl Tokenizer for StandardTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        Self::clean(text)
            .unicode_words()
            .zip(1u32..)
            .map(|(word, position)| Token::new(word.to_string(), position))
            .collect()
    }

    fn name(&self) -> &str {
        "standard"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_digits() {
        let tokens = StandardTokenizer.tokenize("Don't stop, café-au-lait 42 times!");
        let words: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(words, vec!["Dont", "stop", "cafeaulait", "times"]);
        assert_eq!(tokens.last().map(|t| t.position), Some(4));
    }

    #[test]
    fn blank_text_has_no_tokens() {
        assert!(StandardTokenizer.tokenize("  123 ... \t").is_empty());
    }
}
