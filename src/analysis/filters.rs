use rust_stemmers::{Algorithm, Stemmer};
use crate::analysis::filter::TokenFilter;
use crate::analysis::token::Token;

/// Lower-cases tokens in place. Tokens are ASCII after cleaning.
pub struct LowercaseFilter;

impl TokenFilter for LowercaseFilter {
    fn filter(&self, mut tokens: Vec<Token>) -> Vec<Token> {
        for token in &mut tokens {
            token.text.make_ascii_lowercase();
        }
        tokens
    }

    fn name(&self) -> &str {
        "lowercase"
    }
}

/// Reduces tokens to their Snowball stem, keeping positions untouched.
pub struct StemmerFilter {
    stemmer: Stemmer,
    name: String,
}

impl StemmerFilter {
    pub fn new(algorithm: Algorithm) -> Self {
        StemmerFilter {
            stemmer: Stemmer::create(algorithm),
            name: format!("stemmer({:?})", algorithm),
        }
    }
}

impl TokenFilter for StemmerFilter {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens
            .into_iter()
            .map(|token| {
                let stem = self.stemmer.stem(&token.text).into_owned();
                Token::new(stem, token.position)
            })
            .filter(|token| !token.text.is_empty())
            .collect()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
