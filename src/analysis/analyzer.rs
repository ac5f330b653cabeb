use std::collections::BTreeSet;
use std::fmt;
use rust_stemmers::Algorithm;
use crate::analysis::filter::TokenFilter;
use crate::analysis::filters::{LowercaseFilter, StemmerFilter};
use crate::analysis::token::Token;
use crate::analysis::tokenizer::{StandardTokenizer, Tokenizer};

/// Text analysis pipeline
pub struct Analyzer {
    pub tokenizer: Box<dyn Tokenizer>,
    pub filters: Vec<Box<dyn TokenFilter>>,
    pub name: String,
}

impl Analyzer {
    pub fn new(name: String, tokenizer: Box<dyn Tokenizer>) -> Self {
        Analyzer {
            tokenizer,
            filters: Vec::new(),
            name,
        }
    }

    pub fn add_filter(mut self, filter: Box<dyn TokenFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn analyze(&self, text: &str) -> Vec<Token> {
        let mut tokens = self.tokenizer.tokenize(text);

        for filter in &self.filters {
            tokens = filter.filter(tokens);
        }

        tokens
    }

    /// Normalized terms of `text` in document order.
    pub fn stems(&self, text: &str) -> Vec<String> {
        self.analyze(text).into_iter().map(|token| token.text).collect()
    }

    /// Sorted, de-duplicated terms of `text`.
    pub fn unique_stems(&self, text: &str) -> BTreeSet<String> {
        self.analyze(text).into_iter().map(|token| token.text).collect()
    }

    /// Lower-cased Snowball English stems, no stop words.
    pub fn standard_english() -> Self {
        Analyzer::new("standard_english".to_string(),
                      Box::new(StandardTokenizer))
            .add_filter(Box::new(LowercaseFilter))
            .add_filter(Box::new(StemmerFilter::new(Algorithm::English)))
    }
}

impl fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filters: Vec<&str> = self.filters.iter().map(|filter| filter.name()).collect();
        f.debug_struct("Analyzer")
            .field("name", &self.name)
            .field("tokenizer", &self.tokenizer.name())
            .field("filters", &filters)
            .finish()
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Analyzer::standard_english()
    }
}
