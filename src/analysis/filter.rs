use crate::analysis::token::Token;

/// One stage of the analysis pipeline after tokenizing.
pub trait TokenFilter: Send + Sync {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token>;

    fn name(&self) -> &str;
}
