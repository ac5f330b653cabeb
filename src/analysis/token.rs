/// A normalized word and where it sits in the analyzed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// 1-based ordinal of the word within the analyzed text.
    pub position: u32,
}

impl Token {
    pub fn new(text: String, position: u32) -> Self {
        Token { text, position }
    }
}
