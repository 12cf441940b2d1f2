use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"\w+(?:[-']\w+)*").expect("valid regex");
    static ref RUN_RE: Regex = Regex::new(r"[\w']+").expect("valid regex");
    static ref DO_RE: Regex = Regex::new(r"^(did|does)$").expect("valid regex");
}

const PUNCTUATION: &[char] = &[',', '.', '?', '!', '(', ')', ';', ':', '\'', '-', '"', '`'];

/// Turns text into an ordered sequence of lowercase terms. Duplicates are kept.
pub trait Tokenizer: fmt::Debug + Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Word tokenizer for ranked search: keeps hyphens and apostrophes inside words.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer {
    /// Collapse "did" and "does" into "do".
    pub stem: bool,
}

impl WordTokenizer {
    pub fn stemming() -> Self {
        Self { stem: true }
    }
}

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let tokens = tokenize(text);
        if self.stem { stem(tokens) } else { tokens }
    }
}

/// Tokenizer for boolean search: punctuation becomes whitespace, so "what's" splits in two.
#[derive(Debug, Clone, Copy, Default)]
pub struct PunctuationTokenizer;

impl Tokenizer for PunctuationTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let cleaned: String = text
            .chars()
            .map(|c| if PUNCTUATION.contains(&c) { ' ' } else { c })
            .collect::<String>()
            .to_lowercase();
        RUN_RE.find_iter(&cleaned).map(|m| m.as_str().to_string()).collect()
    }
}

/// Lowercased words; hyphens and apostrophes inside a word are retained.
pub fn tokenize(text: &str) -> Vec<String> {
    WORD_RE.find_iter(text).map(|m| m.as_str().to_lowercase()).collect()
}

/// The only stemming rule: exactly "did" or "does" becomes "do".
pub fn stem(tokens: Vec<String>) -> Vec<String> {
    tokens
        .into_iter()
        .map(|t| if DO_RE.is_match(&t) { "do".to_string() } else { t })
        .collect()
}
