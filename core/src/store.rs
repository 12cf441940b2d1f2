use crate::error::{Error, Result};
use crate::tokenizer::{Tokenizer, WordTokenizer};
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub text: String,
    /// Ordered tokens, duplicates kept.
    pub tokens: Vec<String>,
}

/// Fails when `n` documents cannot all be given a distinct [`DocId`].
pub(crate) fn ensure_addressable(n: usize) -> Result<()> {
    match n.checked_sub(1) {
        Some(last) if DocId::try_from(last).is_err() => Err(Error::CorpusTooLarge(n)),
        _ => Ok(()),
    }
}

/// Raw documents indexed by sequential id. The id of a document is its
/// position in ingestion order.
///
/// The store remembers the tokenizer its documents went through; engines
/// built from it tokenize queries the same way.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    docs: Vec<Document>,
    tokenizer: Arc<dyn Tokenizer>,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::with_tokenizer(Arc::new(WordTokenizer::default()))
    }
}

impl DocumentStore {
    /// Empty store using [`WordTokenizer`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokenizer(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self { docs: Vec::new(), tokenizer }
    }

    /// Tokenize every text and assign ids 0, 1, 2, ... in iteration order.
    pub fn from_texts<I, S, T>(texts: I, tokenizer: T) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        T: Tokenizer + 'static,
    {
        let mut store = Self::with_tokenizer(Arc::new(tokenizer));
        for text in texts {
            store.push(text.into())?;
        }
        Ok(store)
    }

    /// Build a store from documents already split by `tokenizer`; the raw
    /// text is the tokens joined by spaces.
    pub fn from_tokens<T: Tokenizer + 'static>(token_docs: Vec<Vec<String>>, tokenizer: T) -> Result<Self> {
        ensure_addressable(token_docs.len())?;
        let docs = token_docs
            .into_iter()
            .enumerate()
            .map(|(i, tokens)| Document { id: i as DocId, text: tokens.join(" "), tokens })
            .collect();
        Ok(Self { docs, tokenizer: Arc::new(tokenizer) })
    }

    pub fn push(&mut self, text: String) -> Result<DocId> {
        let id = DocId::try_from(self.docs.len()).map_err(|_| Error::CorpusTooLarge(self.docs.len() + 1))?;
        let tokens = self.tokenizer.tokenize(&text);
        self.docs.push(Document { id, text, tokens });
        Ok(id)
    }

    /// The tokenizer documents were ingested with.
    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }

    pub fn get(&self, id: DocId) -> Option<&Document> {
        self.docs.get(id as usize)
    }

    pub fn text(&self, id: DocId) -> Option<&str> {
        self.get(id).map(|d| d.text.as_str())
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.docs.iter()
    }

    pub fn token_lists(&self) -> Vec<&[String]> {
        self.docs.iter().map(|d| d.tokens.as_slice()).collect()
    }

    /// Raw token count per document, indexed by doc id. Saturates at `u32::MAX`.
    pub fn token_counts(&self) -> Vec<u32> {
        self.docs.iter().map(|d| u32::try_from(d.tokens.len()).unwrap_or(u32::MAX)).collect()
    }

    /// Mean raw token count over the corpus; 0 for an empty store.
    pub fn average_token_count(&self) -> f64 {
        if self.docs.is_empty() {
            return 0.0;
        }
        let total: usize = self.docs.iter().map(|d| d.tokens.len()).sum();
        total as f64 / self.docs.len() as f64
    }
}
