//! Ranked inverted index: document frequencies and tf-idf weighted postings.

use crate::error::{Error, Result};
use crate::store::{ensure_addressable, DocumentStore};
use crate::DocId;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub weight: f64, // (1 + log10 tf) * idf
    /// Raw count of the term in the document.
    pub tf: u32,
}

pub type PostingsList = Vec<Posting>;

/// Inverse document frequency, log10(n / df). Zero when either count is zero.
pub fn idf(num_docs: usize, df: u32) -> f64 {
    if num_docs == 0 || df == 0 {
        return 0.0;
    }
    (num_docs as f64 / df as f64).log10()
}

/// Log-scaled term frequency. A count of 1 gives exactly 1.
fn tf_weight(count: u32) -> f64 {
    1.0 + (count as f64).log10()
}

/// term -> number of documents containing it. Every stored count is > 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentFrequencies(BTreeMap<String, u32>);

impl DocumentFrequencies {
    /// Count, for every distinct term, the documents it occurs in.
    pub fn count<D: AsRef<[String]>>(docs: &[D]) -> Self {
        let mut df: BTreeMap<String, u32> = BTreeMap::new();
        for doc in docs {
            let distinct: HashSet<&str> = doc.as_ref().iter().map(String::as_str).collect();
            for term in distinct {
                match df.get_mut(term) {
                    Some(n) => *n += 1,
                    None => {
                        df.insert(term.to_string(), 1);
                    }
                }
            }
        }
        Self(df)
    }

    /// Document frequency of `term`, 0 if it never occurs.
    pub fn get(&self, term: &str) -> u32 {
        self.0.get(term).copied().unwrap_or(0)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.0.contains_key(term)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(t, n)| (t.as_str(), *n))
    }
}

impl FromIterator<(String, u32)> for DocumentFrequencies {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().filter(|(_, n)| *n > 0).collect())
    }
}

/// Immutable term -> postings snapshot. A term is present iff it occurs in at
/// least one document, and its postings are ordered by ascending doc id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvertedIndex {
    postings: BTreeMap<String, PostingsList>,
    df: DocumentFrequencies,
    num_docs: usize,
}

impl InvertedIndex {
    /// Assemble an index from precomputed parts. Empty postings lists are dropped.
    pub fn from_parts(postings: BTreeMap<String, PostingsList>, df: DocumentFrequencies, num_docs: usize) -> Self {
        let postings = postings.into_iter().filter(|(_, p)| !p.is_empty()).collect();
        Self { postings, df, num_docs }
    }

    pub fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    pub fn doc_frequencies(&self) -> &DocumentFrequencies {
        &self.df
    }

    pub fn df(&self, term: &str) -> u32 {
        self.df.get(term)
    }

    pub fn idf(&self, term: &str) -> f64 {
        idf(self.num_docs, self.df(term))
    }

    pub fn num_docs(&self) -> usize {
        self.num_docs
    }

    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Posting])> {
        self.postings.iter().map(|(t, p)| (t.as_str(), p.as_slice()))
    }
}

/// Two-pass builder: document frequencies first, then tf-idf weighting.
pub struct InvertedIndexBuilder;

impl InvertedIndexBuilder {
    pub fn from_store(store: &DocumentStore) -> Result<InvertedIndex> {
        Self::build(&store.token_lists())
    }

    /// Build over tokenized documents; document `i` gets id `i`.
    pub fn build<D: AsRef<[String]> + Sync>(docs: &[D]) -> Result<InvertedIndex> {
        let start = Instant::now();
        let n = docs.len();
        if n == 0 {
            return Err(Error::EmptyCorpus);
        }
        ensure_addressable(n)?;

        let df = DocumentFrequencies::count(docs);

        // Each document's counts are independent; weighting runs per document
        // and the results are appended in doc id order.
        let per_doc: Vec<Vec<(&str, Posting)>> = docs
            .par_iter()
            .enumerate()
            .map(|(i, doc)| {
                let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
                for term in doc.as_ref() {
                    let tf = counts.entry(term.as_str()).or_insert(0);
                    *tf = tf.saturating_add(1);
                }
                counts
                    .into_iter()
                    .map(|(term, tf)| {
                        let weight = tf_weight(tf) * idf(n, df.get(term));
                        // in range: checked by ensure_addressable
                        (term, Posting { doc_id: i as DocId, weight, tf })
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        let mut postings: BTreeMap<String, PostingsList> = BTreeMap::new();
        for doc_postings in per_doc {
            for (term, posting) in doc_postings {
                match postings.get_mut(term) {
                    Some(list) => list.push(posting),
                    None => {
                        postings.insert(term.to_string(), vec![posting]);
                    }
                }
            }
        }

        let index = InvertedIndex { postings, df, num_docs: n };
        tracing::info!(
            num_docs = n,
            num_terms = index.num_terms(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "built inverted index"
        );
        Ok(index)
    }
}
