//! Boolean AND retrieval over unweighted, sorted postings.

use crate::error::Result;
use crate::store::{ensure_addressable, DocumentStore};
use crate::tokenizer::{PunctuationTokenizer, Tokenizer};
use crate::DocId;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// term -> ascending, duplicate-free doc ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BooleanIndex(BTreeMap<String, Vec<DocId>>);

impl BooleanIndex {
    pub fn postings(&self, term: &str) -> Option<&[DocId]> {
        self.0.get(term).map(Vec::as_slice)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.0.contains_key(term)
    }

    pub fn num_terms(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[DocId])> {
        self.0.iter().map(|(t, ids)| (t.as_str(), ids.as_slice()))
    }
}

/// Collects arbitrary lists, restoring the sorted, duplicate-free form and
/// dropping empty lists.
impl FromIterator<(String, Vec<DocId>)> for BooleanIndex {
    fn from_iter<I: IntoIterator<Item = (String, Vec<DocId>)>>(iter: I) -> Self {
        let map = iter
            .into_iter()
            .filter_map(|(term, mut ids)| {
                ids.sort_unstable();
                ids.dedup();
                (!ids.is_empty()).then_some((term, ids))
            })
            .collect();
        Self(map)
    }
}

pub struct BooleanIndexBuilder;

impl BooleanIndexBuilder {
    pub fn from_store(store: &DocumentStore) -> Result<BooleanIndex> {
        Self::build(&store.token_lists())
    }

    /// Document `i` gets id `i`. Documents are visited in id order, so each
    /// list only ever needs its last entry checked for duplicates.
    pub fn build<D: AsRef<[String]>>(docs: &[D]) -> Result<BooleanIndex> {
        ensure_addressable(docs.len())?;
        let mut map: BTreeMap<String, Vec<DocId>> = BTreeMap::new();
        for (i, doc) in docs.iter().enumerate() {
            // in range: checked by ensure_addressable
            let doc_id = i as DocId;
            for term in doc.as_ref() {
                match map.get_mut(term.as_str()) {
                    Some(ids) => {
                        if ids.last() != Some(&doc_id) {
                            ids.push(doc_id);
                        }
                    }
                    None => {
                        map.insert(term.clone(), vec![doc_id]);
                    }
                }
            }
        }
        tracing::info!(num_docs = docs.len(), num_terms = map.len(), "built boolean index");
        Ok(BooleanIndex(map))
    }
}

/// Intersection of two ascending, duplicate-free lists in one synchronized pass.
pub fn intersect(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] < b[j] {
            i += 1;
        } else if a[i] > b[j] {
            j += 1;
        } else {
            out.push(a[i]);
            i += 1;
            j += 1;
        }
    }
    out
}

/// Order terms by ascending postings length; equal lengths keep their query order.
/// Terms missing from the index sort first, as empty lists.
pub fn sort_by_postings_len<'a>(terms: &[&'a str], index: &BooleanIndex) -> Vec<&'a str> {
    let mut sorted = terms.to_vec();
    sorted.sort_by_key(|t| index.postings(t).map_or(0, <[DocId]>::len));
    sorted
}

/// Strict conjunction: a document matches only if it contains every query term.
pub struct BooleanSearchEngine {
    index: BooleanIndex,
    tokenizer: Arc<dyn Tokenizer>,
}

impl BooleanSearchEngine {
    /// Queries go through the tokenizer the store was ingested with.
    pub fn build(store: &DocumentStore) -> Result<Self> {
        let index = BooleanIndexBuilder::from_store(store)?;
        Ok(Self::with_tokenizer(index, Arc::clone(store.tokenizer())))
    }

    /// Wrap a prebuilt index; queries use [`PunctuationTokenizer`].
    pub fn from_index(index: BooleanIndex) -> Self {
        Self::with_tokenizer(index, Arc::new(PunctuationTokenizer))
    }

    pub fn with_tokenizer(index: BooleanIndex, tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self { index, tokenizer }
    }

    pub fn index(&self) -> &BooleanIndex {
        &self.index
    }

    /// Matching doc ids, ascending. Empty if any term is unknown or the query has no terms.
    pub fn search(&self, query: &str) -> Vec<DocId> {
        let tokens = self.tokenizer.tokenize(query);
        let mut seen = HashSet::new();
        let terms: Vec<&str> = tokens.iter().map(String::as_str).filter(|t| seen.insert(*t)).collect();
        if terms.is_empty() {
            return Vec::new();
        }
        if let Some(missing) = terms.iter().find(|t| !self.index.contains(t)) {
            tracing::debug!(query, term = *missing, "term not indexed; conjunction is empty");
            return Vec::new();
        }

        let ordered = sort_by_postings_len(&terms, &self.index);
        let mut lists = ordered.iter().filter_map(|t| self.index.postings(t));
        let mut result = match lists.next() {
            Some(first) => first.to_vec(),
            None => return Vec::new(),
        };
        for list in lists {
            if result.is_empty() {
                break;
            }
            result = intersect(&result, list);
        }
        tracing::debug!(query, terms = terms.len(), hits = result.len(), "boolean search");
        result
    }
}
