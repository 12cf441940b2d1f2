use crate::index::{idf, DocumentFrequencies};
use std::collections::BTreeMap;

/// term -> query weight. Terms iterate in sorted order, which fixes the order
/// in which scorers accumulate contributions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryVector(BTreeMap<String, f64>);

impl QueryVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, term: impl Into<String>, weight: f64) {
        self.0.insert(term.into(), weight);
    }

    pub fn get(&self, term: &str) -> Option<f64> {
        self.0.get(term).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(t, w)| (t.as_str(), *w))
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for QueryVector {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(t, w)| (t.into(), w)).collect())
    }
}

pub struct QueryVectorizer;

impl QueryVectorizer {
    /// Distinct query terms weighted by idf. Terms the corpus never saw are dropped.
    pub fn vectorize<S: AsRef<str>>(tokens: &[S], df: &DocumentFrequencies, num_docs: usize) -> QueryVector {
        let mut vector = QueryVector::new();
        for token in tokens {
            let term = token.as_ref();
            let n = df.get(term);
            if n == 0 {
                continue;
            }
            vector.insert(term, idf(num_docs, n));
        }
        vector
    }
}
