//! Scoring models for ranked retrieval.
//!
//! All three models share one contract: given a query vector, an index and
//! per-document statistics, produce `doc_id -> score`. A document missing
//! from the map has zero relevance. [`rank`] turns the map into the final
//! ordering: score descending, then doc id ascending, so equal scores always
//! come back in the same order.

use crate::error::{Error, Result};
use crate::index::InvertedIndex;
use crate::lengths::DocumentLengths;
use crate::query::QueryVector;
use crate::DocId;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Corpus statistics the scorers read. Computed once per index build.
#[derive(Debug, Clone, Copy)]
pub struct DocStats<'a> {
    /// tf-idf vector norms, for cosine.
    pub lengths: &'a DocumentLengths,
    /// Raw token count per doc id, for BM25.
    pub token_counts: &'a [u32],
    /// Mean raw token count over the corpus, for BM25.
    pub avg_token_count: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scorer {
    /// Dot product of query and document weights over the document norm only.
    Cosine,
    /// Sum of idf over query terms present in the document.
    Rsv,
    /// Okapi BM25; parameters are checked when the [`Bm25`] value is built.
    Bm25(Bm25),
}

/// Validated BM25 parameters: `k` finite and >= 0, `b` in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25 {
    k: f64,
    b: f64,
}

impl Bm25 {
    pub fn new(k: f64, b: f64) -> Result<Self> {
        if !k.is_finite() || k < 0.0 {
            return Err(Error::InvalidBm25K(k));
        }
        if !b.is_finite() || !(0.0..=1.0).contains(&b) {
            return Err(Error::InvalidBm25B(b));
        }
        Ok(Self { k, b })
    }

    /// Term-frequency saturation.
    pub fn k(&self) -> f64 {
        self.k
    }

    /// Length normalization strength.
    pub fn b(&self) -> f64 {
        self.b
    }
}

impl Scorer {
    pub fn bm25(k: f64, b: f64) -> Result<Self> {
        Bm25::new(k, b).map(Scorer::Bm25)
    }

    pub fn score(&self, query: &QueryVector, index: &InvertedIndex, stats: &DocStats<'_>) -> HashMap<DocId, f64> {
        if index.num_docs() == 0 || query.is_empty() {
            return HashMap::new();
        }
        match *self {
            Scorer::Cosine => cosine(query, index, stats.lengths),
            Scorer::Rsv => rsv(query, index),
            Scorer::Bm25(params) => bm25(query, index, stats, params),
        }
    }
}

impl fmt::Display for Scorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scorer::Cosine => write!(f, "Cosine"),
            Scorer::Rsv => write!(f, "RSV"),
            Scorer::Bm25(p) => write!(f, "BM25 k={} b={:.2}", p.k, p.b),
        }
    }
}

fn cosine(query: &QueryVector, index: &InvertedIndex, lengths: &DocumentLengths) -> HashMap<DocId, f64> {
    let mut acc: HashMap<DocId, f64> = HashMap::new();
    for (term, qw) in query.iter() {
        let Some(postings) = index.postings(term) else { continue };
        for p in postings {
            *acc.entry(p.doc_id).or_insert(0.0) += qw * p.weight;
        }
    }
    for (doc_id, score) in acc.iter_mut() {
        let len = lengths.get(*doc_id);
        *score = if len > 0.0 { *score / len } else { 0.0 };
    }
    acc
}

fn rsv(query: &QueryVector, index: &InvertedIndex) -> HashMap<DocId, f64> {
    let mut acc: HashMap<DocId, f64> = HashMap::new();
    for term in query.terms() {
        let Some(postings) = index.postings(term) else { continue };
        let idf = index.idf(term);
        for p in postings {
            *acc.entry(p.doc_id).or_insert(0.0) += idf;
        }
    }
    acc
}

fn bm25(query: &QueryVector, index: &InvertedIndex, stats: &DocStats<'_>, params: Bm25) -> HashMap<DocId, f64> {
    let Bm25 { k, b } = params;
    let mut acc: HashMap<DocId, f64> = HashMap::new();
    for term in query.terms() {
        let Some(postings) = index.postings(term) else { continue };
        let idf = index.idf(term);
        for p in postings {
            let tf = p.tf as f64;
            let dl = stats.token_counts.get(p.doc_id as usize).copied().unwrap_or(0) as f64;
            let rel_len = if stats.avg_token_count > 0.0 { dl / stats.avg_token_count } else { 0.0 };
            let denom = k * (1.0 - b + b * rel_len) + tf;
            let contrib = if denom > 0.0 { idf * (k + 1.0) * tf / denom } else { 0.0 };
            let contrib = if contrib.is_finite() { contrib } else { 0.0 };
            *acc.entry(p.doc_id).or_insert(0.0) += contrib;
        }
    }
    acc
}

/// Order scores by descending score; equal scores by ascending doc id.
pub fn rank(scores: HashMap<DocId, f64>) -> Vec<(DocId, f64)> {
    let mut ranked: Vec<(DocId, f64)> = scores.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

/// |A ∩ B| / |A ∪ B| over the distinct terms of two token sequences; 0 when both are empty.
pub fn jaccard<A: AsRef<str>, B: AsRef<str>>(a: &[A], b: &[B]) -> f64 {
    let a: HashSet<&str> = a.iter().map(AsRef::as_ref).collect();
    let b: HashSet<&str> = b.iter().map(AsRef::as_ref).collect();
    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}
