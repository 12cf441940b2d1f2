//! Champion lists: each term's postings cut down to the K highest weights.

use crate::error::{Error, Result};
use crate::index::{InvertedIndex, PostingsList};
use std::collections::BTreeMap;

/// Per-term top-K postings, sorted by descending weight.
///
/// Document frequencies and the corpus size are those of the full index, so
/// idf values are unchanged when scoring against champion lists.
#[derive(Debug, Clone, PartialEq)]
pub struct ChampionIndex {
    index: InvertedIndex,
    threshold: usize,
}

impl ChampionIndex {
    /// The champion lists as an index that any scorer can walk.
    pub fn as_index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }
}

pub struct ChampionListBuilder;

impl ChampionListBuilder {
    /// Keep the `threshold` highest-weight postings per term. Equal weights
    /// keep their order from the full index (ascending doc id).
    pub fn build(index: &InvertedIndex, threshold: usize) -> Result<ChampionIndex> {
        if threshold == 0 {
            return Err(Error::InvalidChampionThreshold(threshold));
        }
        let lists: BTreeMap<String, PostingsList> = index
            .iter()
            .map(|(term, postings)| {
                let mut champs = postings.to_vec();
                champs.sort_by(|a, b| b.weight.total_cmp(&a.weight));
                champs.truncate(threshold);
                (term.to_string(), champs)
            })
            .collect();
        tracing::debug!(threshold, num_terms = lists.len(), "built champion index");
        let index = InvertedIndex::from_parts(lists, index.doc_frequencies().clone(), index.num_docs());
        Ok(ChampionIndex { index, threshold })
    }
}
