use crate::index::InvertedIndex;
use crate::DocId;

/// Euclidean norm of each document's tf-idf vector, indexed by doc id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentLengths(Vec<f64>);

impl DocumentLengths {
    /// Length of `doc_id`; 0 for documents without any weighted posting.
    pub fn get(&self, doc_id: DocId) -> f64 {
        self.0.get(doc_id as usize).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f64>> for DocumentLengths {
    fn from(lengths: Vec<f64>) -> Self {
        Self(lengths)
    }
}

pub struct LengthNormalizer;

impl LengthNormalizer {
    /// sqrt(sum of squared weights) per document, over every postings list.
    pub fn compute(index: &InvertedIndex) -> DocumentLengths {
        let mut sums = vec![0.0f64; index.num_docs()];
        for (_, postings) in index.iter() {
            for p in postings {
                let slot = p.doc_id as usize;
                if slot >= sums.len() {
                    sums.resize(slot + 1, 0.0);
                }
                sums[slot] += p.weight * p.weight;
            }
        }
        DocumentLengths(sums.into_iter().map(f64::sqrt).collect())
    }
}
