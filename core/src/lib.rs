//! In-memory text retrieval: tf-idf inverted index, champion lists, ranked
//! search under cosine / RSV / BM25 scoring, and a boolean AND engine.

pub mod boolean;
pub mod champion;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod lengths;
pub mod query;
pub mod scoring;
pub mod store;
pub mod tokenizer;

pub use boolean::{intersect, BooleanIndex, BooleanIndexBuilder, BooleanSearchEngine};
pub use champion::{ChampionIndex, ChampionListBuilder};
pub use config::{Bm25Params, EngineConfig, ScorerKind};
pub use engine::{EngineHandle, RankedSearchEngine, SearchHit};
pub use error::{Error, Result};
pub use index::{idf, DocumentFrequencies, InvertedIndex, InvertedIndexBuilder, Posting, PostingsList};
pub use lengths::{DocumentLengths, LengthNormalizer};
pub use query::{QueryVector, QueryVectorizer};
pub use scoring::{jaccard, rank, Bm25, DocStats, Scorer};
pub use store::{Document, DocumentStore};
pub use tokenizer::{PunctuationTokenizer, Tokenizer, WordTokenizer};

/// Sequential document id, assigned by ingestion order starting at 0.
pub type DocId = u32;
