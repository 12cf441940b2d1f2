//! Ranked search: tokenize, vectorize, score, rank.

use crate::champion::{ChampionIndex, ChampionListBuilder};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::index::{InvertedIndex, InvertedIndexBuilder};
use crate::lengths::{DocumentLengths, LengthNormalizer};
use crate::query::{QueryVector, QueryVectorizer};
use crate::scoring::{rank, DocStats, Scorer};
use crate::store::DocumentStore;
use crate::tokenizer::Tokenizer;
use crate::DocId;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f64,
}

/// An immutable snapshot of every structure ranked search needs.
///
/// Built once from a [`DocumentStore`]; queries only read it, so one engine
/// can serve any number of threads.
pub struct RankedSearchEngine {
    config: EngineConfig,
    scorer: Scorer,
    index: InvertedIndex,
    champions: ChampionIndex,
    lengths: DocumentLengths,
    token_counts: Vec<u32>,
    avg_token_count: f64,
    tokenizer: Arc<dyn Tokenizer>,
}

impl RankedSearchEngine {
    /// Queries go through the tokenizer the store was ingested with.
    pub fn build(store: &DocumentStore, config: EngineConfig) -> Result<Self> {
        let scorer = config.scorer()?;
        let start = Instant::now();
        let index = InvertedIndexBuilder::from_store(store)?;
        let champions = ChampionListBuilder::build(&index, config.champion_threshold)?;
        let lengths = LengthNormalizer::compute(&index);
        tracing::info!(
            num_docs = index.num_docs(),
            num_terms = index.num_terms(),
            %scorer,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "ranked engine ready"
        );
        Ok(Self {
            config,
            scorer,
            index,
            champions,
            lengths,
            token_counts: store.token_counts(),
            avg_token_count: store.average_token_count(),
            tokenizer: Arc::clone(store.tokenizer()),
        })
    }

    /// Search with the configured scorer.
    pub fn search(&self, query: &str, use_champions: bool) -> Vec<SearchHit> {
        self.search_with(query, self.scorer, use_champions)
    }

    /// Search with the configured scorer and champion setting.
    pub fn search_default(&self, query: &str) -> Vec<SearchHit> {
        self.search(query, self.config.use_champions)
    }

    pub fn search_with(&self, query: &str, scorer: Scorer, use_champions: bool) -> Vec<SearchHit> {
        let vector = self.vectorize(query);
        tracing::debug!(query, terms = vector.len(), use_champions, %scorer, "ranked search");
        self.score_vector(&vector, scorer, use_champions)
    }

    pub fn vectorize(&self, query: &str) -> QueryVector {
        let tokens = self.tokenizer.tokenize(query);
        QueryVectorizer::vectorize(&tokens, self.index.doc_frequencies(), self.index.num_docs())
    }

    /// Score an explicit query vector and rank the result.
    pub fn score_vector(&self, vector: &QueryVector, scorer: Scorer, use_champions: bool) -> Vec<SearchHit> {
        let index = if use_champions { self.champions.as_index() } else { &self.index };
        let stats = DocStats {
            lengths: &self.lengths,
            token_counts: &self.token_counts,
            avg_token_count: self.avg_token_count,
        };
        rank(scorer.score(vector, index, &stats))
            .into_iter()
            .map(|(doc_id, score)| SearchHit { doc_id, score })
            .collect()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scorer(&self) -> Scorer {
        self.scorer
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn champions(&self) -> &ChampionIndex {
        &self.champions
    }

    pub fn lengths(&self) -> &DocumentLengths {
        &self.lengths
    }

    pub fn num_docs(&self) -> usize {
        self.index.num_docs()
    }
}

/// Shared, swappable reference to the current engine.
///
/// Readers grab an `Arc` snapshot and search without holding the lock. A
/// corpus update builds a whole new engine and swaps it in with [`replace`];
/// queries already running finish against the snapshot they started with.
///
/// [`replace`]: EngineHandle::replace
#[derive(Clone)]
pub struct EngineHandle {
    current: Arc<RwLock<Arc<RankedSearchEngine>>>,
}

impl EngineHandle {
    pub fn new(engine: RankedSearchEngine) -> Self {
        Self { current: Arc::new(RwLock::new(Arc::new(engine))) }
    }

    pub fn snapshot(&self) -> Arc<RankedSearchEngine> {
        self.current.read().clone()
    }

    /// Install `engine` and return the one it replaced.
    pub fn replace(&self, engine: RankedSearchEngine) -> Arc<RankedSearchEngine> {
        let next = Arc::new(engine);
        let prev = std::mem::replace(&mut *self.current.write(), next);
        tracing::info!(num_docs = prev.num_docs(), "replaced ranked engine snapshot");
        prev
    }

    pub fn search(&self, query: &str, use_champions: bool) -> Vec<SearchHit> {
        self.snapshot().search(query, use_champions)
    }
}
