//! Engine configuration.
//!
//! Every knob has a default, so a partial JSON document deserializes into a
//! usable config. Values are checked by [`EngineConfig::validate`] before any
//! index is built.

use crate::error::{Error, Result};
use crate::scoring::{Bm25, Scorer};
use serde::{Deserialize, Serialize};

/// Default number of postings kept per term in the champion index.
pub const DEFAULT_CHAMPION_THRESHOLD: usize = 10;

/// Default BM25 term-frequency saturation parameter.
pub const DEFAULT_BM25_K: f64 = 1.0;

/// Default BM25 length normalization parameter.
pub const DEFAULT_BM25_B: f64 = 0.5;

/// Which scoring model the ranked engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorerKind {
    #[default]
    Cosine,
    Rsv,
    Bm25,
}

impl std::str::FromStr for ScorerKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cosine" => Ok(ScorerKind::Cosine),
            "rsv" => Ok(ScorerKind::Rsv),
            "bm25" => Ok(ScorerKind::Bm25),
            other => Err(format!("unknown scorer '{other}' (expected cosine, rsv or bm25)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bm25Params {
    pub k: f64,
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k: DEFAULT_BM25_K, b: DEFAULT_BM25_B }
    }
}

impl Bm25Params {
    pub fn validate(&self) -> Result<()> {
        Bm25::new(self.k, self.b).map(|_| ())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// K: postings kept per term in the champion index.
    pub champion_threshold: usize,
    pub scorer: ScorerKind,
    pub bm25: Bm25Params,
    /// Search the champion index instead of the full index by default.
    pub use_champions: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            champion_threshold: DEFAULT_CHAMPION_THRESHOLD,
            scorer: ScorerKind::default(),
            bm25: Bm25Params::default(),
            use_champions: false,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.champion_threshold == 0 {
            return Err(Error::InvalidChampionThreshold(self.champion_threshold));
        }
        self.bm25.validate()
    }

    /// Runtime scorer for the configured kind. BM25 parameters are checked
    /// even when another kind is selected, so a bad config never hides.
    pub fn scorer(&self) -> Result<Scorer> {
        self.validate()?;
        match self.scorer {
            ScorerKind::Cosine => Ok(Scorer::Cosine),
            ScorerKind::Rsv => Ok(Scorer::Rsv),
            ScorerKind::Bm25 => Scorer::bm25(self.bm25.k, self.bm25.b),
        }
    }
}
