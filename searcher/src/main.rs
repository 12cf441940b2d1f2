use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use searchcore::{
    BooleanSearchEngine, DocId, DocumentStore, EngineConfig, PunctuationTokenizer, RankedSearchEngine, ScorerKind,
    SearchHit, Tokenizer, WordTokenizer,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

mod corpus;

const DEFAULT_QUERIES: &[&str] = &["pop love song", "chinese american", "city"];

#[derive(Parser)]
#[command(name = "searcher")]
#[command(about = "Ranked and boolean search over a line-per-document corpus", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank documents by cosine, RSV or BM25 score
    Rank {
        /// Corpus file, one document per line (.gz is decompressed)
        #[arg(long)]
        corpus: PathBuf,
        /// Query to run; repeat for several
        #[arg(long = "query")]
        queries: Vec<String>,
        /// File with one query per line
        #[arg(long = "queries")]
        queries_file: Option<PathBuf>,
        /// JSON engine config; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        scorer: Option<ScorerKind>,
        /// BM25 term-frequency saturation
        #[arg(long)]
        k: Option<f64>,
        /// BM25 length normalization
        #[arg(long)]
        b: Option<f64>,
        /// Champion list size
        #[arg(long)]
        threshold: Option<usize>,
        /// Search champion lists instead of the full index
        #[arg(long, default_value_t = false)]
        champions: bool,
        /// Run every query against the full index and then the champion lists
        #[arg(long, default_value_t = false)]
        compare: bool,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Collapse "did"/"does" into "do"
        #[arg(long, default_value_t = false)]
        stem: bool,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Documents containing every query term
    Boolean {
        #[arg(long)]
        corpus: PathBuf,
        #[arg(long = "query")]
        queries: Vec<String>,
        #[arg(long = "queries")]
        queries_file: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Serialize)]
struct RankedReport<'a> {
    query: &'a str,
    scorer: String,
    champions: bool,
    hits: Vec<SearchHit>,
}

#[derive(Serialize)]
struct BooleanReport<'a> {
    query: &'a str,
    doc_ids: Vec<DocId>,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Rank {
            corpus,
            queries,
            queries_file,
            config,
            scorer,
            k,
            b,
            threshold,
            champions,
            compare,
            limit,
            stem,
            json,
        } => {
            let mut cfg = load_config(config.as_deref())?;
            if let Some(s) = scorer {
                cfg.scorer = s;
            }
            if let Some(k) = k {
                cfg.bm25.k = k;
            }
            if let Some(b) = b {
                cfg.bm25.b = b;
            }
            if let Some(t) = threshold {
                cfg.champion_threshold = t;
            }
            cfg.use_champions |= champions;
            let queries = collect_queries(queries, queries_file.as_deref())?;
            run_ranked(&corpus, cfg, WordTokenizer { stem }, &queries, compare, limit, json)
        }
        Commands::Boolean { corpus, queries, queries_file, json } => {
            let queries = collect_queries(queries, queries_file.as_deref())?;
            run_boolean(&corpus, &queries, json)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else { return Ok(EngineConfig::default()) };
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    let cfg: EngineConfig =
        serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}

fn collect_queries(mut queries: Vec<String>, file: Option<&Path>) -> Result<Vec<String>> {
    if let Some(path) = file {
        queries.extend(corpus::read_queries(path)?);
    }
    if queries.is_empty() {
        queries = DEFAULT_QUERIES.iter().map(|q| q.to_string()).collect();
    }
    Ok(queries)
}

fn load_store<T: Tokenizer + 'static>(path: &Path, tokenizer: T) -> Result<DocumentStore> {
    let t0 = Instant::now();
    let lines = corpus::read_lines(path)?;
    tracing::info!(docs = lines.len(), elapsed_ms = t0.elapsed().as_millis() as u64, "documents read");

    let t1 = Instant::now();
    let store = DocumentStore::from_texts(lines, tokenizer).context("ingesting corpus")?;
    tracing::info!(elapsed_ms = t1.elapsed().as_millis() as u64, "documents tokenized");
    Ok(store)
}

fn run_ranked(
    path: &Path,
    cfg: EngineConfig,
    tokenizer: WordTokenizer,
    queries: &[String],
    compare: bool,
    limit: usize,
    json: bool,
) -> Result<()> {
    let store = load_store(path, tokenizer)?;
    let use_champions = cfg.use_champions;
    let engine = RankedSearchEngine::build(&store, cfg).context("building ranked engine")?;
    let scorer = engine.scorer().to_string();

    let modes: Vec<bool> = if compare { vec![false, true] } else { vec![use_champions] };
    let mut reports = Vec::new();
    for query in queries {
        for &champions in &modes {
            let mut hits = engine.search(query, champions);
            hits.truncate(limit);
            reports.push(RankedReport { query, scorer: scorer.clone(), champions, hits });
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }
    for report in &reports {
        let suffix = if report.champions { " Using Champion List" } else { "" };
        println!("\n\nQUERY={}{}", report.query, suffix);
        for hit in &report.hits {
            println!("{}\t{:e}", hit.doc_id, hit.score);
        }
    }
    Ok(())
}

fn run_boolean(path: &Path, queries: &[String], json: bool) -> Result<()> {
    let store = load_store(path, PunctuationTokenizer)?;
    let t0 = Instant::now();
    let engine = BooleanSearchEngine::build(&store).context("building boolean index")?;
    tracing::info!(elapsed_ms = t0.elapsed().as_millis() as u64, "boolean index built");

    let reports: Vec<BooleanReport> =
        queries.iter().map(|q| BooleanReport { query: q, doc_ids: engine.search(q) }).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }
    for report in &reports {
        let texts: Vec<&str> = report.doc_ids.iter().filter_map(|&id| store.text(id)).collect();
        println!("\n\nQUERY:{}\nRESULTS:\n{}", report.query, texts.join("\n"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_rank_flags() {
        let cli = Cli::try_parse_from([
            "searcher", "rank", "--corpus", "docs.txt.gz", "--query", "pop love", "--query", "city", "--scorer",
            "bm25", "--b", "0.75", "--compare",
        ])
        .unwrap();
        match cli.command {
            Commands::Rank { queries, scorer, b, compare, limit, .. } => {
                assert_eq!(queries, vec!["pop love", "city"]);
                assert_eq!(scorer, Some(ScorerKind::Bm25));
                assert_eq!(b, Some(0.75));
                assert!(compare);
                assert_eq!(limit, 10);
            }
            _ => panic!("expected rank subcommand"),
        }
    }

    #[test]
    fn rejects_unknown_scorer() {
        let res = Cli::try_parse_from(["searcher", "rank", "--corpus", "d.txt", "--scorer", "tfidf"]);
        assert!(res.is_err());
    }

    #[test]
    fn default_queries_when_none_given() {
        let q = collect_queries(Vec::new(), None).unwrap();
        assert_eq!(q, vec!["pop love song", "chinese american", "city"]);
    }

    #[test]
    fn config_file_with_overrides_missing_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("engine.json");
        std::fs::write(&path, r#"{"champion_threshold": 5, "scorer": "rsv"}"#).unwrap();
        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.champion_threshold, 5);
        assert_eq!(cfg.scorer, ScorerKind::Rsv);
        assert_eq!(cfg.bm25.k, 1.0);
        assert_eq!(load_config(None).unwrap(), EngineConfig::default());
    }

    #[test]
    fn ranked_run_over_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("docs.txt");
        std::fs::write(&path, "pop love song\ncity lights\nlove city\n").unwrap();
        let queries = vec!["love".to_string()];
        run_ranked(&path, EngineConfig::default(), WordTokenizer::default(), &queries, true, 5, true).unwrap();
        run_boolean(&path, &queries, false).unwrap();
    }

    #[test]
    fn invalid_threshold_fails_the_run() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("docs.txt");
        std::fs::write(&path, "a b\n").unwrap();
        let cfg = EngineConfig { champion_threshold: 0, ..Default::default() };
        assert!(run_ranked(&path, cfg, WordTokenizer::default(), &[], false, 10, false).is_err());
    }
}
