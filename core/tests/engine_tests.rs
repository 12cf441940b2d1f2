use proptest::prelude::*;
use searchcore::{
    BooleanSearchEngine, DocumentStore, EngineConfig, InvertedIndexBuilder, PunctuationTokenizer, QueryVector,
    RankedSearchEngine, Scorer, ScorerKind, WordTokenizer,
};

fn store(texts: &[&str]) -> DocumentStore {
    DocumentStore::from_texts(texts.iter().copied(), WordTokenizer::default()).unwrap()
}

fn engine(texts: &[&str], config: EngineConfig) -> RankedSearchEngine {
    RankedSearchEngine::build(&store(texts), config).unwrap()
}

fn unit_query(term: &str) -> QueryVector {
    [(term, 1.0)].into_iter().collect()
}

#[test]
fn rsv_matches_closed_form() {
    let e = engine(&["a b c", "c d e", "c e f"], EngineConfig::default());
    let hits = e.score_vector(&unit_query("a"), Scorer::Rsv, false);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].doc_id, 0);
    assert!((hits[0].score - 0.4771).abs() < 1e-4, "got {}", hits[0].score);
    assert!((e.index().idf("a") - 0.47712125).abs() < 1e-8);
    assert!((e.index().idf("e") - 0.17609126).abs() < 1e-8);
}

#[test]
fn rsv_sums_idf_over_present_terms() {
    let e = engine(&["a b c", "c d e", "c e f"], EngineConfig::default());
    let hits = e.search_with("a e", Scorer::Rsv, false);
    let ids: Vec<u32> = hits.iter().map(|h| h.doc_id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
    assert!((hits[0].score - 3f64.log10()).abs() < 1e-12);
    assert!((hits[1].score - 1.5f64.log10()).abs() < 1e-12);
    assert!((hits[2].score - 1.5f64.log10()).abs() < 1e-12);

    let both = e.search_with("a b", Scorer::Rsv, false);
    assert_eq!(both.len(), 1);
    assert!((both[0].score - 2.0 * 3f64.log10()).abs() < 1e-12);
}

#[test]
fn bm25_matches_closed_form() {
    let e = engine(&["a a b c", "c d e", "c e f"], EngineConfig::default());
    let hits = e.score_vector(&unit_query("a"), Scorer::bm25(1.0, 0.5).unwrap(), false);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].doc_id, 0);
    assert!((hits[0].score - 0.61564032).abs() < 1e-6, "got {}", hits[0].score);
}

#[test]
fn bm25_sums_per_term_contributions() {
    let e = engine(&["a a b c", "c d e", "c e f"], EngineConfig::default());
    let hits = e.search_with("a b", Scorer::bm25(1.0, 0.5).unwrap(), false);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].doc_id, 0);
    // |d0| = 4, avg = 10/3, so k * (1 - b + b * |d0| / avg) = 1.1
    let idf = 3f64.log10();
    let expected = idf * 2.0 * 2.0 / (1.1 + 2.0) + idf * 2.0 * 1.0 / (1.1 + 1.0);
    assert!((hits[0].score - expected).abs() < 1e-12, "got {} want {}", hits[0].score, expected);
}

#[test]
fn bm25_rejects_out_of_range_parameters() {
    assert!(Scorer::bm25(f64::INFINITY, 0.5).is_err());
    assert!(Scorer::bm25(-3.0, 0.0).is_err());
    assert!(Scorer::bm25(1.0, 7.0).is_err());
}

#[test]
fn cosine_uses_precomputed_norms() {
    let e = engine(&["a a b c", "c d e", "c e f"], EngineConfig::default());
    let hits = e.score_vector(&unit_query("a"), Scorer::Cosine, false);
    assert_eq!(hits[0].doc_id, 0);
    assert!((hits[0].score - 0.792857).abs() < 1e-5, "got {}", hits[0].score);
}


#[test]
fn boolean_end_to_end() {
    let docs = DocumentStore::from_tokens(
        vec![vec!["a".to_string(), "b".to_string()], vec!["a".to_string(), "c".to_string()]],
        PunctuationTokenizer,
    )
    .unwrap();
    let engine = BooleanSearchEngine::build(&docs).unwrap();
    assert_eq!(engine.search("a b"), vec![0]);
    assert_eq!(engine.search("a"), vec![0, 1]);
}

#[test]
fn boolean_over_raw_text() {
    let docs = DocumentStore::from_texts(
        ["Why did the chicken cross?", "Because, why not!", "The chicken, because."],
        PunctuationTokenizer,
    )
    .unwrap();
    let engine = BooleanSearchEngine::build(&docs).unwrap();
    assert_eq!(engine.search("why because"), vec![1]);
    assert_eq!(engine.search("chicken"), vec![0, 2]);
    assert_eq!(engine.search("Chicken THE because"), vec![2]);
}

#[test]
fn unknown_terms_give_empty_results() {
    let texts = ["a b c", "c d e"];
    let ranked = engine(&texts, EngineConfig::default());
    for scorer in [Scorer::Cosine, Scorer::Rsv, Scorer::bm25(1.0, 0.5).unwrap()] {
        assert!(ranked.search_with("zebra", scorer, false).is_empty());
        assert!(ranked.search_with("zebra", scorer, true).is_empty());
    }
    let boolean = BooleanSearchEngine::build(&DocumentStore::from_texts(texts, PunctuationTokenizer).unwrap()).unwrap();
    assert!(boolean.search("zebra").is_empty());
    assert!(boolean.search("a zebra").is_empty());
}

#[test]
fn ranked_and_boolean_share_the_ingestion_tokenizer() {
    let docs = DocumentStore::from_texts(["What's new?", "nothing new"], PunctuationTokenizer).unwrap();
    let ranked = RankedSearchEngine::build(&docs, EngineConfig::default()).unwrap();
    let boolean = BooleanSearchEngine::build(&docs).unwrap();
    let ranked_ids: Vec<u32> = ranked.search("what's", false).iter().map(|h| h.doc_id).collect();
    assert_eq!(ranked_ids, vec![0]);
    assert_eq!(boolean.search("what's"), vec![0]);
}

#[test]
fn rebuild_is_idempotent() {
    let texts = ["the cat sat", "the dog sat down", "a cat and a dog", "nothing here"];
    let cfg = EngineConfig { scorer: ScorerKind::Bm25, ..Default::default() };
    let first = engine(&texts, cfg.clone());
    let second = engine(&texts, cfg);
    assert_eq!(first.index(), second.index());
    assert_eq!(first.champions(), second.champions());
    assert_eq!(first.lengths(), second.lengths());
    for q in ["cat", "dog sat", "the a nothing"] {
        assert_eq!(first.search(q, false), second.search(q, false));
    }
}

#[test]
fn champion_mode_is_a_subset_of_full_results() {
    let texts: Vec<String> = (0..30)
        .map(|i| if i % 2 == 0 { format!("common {}", "rare ".repeat(i % 5 + 1)) } else { "common other".to_string() })
        .collect();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let cfg = EngineConfig { champion_threshold: 3, ..Default::default() };
    let e = engine(&refs, cfg);
    let full = e.search("rare", false);
    let champ = e.search("rare", true);
    assert_eq!(full.len(), 15);
    assert_eq!(champ.len(), 3);
    for hit in &champ {
        assert!(full.iter().any(|h| h.doc_id == hit.doc_id));
    }
}

#[test]
fn equal_scores_come_back_in_doc_id_order() {
    let e = engine(&["x y", "z", "x y", "x y"], EngineConfig::default());
    let ids: Vec<u32> = e.search("x", false).iter().map(|h| h.doc_id).collect();
    assert_eq!(ids, vec![0, 2, 3]);
}

fn corpus() -> impl Strategy<Value = Vec<Vec<String>>> {
    let word = prop::sample::select(vec!["a", "b", "c", "d", "e", "f"]).prop_map(String::from);
    prop::collection::vec(prop::collection::vec(word, 0..8), 1..12)
}

/// Two documents with no term in common, and a query term drawn from each.
type DisjointPair = (Vec<&'static str>, Vec<&'static str>, prop::sample::Index, prop::sample::Index);

fn disjoint_pair() -> impl Strategy<Value = DisjointPair> {
    let left = prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "d"]), 1..8);
    let right = prop::collection::vec(prop::sample::select(vec!["w", "x", "y", "z"]), 1..8);
    (left, right, any::<prop::sample::Index>(), any::<prop::sample::Index>())
}

/// Cosine score of `term` against `doc` when no other document shares a term
/// with it: N = 2 and every df is 1.
fn disjoint_cosine(doc: &[&str], term: &str) -> f64 {
    let idf = (2.0f64 / 1.0).log10();
    let mut counts = std::collections::BTreeMap::new();
    for t in doc {
        *counts.entry(*t).or_insert(0u32) += 1;
    }
    let weight = |c: u32| (1.0 + (c as f64).log10()) * idf;
    let norm = counts.values().fold(0.0f64, |acc, &c| acc + weight(c) * weight(c)).sqrt();
    idf * weight(counts[term]) / norm
}

proptest! {
    #[test]
    fn cosine_on_disjoint_vocabularies_is_exact((left, right, li, ri) in disjoint_pair()) {
        let texts = [left.join(" "), right.join(" ")];
        let e = engine(&[texts[0].as_str(), texts[1].as_str()], EngineConfig::default());
        let lt = *li.get(&left);
        let rt = *ri.get(&right);

        let hits = e.search(lt, false);
        prop_assert_eq!(hits.len(), 1);
        prop_assert_eq!(hits[0].doc_id, 0);
        prop_assert_eq!(hits[0].score, disjoint_cosine(&left, lt));

        let hits = e.search(&format!("{lt} {rt}"), false);
        prop_assert_eq!(hits.len(), 2);
        let by_id = |id: u32| hits.iter().find(|h| h.doc_id == id).map(|h| h.score);
        prop_assert_eq!(by_id(0), Some(disjoint_cosine(&left, lt)));
        prop_assert_eq!(by_id(1), Some(disjoint_cosine(&right, rt)));
    }

    #[test]
    fn postings_agree_with_document_frequencies(docs in corpus()) {
        let index = InvertedIndexBuilder::build(&docs).unwrap();
        prop_assert_eq!(index.num_docs(), docs.len());
        for (term, postings) in index.iter() {
            let df = index.df(term);
            prop_assert!(df > 0);
            prop_assert!(df as usize <= docs.len());
            prop_assert_eq!(postings.len(), df as usize);
        }
        prop_assert_eq!(index.num_terms(), index.doc_frequencies().len());
    }
}
