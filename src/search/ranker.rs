//! TF-IDF similarity ranker.
//!
//! Builds a term-weighting model over the candidate contents plus the query
//! (treated as one extra document), scores every candidate by cosine
//! similarity against the query vector and keeps the top [`MAX_RESULTS`].
//!
//! The model is rebuilt from scratch on every call: scores are always
//! consistent with the current candidate set and the function stays pure.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::Section;

/// Maximum number of ranked sections returned per request.
pub const MAX_RESULTS: usize = 5;

/// A candidate section together with its similarity to the query, in [0, 1].
#[derive(Debug, Clone)]
pub struct RankedSection {
    pub section: Section,
    pub score: f64,
}

/// Rank `candidates` by textual similarity to `query`.
///
/// Returns at most [`MAX_RESULTS`] sections ordered by descending score,
/// ties keeping the original candidate order. A score of exactly zero is
/// still returned if it falls in the top results; an empty candidate set
/// yields an empty vec.
pub fn rank(query: &str, candidates: Vec<Section>) -> Vec<RankedSection> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let documents: Vec<Vec<String>> = candidates
        .iter()
        .map(|c| tokenize(&c.section_content))
        .chain(std::iter::once(tokenize(query)))
        .collect();

    let idf = inverse_document_frequencies(&documents);
    let vectors: Vec<HashMap<&str, f64>> =
        documents.iter().map(|doc| tfidf_vector(doc, &idf)).collect();

    let Some((query_vector, candidate_vectors)) = vectors.split_last() else {
        return Vec::new();
    };

    let scores: Vec<f64> = candidate_vectors
        .iter()
        .map(|v| cosine_similarity(query_vector, v))
        .collect();

    let mut order: Vec<usize> = (0..scores.len()).collect();
    // Stable sort: equal scores keep candidate order.
    order.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(Ordering::Equal));

    let mut candidates: Vec<Option<Section>> = candidates.into_iter().map(Some).collect();
    order
        .into_iter()
        .take(MAX_RESULTS)
        .filter_map(|idx| {
            candidates[idx].take().map(|section| RankedSection {
                section,
                score: scores[idx].clamp(0.0, 1.0),
            })
        })
        .collect()
}

/// Lowercase alphanumeric tokens of at least two characters.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|w| w.len() > 1)
        .map(String::from)
        .collect()
}

/// Smoothed IDF: ln((1 + n) / (1 + df)) + 1.
///
/// The +1 keeps terms that occur in every document weighted, so a candidate
/// textually identical to the query scores exactly 1.0.
fn inverse_document_frequencies(documents: &[Vec<String>]) -> HashMap<&str, f64> {
    let n = documents.len() as f64;
    let mut doc_freq: HashMap<&str, usize> = HashMap::new();
    for doc in documents {
        let mut seen: Vec<&str> = doc.iter().map(String::as_str).collect();
        seen.sort_unstable();
        seen.dedup();
        for term in seen {
            *doc_freq.entry(term).or_insert(0) += 1;
        }
    }

    doc_freq
        .into_iter()
        .map(|(term, df)| (term, ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0))
        .collect()
}

/// L2-normalized sparse TF-IDF vector for one document.
fn tfidf_vector<'a>(doc: &'a [String], idf: &HashMap<&'a str, f64>) -> HashMap<&'a str, f64> {
    let mut weights: HashMap<&str, f64> = HashMap::new();
    for term in doc {
        *weights.entry(term.as_str()).or_insert(0.0) += 1.0;
    }
    for (term, weight) in weights.iter_mut() {
        *weight *= idf.get(term).copied().unwrap_or(0.0);
    }

    let norm: f64 = weights.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for weight in weights.values_mut() {
            *weight /= norm;
        }
    }
    weights
}

/// Cosine similarity of two L2-normalized sparse vectors (their dot product).
fn cosine_similarity<'a>(a: &HashMap<&'a str, f64>, b: &HashMap<&'a str, f64>) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(term, w)| large.get(term).map(|v| w * v))
        .sum()
}
