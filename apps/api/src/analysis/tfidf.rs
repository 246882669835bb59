//! TF-IDF over a small in-memory corpus (typically the resume/job pair).
//!
//! IDF is smoothed: `ln((1 + n) / (1 + df)) + 1`, so a term present in every
//! document still carries weight 1.0 and a single-document corpus degrades to
//! plain term frequency. All maps are `BTreeMap` so iteration order, and
//! therefore every result, is deterministic.

use std::collections::BTreeMap;

use serde::Serialize;

pub type TermVector = BTreeMap<String, f64>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredTerm {
    pub term: String,
    pub score: f64,
}

#[derive(Debug, Clone)]
pub struct TfIdfModel {
    idf: BTreeMap<String, f64>,
    term_counts: Vec<BTreeMap<String, u32>>,
}

impl TfIdfModel {
    /// Fits the model over `documents`, counting all 1..=`max_ngram` grams.
    pub fn fit(documents: &[&[String]], max_ngram: usize) -> Self {
        let term_counts: Vec<BTreeMap<String, u32>> = documents
            .iter()
            .map(|tokens| {
                let mut counts = BTreeMap::new();
                for gram in ngrams(tokens, max_ngram) {
                    *counts.entry(gram).or_insert(0) += 1;
                }
                counts
            })
            .collect();

        let mut doc_freq: BTreeMap<String, u32> = BTreeMap::new();
        for counts in &term_counts {
            for term in counts.keys() {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
        }

        let n = term_counts.len() as f64;
        let idf = doc_freq
            .into_iter()
            .map(|(term, df)| {
                let weight = ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0;
                (term, weight)
            })
            .collect();

        Self { idf, term_counts }
    }

    pub fn document_count(&self) -> usize {
        self.term_counts.len()
    }

    /// L2-normalized TF-IDF vector for one document. Empty for an out-of-range
    /// index or an empty document.
    pub fn vector(&self, doc: usize) -> TermVector {
        let Some(counts) = self.term_counts.get(doc) else {
            return TermVector::new();
        };

        let mut weights: TermVector = counts
            .iter()
            .map(|(term, &count)| {
                let idf = self.idf.get(term).copied().unwrap_or(1.0);
                (term.clone(), count as f64 * idf)
            })
            .collect();

        let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for w in weights.values_mut() {
                *w /= norm;
            }
        }
        weights
    }

    /// Highest-weighted terms of one document, best first. Ties are broken by
    /// term order.
    pub fn top_terms(&self, doc: usize, k: usize) -> Vec<ScoredTerm> {
        let mut scored: Vec<ScoredTerm> = self
            .vector(doc)
            .into_iter()
            .map(|(term, score)| ScoredTerm { term, score })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.term.cmp(&b.term)));
        scored.truncate(k);
        scored
    }
}

/// All contiguous n-grams of length 1..=`max_n`, joined with single spaces.
pub fn ngrams(tokens: &[String], max_n: usize) -> Vec<String> {
    let mut grams = Vec::new();
    for n in 1..=max_n.max(1) {
        if n > tokens.len() {
            break;
        }
        grams.extend(tokens.windows(n).map(|w| w.join(" ")));
    }
    grams
}

/// Cosine similarity of two sparse vectors, clamped to [0, 1].
/// Zero when either vector is empty.
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
    let dot: f64 = a
        .iter()
        .filter_map(|(term, wa)| b.get(term).map(|wb| wa * wb))
        .sum();
    let norm_a = a.values().map(|w| w * w).sum::<f64>().sqrt();
    let norm_b = b.values().map(|w| w * w).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}
