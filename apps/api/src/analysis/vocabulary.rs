use serde::Serialize;

use crate::analysis::normalizer::{normalize, NormalizerConfig};

/// Skills recognised when no vocabulary is configured.
pub const DEFAULT_SKILLS: &[&str] = &[
    "Python",
    "SQL",
    "Machine Learning",
    "Power BI",
    "Data Science",
    "AWS",
    "Java",
    "JavaScript",
    "React",
];

/// A canonical label together with its normalized token sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VocabularyEntry {
    pub label: String,
    pub tokens: Vec<String>,
}

/// Ordered, immutable set of canonical skill labels.
///
/// Labels are normalized once at construction with the same normalizer that is
/// applied to document text, so matching compares like with like.
#[derive(Debug, Clone, Default)]
pub struct SkillVocabulary {
    entries: Vec<VocabularyEntry>,
}

impl SkillVocabulary {
    /// Builds a vocabulary, dropping blank labels and duplicates. Two labels are
    /// duplicates when they normalize to the same tokens, so case (including
    /// non-ASCII case) and punctuation variants collapse. The first spelling wins.
    pub fn new<I, S>(labels: I, normalizer: &NormalizerConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: Vec<VocabularyEntry> = Vec::new();

        for label in labels {
            let label = label.as_ref().trim();
            if label.is_empty() {
                continue;
            }
            let tokens = normalize(label, normalizer);
            if tokens.is_empty() {
                tracing::warn!("Skill label '{label}' normalizes to nothing; skipping");
                continue;
            }
            if let Some(kept) = entries.iter().find(|e| e.tokens == tokens) {
                tracing::debug!("Skill label '{label}' duplicates '{}'; skipping", kept.label);
                continue;
            }
            entries.push(VocabularyEntry {
                label: label.to_string(),
                tokens,
            });
        }

        Self { entries }
    }

    pub fn with_defaults(normalizer: &NormalizerConfig) -> Self {
        Self::new(DEFAULT_SKILLS.iter().copied(), normalizer)
    }

    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Looks up the canonical label whose normalized form equals `term`
    /// (tokens joined with single spaces).
    pub fn canonical_for(&self, term: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.tokens.join(" ") == term)
            .map(|e| e.label.as_str())
    }
}
