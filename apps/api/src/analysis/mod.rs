// Skill gap core: normalization, skill extraction, gap scoring.
// Everything below `pipeline` is pure and synchronous; the pipeline wires the
// core to the text extractor and course recommender.

pub mod gap;
pub mod handlers;
pub mod normalizer;
pub mod pipeline;
pub mod skills;
pub mod tfidf;
pub mod vocabulary;
