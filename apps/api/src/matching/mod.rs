// Matching and skill-gap engine.
// Similarity ranking over embedded postings, substring skill extraction,
// and deterministic gap scoring. External calls go through `embedding` and
// `store`; learning links are attached by `resources`.

pub mod extractor;
pub mod gap_scorer;
pub mod search;
pub mod skills;
