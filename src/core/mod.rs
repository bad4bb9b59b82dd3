// Core algorithm exports
pub mod matcher;
pub mod overlap;
pub mod reasons;
pub mod scorer;
pub mod similarity;

pub use matcher::{Matcher, RankResult};
pub use overlap::{normalized_overlap, shared_items};
pub use reasons::compatibility_reasons;
pub use scorer::{score, score_documents, CompatibilityScorer, ScoreBreakdown, DEFAULT_SCORE_BOOST};
pub use similarity::cosine_similarity;
