pub mod candidates;
pub mod normalizer;
pub mod pipeline;
pub mod quantity;
pub mod relevance;
pub mod selector;
pub mod size;

pub use candidates::build_candidates;
pub use normalizer::{normalize, Normalizer};
pub use pipeline::{CartAction, DryRunCart, MatchPipeline, SearchProvider};
pub use selector::Selector;
