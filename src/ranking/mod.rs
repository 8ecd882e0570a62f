pub mod frequency;
pub mod ranker;

pub use frequency::DocumentFrequencyIndex;
pub use ranker::{
    rank_location, rank_weighted, sort_results, truncate_results, RankStrategy, Ranker, ResultLimit,
};
