mod scorer;
mod types;

pub use scorer::{top_n, Ranking, SatelliteScorer};
pub use types::{EventStream, Horizon, SatelliteScore, ScoringOptions};
