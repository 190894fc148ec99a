use rayon::prelude::*;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;

use super::types::{EventStream, SatelliteScore, ScoringOptions};
use crate::passes::{reconstruct_passes, PassEvent, ReconstructionStats};

/// Ranked scores plus the anomalies met on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking {
    pub scores: Vec<SatelliteScore>,
    pub stats: ReconstructionStats,
}

impl Ranking {
    pub fn top(&self, n: usize) -> &[SatelliteScore] {
        &self.scores[..n.min(self.scores.len())]
    }
}

/// Ranks satellites by total observable time.
#[derive(Debug, Clone, Default)]
pub struct SatelliteScorer {
    names: HashMap<u32, String>,
    options: ScoringOptions,
}

impl SatelliteScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_names(mut self, names: HashMap<u32, String>) -> Self {
        self.names = names;
        self
    }

    pub fn with_options(mut self, options: ScoringOptions) -> Self {
        self.options = options;
        self
    }

    pub fn display_name(&self, satellite_id: u32) -> String {
        self.names
            .get(&satellite_id)
            .cloned()
            .unwrap_or_else(|| format!("NORAD {}", satellite_id))
    }

    pub fn score(&self, streams: &HashMap<u32, EventStream>) -> Vec<SatelliteScore> {
        self.rank(streams).scores
    }

    /// Reconstruct every satellite independently, drop those without passes
    /// and sort the rest.
    pub fn rank(&self, streams: &HashMap<u32, EventStream>) -> Ranking {
        let results: Vec<(Option<SatelliteScore>, ReconstructionStats)> = streams
            .par_iter()
            .map(|(satellite_id, stream)| self.score_one(*satellite_id, stream))
            .collect();

        let mut ranking = Ranking::default();
        for (score, stats) in results {
            ranking.stats.merge(&stats);
            ranking.scores.extend(score);
        }
        ranking.scores.sort_by(compare_scores);

        if ranking.stats.orphans() > 0 || ranking.stats.unclosed > 0 {
            log::info!(
                "{} orphan events and {} unclosed passes ignored",
                ranking.stats.orphans(),
                ranking.stats.unclosed
            );
        }
        log::info!(
            "{} of {} satellites have at least one pass",
            ranking.scores.len(),
            streams.len()
        );

        ranking
    }

    fn score_one(
        &self,
        satellite_id: u32,
        stream: &EventStream,
    ) -> (Option<SatelliteScore>, ReconstructionStats) {
        let events: Cow<'_, [PassEvent]> = match &self.options.horizon {
            Some(horizon) => stream
                .events
                .iter()
                .filter(|e| horizon.contains(e.time))
                .cloned()
                .collect(),
            None => Cow::Borrowed(stream.events.as_slice()),
        };

        let reconstruction = reconstruct_passes(satellite_id, &events, &stream.samples);
        let mut passes = reconstruction.passes;
        if let Some(min_elevation) = self.options.min_peak_elevation_deg {
            passes.retain(|p| p.peak_elevation_deg >= min_elevation);
        }

        if passes.is_empty() {
            log::debug!("NORAD {}: no passes, excluded from ranking", satellite_id);
            return (None, reconstruction.stats);
        }

        let name = self.display_name(satellite_id);
        let score = SatelliteScore::from_passes(satellite_id, name, passes);
        (Some(score), reconstruction.stats)
    }
}

/// Total time desc, then pass count desc, then id asc.
fn compare_scores(a: &SatelliteScore, b: &SatelliteScore) -> Ordering {
    b.total_duration
        .cmp(&a.total_duration)
        .then_with(|| b.pass_count.cmp(&a.pass_count))
        .then_with(|| a.satellite_id.cmp(&b.satellite_id))
}

/// First `n` entries of an already ranked sequence.
pub fn top_n(scores: Vec<SatelliteScore>, n: usize) -> Vec<SatelliteScore> {
    scores.into_iter().take(n).collect()
}
