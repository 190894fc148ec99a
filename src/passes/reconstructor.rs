use chrono::{DateTime, Utc};
use serde::Serialize;

use super::types::{ElevationSample, Pass, PassEvent, PassEventKind};

/// Anomalies seen while folding one event stream. None of them is fatal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconstructionStats {
    pub orphan_culminates: usize,
    pub orphan_sets: usize,
    pub superseded_rises: usize,
    pub unclosed: usize,
    pub out_of_order: usize,
}

impl ReconstructionStats {
    pub fn merge(&mut self, other: &ReconstructionStats) {
        self.orphan_culminates += other.orphan_culminates;
        self.orphan_sets += other.orphan_sets;
        self.superseded_rises += other.superseded_rises;
        self.unclosed += other.unclosed;
        self.out_of_order += other.out_of_order;
    }

    pub fn orphans(&self) -> usize {
        self.orphan_culminates + self.orphan_sets
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    pub passes: Vec<Pass>,
    pub stats: ReconstructionStats,
}

#[derive(Debug, Clone, PartialEq)]
struct OpenPass {
    rise_time: DateTime<Utc>,
    rise_elevation_deg: f64,
    rise_azimuth_deg: f64,
    /// Highest culmination so far: (elevation, time)
    peak: Option<(f64, DateTime<Utc>)>,
}

#[derive(Debug, Clone, PartialEq)]
enum State {
    Idle,
    OpenPass(OpenPass),
}

/// Folds one satellite's rise/culminate/set stream into passes.
///
/// Events must arrive in non-decreasing time order. One instance per
/// satellite; never feed two streams into the same reconstructor.
#[derive(Debug, Clone)]
pub struct PassReconstructor<'a> {
    satellite_id: u32,
    state: State,
    stats: ReconstructionStats,
    last_time: Option<DateTime<Utc>>,
    samples: &'a [ElevationSample],
}

impl PassReconstructor<'static> {
    pub fn new(satellite_id: u32) -> Self {
        PassReconstructor::with_samples(satellite_id, &[])
    }
}

impl<'a> PassReconstructor<'a> {
    /// Reconstructor that falls back to `samples` for the peak elevation of
    /// windows without a culmination.
    pub fn with_samples(satellite_id: u32, samples: &'a [ElevationSample]) -> Self {
        Self {
            satellite_id,
            state: State::Idle,
            stats: ReconstructionStats::default(),
            last_time: None,
            samples,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, State::OpenPass(_))
    }

    pub fn stats(&self) -> &ReconstructionStats {
        &self.stats
    }

    /// Feed one event; returns the pass it closes, if any.
    pub fn push(&mut self, event: &PassEvent) -> Option<Pass> {
        if let Some(last) = self.last_time {
            if event.time < last {
                if self.stats.out_of_order == 0 {
                    log::warn!(
                        "NORAD {}: event at {} precedes {}, stream is out of order",
                        self.satellite_id,
                        event.time,
                        last
                    );
                }
                self.stats.out_of_order += 1;
            }
        }
        self.last_time = Some(event.time);

        let state = std::mem::replace(&mut self.state, State::Idle);
        let (next, closed) = match (state, event.kind) {
            (State::Idle, PassEventKind::Rise) => {
                (State::OpenPass(OpenPass::from_rise(event)), None)
            }
            (State::Idle, PassEventKind::Culminate) => {
                log::debug!("NORAD {}: orphan culmination at {}", self.satellite_id, event.time);
                self.stats.orphan_culminates += 1;
                (State::Idle, None)
            }
            (State::Idle, PassEventKind::Set) => {
                log::debug!("NORAD {}: orphan set at {}", self.satellite_id, event.time);
                self.stats.orphan_sets += 1;
                (State::Idle, None)
            }
            (State::OpenPass(open), PassEventKind::Rise) => {
                log::debug!(
                    "NORAD {}: rise at {} supersedes open rise at {}",
                    self.satellite_id,
                    event.time,
                    open.rise_time
                );
                self.stats.superseded_rises += 1;
                (State::OpenPass(OpenPass::from_rise(event)), None)
            }
            (State::OpenPass(mut open), PassEventKind::Culminate) => {
                if !event.elevation_deg.is_finite() {
                    log::debug!(
                        "NORAD {}: ignoring culmination at {} with elevation {}",
                        self.satellite_id,
                        event.time,
                        event.elevation_deg
                    );
                } else if open.peak.is_none_or(|(peak, _)| event.elevation_deg > peak) {
                    open.peak = Some((event.elevation_deg, event.time));
                }
                (State::OpenPass(open), None)
            }
            (State::OpenPass(open), PassEventKind::Set) => {
                (State::Idle, Some(self.close(open, event)))
            }
        };

        self.state = next;
        closed
    }

    fn close(&self, open: OpenPass, set: &PassEvent) -> Pass {
        let (peak, culmination_time) = match open.peak {
            Some((elevation, time)) => (elevation, Some(time)),
            None => {
                let fallback = self
                    .sampled_peak(open.rise_time, set.time)
                    .unwrap_or_else(|| open.rise_elevation_deg.max(set.elevation_deg));
                (fallback, None)
            }
        };

        Pass {
            satellite_id: self.satellite_id,
            start_time: open.rise_time,
            end_time: set.time,
            duration_minutes: (set.time - open.rise_time).num_milliseconds() as f64 / 60_000.0,
            peak_elevation_deg: peak.max(0.0),
            culmination_time,
            rise_azimuth_deg: open.rise_azimuth_deg,
            set_azimuth_deg: set.azimuth_deg,
        }
    }

    fn sampled_peak(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Option<f64> {
        self.samples
            .iter()
            .filter(|s| s.time >= start && s.time <= end && s.elevation_deg.is_finite())
            .map(|s| s.elevation_deg)
            .reduce(f64::max)
    }

    /// End of stream. An open window is dropped.
    pub fn finish(mut self) -> ReconstructionStats {
        if let State::OpenPass(open) = &self.state {
            log::debug!(
                "NORAD {}: dropping unclosed pass from {}",
                self.satellite_id,
                open.rise_time
            );
            self.stats.unclosed += 1;
        }
        self.stats
    }
}

impl OpenPass {
    fn from_rise(event: &PassEvent) -> Self {
        Self {
            rise_time: event.time,
            rise_elevation_deg: event.elevation_deg,
            rise_azimuth_deg: event.azimuth_deg,
            peak: None,
        }
    }
}

/// Run a fresh reconstructor over a complete stream.
pub fn reconstruct_passes(
    satellite_id: u32,
    events: &[PassEvent],
    samples: &[ElevationSample],
) -> Reconstruction {
    let mut reconstructor = PassReconstructor::with_samples(satellite_id, samples);
    let passes = events
        .iter()
        .filter_map(|event| reconstructor.push(event))
        .collect();
    Reconstruction {
        passes,
        stats: reconstructor.finish(),
    }
}
