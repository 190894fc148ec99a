use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::passes::{ElevationSample, Pass, PassEvent};

/// Everything the propagation side delivers for one satellite.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EventStream {
    pub events: Vec<PassEvent>,
    #[serde(default)]
    pub samples: Vec<ElevationSample>,
}

impl From<Vec<PassEvent>> for EventStream {
    fn from(events: Vec<PassEvent>) -> Self {
        Self {
            events,
            samples: Vec::new(),
        }
    }
}

/// Closed analysis interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Horizon {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Horizon {
    pub fn starting_at(start: DateTime<Utc>, length: Duration) -> Self {
        Self {
            start,
            end: start + length,
        }
    }

    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        time >= self.start && time <= self.end
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoringOptions {
    /// Drop events outside this interval before reconstruction
    pub horizon: Option<Horizon>,
    /// Ignore passes peaking below this elevation
    pub min_peak_elevation_deg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SatelliteScore {
    pub satellite_id: u32,
    pub display_name: String,
    pub passes: Vec<Pass>,
    pub pass_count: usize,
    /// Exact sum of pass durations, the ranking key
    #[serde(skip)]
    pub total_duration: Duration,
    pub total_duration_minutes: f64,
    pub max_elevation_deg: f64,
}

impl SatelliteScore {
    pub fn from_passes(satellite_id: u32, display_name: String, passes: Vec<Pass>) -> Self {
        let total_duration = passes
            .iter()
            .fold(Duration::zero(), |total, p| total + (p.end_time - p.start_time));
        Self {
            satellite_id,
            display_name,
            pass_count: passes.len(),
            total_duration,
            total_duration_minutes: total_duration.num_milliseconds() as f64 / 60_000.0,
            max_elevation_deg: passes
                .iter()
                .map(|p| p.peak_elevation_deg)
                .fold(0.0, f64::max),
            passes,
        }
    }
}
