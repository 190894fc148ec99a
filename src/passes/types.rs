use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PassEventKind {
    Rise,
    Culminate,
    Set,
}

/// Rise, culmination or set of a satellite as seen from the station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassEvent {
    pub time: DateTime<Utc>,
    pub elevation_deg: f64,
    #[serde(default)]
    pub azimuth_deg: f64,
    pub kind: PassEventKind,
}

impl PassEvent {
    pub fn new(time: DateTime<Utc>, kind: PassEventKind, elevation_deg: f64) -> Self {
        Self {
            time,
            elevation_deg,
            azimuth_deg: 0.0,
            kind,
        }
    }

    pub fn with_azimuth(mut self, azimuth_deg: f64) -> Self {
        self.azimuth_deg = azimuth_deg;
        self
    }
}

/// High-resolution look angle between events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationSample {
    pub time: DateTime<Utc>,
    pub elevation_deg: f64,
    #[serde(default)]
    pub azimuth_deg: f64,
}

/// A closed visibility window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pass {
    pub satellite_id: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: f64,
    pub peak_elevation_deg: f64,
    /// Time of the culmination the peak was taken from, if any
    pub culmination_time: Option<DateTime<Utc>>,
    pub rise_azimuth_deg: f64,
    pub set_azimuth_deg: f64,
}
