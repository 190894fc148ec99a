use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::scoring::{Horizon, ScoringOptions};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid horizon '{value}': {message}")]
    Horizon { value: String, message: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub satellites: Vec<SatelliteEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Humantime duration, e.g. "48h"
    pub horizon: Option<String>,
    pub min_peak_elevation_deg: Option<f64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            horizon: None,
            min_peak_elevation_deg: None,
        }
    }
}

fn default_top_n() -> usize {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct SatelliteEntry {
    pub norad_id: u32,
    pub name: String,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        Ok(config)
    }

    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        // Surface a bad horizon at load time rather than at first use
        config.horizon_length()?;
        Ok(config)
    }

    pub fn names(&self) -> HashMap<u32, String> {
        self.satellites
            .iter()
            .map(|s| (s.norad_id, s.name.clone()))
            .collect()
    }

    pub fn horizon_length(&self) -> Result<Option<Duration>, ConfigError> {
        let Some(value) = self.analysis.horizon.as_deref() else {
            return Ok(None);
        };
        let err = |message: String| ConfigError::Horizon {
            value: value.to_string(),
            message,
        };
        let std_duration =
            humantime::parse_duration(value.trim()).map_err(|e| err(e.to_string()))?;
        Duration::from_std(std_duration)
            .map(Some)
            .map_err(|e| err(e.to_string()))
    }

    /// Scoring options with the horizon anchored at `start`.
    pub fn scoring_options(&self, start: DateTime<Utc>) -> Result<ScoringOptions, ConfigError> {
        Ok(ScoringOptions {
            horizon: self
                .horizon_length()?
                .map(|length| Horizon::starting_at(start, length)),
            min_peak_elevation_deg: self.analysis.min_peak_elevation_deg,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn full_config() {
        let config = Config::parse(
            r#"
analysis:
  top_n: 3
  horizon: 48h
  min_peak_elevation_deg: 30.0
satellites:
  - norad_id: 25397
    name: GO-32
  - norad_id: 43880
    name: UWE-4
"#,
        )
        .unwrap();

        assert_eq!(config.analysis.top_n, 3);
        assert_eq!(config.names()[&43880], "UWE-4");
        assert_eq!(config.horizon_length().unwrap(), Some(Duration::hours(48)));

        let start = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
        let options = config.scoring_options(start).unwrap();
        assert_eq!(options.horizon.unwrap().end, start + Duration::hours(48));
        assert_eq!(options.min_peak_elevation_deg, Some(30.0));
    }

    #[test]
    fn defaults() {
        let config = Config::parse("{}").unwrap();
        assert_eq!(config.analysis.top_n, 5);
        assert!(config.satellites.is_empty());
        let options = config.scoring_options(Utc::now()).unwrap();
        assert_eq!(options, ScoringOptions::default());
    }

    #[test]
    fn bad_horizon_is_rejected() {
        let err = Config::parse("analysis:\n  horizon: two days\n").unwrap_err();
        assert!(matches!(err, ConfigError::Horizon { .. }));
    }
}
