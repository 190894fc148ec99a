use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::error::IngestError;
use super::hex::parse_hex;
use crate::normalizer::RawFrame;

/// One line of an archive dump.
#[derive(Debug, Deserialize)]
struct FrameLine {
    frame: String,
    timestamp: DateTime<Utc>,
    #[serde(default, alias = "satellite", alias = "norad_cat_id")]
    norad_id: Option<u32>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    observation_id: Option<u64>,
}

#[derive(Debug, Default)]
pub struct FrameDump {
    pub frames: Vec<RawFrame>,
    /// Lines that could not be turned into a frame
    pub skipped: usize,
}

/// Read a JSONL frame dump.
///
/// `default_norad_id` applies to lines without their own id (per-satellite
/// dump directories). Malformed lines are skipped and counted.
pub fn read_frames(
    path: impl AsRef<Path>,
    default_norad_id: Option<u32>,
    default_source: &str,
) -> Result<FrameDump, IngestError> {
    let file = File::open(path.as_ref())?;
    parse_frames(BufReader::new(file), default_norad_id, default_source)
}

pub fn parse_frames(
    reader: impl BufRead,
    default_norad_id: Option<u32>,
    default_source: &str,
) -> Result<FrameDump, IngestError> {
    let mut dump = FrameDump::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match parse_line(&line, index + 1, default_norad_id, default_source) {
            Ok(frame) => dump.frames.push(frame),
            Err(e) => {
                log::warn!("Skipping frame line {}: {}", index + 1, e);
                dump.skipped += 1;
            }
        }
    }

    Ok(dump)
}

fn parse_line(
    line: &str,
    line_number: usize,
    default_norad_id: Option<u32>,
    default_source: &str,
) -> Result<RawFrame, IngestError> {
    let parsed: FrameLine = serde_json::from_str(line)?;
    let satellite_id = parsed
        .norad_id
        .or(default_norad_id)
        .ok_or(IngestError::MissingSatellite { line: line_number })?;
    let payload = parse_hex(&parsed.frame)?;

    if let Some(observation_id) = parsed.observation_id {
        log::trace!("line {}: observation {}", line_number, observation_id);
    }

    Ok(RawFrame {
        satellite_id,
        payload,
        source: parsed.source.unwrap_or_else(|| default_source.to_string()),
        timestamp: parsed.timestamp,
    })
}
