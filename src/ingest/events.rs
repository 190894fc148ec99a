use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use super::error::IngestError;
use crate::scoring::EventStream;

#[derive(Debug, Deserialize)]
struct SatelliteEvents {
    norad_id: u32,
    #[serde(default)]
    name: Option<String>,
    #[serde(flatten)]
    stream: EventStream,
}

#[derive(Debug, Default)]
pub struct EventFile {
    pub streams: HashMap<u32, EventStream>,
    /// Names given inline next to the events
    pub names: HashMap<u32, String>,
}

pub fn read_event_streams(path: impl AsRef<Path>) -> Result<EventFile, IngestError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    parse_event_streams(&content)
}

/// Parse a YAML (or JSON) list of per-satellite event streams.
///
/// Repeated satellites are merged and their events re-sorted by time.
pub fn parse_event_streams(content: &str) -> Result<EventFile, IngestError> {
    let entries: Vec<SatelliteEvents> = serde_yaml::from_str(content)?;
    let mut file = EventFile::default();

    for entry in entries {
        if let Some(name) = entry.name {
            file.names.insert(entry.norad_id, name);
        }
        match file.streams.get_mut(&entry.norad_id) {
            Some(existing) => {
                log::warn!("NORAD {}: merging repeated event block", entry.norad_id);
                existing.events.extend(entry.stream.events);
                existing.events.sort_by_key(|e| e.time);
                existing.samples.extend(entry.stream.samples);
                existing.samples.sort_by_key(|s| s.time);
            }
            None => {
                file.streams.insert(entry.norad_id, entry.stream);
            }
        }
    }

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::PassEventKind;

    #[test]
    fn parses_yaml_streams() {
        let file = parse_event_streams(
            r#"
- norad_id: 25397
  name: GO-32
  events:
    - { time: "2025-05-01T10:00:00Z", elevation_deg: 0.0, azimuth_deg: 200.0, kind: rise }
    - { time: "2025-05-01T10:06:00Z", elevation_deg: 51.2, azimuth_deg: 270.0, kind: culminate }
    - { time: "2025-05-01T10:12:00Z", elevation_deg: 0.0, azimuth_deg: 340.0, kind: set }
- norad_id: 43880
  events: []
  samples:
    - { time: "2025-05-01T11:00:00Z", elevation_deg: 3.0 }
"#,
        )
        .unwrap();

        assert_eq!(file.streams.len(), 2);
        assert_eq!(file.names[&25397], "GO-32");
        let go32 = &file.streams[&25397];
        assert_eq!(go32.events.len(), 3);
        assert_eq!(go32.events[1].kind, PassEventKind::Culminate);
        assert_eq!(go32.events[1].elevation_deg, 51.2);
        assert_eq!(file.streams[&43880].samples.len(), 1);
    }

    #[test]
    fn parses_json_and_merges_repeats() {
        let file = parse_event_streams(
            r#"[
  {"norad_id": 7, "events": [{"time": "2025-05-01T12:00:00Z", "elevation_deg": 0, "kind": "set"}]},
  {"norad_id": 7, "events": [{"time": "2025-05-01T11:50:00Z", "elevation_deg": 0, "kind": "rise"}]}
]"#,
        )
        .unwrap();

        let events = &file.streams[&7].events;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, PassEventKind::Rise);
        assert_eq!(events[1].kind, PassEventKind::Set);
    }

    #[test]
    fn unknown_kind_is_an_error() {
        let result = parse_event_streams(
            r#"[{"norad_id": 7, "events": [{"time": "2025-05-01T12:00:00Z", "elevation_deg": 0, "kind": "peak"}]}]"#,
        );
        assert!(matches!(result, Err(IngestError::Yaml(_))));
    }
}
