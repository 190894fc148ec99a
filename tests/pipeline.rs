use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;

use sat_watchdog::decoders::{go32, DecoderRegistry, FrameDecoder, LinearChannel};
use sat_watchdog::ingest::{parse_event_streams, parse_frames};
use sat_watchdog::normalizer::FrameNormalizer;
use sat_watchdog::passes::{PassEvent, PassEventKind};
use sat_watchdog::scoring::{top_n, EventStream, SatelliteScorer};
use sat_watchdog::telemetry::{DecodedFields, OperatingMode};

/// Battery pack voltage in mV, big-endian, behind a one byte type marker.
struct MillivoltBeacon;

impl FrameDecoder for MillivoltBeacon {
    fn name(&self) -> &str {
        "mV beacon"
    }

    fn decode(&self, payload: &[u8]) -> DecodedFields {
        match payload {
            [0x42, hi, lo, ..] => {
                let mv = u16::from_be_bytes([*hi, *lo]) as f64;
                DecodedFields::empty()
                    .with("battery_voltage", LinearChannel::new(1000.0, 1.0).apply(mv))
                    .with("mode", "deployment")
                    .with("beacon_type", 0x42_i64)
            }
            _ => DecodedFields::empty(),
        }
    }
}

fn ts() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 14, 9, 0, 0).unwrap()
}

#[test]
fn dump_to_records_with_custom_decoder() {
    let mut registry = DecoderRegistry::with_builtin();
    registry.register(43880, MillivoltBeacon);
    let normalizer = FrameNormalizer::new(&registry);

    let dump = r#"{"frame": "1acf010200ff00010000d7ffcb5a3e000000", "timestamp": "2025-02-14T09:00:00Z", "norad_id": 25397}
{"frame": "421f40", "timestamp": "2025-02-14T09:00:05Z", "norad_id": 43880}
{"frame": "4100", "timestamp": "2025-02-14T09:00:10Z", "norad_id": 43880}
{"frame": "00", "timestamp": "2025-02-14T09:00:15Z", "norad_id": 40014}
"#;
    let parsed = parse_frames(dump.as_bytes(), None, "satnogs_db").unwrap();
    let report = normalizer.process_batch(&parsed.frames);

    assert_eq!(report.total, 4);
    assert_eq!(report.decoded(), 2);
    assert_eq!(report.undecodable, 1);
    assert_eq!(report.unsupported, 1);

    let techsat = &report.records[0];
    assert_eq!(techsat.satellite_id, go32::NORAD_ID);
    assert_eq!(techsat.battery_voltage, Some(7.5));
    assert_eq!(techsat.solar_power, Some(9.38));
    assert_eq!(techsat.temp_obc, Some(21.5));
    assert_eq!(techsat.signal_strength, Some(-90.0));
    assert_eq!(techsat.tumble_rate, Some(0.125));

    let uwe = &report.records[1];
    assert_eq!(uwe.battery_voltage, Some(8.0));
    assert_eq!(uwe.mode, OperatingMode::Deployment);
    assert_eq!(uwe.timestamp, ts() + Duration::seconds(5));
    let flat = uwe.to_flat_map();
    assert!(!flat.contains_key("beacon_type"));
    assert!(!flat.contains_key("raw_payload"));
}

#[test]
fn unregistered_satellite_never_produces_records() {
    let registry = DecoderRegistry::new();
    let normalizer = FrameNormalizer::new(&registry);
    for len in 0..64 {
        let payload = vec![0x5a; len];
        assert!(normalizer
            .process(go32::NORAD_ID, &payload, "satnogs_db", ts())
            .is_none());
    }
}

#[test]
fn events_to_ranking() {
    let file = parse_event_streams(
        r#"
- norad_id: 1
  name: ALPHA
  events:
    - { time: "2025-02-14T10:00:00Z", elevation_deg: 0.0, kind: rise }
    - { time: "2025-02-14T10:05:00Z", elevation_deg: 45.0, kind: culminate }
    - { time: "2025-02-14T10:10:00Z", elevation_deg: 0.0, kind: set }
    - { time: "2025-02-14T12:00:00Z", elevation_deg: 0.0, kind: rise }
    - { time: "2025-02-14T12:20:00Z", elevation_deg: 0.0, kind: set }
- norad_id: 2
  name: BRAVO
  events:
    - { time: "2025-02-14T09:55:00Z", elevation_deg: 0.0, kind: set }
    - { time: "2025-02-14T11:00:00Z", elevation_deg: 0.0, kind: rise }
    - { time: "2025-02-14T11:12:00Z", elevation_deg: 70.0, kind: culminate }
    - { time: "2025-02-14T11:25:00Z", elevation_deg: 0.0, kind: set }
- norad_id: 3
  events:
    - { time: "2025-02-14T11:00:00Z", elevation_deg: 0.0, kind: rise }
"#,
    )
    .unwrap();

    let scorer = SatelliteScorer::new().with_names(file.names.clone());
    let ranking = scorer.rank(&file.streams);

    let order: Vec<_> = ranking
        .scores
        .iter()
        .map(|s| (s.display_name.as_str(), s.total_duration_minutes))
        .collect();
    assert_eq!(order, vec![("ALPHA", 30.0), ("BRAVO", 25.0)]);
    assert_eq!(ranking.scores[0].max_elevation_deg, 45.0);
    assert_eq!(ranking.scores[1].max_elevation_deg, 70.0);
    assert_eq!(ranking.stats.orphan_sets, 1);
    assert_eq!(ranking.stats.unclosed, 1);

    assert_eq!(top_n(ranking.scores, 10).len(), 2);
}

#[test]
fn streams_are_reconstructed_independently() {
    // Interleaving 1 and 2 into one machine would close 1's rise with 2's set
    let t0 = ts();
    let streams = HashMap::from([
        (
            1_u32,
            EventStream::from(vec![PassEvent::new(t0, PassEventKind::Rise, 0.0)]),
        ),
        (
            2_u32,
            EventStream::from(vec![PassEvent::new(
                t0 + Duration::minutes(8),
                PassEventKind::Set,
                0.0,
            )]),
        ),
    ]);
    assert!(SatelliteScorer::new().score(&streams).is_empty());
}

#[test]
fn nan_culmination_in_event_file_keeps_real_peak() {
    let file = parse_event_streams(
        r#"
- norad_id: 25397
  events:
    - { time: "2025-02-14T10:00:00Z", elevation_deg: 0.0, kind: rise }
    - { time: "2025-02-14T10:03:00Z", elevation_deg: .nan, kind: culminate }
    - { time: "2025-02-14T10:06:00Z", elevation_deg: 51.2, kind: culminate }
    - { time: "2025-02-14T10:12:00Z", elevation_deg: 0.0, kind: set }
"#,
    )
    .unwrap();

    let scores = SatelliteScorer::new().score(&file.streams);
    assert_eq!(scores[0].passes[0].peak_elevation_deg, 51.2);
    assert_eq!(scores[0].max_elevation_deg, 51.2);
}
