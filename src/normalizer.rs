use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::decoders::DecoderRegistry;
use crate::telemetry::CanonicalRecord;

/// One frame as received from an archive or live feed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFrame {
    pub satellite_id: u32,
    pub payload: Vec<u8>,
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

/// Why a frame produced no record. Both cases are expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No decoder registered for the satellite
    Unsupported,
    /// Decoder returned nothing (or panicked)
    Undecodable,
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub records: Vec<CanonicalRecord>,
    pub total: usize,
    pub unsupported: usize,
    pub undecodable: usize,
}

impl BatchReport {
    pub fn decoded(&self) -> usize {
        self.records.len()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} frames decoded ({} unsupported, {} undecodable)",
            self.decoded(),
            self.total,
            self.unsupported,
            self.undecodable
        )
    }
}

/// Registry lookup, decode, field filtering, record construction.
///
/// Never fails: every anomaly ends as "no record".
#[derive(Debug, Clone, Copy)]
pub struct FrameNormalizer<'a> {
    registry: &'a DecoderRegistry,
}

impl<'a> FrameNormalizer<'a> {
    pub fn new(registry: &'a DecoderRegistry) -> Self {
        Self { registry }
    }

    pub fn process(
        &self,
        satellite_id: u32,
        payload: &[u8],
        source: &str,
        timestamp: DateTime<Utc>,
    ) -> Option<CanonicalRecord> {
        self.process_detailed(satellite_id, payload, source, timestamp)
            .ok()
    }

    /// Same as [`process`](Self::process), keeping the reason a frame was dropped.
    pub fn process_detailed(
        &self,
        satellite_id: u32,
        payload: &[u8],
        source: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<CanonicalRecord, Rejection> {
        let decoder = self
            .registry
            .lookup(satellite_id)
            .ok_or(Rejection::Unsupported)?;

        let decoded = match catch_unwind(AssertUnwindSafe(|| decoder.decode(payload))) {
            Ok(decoded) => decoded,
            Err(_) => {
                log::warn!(
                    "NORAD {}: decoder {} panicked on {} byte frame",
                    satellite_id,
                    decoder.name(),
                    payload.len()
                );
                return Err(Rejection::Undecodable);
            }
        };

        if decoded.is_empty() {
            log::debug!(
                "NORAD {}: {} byte frame not decodable",
                satellite_id,
                payload.len()
            );
            return Err(Rejection::Undecodable);
        }

        Ok(CanonicalRecord::from_decoded(
            timestamp,
            satellite_id,
            source,
            payload.to_vec(),
            &decoded,
        ))
    }

    /// Decode independent frames in parallel. Records keep input order.
    pub fn process_batch(&self, frames: &[RawFrame]) -> BatchReport {
        let outcomes: Vec<Result<CanonicalRecord, Rejection>> = frames
            .par_iter()
            .map(|frame| {
                self.process_detailed(
                    frame.satellite_id,
                    &frame.payload,
                    &frame.source,
                    frame.timestamp,
                )
            })
            .collect();

        let mut report = BatchReport {
            total: frames.len(),
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome {
                Ok(record) => report.records.push(record),
                Err(Rejection::Unsupported) => report.unsupported += 1,
                Err(Rejection::Undecodable) => report.undecodable += 1,
            }
        }

        log::info!("{}", report);
        report
    }
}
