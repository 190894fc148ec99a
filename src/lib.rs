//! Satellite telemetry normalization and pass ranking.
//!
//! Two independent pipelines:
//!
//! * raw frame + NORAD id → [`normalizer::FrameNormalizer`] → [`telemetry::CanonicalRecord`]
//! * rise/culminate/set events → [`passes::PassReconstructor`] → [`scoring::SatelliteScorer`]

pub mod config;
pub mod decoders;
pub mod ingest;
pub mod normalizer;
pub mod passes;
pub mod scoring;
pub mod telemetry;
