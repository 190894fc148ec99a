mod calibration;
mod cursor;
mod error;
pub mod go32;
mod registry;

pub use calibration::{round_to, LinearChannel};
pub use cursor::ByteCursor;
pub use error::DecodeError;
pub use go32::Go32Decoder;
pub use registry::DecoderRegistry;

use crate::telemetry::DecodedFields;

/// Satellite-specific frame decoding.
///
/// Implementations own calibration: the returned fields are already in SI
/// units and named after [`RecordField`](crate::telemetry::RecordField)s.
/// Malformed input must yield an empty set, never a panic.
pub trait FrameDecoder: Send + Sync {
    fn name(&self) -> &str {
        "unnamed"
    }

    fn decode(&self, payload: &[u8]) -> DecodedFields;
}

impl<F> FrameDecoder for F
where
    F: Fn(&[u8]) -> DecodedFields + Send + Sync,
{
    fn decode(&self, payload: &[u8]) -> DecodedFields {
        self(payload)
    }
}
