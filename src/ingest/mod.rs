//! File adapters feeding the core: archive frame dumps and event streams.

mod error;
mod events;
mod frames;
mod hex;

pub use error::IngestError;
pub use events::{parse_event_streams, read_event_streams, EventFile};
pub use frames::{parse_frames, read_frames, FrameDump};
pub use hex::parse_hex;
