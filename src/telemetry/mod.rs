mod fields;
mod record;

pub use fields::{DecodedFields, FieldValue, RecordField};
pub use record::{CanonicalRecord, OperatingMode};
