use serde::Serialize;
use std::collections::BTreeMap;

/// A single decoded quantity as produced by a [`FrameDecoder`](crate::decoders::FrameDecoder).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Float(f64),
    Integer(i64),
    Text(String),
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) if v.is_finite() => Some(*v),
            FieldValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            FieldValue::Integer(v) => u64::try_from(*v).ok(),
            FieldValue::Float(v) if v.is_finite() && *v >= 0.0 && v.fract() == 0.0 => {
                Some(*v as u64)
            }
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        FieldValue::Integer(v as i64)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

/// Decoder output: physical-quantity name to calibrated value.
///
/// An empty set means the frame could not be decoded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecodedFields(BTreeMap<String, FieldValue>);

impl DecodedFields {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Chainable form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for DecodedFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// The optional physical fields of a [`CanonicalRecord`](super::CanonicalRecord).
///
/// This is the allow-list decoder output is filtered against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    BatteryVoltage,
    BatteryCurrent,
    SolarPower,
    TempObc,
    TempPa,
    TempBattery,
    SignalStrength,
    TumbleRate,
    Mode,
    Uptime,
}

impl RecordField {
    pub const ALL: [RecordField; 10] = [
        RecordField::BatteryVoltage,
        RecordField::BatteryCurrent,
        RecordField::SolarPower,
        RecordField::TempObc,
        RecordField::TempPa,
        RecordField::TempBattery,
        RecordField::SignalStrength,
        RecordField::TumbleRate,
        RecordField::Mode,
        RecordField::Uptime,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RecordField::BatteryVoltage => "battery_voltage",
            RecordField::BatteryCurrent => "battery_current",
            RecordField::SolarPower => "solar_power",
            RecordField::TempObc => "temp_obc",
            RecordField::TempPa => "temp_pa",
            RecordField::TempBattery => "temp_battery",
            RecordField::SignalStrength => "signal_strength",
            RecordField::TumbleRate => "tumble_rate",
            RecordField::Mode => "mode",
            RecordField::Uptime => "uptime",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}
