use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

use super::fields::{DecodedFields, FieldValue, RecordField};

/// Operating mode reported by the spacecraft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OperatingMode {
    #[default]
    Nominal,
    Startup,
    Safe,
    Transmit,
    Deployment,
    Unknown,
    Other(String),
}

impl OperatingMode {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "nominal" => OperatingMode::Nominal,
            "startup" => OperatingMode::Startup,
            "safe" => OperatingMode::Safe,
            "transmit" => OperatingMode::Transmit,
            "deployment" => OperatingMode::Deployment,
            "unknown" => OperatingMode::Unknown,
            _ => OperatingMode::Other(label.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            OperatingMode::Nominal => "nominal",
            OperatingMode::Startup => "startup",
            OperatingMode::Safe => "safe",
            OperatingMode::Transmit => "transmit",
            OperatingMode::Deployment => "deployment",
            OperatingMode::Unknown => "unknown",
            OperatingMode::Other(s) => s,
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OperatingMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One decoded telemetry sample in SI units.
///
/// Serializing a record yields the flat summary view: `raw_payload` is never
/// part of it and absent fields appear as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRecord {
    pub timestamp: DateTime<Utc>,
    pub satellite_id: u32,
    pub source: String,
    #[serde(skip)]
    pub raw_payload: Vec<u8>,

    // Power, V / A (+charge) / W
    pub battery_voltage: Option<f64>,
    pub battery_current: Option<f64>,
    pub solar_power: Option<f64>,

    // Thermal, °C
    pub temp_obc: Option<f64>,
    pub temp_pa: Option<f64>,
    pub temp_battery: Option<f64>,

    // RF / attitude, dBm and rad/s
    pub signal_strength: Option<f64>,
    pub tumble_rate: Option<f64>,

    pub mode: OperatingMode,
    /// Seconds since boot
    pub uptime: Option<u64>,
}

impl CanonicalRecord {
    pub fn new(
        timestamp: DateTime<Utc>,
        satellite_id: u32,
        source: impl Into<String>,
        raw_payload: Vec<u8>,
    ) -> Self {
        Self {
            timestamp,
            satellite_id,
            source: source.into(),
            raw_payload,
            battery_voltage: None,
            battery_current: None,
            solar_power: None,
            temp_obc: None,
            temp_pa: None,
            temp_battery: None,
            signal_strength: None,
            tumble_rate: None,
            mode: OperatingMode::default(),
            uptime: None,
        }
    }

    /// Build a record from decoder output, keeping only known fields.
    ///
    /// Unknown keys and values of the wrong kind are dropped.
    pub fn from_decoded(
        timestamp: DateTime<Utc>,
        satellite_id: u32,
        source: impl Into<String>,
        raw_payload: Vec<u8>,
        decoded: &DecodedFields,
    ) -> Self {
        let mut record = Self::new(timestamp, satellite_id, source, raw_payload);
        for (key, value) in decoded.iter() {
            match RecordField::from_name(key) {
                Some(field) => {
                    if !record.apply(field, value) {
                        log::debug!(
                            "NORAD {}: dropping field {} with unusable value {:?}",
                            satellite_id,
                            key,
                            value
                        );
                    }
                }
                None => log::trace!("NORAD {}: ignoring unknown field {}", satellite_id, key),
            }
        }
        record
    }

    fn apply(&mut self, field: RecordField, value: &FieldValue) -> bool {
        let slot = match field {
            RecordField::BatteryVoltage => &mut self.battery_voltage,
            RecordField::BatteryCurrent => &mut self.battery_current,
            RecordField::SolarPower => &mut self.solar_power,
            RecordField::TempObc => &mut self.temp_obc,
            RecordField::TempPa => &mut self.temp_pa,
            RecordField::TempBattery => &mut self.temp_battery,
            RecordField::SignalStrength => &mut self.signal_strength,
            RecordField::TumbleRate => &mut self.tumble_rate,
            RecordField::Mode => {
                return match value.as_text() {
                    Some(label) => {
                        self.mode = OperatingMode::from_label(label);
                        true
                    }
                    None => false,
                };
            }
            RecordField::Uptime => {
                self.uptime = value.as_u64();
                return self.uptime.is_some();
            }
        };
        *slot = value.as_f64();
        slot.is_some()
    }

    /// Field name to value, without the raw payload.
    pub fn to_flat_map(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }

    pub fn raw_payload_hex(&self) -> String {
        self.raw_payload.iter().map(|b| format!("{:02x}", b)).collect()
    }
}
