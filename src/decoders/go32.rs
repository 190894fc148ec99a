//! GO-32 (TechSat-1B), NORAD 25397.
//!
//! Beacon payload after AX.25 framing, big-endian:
//!
//! | offset | size | field          |
//! |--------|------|----------------|
//! | 0      | 2    | sync           |
//! | 2      | 1    | mode code      |
//! | 3      | 2    | battery V adc  |
//! | 5      | 2    | battery I adc (signed) |
//! | 7      | 2    | solar I adc    |
//! | 9      | 2    | OBC temp (signed, 0.1 °C) |
//! | 11     | 2    | PA temp (signed, 0.1 °C)  |
//! | 13     | 1    | RSSI (-dBm)    |
//! | 14     | 4    | spin rate (f32, rad/s) |

use super::calibration::{round_to, LinearChannel};
use super::cursor::ByteCursor;
use super::error::DecodeError;
use super::FrameDecoder;
use crate::telemetry::DecodedFields;

pub const NORAD_ID: u32 = 25397;
pub const FRAME_LEN: usize = 18;

const BATTERY_VOLTAGE: LinearChannel = LinearChannel::new(1024.0, 15.0);
const BATTERY_CURRENT: LinearChannel = LinearChannel::new(1024.0, 2.0);
const SOLAR_CURRENT: LinearChannel = LinearChannel::new(1024.0, 5.0);
const TEMPERATURE: LinearChannel = LinearChannel::new(10.0, 1.0);

#[derive(Debug, Clone, PartialEq)]
struct Go32Frame {
    sync: u16,
    mode_code: u8,
    batt_v_adc: u16,
    batt_i_adc: i16,
    solar_i_adc: u16,
    temp_obc_adc: i16,
    temp_pa_adc: i16,
    rssi_raw: u8,
    spin_rate: f32,
}

impl Go32Frame {
    fn parse(payload: &[u8]) -> Result<Self, DecodeError> {
        let mut cursor = ByteCursor::new(payload);
        cursor.require(FRAME_LEN)?;

        let frame = Self {
            sync: cursor.u16_be()?,
            mode_code: cursor.u8()?,
            batt_v_adc: cursor.u16_be()?,
            batt_i_adc: cursor.i16_be()?,
            solar_i_adc: cursor.u16_be()?,
            temp_obc_adc: cursor.i16_be()?,
            temp_pa_adc: cursor.i16_be()?,
            rssi_raw: cursor.u8()?,
            spin_rate: cursor.f32_be()?,
        };

        if !frame.spin_rate.is_finite() {
            return Err(DecodeError::InvalidField {
                field: "spin_rate",
                reason: format!("{} is not finite", frame.spin_rate),
            });
        }

        Ok(frame)
    }

    fn calibrate(&self) -> DecodedFields {
        let battery_voltage = BATTERY_VOLTAGE.apply(self.batt_v_adc as f64);
        let battery_current = BATTERY_CURRENT.apply(self.batt_i_adc as f64);
        // P = V * I
        let solar_power = SOLAR_CURRENT.apply(self.solar_i_adc as f64) * battery_voltage;

        DecodedFields::empty()
            .with("battery_voltage", round_to(battery_voltage, 2))
            .with("battery_current", round_to(battery_current, 3))
            .with("solar_power", round_to(solar_power, 2))
            .with("temp_obc", round_to(TEMPERATURE.apply(self.temp_obc_adc as f64), 1))
            .with("temp_pa", round_to(TEMPERATURE.apply(self.temp_pa_adc as f64), 1))
            .with("signal_strength", -(self.rssi_raw as f64))
            .with("tumble_rate", round_to(self.spin_rate as f64, 4))
            .with("mode", mode_label(self.mode_code))
    }
}

fn mode_label(code: u8) -> &'static str {
    match code {
        0 => "startup",
        1 => "nominal",
        2 => "safe",
        3 => "transmit",
        _ => "unknown",
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Go32Decoder;

impl FrameDecoder for Go32Decoder {
    fn name(&self) -> &str {
        "GO-32"
    }

    fn decode(&self, payload: &[u8]) -> DecodedFields {
        match Go32Frame::parse(payload) {
            Ok(frame) => {
                log::trace!("GO-32 frame sync {:#06x}", frame.sync);
                frame.calibrate()
            }
            Err(e) => {
                log::debug!("GO-32 frame rejected: {}", e);
                DecodedFields::empty()
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::telemetry::FieldValue;
    use rstest::rstest;

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn frame(
        mode: u8,
        batt_v: u16,
        batt_i: i16,
        solar_i: u16,
        temp_obc: i16,
        temp_pa: i16,
        rssi: u8,
        spin: f32,
    ) -> Vec<u8> {
        let mut out = Vec::with_capacity(FRAME_LEN);
        out.extend_from_slice(&0x1acf_u16.to_be_bytes());
        out.push(mode);
        out.extend_from_slice(&batt_v.to_be_bytes());
        out.extend_from_slice(&batt_i.to_be_bytes());
        out.extend_from_slice(&solar_i.to_be_bytes());
        out.extend_from_slice(&temp_obc.to_be_bytes());
        out.extend_from_slice(&temp_pa.to_be_bytes());
        out.push(rssi);
        out.extend_from_slice(&spin.to_be_bytes());
        out
    }

    fn float(fields: &DecodedFields, key: &str) -> f64 {
        fields.get(key).and_then(FieldValue::as_f64).unwrap()
    }

    #[test]
    fn decodes_nominal_beacon() {
        let payload = frame(1, 512, -256, 1024, 215, -53, 97, 0.125);
        let fields = Go32Decoder.decode(&payload);

        assert_eq!(float(&fields, "battery_voltage"), 7.5);
        assert_eq!(float(&fields, "battery_current"), -0.5);
        assert_eq!(float(&fields, "solar_power"), 37.5);
        assert_eq!(float(&fields, "temp_obc"), 21.5);
        assert_eq!(float(&fields, "temp_pa"), -5.3);
        assert_eq!(float(&fields, "signal_strength"), -97.0);
        assert_eq!(float(&fields, "tumble_rate"), 0.125);
        assert_eq!(fields.get("mode"), Some(&FieldValue::from("nominal")));
    }

    #[test]
    fn full_scale_voltage() {
        let fields = Go32Decoder.decode(&frame(1, 1024, 0, 0, 0, 0, 0, 0.0));
        assert_eq!(float(&fields, "battery_voltage"), 15.0);
    }

    #[rstest]
    #[case(0, "startup")]
    #[case(2, "safe")]
    #[case(3, "transmit")]
    #[case(4, "unknown")]
    #[case(255, "unknown")]
    fn mode_codes(#[case] code: u8, #[case] label: &str) {
        let fields = Go32Decoder.decode(&frame(code, 0, 0, 0, 0, 0, 0, 0.0));
        assert_eq!(fields.get("mode"), Some(&FieldValue::from(label)));
    }

    #[test]
    fn every_short_payload_is_rejected() {
        let payload = frame(1, 512, 0, 0, 0, 0, 0, 0.0);
        for len in 0..FRAME_LEN {
            assert!(Go32Decoder.decode(&payload[..len]).is_empty(), "len {}", len);
        }
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let mut payload = frame(2, 100, 0, 0, 0, 0, 0, 0.0);
        payload.extend_from_slice(&[0xaa; 8]);
        let fields = Go32Decoder.decode(&payload);
        assert_eq!(fields.get("mode"), Some(&FieldValue::from("safe")));
    }

    #[test]
    fn non_finite_spin_rate_is_rejected() {
        assert!(Go32Decoder.decode(&frame(1, 0, 0, 0, 0, 0, 0, f32::NAN)).is_empty());
        assert!(Go32Decoder
            .decode(&frame(1, 0, 0, 0, 0, 0, 0, f32::INFINITY))
            .is_empty());
    }

    #[test]
    fn decoding_is_pure() {
        let payload = frame(3, 700, 12, 300, 250, 400, 80, 0.02);
        assert_eq!(Go32Decoder.decode(&payload), Go32Decoder.decode(&payload));
    }
}
