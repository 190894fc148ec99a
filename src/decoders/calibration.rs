/// Linear ADC channel: `raw / scale * range + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearChannel {
    pub scale: f64,
    pub range: f64,
    pub offset: f64,
}

impl LinearChannel {
    pub const fn new(scale: f64, range: f64) -> Self {
        Self {
            scale,
            range,
            offset: 0.0,
        }
    }

    pub const fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    pub fn apply(&self, raw: f64) -> f64 {
        raw / self.scale * self.range + self.offset
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
