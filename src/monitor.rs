use time::OffsetDateTime;

/// Acceptable operating range for the instrument, in volts. Boundaries are
/// inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadingRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeStatus {
    Within,
    Outside,
}

impl Default for ReadingRange {
    fn default() -> Self {
        Self { min: 3.0, max: 5.0 }
    }
}

impl ReadingRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn check(&self, value: f64) -> RangeStatus {
        if value >= self.min && value <= self.max {
            RangeStatus::Within
        } else {
            RangeStatus::Outside
        }
    }

    /// Alert text for an out-of-range value. Delivery is the consumer's
    /// concern; this only formats the message.
    pub fn alert_message(&self, value: f64) -> String {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        format!(
            "Value is outside the acceptable range!\n\
             - Current value: {:.3}V\n\
             - Acceptable range: [{:.3}V - {:.3}V]\n\
             - Server time: {:02}/{:02}/{:04} {:02}:{:02}:{:02}",
            value,
            self.min,
            self.max,
            now.day(),
            u8::from(now.month()),
            now.year(),
            now.hour(),
            now.minute(),
            now.second()
        )
    }
}
