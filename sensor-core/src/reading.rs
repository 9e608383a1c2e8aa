use rand::Rng;
use serde::{Deserialize, Serialize};

pub const MIN_TEMP: f64 = 65.0;
pub const MAX_TEMP: f64 = 85.0;
pub const DEFAULT_LOCATION: &str = "warehouse";

/// One sensor sample as stored on the `Sensors` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub temp: f64,
    pub location: String,
}

impl SensorReading {
    pub fn new(temp: f64, location: impl Into<String>) -> Self {
        Self {
            temp,
            location: location.into(),
        }
    }

    /// Draws a warehouse reading with a temperature in `[65, 85]` °F.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let temp = rng.gen_range(MIN_TEMP..=MAX_TEMP);
        Self::new(round_hundredths(temp), DEFAULT_LOCATION)
    }

    pub fn generate() -> Self {
        Self::random(&mut rand::thread_rng())
    }
}

// Rounding never leaves [MIN_TEMP, MAX_TEMP] since both bounds are whole numbers.
fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
