/// A single price update from the live ticker feed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub instrument_token: u32,
    pub timestamp_ms: u64,
    pub last_price: f64,
}

impl Tick {
    pub fn new(instrument_token: u32, timestamp_ms: u64, last_price: f64) -> Self {
        Self {
            instrument_token,
            timestamp_ms,
            last_price,
        }
    }
}
