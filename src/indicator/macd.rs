use super::ema::Ema;

pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdPoint {
    pub macd: f64,
    pub signal: Option<f64>,
}

impl MacdPoint {
    pub fn diff(&self) -> Option<f64> {
        self.signal.map(|s| self.macd - s)
    }
}

/// Moving Average Convergence Divergence.
///
/// The signal line only starts once the MACD line itself is defined.
#[derive(Debug, Clone)]
pub struct Macd {
    fast: Ema,
    slow: Ema,
    signal: Ema,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Self {
            fast: Ema::new(fast),
            slow: Ema::new(slow),
            signal: Ema::new(signal),
        }
    }

    pub fn push(&mut self, close: f64) -> Option<MacdPoint> {
        let fast = self.fast.push(close);
        let slow = self.slow.push(close);
        let macd = fast? - slow?;
        let signal = self.signal.push(macd);
        Some(MacdPoint { macd, signal })
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new(MACD_FAST, MACD_SLOW, MACD_SIGNAL)
    }
}

pub fn macd_series(closes: &[f64]) -> Vec<Option<MacdPoint>> {
    let mut macd = Macd::default();
    closes.iter().map(|c| macd.push(*c)).collect()
}
