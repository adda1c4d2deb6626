use super::ema::Ema;

/// Relative Strength Index with Wilder smoothing of gains and losses.
#[derive(Debug, Clone)]
pub struct Rsi {
    prev_close: Option<f64>,
    avg_gain: Ema,
    avg_loss: Ema,
}

impl Rsi {
    pub fn new(window: usize) -> Self {
        assert!(window > 0, "RSI window must be > 0");
        Self {
            prev_close: None,
            avg_gain: Ema::wilder(window),
            avg_loss: Ema::wilder(window),
        }
    }

    /// The first close has no predecessor and counts as a zero move.
    pub fn push(&mut self, close: f64) -> Option<f64> {
        let delta = self.prev_close.replace(close).map_or(0.0, |prev| close - prev);
        let gain = self.avg_gain.push(delta.max(0.0));
        let loss = self.avg_loss.push((-delta).max(0.0));
        let (gain, loss) = (gain?, loss?);
        if loss <= f64::EPSILON {
            return Some(100.0);
        }
        let rs = gain / loss;
        Some(100.0 - 100.0 / (1.0 + rs))
    }
}

pub fn rsi_series(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut rsi = Rsi::new(window);
    closes.iter().map(|c| rsi.push(*c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_rise_saturates_at_100() {
        let series = rsi_series(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(series[0], None);
        assert_eq!(series[1], None);
        assert_eq!(series[2], Some(100.0));
        assert_eq!(series[4], Some(100.0));
    }

    #[test]
    fn monotonic_fall_tends_to_zero() {
        let series = rsi_series(&[5.0, 4.0, 3.0, 2.0, 1.0], 2);
        let last = series[4].unwrap();
        assert!(last.abs() < 1e-9, "rsi={}", last);
    }
}
