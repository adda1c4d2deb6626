/// Average True Range.
///
/// The first value is the plain mean of the first `window` true ranges;
/// after that Wilder's recursion `atr = (atr * (n - 1) + tr) / n` applies.
/// The first `window - 1` bars yield `None`, not the `0.0` that zero-filling
/// charting libraries report there.
#[derive(Debug, Clone)]
pub struct Atr {
    window: usize,
    prev_close: Option<f64>,
    warmup_sum: f64,
    count: usize,
    atr: Option<f64>,
}

impl Atr {
    pub fn new(window: usize) -> Self {
        assert!(window > 0, "ATR window must be > 0");
        Self {
            window,
            prev_close: None,
            warmup_sum: 0.0,
            count: 0,
            atr: None,
        }
    }

    pub fn push(&mut self, high: f64, low: f64, close: f64) -> Option<f64> {
        let tr = true_range(high, low, self.prev_close);
        self.prev_close = Some(close);
        self.count += 1;

        let n = self.window as f64;
        match self.atr {
            Some(prev) => self.atr = Some((prev * (n - 1.0) + tr) / n),
            None => {
                self.warmup_sum += tr;
                if self.count >= self.window {
                    self.atr = Some(self.warmup_sum / n);
                }
            }
        }
        self.atr
    }
}

/// The first bar has no previous close, so its true range is `high - low`.
pub fn true_range(high: f64, low: f64, prev_close: Option<f64>) -> f64 {
    let hl = high - low;
    match prev_close {
        Some(pc) => hl.max((high - pc).abs()).max((low - pc).abs()),
        None => hl,
    }
}

pub fn atr_series(highs: &[f64], lows: &[f64], closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut atr = Atr::new(window);
    highs
        .iter()
        .zip(lows)
        .zip(closes)
        .map(|((h, l), c)| atr.push(*h, *l, *c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn true_range_uses_gap_from_previous_close() {
        assert!((true_range(10.0, 8.0, None) - 2.0).abs() < f64::EPSILON);
        assert!((true_range(10.0, 8.0, Some(5.0)) - 5.0).abs() < f64::EPSILON);
        assert!((true_range(10.0, 8.0, Some(13.0)) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn seeds_with_mean_then_wilder() {
        let mut atr = Atr::new(2);
        assert_eq!(atr.push(10.0, 8.0, 9.0), None); // tr 2
        assert_eq!(atr.push(11.0, 9.0, 10.0), Some(2.0)); // tr 2 -> mean 2
        let v = atr.push(14.0, 10.0, 12.0).unwrap(); // tr 4 -> (2 + 4) / 2
        assert!((v - 3.0).abs() < 1e-12);
    }

    #[test]
    fn warmup_rows_are_none_not_zero() {
        let series = atr_series(&[3.0, 3.0, 3.0], &[1.0, 1.0, 1.0], &[2.0, 2.0, 2.0], 3);
        assert_eq!(series[..2], [None, None]);
        assert_eq!(series[2], Some(2.0));
    }
}
