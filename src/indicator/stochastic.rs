use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StochasticPoint {
    pub k: Option<f64>,
    pub d: Option<f64>,
}

/// Stochastic oscillator: %K over `window` bars and %D as the `smooth`
/// bar mean of %K.
///
/// %K is undefined when the window's high equals its low; %D is undefined
/// while any %K in its own window is undefined.
#[derive(Debug, Clone)]
pub struct Stochastic {
    window: usize,
    smooth: usize,
    highs: VecDeque<f64>,
    lows: VecDeque<f64>,
    ks: VecDeque<Option<f64>>,
}

impl Stochastic {
    pub fn new(window: usize, smooth: usize) -> Self {
        assert!(window > 0, "stochastic window must be > 0");
        assert!(smooth > 0, "stochastic smoothing must be > 0");
        Self {
            window,
            smooth,
            highs: VecDeque::with_capacity(window),
            lows: VecDeque::with_capacity(window),
            ks: VecDeque::with_capacity(smooth),
        }
    }

    pub fn push(&mut self, high: f64, low: f64, close: f64) -> StochasticPoint {
        self.highs.push_back(high);
        self.lows.push_back(low);
        if self.highs.len() > self.window {
            self.highs.pop_front();
            self.lows.pop_front();
        }
        if self.highs.len() < self.window {
            return StochasticPoint { k: None, d: None };
        }

        let max_high = self.highs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min_low = self.lows.iter().copied().fold(f64::INFINITY, f64::min);
        let range = max_high - min_low;
        let k = if range.abs() <= f64::EPSILON {
            None
        } else {
            Some(100.0 * (close - min_low) / range)
        };

        self.ks.push_back(k);
        if self.ks.len() > self.smooth {
            self.ks.pop_front();
        }
        let d = if self.ks.len() == self.smooth {
            self.ks
                .iter()
                .copied()
                .sum::<Option<f64>>()
                .map(|sum| sum / self.smooth as f64)
        } else {
            None
        };
        StochasticPoint { k, d }
    }
}

pub fn stochastic_series(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    window: usize,
    smooth: usize,
) -> Vec<StochasticPoint> {
    let mut stoch = Stochastic::new(window, smooth);
    highs
        .iter()
        .zip(lows)
        .zip(closes)
        .map(|((h, l), c)| stoch.push(*h, *l, *c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_at_high_is_100_and_at_low_is_0() {
        let mut s = Stochastic::new(2, 1);
        assert_eq!(s.push(10.0, 5.0, 7.0).k, None);
        let p = s.push(12.0, 6.0, 12.0);
        assert_eq!(p.k, Some(100.0));
        assert_eq!(p.d, Some(100.0));
        let p = s.push(11.0, 4.0, 4.0);
        assert_eq!(p.k, Some(0.0));
    }

    #[test]
    fn flat_range_leaves_k_undefined_and_poisons_d() {
        let mut s = Stochastic::new(1, 2);
        let p = s.push(5.0, 5.0, 5.0);
        assert_eq!(p.k, None);
        let p = s.push(6.0, 4.0, 5.0);
        assert_eq!(p.k, Some(50.0));
        assert_eq!(p.d, None);
        let p = s.push(6.0, 4.0, 6.0);
        assert_eq!(p.d, Some(75.0));
    }
}
