use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBand {
    pub middle: f64,
    pub high: f64,
    pub low: f64,
}

/// Bollinger Bands using the population standard deviation of the window.
#[derive(Debug, Clone)]
pub struct Bollinger {
    window: usize,
    std_dev: f64,
    values: VecDeque<f64>,
}

impl Bollinger {
    pub fn new(window: usize, std_dev: f64) -> Self {
        assert!(window > 0, "Bollinger window must be > 0");
        Self {
            window,
            std_dev,
            values: VecDeque::with_capacity(window),
        }
    }

    pub fn push(&mut self, close: f64) -> Option<BollingerBand> {
        self.values.push_back(close);
        if self.values.len() > self.window {
            self.values.pop_front();
        }
        if self.values.len() < self.window {
            return None;
        }
        let n = self.window as f64;
        let mean = self.values.iter().sum::<f64>() / n;
        let variance = self.values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let width = self.std_dev * variance.sqrt();
        Some(BollingerBand {
            middle: mean,
            high: mean + width,
            low: mean - width,
        })
    }
}

pub fn bollinger_series(closes: &[f64], window: usize, std_dev: f64) -> Vec<Option<BollingerBand>> {
    let mut bb = Bollinger::new(window, std_dev);
    closes.iter().map(|c| bb.push(*c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_use_population_std() {
        // mean 5, population std 2
        let series = bollinger_series(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 8, 2.0);
        let band = series[7].unwrap();
        assert!((band.middle - 5.0).abs() < 1e-12);
        assert!((band.high - 9.0).abs() < 1e-12);
        assert!((band.low - 1.0).abs() < 1e-12);
        assert!(series[6].is_none());
    }
}
