/// Exponential moving average with `alpha = 2 / (window + 1)`.
///
/// The recursion is seeded with the first value and runs from there; the
/// average is only reported once `window` values have been pushed.
#[derive(Debug, Clone)]
pub struct Ema {
    window: usize,
    alpha: f64,
    current: Option<f64>,
    count: usize,
}

impl Ema {
    pub fn new(window: usize) -> Self {
        assert!(window > 0, "EMA window must be > 0");
        Self::with_alpha(window, 2.0 / (window as f64 + 1.0))
    }

    /// Wilder-style smoothing (`alpha = 1 / window`), used by RSI and ATR.
    pub fn wilder(window: usize) -> Self {
        assert!(window > 0, "EMA window must be > 0");
        Self::with_alpha(window, 1.0 / window as f64)
    }

    fn with_alpha(window: usize, alpha: f64) -> Self {
        Self {
            window,
            alpha,
            current: None,
            count: 0,
        }
    }

    pub fn push(&mut self, value: f64) -> Option<f64> {
        let next = match self.current {
            Some(prev) => prev + self.alpha * (value - prev),
            None => value,
        };
        self.current = Some(next);
        self.count += 1;
        self.value()
    }

    pub fn value(&self) -> Option<f64> {
        if self.is_ready() {
            self.current
        } else {
            None
        }
    }

    /// The running average even during warm-up.
    pub fn raw(&self) -> Option<f64> {
        self.current
    }

    pub fn is_ready(&self) -> bool {
        self.count >= self.window
    }
}

pub fn ema_series(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut ema = Ema::new(window);
    values.iter().map(|v| ema.push(*v)).collect()
}
