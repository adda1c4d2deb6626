pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod params;
pub mod rsi;
pub mod sma;
pub mod stochastic;

use crate::model::bar::Bar;

use params::IndicatorParams;

/// Every indicator column for one symbol, aligned index-for-index with `bars`.
#[derive(Debug, Clone, Default)]
pub struct TechnicalSeries {
    pub timestamps_ms: Vec<u64>,
    pub close: Vec<f64>,
    pub sma: Vec<Option<f64>>,
    pub ema: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
    pub macd_signal: Vec<Option<f64>>,
    pub macd_diff: Vec<Option<f64>>,
    pub bb_high: Vec<Option<f64>>,
    pub bb_low: Vec<Option<f64>>,
    pub stoch_k: Vec<Option<f64>>,
    pub stoch_d: Vec<Option<f64>>,
    pub atr: Vec<Option<f64>>,
}

impl TechnicalSeries {
    pub fn compute(bars: &[Bar], params: &IndicatorParams) -> Self {
        let timestamps_ms: Vec<u64> = bars.iter().map(|b| b.timestamp_ms).collect();
        let close: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let high: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let low: Vec<f64> = bars.iter().map(|b| b.low).collect();

        let macd = macd::macd_series(&close);
        let bands =
            bollinger::bollinger_series(&close, params.bollinger_window, params.bollinger_std_dev as f64);
        let stoch = stochastic::stochastic_series(
            &high,
            &low,
            &close,
            params.stoch_window,
            params.stoch_smooth_k,
        );

        Self {
            sma: sma::sma_series(&close, params.sma_window),
            ema: ema::ema_series(&close, params.ema_window),
            rsi: rsi::rsi_series(&close, params.rsi_window),
            macd: macd.iter().map(|p| p.map(|p| p.macd)).collect(),
            macd_signal: macd.iter().map(|p| p.and_then(|p| p.signal)).collect(),
            macd_diff: macd.iter().map(|p| p.and_then(|p| p.diff())).collect(),
            bb_high: bands.iter().map(|b| b.map(|b| b.high)).collect(),
            bb_low: bands.iter().map(|b| b.map(|b| b.low)).collect(),
            stoch_k: stoch.iter().map(|p| p.k).collect(),
            stoch_d: stoch.iter().map(|p| p.d).collect(),
            atr: atr::atr_series(&high, &low, &close, params.atr_window),
            timestamps_ms,
            close,
        }
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    /// `(x, y)` points for a chart, skipping warm-up gaps. `x` is the bar index.
    pub fn points(column: &[Option<f64>]) -> Vec<(f64, f64)> {
        column
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i as f64, v)))
            .collect()
    }

    pub fn close_points(&self) -> Vec<(f64, f64)> {
        self.close
            .iter()
            .enumerate()
            .map(|(i, v)| (i as f64, *v))
            .collect()
    }
}
