use anyhow::{bail, Result};
use serde::Deserialize;

/// Window sizes and multipliers for the technicals tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub sma_window: usize,
    pub ema_window: usize,
    pub rsi_window: usize,
    pub bollinger_window: usize,
    pub bollinger_std_dev: usize,
    pub stoch_window: usize,
    pub stoch_smooth_k: usize,
    pub atr_window: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            sma_window: 20,
            ema_window: 20,
            rsi_window: 14,
            bollinger_window: 20,
            bollinger_std_dev: 2,
            stoch_window: 14,
            stoch_smooth_k: 3,
            atr_window: 14,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorParam {
    SmaWindow,
    EmaWindow,
    RsiWindow,
    BollingerWindow,
    BollingerStdDev,
    StochWindow,
    StochSmoothK,
    AtrWindow,
}

impl IndicatorParam {
    pub const ALL: [IndicatorParam; 8] = [
        IndicatorParam::SmaWindow,
        IndicatorParam::EmaWindow,
        IndicatorParam::RsiWindow,
        IndicatorParam::BollingerWindow,
        IndicatorParam::BollingerStdDev,
        IndicatorParam::StochWindow,
        IndicatorParam::StochSmoothK,
        IndicatorParam::AtrWindow,
    ];

    pub fn label(self) -> &'static str {
        match self {
            IndicatorParam::SmaWindow => "SMA Window",
            IndicatorParam::EmaWindow => "EMA Window",
            IndicatorParam::RsiWindow => "RSI Window",
            IndicatorParam::BollingerWindow => "Bollinger Bands Window",
            IndicatorParam::BollingerStdDev => "Bollinger Bands Std Dev",
            IndicatorParam::StochWindow => "Stochastic Oscillator Window",
            IndicatorParam::StochSmoothK => "Stochastic Oscillator Smooth %K",
            IndicatorParam::AtrWindow => "ATR Window",
        }
    }

    /// Inclusive bounds accepted for this parameter.
    pub fn range(self) -> (usize, usize) {
        match self {
            IndicatorParam::BollingerStdDev => (1, 10),
            IndicatorParam::StochSmoothK => (1, 50),
            _ => (1, 200),
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl IndicatorParams {
    pub fn get(&self, param: IndicatorParam) -> usize {
        match param {
            IndicatorParam::SmaWindow => self.sma_window,
            IndicatorParam::EmaWindow => self.ema_window,
            IndicatorParam::RsiWindow => self.rsi_window,
            IndicatorParam::BollingerWindow => self.bollinger_window,
            IndicatorParam::BollingerStdDev => self.bollinger_std_dev,
            IndicatorParam::StochWindow => self.stoch_window,
            IndicatorParam::StochSmoothK => self.stoch_smooth_k,
            IndicatorParam::AtrWindow => self.atr_window,
        }
    }

    fn slot(&mut self, param: IndicatorParam) -> &mut usize {
        match param {
            IndicatorParam::SmaWindow => &mut self.sma_window,
            IndicatorParam::EmaWindow => &mut self.ema_window,
            IndicatorParam::RsiWindow => &mut self.rsi_window,
            IndicatorParam::BollingerWindow => &mut self.bollinger_window,
            IndicatorParam::BollingerStdDev => &mut self.bollinger_std_dev,
            IndicatorParam::StochWindow => &mut self.stoch_window,
            IndicatorParam::StochSmoothK => &mut self.stoch_smooth_k,
            IndicatorParam::AtrWindow => &mut self.atr_window,
        }
    }

    /// Shift a parameter by `delta`, clamped to its range. Returns the new value.
    pub fn adjust(&mut self, param: IndicatorParam, delta: i64) -> usize {
        let (lo, hi) = param.range();
        let slot = self.slot(param);
        let next = (*slot as i64).saturating_add(delta).clamp(lo as i64, hi as i64);
        *slot = next as usize;
        *slot
    }

    pub fn validate(&self) -> Result<()> {
        for param in IndicatorParam::ALL {
            let (lo, hi) = param.range();
            let value = self.get(param);
            if value < lo || value > hi {
                bail!(
                    "{} = {} is out of range [{}, {}]",
                    param.label(),
                    value,
                    lo,
                    hi
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjust_clamps_to_parameter_range() {
        let mut p = IndicatorParams::default();
        assert_eq!(p.adjust(IndicatorParam::BollingerStdDev, 100), 10);
        assert_eq!(p.adjust(IndicatorParam::SmaWindow, -1000), 1);
        assert_eq!(p.adjust(IndicatorParam::StochSmoothK, 60), 50);
        assert_eq!(p.adjust(IndicatorParam::AtrWindow, 1), 15);
    }

    #[test]
    fn param_cycle_wraps() {
        assert_eq!(IndicatorParam::AtrWindow.next(), IndicatorParam::SmaWindow);
        assert_eq!(IndicatorParam::SmaWindow.prev(), IndicatorParam::AtrWindow);
    }

    #[test]
    fn validate_rejects_zero_window() {
        let p = IndicatorParams {
            rsi_window: 0,
            ..IndicatorParams::default()
        };
        assert!(p.validate().is_err());
        assert!(IndicatorParams::default().validate().is_ok());
    }
}
