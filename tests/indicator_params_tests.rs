use findash::indicator::params::{IndicatorParam, IndicatorParams};

#[test]
fn defaults_match_dashboard_sliders() {
    let p = IndicatorParams::default();
    assert_eq!(p.get(IndicatorParam::SmaWindow), 20);
    assert_eq!(p.get(IndicatorParam::EmaWindow), 20);
    assert_eq!(p.get(IndicatorParam::RsiWindow), 14);
    assert_eq!(p.get(IndicatorParam::BollingerWindow), 20);
    assert_eq!(p.get(IndicatorParam::BollingerStdDev), 2);
    assert_eq!(p.get(IndicatorParam::StochWindow), 14);
    assert_eq!(p.get(IndicatorParam::StochSmoothK), 3);
    assert_eq!(p.get(IndicatorParam::AtrWindow), 14);
}

#[test]
fn full_cycle_visits_every_param() {
    let mut param = IndicatorParam::SmaWindow;
    for expected in IndicatorParam::ALL.iter().skip(1) {
        param = param.next();
        assert_eq!(param, *expected);
    }
    assert_eq!(param.next(), IndicatorParam::SmaWindow);
}

#[test]
fn adjust_only_touches_one_param() {
    let mut p = IndicatorParams::default();
    assert_eq!(p.adjust(IndicatorParam::EmaWindow, 5), 25);
    assert_eq!(p.ema_window, 25);
    assert_eq!(p.sma_window, 20);
    assert_eq!(p.adjust(IndicatorParam::EmaWindow, -500), 1);
    assert!(p.validate().is_ok());
}
