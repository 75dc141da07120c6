//! Monthly birth-count forecasting.
//!
//! The model is deliberately a library capability, not custom fitting logic:
//! MSTL decomposition with an annual season and an AutoETS trend model from
//! `augurs`, with prediction intervals at the requested confidence level.

use augurs::{
    ets::AutoETS,
    forecaster::{Forecaster, transforms::LinearInterpolator},
    mstl::MSTLModel,
};
use model::Period;
use tracing::debug;

use crate::aggregate::AggregateSeries;
use crate::error::{ComputeError, Result};

/// Months per seasonal cycle (annual seasonality).
pub const SEASON_LENGTH: usize = 12;

/// Minimum observed months before a forecast is attempted: two full
/// seasonal cycles.
pub const MIN_OBSERVED_MONTHS: usize = 2 * SEASON_LENGTH;

/// Default confidence level for prediction intervals.
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// One forecast period beyond the observed range.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    pub period: Period,
    pub predicted: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Point forecast plus uncertainty interval for each future period.
///
/// Every point satisfies `lower <= predicted <= upper`; all values are
/// non-negative (birth counts cannot go below zero).
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    pub points: Vec<ForecastPoint>,
    pub confidence: f64,
}

/// Forecasts `horizon` months beyond the end of `series`.
///
/// Fails with [`ComputeError::InsufficientData`] when fewer than
/// [`MIN_OBSERVED_MONTHS`] observations are available, and with
/// [`ComputeError::Forecast`] on invalid parameters or a model failure.
pub fn forecast(
    series: &AggregateSeries,
    horizon: usize,
    confidence: Option<f64>,
) -> Result<ForecastResult> {
    if horizon == 0 {
        return Err(ComputeError::Forecast(
            "horizon must be at least 1 month".to_string(),
        ));
    }
    if series.len() < MIN_OBSERVED_MONTHS {
        return Err(ComputeError::InsufficientData(series.len()));
    }
    let confidence = confidence.unwrap_or(DEFAULT_CONFIDENCE_LEVEL);
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(ComputeError::Forecast(format!(
            "confidence level must be strictly between 0 and 1, got {confidence}"
        )));
    }

    let values = series.values();
    debug!(observations = values.len(), horizon, confidence, "fitting forecast model");

    // AutoETS handles the trend inside the MSTL seasonal decomposition; the
    // interpolator covers any NaN slipping through upstream.
    let ets = AutoETS::non_seasonal().into_trend_model();
    let mstl = MSTLModel::new(vec![SEASON_LENGTH], ets);
    let transformers: Vec<Box<dyn augurs::forecaster::Transformer>> =
        vec![Box::new(LinearInterpolator::default())];
    let mut forecaster = Forecaster::new(mstl).with_transformers(transformers);

    forecaster
        .fit(&values)
        .map_err(|e| ComputeError::Forecast(format!("model fit failed: {e}")))?;
    let prediction = forecaster
        .predict(horizon, confidence)
        .map_err(|e| ComputeError::Forecast(format!("prediction failed: {e}")))?;

    let predicted: Vec<f64> = prediction.point.iter().map(|v| v.max(0.0)).collect();
    let (lower, upper) = match prediction.intervals {
        Some(intervals) => (
            intervals.lower.iter().map(|v| v.max(0.0)).collect::<Vec<f64>>(),
            intervals.upper.iter().map(|v| v.max(0.0)).collect::<Vec<f64>>(),
        ),
        // The model can omit intervals; fall back to a +/-20% band.
        None => (
            predicted.iter().map(|v| (v * 0.8).max(0.0)).collect(),
            predicted.iter().map(|v| v * 1.2).collect(),
        ),
    };

    if predicted.len() != horizon || lower.len() != horizon || upper.len() != horizon {
        return Err(ComputeError::Forecast(format!(
            "model returned {} periods for a horizon of {horizon}",
            predicted.len()
        )));
    }

    let last = series.last_period().ok_or_else(|| {
        ComputeError::Forecast("cannot forecast an empty series".to_string())
    })?;

    let mut period = last;
    let mut points = Vec::with_capacity(horizon);
    for i in 0..horizon {
        period = period.succ();
        let p = predicted[i];
        points.push(ForecastPoint {
            period,
            predicted: p,
            lower: lower[i].min(p),
            upper: upper[i].max(p),
        });
    }

    Ok(ForecastResult { points, confidence })
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::Period;

    /// Seasonal series with a mild trend: 4 years of monthly values.
    fn seasonal_series(months: usize) -> AggregateSeries {
        let mut period = Period::new(2020, 1).unwrap();
        let mut points = Vec::with_capacity(months);
        for i in 0..months {
            let season = ((i % 12) as f64 / 12.0 * std::f64::consts::TAU).sin() * 40.0;
            let trend = i as f64 * 1.5;
            points.push((period, 500.0 + season + trend));
            period = period.succ();
        }
        AggregateSeries::new(points).unwrap()
    }

    #[test]
    fn test_forecast_horizon_and_periods() {
        let series = seasonal_series(24);
        let result = forecast(&series, 6, None).unwrap();

        assert_eq!(result.points.len(), 6);
        assert_eq!(result.points[0].period, Period::new(2022, 1).unwrap());
        assert_eq!(result.points[5].period, Period::new(2022, 6).unwrap());
        for pair in result.points.windows(2) {
            assert_eq!(pair[1].period.index(), pair[0].period.index() + 1);
        }
    }

    #[test]
    fn test_bounds_bracket_the_point_forecast() {
        let series = seasonal_series(48);
        let result = forecast(&series, 12, None).unwrap();

        assert_eq!(result.confidence, DEFAULT_CONFIDENCE_LEVEL);
        for point in &result.points {
            assert!(
                point.lower <= point.predicted && point.predicted <= point.upper,
                "bounds out of order at {}: {} / {} / {}",
                point.period,
                point.lower,
                point.predicted,
                point.upper
            );
            assert!(point.lower >= 0.0);
        }
    }

    #[test]
    fn test_short_series_is_rejected() {
        let series = seasonal_series(MIN_OBSERVED_MONTHS - 1);
        match forecast(&series, 6, None) {
            Err(ComputeError::InsufficientData(got)) => {
                assert_eq!(got, MIN_OBSERVED_MONTHS - 1)
            }
            other => panic!("expected InsufficientData, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_horizon_is_rejected() {
        let series = seasonal_series(24);
        assert!(matches!(
            forecast(&series, 0, None),
            Err(ComputeError::Forecast(_))
        ));
    }

    #[test]
    fn test_invalid_confidence_is_rejected() {
        let series = seasonal_series(24);
        assert!(matches!(
            forecast(&series, 6, Some(1.5)),
            Err(ComputeError::Forecast(_))
        ));
        assert!(matches!(
            forecast(&series, 6, Some(0.0)),
            Err(ComputeError::Forecast(_))
        ));
    }
}
