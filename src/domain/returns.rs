//! Log-Return Series
//!
//! Converts daily price levels into a cleaned log-return series:
//! r_t = ln(P_t / P_{t-1}). The first observation has no prior price
//! and is dropped. Missing trading days are simply absent index
//! points; there is no interpolation or gap filling.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while deriving a return series from price levels.
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("no usable observations for {ticker} after cleaning")]
    Empty { ticker: String },

    #[error("price dates for {ticker} are not strictly increasing at {date}")]
    UnorderedDates { ticker: String, date: NaiveDate },
}

/// An ordered sequence of (date, log-return) pairs with strictly
/// increasing dates and finite values.
#[derive(Debug, Clone)]
pub struct ReturnSeries {
    ticker: String,
    points: Vec<(NaiveDate, f64)>,
}

impl ReturnSeries {
    /// Derive log returns from daily price levels.
    ///
    /// Observations with a non-finite or non-positive price on either
    /// side of the ratio are dropped, matching how NaN returns vanish
    /// from the cleaned series. Fails if nothing survives cleaning.
    pub fn from_prices(
        ticker: &str,
        observations: &[(NaiveDate, f64)],
    ) -> Result<Self, SeriesError> {
        for pair in observations.windows(2) {
            if pair[1].0 <= pair[0].0 {
                return Err(SeriesError::UnorderedDates {
                    ticker: ticker.to_string(),
                    date: pair[1].0,
                });
            }
        }

        let mut points = Vec::with_capacity(observations.len().saturating_sub(1));
        for pair in observations.windows(2) {
            let (_, prev) = pair[0];
            let (date, curr) = pair[1];
            if !prev.is_finite() || !curr.is_finite() || prev <= 0.0 || curr <= 0.0 {
                continue;
            }
            points.push((date, (curr / prev).ln()));
        }

        if points.is_empty() {
            return Err(SeriesError::Empty {
                ticker: ticker.to_string(),
            });
        }

        Ok(Self {
            ticker: ticker.to_string(),
            points,
        })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|(d, _)| *d)
    }

    /// Log-return values in date order.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, r)| *r).collect()
    }

    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, n).unwrap()
    }

    #[test]
    fn n_prices_yield_n_minus_one_returns() {
        let prices = vec![
            (day(1), 100.0),
            (day(2), 101.0),
            (day(3), 99.5),
            (day(4), 103.0),
        ];
        let series = ReturnSeries::from_prices("BTC-USD", &prices).unwrap();

        assert_eq!(series.len(), 3);
        let values = series.values();
        assert_relative_eq!(values[0], (101.0f64 / 100.0).ln(), epsilon = 1e-12);
        assert_relative_eq!(values[1], (99.5f64 / 101.0).ln(), epsilon = 1e-12);
        assert_relative_eq!(values[2], (103.0f64 / 99.5).ln(), epsilon = 1e-12);
        assert_eq!(series.dates().next(), Some(day(2)));
    }

    #[test]
    fn bad_prices_are_dropped_not_propagated() {
        let prices = vec![
            (day(1), 100.0),
            (day(2), f64::NAN),
            (day(3), 102.0),
            (day(4), 104.0),
        ];
        let series = ReturnSeries::from_prices("BTC-USD", &prices).unwrap();

        // The NaN observation kills both adjacent ratios.
        assert_eq!(series.len(), 1);
        assert!(series.values().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn empty_after_cleaning_fails() {
        let prices = vec![(day(1), 0.0), (day(2), -5.0)];
        let err = ReturnSeries::from_prices("ETH-USD", &prices).unwrap_err();
        assert!(matches!(err, SeriesError::Empty { .. }));
    }

    #[test]
    fn single_price_fails() {
        let prices = vec![(day(1), 100.0)];
        assert!(ReturnSeries::from_prices("BTC-USD", &prices).is_err());
    }

    #[test]
    fn unordered_dates_rejected() {
        let prices = vec![(day(3), 100.0), (day(2), 101.0)];
        let err = ReturnSeries::from_prices("BTC-USD", &prices).unwrap_err();
        assert!(matches!(err, SeriesError::UnorderedDates { .. }));
    }
}
