//! Descriptive Statistics & Normality Test
//!
//! Moments, quartiles, and the Jarque-Bera joint normality test for a
//! log-return series. Crypto returns virtually always reject
//! normality; that is a finding to report, not an error.

use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::domain::returns::ReturnSeries;

/// Summary record for one return series.
#[derive(Debug, Clone)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
    pub skewness: f64,
    /// Excess kurtosis (normal distribution scores 0).
    pub kurtosis: f64,
    pub jb_stat: f64,
    pub jb_pvalue: f64,
}

impl DescriptiveStats {
    pub fn from_series(series: &ReturnSeries) -> Self {
        let values = series.values();
        let n = values.len() as f64;

        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0).max(1.0);
        let std_dev = variance.sqrt();

        let mut sorted = values.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let skewness = central_moment(&values, mean, 3) / variance.powf(1.5);
        let kurtosis = central_moment(&values, mean, 4) / variance.powi(2) - 3.0;

        // JB = n/6 (S^2 + K^2/4), asymptotically chi-squared with 2 df
        let jb_stat = n / 6.0 * (skewness.powi(2) + kurtosis.powi(2) / 4.0);
        let jb_pvalue = chi_squared_survival(jb_stat, 2.0);

        Self {
            count: values.len(),
            mean,
            std_dev,
            min: sorted[0],
            q25: percentile(&sorted, 0.25),
            median: percentile(&sorted, 0.50),
            q75: percentile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
            skewness,
            kurtosis,
            jb_stat,
            jb_pvalue,
        }
    }

    /// Whether the Jarque-Bera test rejects normality at 5%.
    pub fn rejects_normality(&self) -> bool {
        self.jb_pvalue < 0.05
    }
}

fn central_moment(values: &[f64], mean: f64, order: i32) -> f64 {
    let n = values.len() as f64;
    values.iter().map(|v| (v - mean).powi(order)).sum::<f64>() / n
}

/// Linear-interpolation percentile over a sorted slice.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = q * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

pub(crate) fn chi_squared_survival(stat: f64, df: f64) -> f64 {
    if !stat.is_finite() || stat < 0.0 {
        return 1.0;
    }
    match ChiSquared::new(df) {
        Ok(chi2) => (1.0 - chi2.cdf(stat)).clamp(0.0, 1.0),
        Err(_) => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn series_from_values(values: &[f64]) -> ReturnSeries {
        // Build a price path whose log returns equal `values`.
        let mut prices = vec![100.0f64];
        for v in values {
            let last = *prices.last().unwrap();
            prices.push(last * v.exp());
        }
        let observations: Vec<_> = prices
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64);
                (date, *p)
            })
            .collect();
        ReturnSeries::from_prices("TEST", &observations).unwrap()
    }

    #[test]
    fn moments_match_known_vector() {
        let series = series_from_values(&[0.01, -0.02, 0.03, -0.01, 0.02, -0.03]);
        let stats = DescriptiveStats::from_series(&series);

        assert_eq!(stats.count, 6);
        assert_relative_eq!(stats.mean, 0.0, epsilon = 1e-10);
        assert!(stats.std_dev > 0.0);
        assert_relative_eq!(stats.min, -0.03, epsilon = 1e-10);
        assert_relative_eq!(stats.max, 0.03, epsilon = 1e-10);
        assert!(stats.q25 <= stats.median && stats.median <= stats.q75);
    }

    #[test]
    fn symmetric_data_has_near_zero_skew() {
        let series = series_from_values(&[0.02, -0.02, 0.01, -0.01, 0.03, -0.03]);
        let stats = DescriptiveStats::from_series(&series);
        assert_relative_eq!(stats.skewness, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn jb_pvalue_in_unit_interval() {
        let values: Vec<f64> = (0..200)
            .map(|i| ((i * 7919 % 400) as f64 / 200.0 - 1.0) * 0.02)
            .collect();
        let series = series_from_values(&values);
        let stats = DescriptiveStats::from_series(&series);

        assert!(stats.jb_stat >= 0.0);
        assert!((0.0..=1.0).contains(&stats.jb_pvalue));
    }

    #[test]
    fn fat_tailed_data_rejects_normality() {
        // Mostly tiny moves with occasional large shocks.
        let mut values = vec![0.0005; 300];
        for i in (0..300).step_by(40) {
            values[i] = if i % 80 == 0 { 0.15 } else { -0.15 };
        }
        let series = series_from_values(&values);
        let stats = DescriptiveStats::from_series(&series);

        assert!(stats.kurtosis > 1.0);
        assert!(stats.rejects_normality());
    }

    #[test]
    fn percentile_interpolates() {
        let sorted = vec![1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(percentile(&sorted, 0.5), 2.5, epsilon = 1e-12);
        assert_relative_eq!(percentile(&sorted, 0.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(percentile(&sorted, 1.0), 4.0, epsilon = 1e-12);
    }
}
