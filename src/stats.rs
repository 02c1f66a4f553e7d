use serde::{Deserialize, Serialize};

use crate::{
    box_plot::BoxPlot,
    quartile::{median_of_sorted, QuartileMethod},
    Error,
};

/// Smallest sample the engine accepts.
pub const MIN_SAMPLES: usize = 3;

/// Descriptive statistics of one sample under one quartile method.
///
/// Owns copies of everything it reports.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatsResult {
    #[serde(rename = "Method")]
    pub method: QuartileMethod,

    #[serde(rename = "Sorted")]
    pub sorted: Vec<f64>,

    #[serde(rename = "Count")]
    pub count: usize,

    #[serde(rename = "Min")]
    pub min: f64,

    #[serde(rename = "Max")]
    pub max: f64,

    #[serde(rename = "Median")]
    pub median: f64,

    #[serde(rename = "Q1")]
    pub q1: f64,

    #[serde(rename = "Q3")]
    pub q3: f64,

    #[serde(rename = "IQR")]
    pub iqr: f64,

    #[serde(rename = "LowerFence")]
    pub lower_fence: f64,

    #[serde(rename = "UpperFence")]
    pub upper_fence: f64,

    #[serde(rename = "Outliers")]
    pub outliers: Vec<f64>,

    #[serde(rename = "Mean")]
    pub mean: f64,

    #[serde(rename = "Variance")]
    pub variance: f64,

    #[serde(rename = "StdDev")]
    pub std_dev: f64,
}

impl StatsResult {
    pub fn is_outlier(&self, x: f64) -> bool {
        x < self.lower_fence || x > self.upper_fence
    }

    pub fn outlier_count(&self) -> usize {
        self.outliers.len()
    }
}

/// Sort, locate quartiles under `method`, derive fences and moments.
///
/// Either every field is computed or the call fails; `values` is never touched.
pub fn compute_statistics(values: &[f64], method: QuartileMethod) -> Result<StatsResult, Error> {
    let count = values.len();
    if count < MIN_SAMPLES {
        return Err(Error::InsufficientData {
            required: MIN_SAMPLES,
            found: count,
        });
    }
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(Error::InvalidInput(format!("non-finite sample {bad}")));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let min = sorted[0];
    let max = sorted[count - 1];
    let median = median_of_sorted(&sorted)?;
    let (q1, q3) = method.quartiles(&sorted)?;

    let box_plot = BoxPlot::new(q1, median, q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|x| box_plot.is_outlier(*x))
        .collect();

    let (mean, variance) = moments(&sorted);

    Ok(StatsResult {
        method,
        sorted,
        count,
        min,
        max,
        median: box_plot.median(),
        q1: box_plot.q1(),
        q3: box_plot.q3(),
        iqr: box_plot.iqr(),
        lower_fence: box_plot.lower_bound(),
        upper_fence: box_plot.upper_bound(),
        outliers,
        mean,
        variance,
        std_dev: variance.sqrt(),
    })
}

/// Mean and sample variance of an ascending slice.
///
/// Summed in sorted order, so any permutation of the sample gives the same bits.
/// Falls back to pre-scaled sums when the direct ones overflow.
fn moments(sorted: &[f64]) -> (f64, f64) {
    let n = sorted.len() as f64;
    let (min, max) = (sorted[0], sorted[sorted.len() - 1]);

    let mut mean = sorted.iter().sum::<f64>() / n;
    if !mean.is_finite() {
        mean = sorted.iter().map(|x| x / n).sum::<f64>();
    }
    let mean = mean.clamp(min, max);

    if sorted.len() < 2 {
        return (mean, 0.0);
    }

    let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    if variance.is_finite() {
        return (mean, variance);
    }

    // halved deviations cannot overflow; scale by the largest one
    let half = sorted.iter().map(|x| x / 2.0 - mean / 2.0).collect::<Vec<_>>();
    let scale = half.iter().fold(0.0_f64, |m, d| m.max(d.abs()));
    if scale == 0.0 {
        return (mean, 0.0);
    }
    let ratio = half.iter().map(|d| (d / scale).powi(2)).sum::<f64>() / (n - 1.0);
    let scale = 2.0 * scale;
    (mean, scale * (scale * ratio))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn even_sample_both_halves_methods() {
        let data = [10.0, 15.0, 20.0, 26.0, 28.0, 30.0, 35.0, 40.0];
        for method in [QuartileMethod::ExclusiveHalves, QuartileMethod::InclusiveHalves] {
            let s = compute_statistics(&data, method).unwrap();
            assert_eq!(s.q1, 17.5);
            assert_eq!(s.median, 27.0);
            assert_eq!(s.q3, 32.5);
            assert_eq!(s.iqr, 15.0);
            assert!(s.outliers.is_empty());
        }
    }

    #[test]
    fn odd_sample_exclusive_halves() {
        let data = [2.0, 4.0, 5.0, 5.0, 6.0, 11.0, 11.0, 13.0, 14.0, 25.0, 30.0];
        let s = compute_statistics(&data, QuartileMethod::ExclusiveHalves).unwrap();
        assert_eq!(s.q1, 5.0);
        assert_eq!(s.median, 11.0);
        assert_eq!(s.q3, 14.0);
        assert_eq!(s.iqr, 9.0);
        assert_eq!(s.lower_fence, -8.5);
        assert_eq!(s.upper_fence, 27.5);
        assert_eq!(s.outliers, vec![30.0]);
    }

    #[test]
    fn odd_sample_inclusive_halves_diverges() {
        let data = [2.0, 4.0, 5.0, 5.0, 6.0, 11.0, 11.0, 13.0, 14.0, 25.0, 30.0];
        let s = compute_statistics(&data, QuartileMethod::InclusiveHalves).unwrap();
        assert_eq!(s.q1, 5.0);
        assert_eq!(s.q3, 13.5);
        assert_eq!(s.iqr, 8.5);
        assert_eq!(s.upper_fence, 26.25);
        assert_eq!(s.outliers, vec![30.0]);
    }

    #[test]
    fn tailed_sample_linear_interpolation() {
        let data = [10.0, 12.0, 14.0, 15.0, 16.0, 18.0, 20.0, 22.0, 24.0, 100.0];
        let s = compute_statistics(&data, QuartileMethod::LinearInterpolation).unwrap();
        assert_eq!(s.q1, 13.5);
        assert_eq!(s.median, 17.0);
        assert_eq!(s.q3, 22.5);
        assert_eq!(s.iqr, 9.0);
        assert_eq!(s.lower_fence, 0.0);
        assert_eq!(s.upper_fence, 36.0);
        assert_eq!(s.outliers, vec![100.0]);
    }

    #[test]
    fn tailed_sample_rank_midpoint() {
        let data = [10.0, 12.0, 14.0, 15.0, 16.0, 18.0, 20.0, 22.0, 24.0, 100.0];
        let s = compute_statistics(&data, QuartileMethod::RankMidpoint).unwrap();
        assert_eq!((s.q1, s.q3, s.iqr), (13.0, 23.0, 10.0));
        assert_eq!((s.lower_fence, s.upper_fence), (-2.0, 38.0));
        assert_eq!(s.outliers, vec![100.0]);
    }

    #[test]
    fn three_samples_is_the_minimum() {
        assert!(compute_statistics(&[1.0, 2.0, 3.0], QuartileMethod::default()).is_ok());
        assert!(matches!(
            compute_statistics(&[1.0, 2.0], QuartileMethod::default()),
            Err(Error::InsufficientData {
                required: 3,
                found: 2
            })
        ));
        assert!(matches!(
            compute_statistics(&[], QuartileMethod::Percentile),
            Err(Error::InsufficientData { found: 0, .. })
        ));
    }

    #[test]
    fn mean_and_variance() {
        let s = compute_statistics(&[1.0, 2.0, 3.0], QuartileMethod::ExclusiveHalves).unwrap();
        assert_eq!(s.mean, 2.0);
        assert_eq!(s.variance, 1.0);
        assert_eq!(s.std_dev, 1.0);
        assert_eq!((s.min, s.max, s.count), (1.0, 3.0, 3));
    }

    #[test]
    fn caller_data_untouched() {
        let data = vec![5.0, 1.0, 4.0, 2.0, 3.0];
        let s = compute_statistics(&data, QuartileMethod::Percentile).unwrap();
        assert_eq!(data, vec![5.0, 1.0, 4.0, 2.0, 3.0]);
        assert_eq!(s.sorted, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn non_finite_rejected() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let r = compute_statistics(&[1.0, bad, 3.0], QuartileMethod::default());
            assert!(matches!(r, Err(Error::InvalidInput(_))));
        }
    }

    #[test]
    fn permutation_gives_identical_record() {
        let a = compute_statistics(&[0.1, 0.2, 0.3], QuartileMethod::default()).unwrap();
        let b = compute_statistics(&[0.3, 0.2, 0.1], QuartileMethod::default()).unwrap();
        let c = compute_statistics(&[0.2, 0.3, 0.1], QuartileMethod::default()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn huge_values_do_not_overflow() {
        for method in QuartileMethod::ALL {
            let s = compute_statistics(&[1.5e308; 4], method).unwrap();
            assert_eq!((s.q1, s.median, s.q3), (1.5e308, 1.5e308, 1.5e308), "{method}");
            assert_eq!(s.iqr, 0.0);
            assert_eq!(s.mean, 1.5e308);
            assert_eq!(s.variance, 0.0);
            assert!(s.outliers.is_empty());
        }
    }

    #[test]
    #[allow(overflowing_literals)]
    fn huge_sum_keeps_mean_finite() {
        let data = [1.0e308, 1.2e308, 1.4e308, 1.6e308, 1.8e308];
        let s = compute_statistics(&data, QuartileMethod::LinearInterpolation).unwrap();
        assert!((s.mean / 1.4e308 - 1.0).abs() < 1.0e-12);
        assert!(s.min <= s.q1 && s.q1 <= s.median && s.median <= s.q3 && s.q3 <= s.max);
        assert!(!s.iqr.is_nan());
    }

    #[test]
    fn large_deviation_keeps_variance_finite() {
        // 1.98e154 squared is past f64::MAX, the variance itself is not
        let mut data = vec![0.0; 99];
        data.push(2.0e154);
        let s = compute_statistics(&data, QuartileMethod::default()).unwrap();
        assert!((s.mean / 2.0e152 - 1.0).abs() < 1.0e-12);
        assert!((s.variance / 4.0e306 - 1.0).abs() < 1.0e-9, "{}", s.variance);
        assert!((s.std_dev / 2.0e153 - 1.0).abs() < 1.0e-9);
    }

    #[test]
    fn identical_values_have_zero_spread() {
        let s = compute_statistics(&[4.0; 6], QuartileMethod::LinearInterpolation).unwrap();
        assert_eq!(s.iqr, 0.0);
        assert_eq!(s.variance, 0.0);
        assert!(s.outliers.is_empty());
    }

    #[test]
    fn serializes_with_pascal_case_keys() {
        let s = compute_statistics(&[1.0, 2.0, 3.0], QuartileMethod::default()).unwrap();
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["IQR"], 2.0);
        assert_eq!(v["Method"], "exclusive-halves");
        assert_eq!(v["Outliers"].as_array().map(|a| a.len()), Some(0));
    }
}
