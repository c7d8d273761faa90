use super::value::{ArrayValues, ValueAnalysis};
use serde::Serialize;

/// Descriptive statistics for a numeric array value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub count: usize,
    pub sum: f64,
    pub average: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    /// Population standard deviation (divisor N)
    pub standard_deviation: f64,
}

impl Statistics {
    /// Statistics for a numeric array analysis, `None` for anything else
    pub fn from_analysis(analysis: &ValueAnalysis) -> Option<Self> {
        if !analysis.is_array || !analysis.is_numeric_array {
            return None;
        }
        match &analysis.array_values {
            Some(ArrayValues::Numbers(numbers)) => Self::from_values(numbers),
            _ => None,
        }
    }

    /// Compute statistics over `values` without reordering them
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let count = values.len();
        let sum: f64 = values.iter().sum();
        let average = sum / count as f64;

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let median = if count.is_multiple_of(2) {
            let mid = count / 2;
            // Halve first so two large finite values stay finite
            sorted[mid - 1] / 2.0 + sorted[mid] / 2.0
        } else {
            sorted[count / 2]
        };

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let variance = values
            .iter()
            .map(|n| (n - average).powi(2))
            .sum::<f64>()
            / count as f64;

        Some(Self {
            count,
            sum,
            average,
            median,
            min,
            max,
            range: max - min,
            standard_deviation: variance.sqrt(),
        })
    }
}
