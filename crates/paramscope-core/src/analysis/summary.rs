use super::{Analyzer, ParameterType, SummaryStats, ValueAnalysis};
use crate::Result;
use crate::query::NormalizedParameters;

/// Counts parameter types without building per-key reports
pub struct SummaryAnalyzer;

impl Analyzer for SummaryAnalyzer {
    type Output = SummaryStats;

    fn analyze(&self, params: &NormalizedParameters) -> Result<Self::Output> {
        tracing::debug!("Summarizing {} parameters", params.len());

        let mut summary = SummaryStats::default();
        for (_, value) in params.iter() {
            let analyses: Vec<ValueAnalysis> = value
                .values()
                .iter()
                .map(|v| ValueAnalysis::analyze(v))
                .collect();
            summary.record(resolve_type(&analyses), analyses.len());
        }

        tracing::info!(
            "Summary complete: {} parameters, {} multi-value",
            summary.total_parameters,
            summary.multi_value_parameters
        );

        Ok(summary)
    }
}

/// Type of a key from the analyses of its distinct values
pub(crate) fn resolve_type(analyses: &[ValueAnalysis]) -> ParameterType {
    match analyses {
        [single] => ParameterType::of_value(single),
        many => ParameterType::of_values(many),
    }
}
