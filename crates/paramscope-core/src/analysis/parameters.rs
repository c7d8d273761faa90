use super::summary::resolve_type;
use super::{
    AnalysisFlags, Analyzer, ParameterReport, ParameterType, PerformanceTimer, Report, Statistics,
    SummaryStats, ValueAnalysis, ValueReport,
};
use crate::Result;
use crate::query::{NormalizedParameters, NormalizedValue, RawParameterSet};
use indexmap::IndexMap;

/// Turns request parameters into a [`Report`].
///
/// Stateless: construct one per handler (or share it), every call builds a
/// fresh report.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterAnalyzer;

impl ParameterAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Parse and analyze a raw query string, timing the whole pipeline
    pub fn analyze_query(&self, query: &str) -> Report {
        let timer = PerformanceTimer::start();
        let raw = RawParameterSet::parse(query);
        self.analyze_raw(&raw, &timer)
    }

    /// Parse and analyze a query string received as bytes
    pub fn analyze_bytes(&self, bytes: &[u8]) -> Result<Report> {
        let timer = PerformanceTimer::start();
        let raw = RawParameterSet::from_bytes(bytes)?;
        Ok(self.analyze_raw(&raw, &timer))
    }

    /// Parse and analyze newline-separated `key=value` text received as bytes
    pub fn analyze_lines(&self, bytes: &[u8]) -> Result<Report> {
        let timer = PerformanceTimer::start();
        let raw = RawParameterSet::from_line_bytes(bytes)?;
        Ok(self.analyze_raw(&raw, &timer))
    }

    /// Normalize and analyze an already-parsed parameter set
    pub fn analyze_raw(&self, raw: &RawParameterSet, timer: &PerformanceTimer) -> Report {
        let params = NormalizedParameters::from_raw(raw);
        self.build_report(&params, timer)
    }

    fn build_report(&self, params: &NormalizedParameters, timer: &PerformanceTimer) -> Report {
        tracing::debug!("Analyzing {} parameters", params.len());

        let mut parameters = IndexMap::with_capacity(params.len());
        let mut summary = SummaryStats::default();

        for (key, value) in params.iter() {
            let report = analyze_parameter(value);
            summary.record(report.parameter_type, report.occurrences);
            parameters.insert(key.to_string(), report);
        }

        tracing::info!(
            "Analysis complete: {} parameters ({} numeric, {} boolean, {} array, {} multi-value)",
            summary.total_parameters,
            summary.numeric_parameters,
            summary.boolean_parameters,
            summary.array_parameters,
            summary.multi_value_parameters
        );

        Report {
            timestamp: timer.timestamp().to_string(),
            performance: timer.finish(parameters.len()),
            parameters,
            summary,
        }
    }
}

impl Analyzer for ParameterAnalyzer {
    type Output = Report;

    fn analyze(&self, params: &NormalizedParameters) -> Result<Self::Output> {
        Ok(self.build_report(params, &PerformanceTimer::start()))
    }
}

fn analyze_parameter(value: &NormalizedValue) -> ParameterReport {
    let values = value.values();
    let analyses: Vec<ValueAnalysis> = values.iter().map(|v| ValueAnalysis::analyze(v)).collect();
    let parameter_type = resolve_type(&analyses);
    let occurrences = values.len();

    let mut report = ParameterReport {
        value: value.clone(),
        values: values.to_vec(),
        parameter_type,
        occurrences,
        analysis: AnalysisFlags {
            is_multi_value: occurrences > 1,
            is_number: false,
            is_boolean: false,
            is_array: false,
            length: occurrences,
        },
        numeric_value: None,
        boolean_value: None,
        elements: None,
        statistics: None,
        analyses: None,
    };

    match analyses.as_slice() {
        [single] => {
            report.analysis.is_number = single.is_number;
            report.analysis.is_boolean = single.is_boolean;
            report.analysis.is_array = single.is_array;
            report.numeric_value = single.numeric_value;
            report.boolean_value = single.boolean_value;
            report.elements = single.array_values.clone();
            report.statistics = Statistics::from_analysis(single);
        }
        many => {
            let entries = many
                .iter()
                .map(|analysis| ValueReport {
                    value: analysis.original_value.clone(),
                    value_type: ParameterType::of_value(analysis),
                    elements: analysis.array_values.clone(),
                    statistics: Statistics::from_analysis(analysis),
                })
                .collect();
            report.analyses = Some(entries);
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ArrayValues;
    use serde_json::json;

    fn analyze(query: &str) -> Report {
        ParameterAnalyzer::new().analyze_query(query)
    }

    #[test]
    fn test_empty_query() {
        let report = analyze("");
        assert!(report.parameters.is_empty());
        assert_eq!(report.summary.total_parameters, 0);
        assert_eq!(report.performance.parameter_count, 0);
    }

    #[test]
    fn test_dedup_occurrences() {
        let report = analyze("a=1&a=1&a=2");
        let a = &report.parameters["a"];
        assert_eq!(a.values, vec!["1", "2"]);
        assert_eq!(a.occurrences, 2);
        assert_eq!(a.parameter_type, ParameterType::NumberList);
        assert!(a.analysis.is_multi_value);
        assert_eq!(report.summary.multi_value_parameters, 1);
    }

    #[test]
    fn test_numeric_array_with_statistics() {
        let report = analyze("n=1,2,3");
        let n = &report.parameters["n"];
        assert_eq!(n.parameter_type, ParameterType::NumericArray);
        assert_eq!(n.occurrences, 1);
        assert!(n.analysis.is_array);
        assert_eq!(n.elements, Some(ArrayValues::Numbers(vec![1.0, 2.0, 3.0])));

        let stats = n.statistics.as_ref().unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.sum, 6.0);
        assert_eq!(stats.average, 2.0);
        assert_eq!(stats.median, 2.0);
        assert_eq!(stats.range, 2.0);
        assert!((stats.standard_deviation - 0.816).abs() < 1e-3);
        assert_eq!(report.summary.array_parameters, 1);
    }

    #[test]
    fn test_scalar_types() {
        let report = analyze("flag=true&day=2024-01-15&n=3.5&name=bob&empty=");
        assert_eq!(report.parameters["flag"].parameter_type, ParameterType::Boolean);
        assert_eq!(report.parameters["flag"].boolean_value, Some(true));
        assert_eq!(report.parameters["day"].parameter_type, ParameterType::Date);
        assert_eq!(report.parameters["n"].parameter_type, ParameterType::Number);
        assert_eq!(report.parameters["n"].numeric_value, Some(3.5));
        assert_eq!(report.parameters["name"].parameter_type, ParameterType::Text);
        assert_eq!(report.parameters["empty"].parameter_type, ParameterType::Text);

        assert_eq!(report.summary.total_parameters, 5);
        assert_eq!(report.summary.numeric_parameters, 1);
        assert_eq!(report.summary.boolean_parameters, 1);
    }

    #[test]
    fn test_multi_value_typing() {
        assert_eq!(
            analyze("x=1&x=2").parameters["x"].parameter_type,
            ParameterType::NumberList
        );
        assert_eq!(
            analyze("x=1&x=true").parameters["x"].parameter_type,
            ParameterType::MixedList
        );
        assert_eq!(
            analyze("x=true&x=FALSE").parameters["x"].parameter_type,
            ParameterType::BooleanList
        );
    }

    #[test]
    fn test_multi_value_analyses_include_nested_arrays() {
        let report = analyze("x=hello&x=4,5");
        let x = &report.parameters["x"];
        assert_eq!(x.parameter_type, ParameterType::MixedList);

        let analyses = x.analyses.as_ref().unwrap();
        assert_eq!(analyses.len(), 2);
        assert_eq!(analyses[0].value_type, ParameterType::Text);
        assert_eq!(analyses[1].value_type, ParameterType::NumericArray);
        assert_eq!(analyses[1].statistics.as_ref().unwrap().sum, 9.0);

        // Multi-value keys never count as arrays in the summary
        assert_eq!(report.summary.array_parameters, 0);
    }

    #[test]
    fn test_parameter_order_follows_query() {
        let report = analyze("z=1&a=2&m=3");
        let keys: Vec<&String> = report.parameters.keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_analyze_bytes_rejects_invalid_utf8() {
        let result = ParameterAnalyzer::new().analyze_bytes(b"a=\xff");
        assert!(result.is_err());
    }

    #[test]
    fn test_analyzer_trait() {
        let raw = RawParameterSet::from_lines("a=1\nb=x");
        let params = NormalizedParameters::from_raw(&raw);
        let report = ParameterAnalyzer.analyze(&params).unwrap();
        assert_eq!(report.summary.total_parameters, 2);
    }

    #[test]
    fn test_report_json_shape() {
        let report = analyze("n=1,2&x=1&x=2&s=hi");
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["summary"]["totalParameters"], json!(3));
        assert_eq!(json["summary"]["multiValueParameters"], json!(1));
        assert_eq!(json["performance"]["parameterCount"], json!(3));
        assert_eq!(json["timestamp"], json["performance"]["timestamp"]);

        assert_eq!(json["parameters"]["n"]["type"], json!("numeric array"));
        assert_eq!(json["parameters"]["n"]["value"], json!("1,2"));
        assert_eq!(json["parameters"]["n"]["elements"], json!([1.0, 2.0]));
        assert_eq!(json["parameters"]["n"]["statistics"]["median"], json!(1.5));

        assert_eq!(json["parameters"]["x"]["type"], json!("number[]"));
        assert_eq!(json["parameters"]["x"]["value"], json!(["1", "2"]));
        assert_eq!(json["parameters"]["x"]["analyses"][0]["type"], json!("number"));

        let s = &json["parameters"]["s"];
        assert_eq!(s["type"], json!("text"));
        assert!(s.get("statistics").is_none());
        assert!(s.get("numericValue").is_none());
        assert_eq!(s["analysis"]["isMultiValue"], json!(false));
    }
}
