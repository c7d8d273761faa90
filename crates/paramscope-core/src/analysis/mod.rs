mod parameters;
mod performance;
mod statistics;
mod summary;
mod value;

pub use parameters::ParameterAnalyzer;
pub use performance::PerformanceTimer;
pub use statistics::Statistics;
pub use summary::SummaryAnalyzer;
pub use value::{ArrayValues, ValueAnalysis, is_date, parse_boolean, parse_number};

use crate::query::{NormalizedParameters, NormalizedValue};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Full analysis output for one request
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub timestamp: String,
    pub parameters: IndexMap<String, ParameterReport>,
    pub summary: SummaryStats,
    pub performance: PerformanceStats,
}

impl Report {
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub total_parameters: usize,
    pub numeric_parameters: usize,
    pub boolean_parameters: usize,
    pub array_parameters: usize,
    pub multi_value_parameters: usize,
}

impl SummaryStats {
    /// Count one parameter key with its resolved type
    pub fn record(&mut self, parameter_type: ParameterType, occurrences: usize) {
        self.total_parameters += 1;
        match parameter_type {
            ParameterType::Number => self.numeric_parameters += 1,
            ParameterType::Boolean => self.boolean_parameters += 1,
            t if t.is_array() => self.array_parameters += 1,
            _ => {}
        }
        if occurrences > 1 {
            self.multi_value_parameters += 1;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceStats {
    /// Elapsed processing time, e.g. `"0.42ms"`
    pub response_time: String,
    pub timestamp: String,
    pub parameter_count: usize,
}

/// Result for a single parameter key
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterReport {
    pub value: NormalizedValue,
    pub values: Vec<String>,
    #[serde(rename = "type")]
    pub parameter_type: ParameterType,
    /// Number of distinct values after deduplication
    pub occurrences: usize,
    pub analysis: AnalysisFlags,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boolean_value: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements: Option<ArrayValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Statistics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyses: Option<Vec<ValueReport>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisFlags {
    pub is_multi_value: bool,
    pub is_number: bool,
    pub is_boolean: bool,
    pub is_array: bool,
    pub length: usize,
}

/// Per-value entry of a multi-value key
#[derive(Debug, Clone, Serialize)]
pub struct ValueReport {
    pub value: String,
    #[serde(rename = "type")]
    pub value_type: ParameterType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements: Option<ArrayValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Statistics>,
}

/// Resolved type tag of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ParameterType {
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "numeric array")]
    NumericArray,
    #[serde(rename = "boolean array")]
    BooleanArray,
    #[serde(rename = "array")]
    Array,
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "number[]")]
    NumberList,
    #[serde(rename = "boolean[]")]
    BooleanList,
    #[serde(rename = "mixed[]")]
    MixedList,
}

impl ParameterType {
    /// Type of a single value.
    ///
    /// Precedence: number > boolean > date > numeric array > boolean array >
    /// array > text.
    pub fn of_value(analysis: &ValueAnalysis) -> Self {
        if analysis.is_number {
            ParameterType::Number
        } else if analysis.is_boolean {
            ParameterType::Boolean
        } else if analysis.is_date {
            ParameterType::Date
        } else if analysis.is_array {
            if analysis.is_numeric_array {
                ParameterType::NumericArray
            } else if analysis.is_boolean_array {
                ParameterType::BooleanArray
            } else {
                ParameterType::Array
            }
        } else {
            ParameterType::Text
        }
    }

    /// Type of a key with several distinct values.
    ///
    /// Only scalar agreement produces a typed list; array values count as text.
    pub fn of_values(analyses: &[ValueAnalysis]) -> Self {
        if analyses.iter().all(|a| a.is_number) {
            ParameterType::NumberList
        } else if analyses.iter().all(|a| a.is_boolean) {
            ParameterType::BooleanList
        } else {
            ParameterType::MixedList
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::Number => "number",
            ParameterType::Boolean => "boolean",
            ParameterType::Date => "date",
            ParameterType::NumericArray => "numeric array",
            ParameterType::BooleanArray => "boolean array",
            ParameterType::Array => "array",
            ParameterType::Text => "text",
            ParameterType::NumberList => "number[]",
            ParameterType::BooleanList => "boolean[]",
            ParameterType::MixedList => "mixed[]",
        }
    }

    /// Single comma-separated value of any element kind
    pub fn is_array(&self) -> bool {
        matches!(
            self,
            ParameterType::NumericArray | ParameterType::BooleanArray | ParameterType::Array
        )
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait Analyzer {
    type Output;

    fn analyze(&self, params: &NormalizedParameters) -> crate::Result<Self::Output>;
}
