use crate::OutputFormat;
use anyhow::{Context, Result};
use paramscope_core::analysis::{
    Analyzer, ParameterReport, PerformanceTimer, SummaryAnalyzer, SummaryStats,
};
use paramscope_core::{NormalizedParameters, ParameterAnalyzer, RawParameterSet, Report};
use std::fs;
use std::path::{Path, PathBuf};

/// Where the parameters to analyze come from
#[derive(Debug, Clone)]
pub enum ParameterSource {
    /// Raw query string, e.g. `a=1&b=2`
    Query(String),
    /// Full URL or request path; the part after `?` is analyzed
    Url(String),
    /// File of newline-separated `key=value` lines
    File(PathBuf),
}

impl ParameterSource {
    /// Read the parameters from this source
    pub fn load(&self) -> Result<RawParameterSet> {
        match self {
            ParameterSource::Query(query) => Ok(RawParameterSet::parse(query)),
            ParameterSource::Url(url) => Ok(RawParameterSet::from_url(url)),
            ParameterSource::File(path) => load_lines(path),
        }
    }
}

fn load_lines(path: &Path) -> Result<RawParameterSet> {
    tracing::debug!("Reading parameters from: {}", path.display());
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(RawParameterSet::from_line_bytes(&bytes)?)
}

/// Analyze parameters from `source` and return the full report
pub fn analyze_parameters(source: &ParameterSource) -> Result<Report> {
    let timer = PerformanceTimer::start();
    let raw = source.load()?;
    Ok(ParameterAnalyzer::new().analyze_raw(&raw, &timer))
}

/// Count parameter types from `source` without per-key detail
pub fn summarize_parameters(source: &ParameterSource) -> Result<SummaryStats> {
    let raw = source.load()?;
    let params = NormalizedParameters::from_raw(&raw);
    Ok(SummaryAnalyzer.analyze(&params)?)
}

pub fn execute(source: ParameterSource, summary_only: bool, format: OutputFormat) -> Result<()> {
    tracing::info!("Analyzing parameters from {:?}", source);
    tracing::debug!("Output format: {}", format.as_str());

    if summary_only {
        let summary = summarize_parameters(&source)?;
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            OutputFormat::Table => output_summary_table(&summary),
            OutputFormat::Pretty => output_summary_pretty(&summary),
        }
        return Ok(());
    }

    let report = analyze_parameters(&source)?;

    match format {
        OutputFormat::Json => output_json(&report)?,
        OutputFormat::Table => output_table(&report),
        OutputFormat::Pretty => output_pretty(&report),
    }

    Ok(())
}

fn output_pretty(report: &Report) {
    use console::style;

    println!("\n{}", style("Parameter Analysis Report").bold().cyan());
    println!("{}", style("=========================").cyan());

    if report.parameters.is_empty() {
        println!("\n  No parameters found.");
    } else {
        println!("\n{}", style("Parameters:").bold());
        for (key, param) in &report.parameters {
            println!(
                "  {} {} ({})",
                style(key).bold(),
                style(param.parameter_type).green(),
                occurrences_label(param.occurrences)
            );
            println!("      value: {}", display_value(param));

            if let Some(stats) = &param.statistics {
                println!(
                    "      stats: count={} sum={} avg={:.2} median={} min={} max={} range={} stddev={:.3}",
                    stats.count,
                    stats.sum,
                    stats.average,
                    stats.median,
                    stats.min,
                    stats.max,
                    stats.range,
                    stats.standard_deviation
                );
            }

            if let Some(analyses) = &param.analyses {
                for entry in analyses {
                    println!("      - {} ({})", entry.value, entry.value_type);
                }
            }
        }
    }

    output_summary_pretty(&report.summary);
    println!(
        "  Response Time:      {}",
        style(&report.performance.response_time).dim()
    );
    println!(); // trailing newline
}

fn output_summary_pretty(summary: &SummaryStats) {
    use console::style;

    println!("\n{}", style("Summary:").bold());
    println!("  Total Parameters:   {}", summary.total_parameters);
    println!("  Numeric:            {}", summary.numeric_parameters);
    println!("  Boolean:            {}", summary.boolean_parameters);
    println!("  Array:              {}", summary.array_parameters);
    println!("  Multi-value:        {}", summary.multi_value_parameters);
}

fn output_json(report: &Report) -> Result<()> {
    println!("{}", report.to_json_pretty()?);
    Ok(())
}

fn output_table(report: &Report) {
    println!("Parameter,Type,Occurrences,Value");
    for (key, param) in &report.parameters {
        println!(
            "{},{},{},\"{}\"",
            key,
            param.parameter_type,
            param.occurrences,
            display_value(param).replace('"', "\"\"")
        );
    }
}

fn output_summary_table(summary: &SummaryStats) {
    println!("Metric,Value");
    println!("Total Parameters,{}", summary.total_parameters);
    println!("Numeric Parameters,{}", summary.numeric_parameters);
    println!("Boolean Parameters,{}", summary.boolean_parameters);
    println!("Array Parameters,{}", summary.array_parameters);
    println!("Multi-value Parameters,{}", summary.multi_value_parameters);
}

fn display_value(param: &ParameterReport) -> String {
    param.values.join(" | ")
}

fn occurrences_label(occurrences: usize) -> String {
    if occurrences == 1 {
        "1 value".to_string()
    } else {
        format!("{} values", occurrences)
    }
}
