use clap::ValueEnum;

pub mod commands;

/// How `analyze` prints a report
///
/// `Table` is CSV with one row per parameter key, or one row per counter
/// with `--summary`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Colored, human-readable report
    #[default]
    Pretty,
    /// The report as served by `GET /api`
    Json,
    Table,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Pretty => "pretty",
            OutputFormat::Json => "json",
            OutputFormat::Table => "table",
        }
    }
}
