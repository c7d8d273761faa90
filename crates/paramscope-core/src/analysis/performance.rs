use super::PerformanceStats;
use chrono::{SecondsFormat, Utc};
use std::time::Instant;

/// Measures processing time of a single request
#[derive(Debug, Clone)]
pub struct PerformanceTimer {
    started: Instant,
    timestamp: String,
}

impl PerformanceTimer {
    /// Start timing now, capturing the ISO-8601 request timestamp
    pub fn start() -> Self {
        Self::started_at(Instant::now())
    }

    /// Timer whose clock started at `started` (e.g. when the request arrived)
    pub fn started_at(started: Instant) -> Self {
        Self {
            started,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    pub fn finish(&self, parameter_count: usize) -> PerformanceStats {
        let elapsed = self.elapsed_ms();

        tracing::debug!("Processed {} parameters in {:.2}ms", parameter_count, elapsed);

        PerformanceStats {
            response_time: format_millis(elapsed),
            timestamp: self.timestamp.clone(),
            parameter_count,
        }
    }
}

fn format_millis(ms: f64) -> String {
    format!("{:.2}ms", ms)
}
