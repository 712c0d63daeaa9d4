//! Prometheus counters for pipeline runs, served at `/metrics`.
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Started,
    Completed,
    Failed,
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunOutcome::Started => "started",
            RunOutcome::Completed => "completed",
            RunOutcome::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineMetrics {
    registry: Registry,
    runs: IntCounterVec,
}

impl PipelineMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let runs = IntCounterVec::new(
            Opts::new("sitegate_pipeline_runs_total", "Pipeline runs by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(runs.clone()))?;
        Ok(Self { registry, runs })
    }

    pub fn record(&self, outcome: RunOutcome) {
        self.runs.with_label_values(&[outcome.as_str()]).inc();
    }

    pub fn count(&self, outcome: RunOutcome) -> u64 {
        self.runs.with_label_values(&[outcome.as_str()]).get()
    }

    /// Text exposition format
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_outcome() {
        let metrics = PipelineMetrics::new().unwrap();
        metrics.record(RunOutcome::Started);
        metrics.record(RunOutcome::Started);
        metrics.record(RunOutcome::Failed);

        assert_eq!(metrics.count(RunOutcome::Started), 2);
        assert_eq!(metrics.count(RunOutcome::Completed), 0);

        let text = metrics.encode().unwrap();
        assert!(text.contains(r#"sitegate_pipeline_runs_total{outcome="started"} 2"#));
        assert!(text.contains(r#"sitegate_pipeline_runs_total{outcome="failed"} 1"#));
    }
}
