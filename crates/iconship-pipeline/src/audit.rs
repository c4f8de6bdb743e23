use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StepStatus {
    Executed,
    Failed,
    /// Never started because an earlier step failed.
    NotRun,
}

#[derive(Debug)]
pub struct StepRecord {
    pub name: String,
    pub status: StepStatus,
    pub started_at: Option<Instant>,
    pub completed_at: Option<Instant>,
}

/// Ordered record of every step in a run.
#[derive(Debug, Default)]
pub struct PipelineAuditLog {
    records: Vec<StepRecord>,
}

impl PipelineAuditLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_start(&mut self, name: &str) {
        self.records.push(StepRecord {
            name: name.to_string(),
            status: StepStatus::Executed,
            started_at: Some(Instant::now()),
            completed_at: None,
        });
    }

    pub(crate) fn record_success(&mut self) {
        if let Some(record) = self.records.last_mut() {
            record.status = StepStatus::Executed;
            record.completed_at = Some(Instant::now());
        }
    }

    pub(crate) fn record_failure(&mut self) {
        if let Some(record) = self.records.last_mut() {
            record.status = StepStatus::Failed;
            record.completed_at = Some(Instant::now());
        }
    }

    pub(crate) fn record_not_run(&mut self, name: &str) {
        self.records.push(StepRecord {
            name: name.to_string(),
            status: StepStatus::NotRun,
            started_at: None,
            completed_at: None,
        });
    }

    #[must_use]
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    #[must_use]
    pub fn executed(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| r.status == StepStatus::Executed)
            .map(|r| r.name.as_str())
            .collect()
    }

    #[must_use]
    pub fn summary(&self) -> String {
        self.records
            .iter()
            .map(|record| {
                let status = match record.status {
                    StepStatus::Executed => "✓",
                    StepStatus::Failed => "✗",
                    StepStatus::NotRun => "·",
                };
                format!("{status} {}", record.name)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
