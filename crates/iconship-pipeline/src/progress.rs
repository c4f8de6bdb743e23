/// Position of a step about to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepProgress<'a> {
    /// One-based.
    pub index: usize,
    pub total: usize,
    pub title: &'a str,
}

impl std::fmt::Display for StepProgress<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}/{}] {}", self.index, self.total, self.title)
    }
}

/// Receives a notification before each step runs.
pub trait ProgressSink {
    fn step_started(&self, progress: StepProgress<'_>);
}

pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn step_started(&self, _progress: StepProgress<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_label_format() {
        let progress = StepProgress {
            index: 3,
            total: 9,
            title: "Bump package versions",
        };
        assert_eq!(progress.to_string(), "[3/9] Bump package versions");
    }
}
