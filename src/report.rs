use std::fmt::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of one (group, profile entry) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Success,
    Skipped,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    pub group_name: String,
    pub postprocessor_id: String,
    pub output_path: PathBuf,
    pub status: JobStatus,
    pub message: String,
}

impl JobResult {
    pub fn success(group: &str, postprocessor: &str, output: &Path) -> Self {
        Self::new(group, postprocessor, output, JobStatus::Success, String::new())
    }

    pub fn skipped(group: &str, postprocessor: &str, output: &Path) -> Self {
        Self::new(
            group,
            postprocessor,
            output,
            JobStatus::Skipped,
            "existing file kept".to_string(),
        )
    }

    pub fn failed(group: &str, postprocessor: &str, output: &Path, message: String) -> Self {
        Self::new(group, postprocessor, output, JobStatus::Failed, message)
    }

    fn new(
        group: &str,
        postprocessor: &str,
        output: &Path,
        status: JobStatus,
        message: String,
    ) -> Self {
        Self {
            group_name: group.to_string(),
            postprocessor_id: postprocessor.to_string(),
            output_path: output.to_path_buf(),
            status,
            message,
        }
    }

    /// One line for the log sink.
    pub fn render_line(&self) -> String {
        let tag = match self.status {
            JobStatus::Success => "[OK  ]",
            JobStatus::Skipped => "[SKIP]",
            JobStatus::Failed => "[FAIL]",
        };
        let mut line = format!(
            "{tag} {} {} -> {}",
            self.group_name,
            self.postprocessor_id,
            self.output_path.display()
        );
        if self.status == JobStatus::Failed {
            let _ = write!(line, ": {}", self.message);
        }
        line
    }
}

/// Ordered log of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: String,
    pub mode: String,
    pub root: String,
    pub output_dir: PathBuf,
    pub results: Vec<JobResult>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_ms: i64,
}

impl RunReport {
    pub fn new(mode: &str, root: &str, output_dir: &Path) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            mode: mode.to_string(),
            root: root.to_string(),
            output_dir: output_dir.to_path_buf(),
            results: Vec::new(),
            started_at: Utc::now(),
            completed_at: None,
            duration_ms: 0,
        }
    }

    pub fn push(&mut self, result: JobResult) {
        self.results.push(result);
    }

    /// Stamps completion time and duration.
    pub fn finish(&mut self) {
        let now = Utc::now();
        self.duration_ms = (now - self.started_at).num_milliseconds();
        self.completed_at = Some(now);
    }

    #[allow(dead_code)]
    pub fn results(&self) -> &[JobResult] {
        &self.results
    }

    pub fn count(&self, status: JobStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    pub fn succeeded(&self) -> usize {
        self.count(JobStatus::Success)
    }

    pub fn skipped(&self) -> usize {
        self.count(JobStatus::Skipped)
    }

    pub fn failed(&self) -> usize {
        self.count(JobStatus::Failed)
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} succeeded, {} skipped, {} failed",
            self.succeeded(),
            self.skipped(),
            self.failed()
        )
    }

    /// One line per result, then the summary.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for result in &self.results {
            let _ = writeln!(out, "{}", result.render_line());
        }
        let _ = writeln!(out, "{}", self.summary());
        out
    }
}
