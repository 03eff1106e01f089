use crate::error::JobError;
use crate::media::InputKind;
use crate::prelude::*;
use crate::validate::ValidationIssue;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Job {
    pub(crate) input_path: Utf8PathBuf,
    pub(crate) kind: InputKind,
    /// Empty means "place output next to the input file".
    pub(crate) output_dir: Option<Utf8PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Skipped {
    pub(crate) path: Utf8PathBuf,
    pub(crate) reason: String,
}

/// The outcome of one job. Named `JobResult` in this crate to avoid shadowing
/// `anyhow::Result`, which is imported everywhere via the prelude.
#[derive(Debug)]
pub(crate) struct JobResult {
    pub(crate) input_path: Utf8PathBuf,
    pub(crate) output_path: Option<Utf8PathBuf>,
    pub(crate) err: Option<JobError>,
    pub(crate) issues: Vec<ValidationIssue>,
}

impl JobResult {
    pub(crate) fn success(input_path: Utf8PathBuf, output_path: Utf8PathBuf) -> Self {
        Self { input_path, output_path: Some(output_path), err: None, issues: Vec::new() }
    }

    pub(crate) fn failure(input_path: Utf8PathBuf, err: JobError) -> Self {
        Self { input_path, output_path: None, err: Some(err), issues: Vec::new() }
    }

    pub(crate) fn validation_failure(input_path: Utf8PathBuf, issues: Vec<ValidationIssue>) -> Self {
        Self {
            input_path,
            output_path: None,
            err: Some(JobError::ValidationFailure { issues: issues.clone() }),
            issues,
        }
    }

    pub(crate) fn ok(&self) -> bool {
        self.err.is_none() && self.issues.is_empty()
    }

    /// The single human-readable message a caller should surface for a
    /// failing job: the error text if present, else the first issue's message.
    pub(crate) fn message(&self) -> String {
        if self.ok() {
            return self.output_path.as_deref().map(ToString::to_string).unwrap_or_default();
        }
        if let Some(err) = &self.err {
            return err.to_string();
        }
        self.issues.first().map(|issue| issue.message.to_owned()).unwrap_or_default()
    }
}
