use crate::validate::ValidationIssue;
use std::fmt;

/// The reasons a single job can fail to produce a conforming artifact.
///
/// Classification failures never reach this type — they are recovered at
/// selection-expansion time into [`crate::job::Skipped`] entries.
#[derive(Debug)]
pub(crate) enum JobError {
    ProbeFailure(anyhow::Error),
    TranscodeFailure(anyhow::Error),
    OutputMissing(anyhow::Error),
    ValidationFailure { issues: Vec<ValidationIssue> },
    Cancelled,
}

impl fmt::Display for JobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProbeFailure(err) => write!(f, "failed to probe media: {err}"),
            Self::TranscodeFailure(err) => write!(f, "transcoder failed: {err}"),
            Self::OutputMissing(err) => write!(f, "output file is missing: {err}"),
            Self::ValidationFailure { issues } => {
                let first = issues.first().map(|issue| issue.message.as_str()).unwrap_or("validation failed");
                write!(f, "{first}")
            }
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::error::Error for JobError {}
