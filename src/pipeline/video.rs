use crate::constraints::MAX_STICKER_DURATION_SECONDS;
use crate::error::JobError;
use crate::job::{Job, JobResult};
use crate::media::MediaInfo;
use crate::options::EncodeOptions;
use crate::pipeline::{Prober, Transcoder};
use crate::prelude::*;
use crate::strategy::build_attempts;
use crate::validate::{validate_video_output, ValidationIssue};
use std::sync::atomic::{AtomicBool, Ordering};

enum LastFailure {
    Error(JobError),
    Issues(Vec<ValidationIssue>),
}

pub(crate) fn output_path(job: &Job) -> Result<Utf8PathBuf> {
    let stem = job
        .input_path
        .file_stem()
        .with_context(|| format!("input must have a file name, but got `{}`", job.input_path))?;
    let dir = job
        .output_dir
        .clone()
        .or_else(|| job.input_path.parent().map(ToOwned::to_owned))
        .unwrap_or_else(|| ".".into());
    Ok(dir.join(format!("{stem}_sticker.webm")))
}

/// Probe → attempt loop (encode → probe → validate, retrying on failure) →
/// final `JobResult`. Never short-circuits with `?` inside the attempt loop:
/// every failure mode advances to the next attempt until the list is
/// exhausted or cancellation is observed.
#[instrument(skip(transcoder, prober, cancelled), fields(input = %job.input_path))]
pub(crate) async fn run(
    transcoder: &dyn Transcoder,
    prober: &dyn Prober,
    job: &Job,
    cancelled: &AtomicBool,
) -> JobResult {
    let mut info = match prober.probe(&job.input_path).await {
        Ok(info) => info,
        Err(err) => return JobResult::failure(job.input_path.clone(), JobError::ProbeFailure(err)),
    };

    info.input_size_bytes = fs::metadata(&job.input_path).await.map(|meta| meta.len()).unwrap_or(0);

    let attempts = match build_attempts(&info, job.kind) {
        Ok(attempts) => attempts,
        Err(err) => return JobResult::failure(job.input_path.clone(), JobError::ProbeFailure(err)),
    };

    let output = match output_path(job) {
        Ok(output) => output,
        Err(err) => return JobResult::failure(job.input_path.clone(), JobError::OutputMissing(err)),
    };

    if let Some(dir) = &job.output_dir {
        if let Err(err) = fs::create_dir_all(dir).await {
            return JobResult::failure(job.input_path.clone(), JobError::OutputMissing(err.into()));
        }
    }

    let opts = EncodeOptions::builder().trim_seconds(MAX_STICKER_DURATION_SECONDS).build();
    let mut last_failure = None;

    for attempt in &attempts {
        if cancelled.load(Ordering::SeqCst) {
            return JobResult::failure(job.input_path.clone(), JobError::Cancelled);
        }

        if let Err(err) = transcoder.encode(&job.input_path, attempt, &output, &opts).await {
            last_failure = Some(LastFailure::Error(JobError::TranscodeFailure(err)));
            continue;
        }

        let size_bytes = match fs::metadata(&output).await {
            Ok(meta) => meta.len(),
            Err(err) => {
                last_failure = Some(LastFailure::Error(JobError::OutputMissing(err.into())));
                continue;
            }
        };

        let out_info: MediaInfo = match prober.probe(&output).await {
            Ok(info) => info,
            Err(err) => {
                last_failure = Some(LastFailure::Error(JobError::ProbeFailure(err)));
                continue;
            }
        };

        let issues = validate_video_output(&out_info, size_bytes);
        if issues.is_empty() {
            return JobResult::success(job.input_path.clone(), output);
        }
        last_failure = Some(LastFailure::Issues(issues));
    }

    match last_failure {
        Some(LastFailure::Issues(issues)) => JobResult::validation_failure(job.input_path.clone(), issues),
        Some(LastFailure::Error(err)) => JobResult::failure(job.input_path.clone(), err),
        None => JobResult::failure(job.input_path.clone(), JobError::Cancelled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::InputKind;
    use crate::pipeline::testing::{MockProber, MockTranscoder};

    fn conforming_info() -> MediaInfo {
        MediaInfo {
            width: 512,
            height: 512,
            fps: 24.0,
            duration_seconds: 2.0,
            has_audio: false,
            format_name: "webm".to_owned(),
            codec_name: "vp9".to_owned(),
            bitrate_bps: 1_000_000,
            input_size_bytes: 0,
        }
    }

    #[test_log::test(tokio::test)]
    async fn succeeds_on_first_attempt_when_output_already_conforms() {
        let dir = tempfile::tempdir().unwrap();
        let input = Utf8PathBuf::try_from(dir.path().join("in.mp4")).unwrap();
        fs::write(&input, b"src").await.unwrap();

        let transcoder = MockTranscoder::failing_first(0);
        let prober = MockProber { media: conforming_info(), image: Default::default() };
        let job = Job { input_path: input, kind: InputKind::Video, output_dir: None };
        let cancelled = AtomicBool::new(false);

        let result = run(&transcoder, &prober, &job, &cancelled).await;
        assert!(result.ok(), "{:?}", result.err);
        assert_eq!(transcoder.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn retries_until_an_attempt_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let input = Utf8PathBuf::try_from(dir.path().join("in.mp4")).unwrap();
        fs::write(&input, b"src").await.unwrap();

        let transcoder = MockTranscoder::failing_first(2);
        let prober = MockProber { media: conforming_info(), image: Default::default() };
        let job = Job { input_path: input, kind: InputKind::Video, output_dir: None };
        let cancelled = AtomicBool::new(false);

        let result = run(&transcoder, &prober, &job, &cancelled).await;
        assert!(result.ok());
        assert_eq!(transcoder.calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn cancellation_before_first_attempt_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let input = Utf8PathBuf::try_from(dir.path().join("in.mp4")).unwrap();
        fs::write(&input, b"src").await.unwrap();

        let transcoder = MockTranscoder::failing_first(0);
        let prober = MockProber { media: conforming_info(), image: Default::default() };
        let job = Job { input_path: input, kind: InputKind::Video, output_dir: None };
        let cancelled = AtomicBool::new(true);

        let result = run(&transcoder, &prober, &job, &cancelled).await;
        assert!(!result.ok());
        assert!(matches!(result.err, Some(JobError::Cancelled)));
        assert_eq!(transcoder.calls.lock().unwrap().len(), 0);
    }
}
