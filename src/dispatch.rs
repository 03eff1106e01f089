//! Concurrent worker-pool fan-out over a filtered job list, with cooperative
//! cancellation on Ctrl+C.

use crate::error::JobError;
use crate::job::{Job, JobResult};
use crate::pipeline::{image, video, Prober, Transcoder};
use crate::prelude::*;
use crate::target::TargetType;
use async_trait::async_trait;
use futures::prelude::*;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The two signals a caller (CLI reporter, or a hypothetical GUI) can
/// subscribe to without the dispatcher knowing which kind of subscriber it
/// has.
#[async_trait]
pub(crate) trait DispatchObserver: Send + Sync {
    async fn started(&self, index: usize, input_path: &Utf8Path);
    async fn finished(&self, index: usize, result: &JobResult);
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct DispatchSummary {
    pub(crate) total: usize,
    pub(crate) completed: usize,
    pub(crate) success: usize,
    pub(crate) failed: usize,
    pub(crate) skipped: usize,
}

pub(crate) fn default_concurrency() -> NonZeroUsize {
    std::thread::available_parallelism().unwrap_or_else(|err| {
        let default = NonZeroUsize::new(1).unwrap();
        warn!(
            err = &err as &dyn std::error::Error,
            "failed to query the system's available parallelism, falling back to {default}",
        );
        default
    })
}

#[instrument(skip_all, fields(jobs = jobs.len(), target = %target))]
pub(crate) async fn run(
    transcoder: &dyn Transcoder,
    prober: &dyn Prober,
    jobs: &[Job],
    target: TargetType,
    concurrency: NonZeroUsize,
    observer: &dyn DispatchObserver,
    skipped: usize,
) -> DispatchSummary {
    let cancelled = Arc::new(AtomicBool::new(false));

    let results_future = stream::iter(jobs.iter().enumerate())
        .map(|(index, job)| {
            let cancelled = cancelled.clone();
            run_one(transcoder, prober, job, target, index, observer, cancelled)
                .instrument(info_span!("job", id = index + 1))
        })
        .buffer_unordered(concurrency.get())
        .collect::<Vec<_>>();

    let results = drain_with_cancellation(results_future, &cancelled).await;

    let mut summary = DispatchSummary { total: jobs.len(), skipped, ..Default::default() };
    for result in &results {
        summary.completed += 1;
        if result.ok() {
            summary.success += 1;
        } else {
            summary.failed += 1;
        }
    }
    summary
}

async fn run_one(
    transcoder: &dyn Transcoder,
    prober: &dyn Prober,
    job: &Job,
    target: TargetType,
    index: usize,
    observer: &dyn DispatchObserver,
    cancelled: Arc<AtomicBool>,
) -> JobResult {
    if cancelled.load(Ordering::SeqCst) {
        return JobResult::failure(job.input_path.clone(), JobError::Cancelled);
    }

    observer.started(index, &job.input_path).await;

    let result = match target {
        TargetType::VideoSticker => video::run(transcoder, prober, job, &cancelled).await,
        TargetType::StaticSticker | TargetType::Emoji => image::run(transcoder, prober, job, target).await,
    };

    observer.finished(index, &result).await;
    result
}

/// Drives `results` to completion while racing a Ctrl+C listener. A received
/// signal only flips the shared flag — it never aborts `results` itself, so
/// in-flight transcoder calls are allowed to finish (their eventual output is
/// just discarded via a `Cancelled` result at the next checkpoint).
async fn drain_with_cancellation<F>(results: F, cancelled: &AtomicBool) -> F::Output
where
    F: Future,
{
    tokio::pin!(results);
    let mut ctrl_c = Box::pin(tokio::signal::ctrl_c());

    loop {
        tokio::select! {
            output = &mut results => return output,
            signal = &mut ctrl_c, if !cancelled.load(Ordering::SeqCst) => {
                if signal.is_ok() {
                    warn!("Cancelling... running tasks will finish.");
                    cancelled.store(true, Ordering::SeqCst);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::InputKind;
    use crate::pipeline::testing::{MockProber, MockTranscoder};
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct RecordingObserver {
        started: Mutex<Vec<usize>>,
        finished: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl DispatchObserver for RecordingObserver {
        async fn started(&self, index: usize, _input_path: &Utf8Path) {
            self.started.lock().unwrap().push(index);
        }

        async fn finished(&self, index: usize, _result: &JobResult) {
            self.finished.lock().unwrap().push(index);
        }
    }

    #[test_log::test(tokio::test)]
    async fn summary_counts_match_job_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let mut jobs = Vec::new();
        for i in 0..3 {
            let input = Utf8PathBuf::try_from(dir.path().join(format!("{i}.png"))).unwrap();
            fs::write(&input, b"x").await.unwrap();
            jobs.push(Job { input_path: input, kind: InputKind::Image, output_dir: None });
        }

        let transcoder = MockTranscoder::failing_first(0);
        let prober = MockProber {
            media: Default::default(),
            image: crate::media::ImageInfo { width: 100, height: 100, format: "png".to_owned() },
        };
        let observer = RecordingObserver::default();

        let summary = run(&transcoder, &prober, &jobs, TargetType::Emoji, NonZeroUsize::new(2).unwrap(), &observer, 2).await;

        assert_eq!(summary.total, 3);
        assert_eq!(summary.completed, 3);
        assert_eq!(summary.success, 3);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.skipped, 2);
        assert_eq!(observer.started.lock().unwrap().len(), 3);
        assert_eq!(observer.finished.lock().unwrap().len(), 3);
    }
}
