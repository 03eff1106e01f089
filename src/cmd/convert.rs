use crate::dispatch::{self, DispatchObserver};
use crate::ffmpeg::FfmpegTranscoder;
use crate::ffprobe::FfprobeProber;
use crate::fs::{validate_output_files_overwriting, RealListFiles};
use crate::job::JobResult;
use crate::pipeline::{image, video};
use crate::prelude::*;
use crate::selection::{expand, SelectionItem};
use crate::target::{evaluate_target, filter_jobs_for_target, summarize_jobs, TargetStatus, TargetType};
use async_trait::async_trait;
use clap::Parser;
use std::num::NonZeroUsize;

/// Converts the given files (or every supported file under a directory) into
/// sticker or emoji artifacts for one target kind.
#[derive(Parser, Debug)]
pub struct Convert {
    /// Files or directories to convert
    #[clap(short, long, required = true)]
    input: Vec<Utf8PathBuf>,

    /// Directory to place output files in; defaults next to each input
    #[clap(short, long, default_value = "")]
    output_dir: String,

    /// Maximum number of jobs to run concurrently
    #[clap(long)]
    concurrency: Option<NonZeroUsize>,

    /// Skip the overwrite confirmation prompt
    #[clap(long)]
    yes: bool,
}

impl Convert {
    pub(crate) async fn run(self, target: TargetType) -> Result<()> {
        let mut selections = Vec::with_capacity(self.input.len());
        for path in &self.input {
            let is_dir = fs::metadata(path).await.with_context(|| format!("failed to stat input: {path}"))?.is_dir();
            selections.push(SelectionItem { path: path.clone(), is_dir });
        }

        let expanded = expand(&RealListFiles, &selections, &self.output_dir).await?;

        for skipped in &expanded.skipped {
            warn!("Skipping {}: {}", skipped.path, skipped.reason);
        }

        let summary = summarize_jobs(&expanded.jobs);
        let hint = evaluate_target(summary, target);
        match hint.status {
            TargetStatus::Blocked => bail!("{}", hint.message),
            TargetStatus::Warning => warn!("{}", hint.message),
            TargetStatus::Ok => {}
        }

        let jobs = filter_jobs_for_target(&expanded.jobs, target);

        for dir in &expanded.output_dirs {
            fs::create_dir_all(dir).await.with_context(|| format!("failed to create output directory: {dir}"))?;
        }

        let output_paths = jobs
            .iter()
            .map(|job| match target {
                TargetType::VideoSticker => video::output_path(job),
                TargetType::StaticSticker | TargetType::Emoji => image::output_path(job, target),
            })
            .try_collect::<Vec<_>>()?;

        validate_output_files_overwriting(self.yes, output_paths).await?;

        let concurrency = self.concurrency.unwrap_or_else(dispatch::default_concurrency);

        let transcoder = FfmpegTranscoder;
        let prober = FfprobeProber;
        let observer = CliObserver;

        let summary = dispatch::run(&transcoder, &prober, &jobs, target, concurrency, &observer, expanded.skipped.len()).await;

        info!(
            "Finished {}: {}/{} succeeded, {} failed, {} skipped",
            target.label(),
            summary.success,
            summary.total,
            summary.failed,
            summary.skipped,
        );

        if summary.failed > 0 {
            bail!("{} of {} job(s) failed", summary.failed, summary.total);
        }

        Ok(())
    }
}

#[derive(Debug)]
struct CliObserver;

#[async_trait]
impl DispatchObserver for CliObserver {
    async fn started(&self, index: usize, input_path: &Utf8Path) {
        info!("[{}] Starting {input_path}", index + 1);
    }

    async fn finished(&self, index: usize, result: &JobResult) {
        if !result.ok() {
            error!("[{}] Failed: {}", index + 1, result.message());
            return;
        }

        let size = match &result.output_path {
            Some(path) => fs::metadata(path).await.map(|meta| crate::display::human_size(meta.len())).ok(),
            None => None,
        };

        match size {
            Some(size) => info!("[{}] Done: {} ({size})", index + 1, result.message()),
            None => info!("[{}] Done: {}", index + 1, result.message()),
        }
    }
}
