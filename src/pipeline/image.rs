use crate::constraints::{EMOJI_SIDE, STATIC_STICKER_SIDE};
use crate::error::JobError;
use crate::job::{Job, JobResult};
use crate::options::ImageEncodeOptions;
use crate::pipeline::{Prober, Transcoder};
use crate::prelude::*;
use crate::target::TargetType;
use crate::validate::{validate_emoji_image, validate_static_sticker_image};

pub(crate) fn options_for_target(target: TargetType) -> ImageEncodeOptions {
    match target {
        TargetType::StaticSticker => ImageEncodeOptions::builder().target_side(STATIC_STICKER_SIDE).build(),
        TargetType::Emoji => ImageEncodeOptions::builder().target_side(EMOJI_SIDE).pad_to_square(true).build(),
        TargetType::VideoSticker => unreachable!("image pipeline only ever runs against image targets"),
    }
}

pub(crate) fn output_path(job: &Job, target: TargetType) -> Result<Utf8PathBuf> {
    let stem = job
        .input_path
        .file_stem()
        .with_context(|| format!("input must have a file name, but got `{}`", job.input_path))?;
    let dir = job
        .output_dir
        .clone()
        .or_else(|| job.input_path.parent().map(ToOwned::to_owned))
        .unwrap_or_else(|| ".".into());
    let suffix = match target {
        TargetType::StaticSticker => "sticker",
        TargetType::Emoji => "emoji",
        TargetType::VideoSticker => unreachable!("image pipeline only ever runs against image targets"),
    };
    Ok(dir.join(format!("{stem}_{suffix}.png")))
}

/// Single-attempt pipeline: encode → probe → validate, no retry.
#[instrument(skip(transcoder, prober), fields(input = %job.input_path))]
pub(crate) async fn run(
    transcoder: &dyn Transcoder,
    prober: &dyn Prober,
    job: &Job,
    target: TargetType,
) -> JobResult {
    let opts = options_for_target(target);

    let output = match output_path(job, target) {
        Ok(output) => output,
        Err(err) => return JobResult::failure(job.input_path.clone(), JobError::OutputMissing(err)),
    };

    if let Some(dir) = &job.output_dir {
        if let Err(err) = fs::create_dir_all(dir).await {
            return JobResult::failure(job.input_path.clone(), JobError::OutputMissing(err.into()));
        }
    }

    if let Err(err) = transcoder.encode_image(&job.input_path, &opts, &output).await {
        return JobResult::failure(job.input_path.clone(), JobError::TranscodeFailure(err));
    }

    let info = match prober.probe_image(&output).await {
        Ok(info) => info,
        Err(err) => return JobResult::failure(job.input_path.clone(), JobError::ProbeFailure(err)),
    };

    let issues = match target {
        TargetType::StaticSticker => validate_static_sticker_image(&info),
        TargetType::Emoji => validate_emoji_image(&info),
        TargetType::VideoSticker => unreachable!("image pipeline only ever runs against image targets"),
    };

    if issues.is_empty() {
        return JobResult::success(job.input_path.clone(), output);
    }
    JobResult::validation_failure(job.input_path.clone(), issues)
}
