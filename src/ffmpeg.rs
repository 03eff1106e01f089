use crate::options::{EncodeOptions, ImageEncodeOptions};
use crate::pipeline::Transcoder;
use crate::prelude::*;
use crate::strategy::EncodeAttempt;
use crate::util::iter;
use async_trait::async_trait;
use tokio::process::Command;

const DEFAULT_FF_ARGS: &[&str] = &["-y", "-loglevel", "warning"];
const STDERR_TAIL_CHARS: usize = 2048;

#[derive(Debug)]
pub(crate) struct FfmpegTranscoder;

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn encode(
        &self,
        input: &Utf8Path,
        attempt: &EncodeAttempt,
        output: &Utf8Path,
        opts: &EncodeOptions,
    ) -> Result<()> {
        run(&video_args(input, attempt, output, opts), output).await
    }

    async fn encode_image(&self, input: &Utf8Path, opts: &ImageEncodeOptions, output: &Utf8Path) -> Result<()> {
        run(&image_args(input, opts, output), output).await
    }
}

fn video_args(input: &Utf8Path, attempt: &EncodeAttempt, output: &Utf8Path, opts: &EncodeOptions) -> Vec<String> {
    let mut args: Vec<String> = DEFAULT_FF_ARGS.iter().map(ToString::to_string).collect();

    if attempt.loop_seconds > 0 {
        args.extend(iter::strs(["-stream_loop", "-1"]));
    }

    args.extend(iter::strs(["-i"]));
    args.push(input.to_string());
    args.extend(iter::strs(["-t"]));
    args.push(opts.trim_seconds.to_string());

    let mut filters = vec![format!("scale={}:{}:flags=lanczos", attempt.width, attempt.height)];
    if attempt.fps > 0 {
        filters.push(format!("fps={}", attempt.fps));
    }

    args.extend(iter::strs([
        "-vf",
        &filters.join(","),
        "-vcodec",
        "libvpx-vp9",
        "-b:v",
    ]));
    args.push(format!("{}k", attempt.bitrate_kbps));
    args.extend(iter::strs(["-an", "-fps_mode", "passthrough"]));
    args.push(output.to_string());
    args
}

fn image_args(input: &Utf8Path, opts: &ImageEncodeOptions, output: &Utf8Path) -> Vec<String> {
    let side = opts.target_side;
    let scale = format!("scale=iw*min({side}/iw\\,{side}/ih):ih*min({side}/iw\\,{side}/ih):flags=lanczos");
    let filter = if opts.pad_to_square {
        format!("{scale},pad={side}:{side}:-1:-1:color=0x00000000")
    } else {
        scale
    };

    let mut args: Vec<String> = DEFAULT_FF_ARGS.iter().map(ToString::to_string).collect();
    args.extend(iter::strs(["-i"]));
    args.push(input.to_string());
    args.extend(iter::strs(["-frames:v", "1", "-vf"]));
    args.push(filter);
    args.push(output.to_string());
    args
}

async fn run(args: &[String], output: &Utf8Path) -> Result<()> {
    debug!("ffmpeg {}", shlex::join(args.iter().map(String::as_str)));

    let result = Command::new("ffmpeg").args(args).output().await.context("failed to spawn ffmpeg")?;

    if result.status.success() {
        return Ok(());
    }

    write_error_log(output, &result.stdout, &result.stderr).await?;

    let tail = tail_chars(&String::from_utf8_lossy(&result.stderr), STDERR_TAIL_CHARS);
    bail!("ffmpeg exited with {}: {tail}", result.status);
}

async fn write_error_log(output: &Utf8Path, stdout: &[u8], stderr: &[u8]) -> Result<()> {
    let log_path = Utf8PathBuf::from(format!("{output}.ffmpeg-error.log"));
    let contents = format!(
        "STDOUT:\n{}\nSTDERR:\n{}\n",
        log_section(stdout),
        log_section(stderr),
    );

    fs::write(&log_path, contents)
        .await
        .with_context(|| format!("failed to write ffmpeg error log: {log_path}"))
}

fn log_section(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        "<empty>".to_owned()
    } else {
        trimmed.to_owned()
    }
}

fn tail_chars(text: &str, max_chars: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_chars {
        return text.to_owned();
    }
    chars[chars.len() - max_chars..].iter().collect()
}
