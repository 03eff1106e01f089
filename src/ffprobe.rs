use crate::media::{ImageInfo, MediaInfo};
use crate::pipeline::Prober;
use crate::prelude::*;
use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

#[derive(Debug)]
pub(crate) struct FfprobeProber;

#[async_trait]
impl Prober for FfprobeProber {
    async fn probe(&self, path: &Utf8Path) -> Result<MediaInfo> {
        let probe = run_ffprobe(path).await?;
        Ok(to_media_info(&probe))
    }

    async fn probe_image(&self, path: &Utf8Path) -> Result<ImageInfo> {
        let probe = run_ffprobe(path).await?;
        let stream = probe
            .streams
            .iter()
            .find(|stream| stream.codec_type.as_deref() == Some("video"))
            .context("no video stream found while probing image")?;

        Ok(ImageInfo {
            width: stream.width.unwrap_or(0),
            height: stream.height.unwrap_or(0),
            format: probe.format.format_name.split(',').next().unwrap_or_default().to_lowercase(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    format: FfprobeFormat,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    format_name: String,
    duration: Option<String>,
    bit_rate: Option<String>,
}

async fn run_ffprobe(path: &Utf8Path) -> Result<FfprobeOutput> {
    let args = ["-v", "error", "-show_entries", "stream:format", "-of", "json", path.as_str()];

    debug!("ffprobe {}", shlex::join(args));

    let output = Command::new("ffprobe").args(args).output().await.context("failed to spawn ffprobe")?;

    if !output.status.success() {
        bail!("ffprobe exited with {}: {}", output.status, String::from_utf8_lossy(&output.stderr));
    }

    serde_json::from_slice(&output.stdout).context("failed to parse ffprobe json output")
}

fn to_media_info(probe: &FfprobeOutput) -> MediaInfo {
    let video_stream = probe.streams.iter().find(|stream| stream.codec_type.as_deref() == Some("video"));
    let has_audio = probe.streams.iter().any(|stream| stream.codec_type.as_deref() == Some("audio"));

    let width = video_stream.and_then(|stream| stream.width).unwrap_or(0);
    let height = video_stream.and_then(|stream| stream.height).unwrap_or(0);
    let codec_name = video_stream.and_then(|stream| stream.codec_name.clone()).unwrap_or_default();

    let fps = video_stream.and_then(|stream| stream.r_frame_rate.as_deref()).map(parse_frame_rate).unwrap_or(0.0);

    let stream_duration =
        video_stream.and_then(|stream| stream.duration.as_deref()).map(parse_decimal).unwrap_or(0.0);
    let duration_seconds = if stream_duration != 0.0 {
        stream_duration
    } else {
        probe.format.duration.as_deref().map(parse_decimal).unwrap_or(0.0)
    };

    let bitrate_bps = probe.format.bit_rate.as_deref().map(parse_decimal).map(|value| value as u64).unwrap_or(0);

    MediaInfo {
        width,
        height,
        fps,
        duration_seconds,
        has_audio,
        format_name: probe.format.format_name.to_lowercase(),
        codec_name,
        bitrate_bps,
        input_size_bytes: 0,
    }
}

/// Parses a rational `"num/den"` frame rate. Anything that isn't exactly that
/// shape, or has a zero denominator, yields 0 rather than erroring.
pub(crate) fn parse_frame_rate(raw: &str) -> f64 {
    let Some((num, den)) = raw.split_once('/') else {
        return 0.0;
    };
    let (Ok(num), Ok(den)) = (num.parse::<f64>(), den.parse::<f64>()) else {
        return 0.0;
    };
    if den == 0.0 {
        return 0.0;
    }
    num / den
}

fn parse_decimal(raw: &str) -> f64 {
    raw.parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rational_frame_rate() {
        assert_eq!(parse_frame_rate("30/1"), 30.0);
        assert_eq!(parse_frame_rate("24000/1001"), 24000.0 / 1001.0);
    }

    #[test]
    fn malformed_or_zero_denominator_frame_rate_yields_zero() {
        assert_eq!(parse_frame_rate("0/0"), 0.0);
        assert_eq!(parse_frame_rate("30"), 0.0);
        assert_eq!(parse_frame_rate("nonsense"), 0.0);
        assert_eq!(parse_frame_rate("1/0"), 0.0);
    }

    #[test]
    fn parses_decimal_duration_and_bitrate() {
        assert_eq!(parse_decimal("3.5"), 3.5);
        assert_eq!(parse_decimal("garbage"), 0.0);
    }

    #[test]
    fn media_info_from_probe_json() {
        let probe: FfprobeOutput = serde_json::from_str(
            r#"{
                "streams": [
                    {"codec_type": "video", "codec_name": "vp9", "width": 512, "height": 512, "r_frame_rate": "30/1", "duration": "2.5"},
                    {"codec_type": "audio"}
                ],
                "format": {"format_name": "webm", "duration": "2.5", "bit_rate": "520000"}
            }"#,
        )
        .unwrap();

        let info = to_media_info(&probe);
        assert_eq!(info.width, 512);
        assert_eq!(info.fps, 30.0);
        assert!(info.has_audio);
        assert_eq!(info.codec_name, "vp9");
        assert_eq!(info.format_name, "webm");
        assert_eq!(info.bitrate_bps, 520_000);
    }

    #[test]
    fn stream_duration_takes_precedence_over_format_duration() {
        let probe: FfprobeOutput = serde_json::from_str(
            r#"{
                "streams": [
                    {"codec_type": "video", "width": 100, "height": 100, "r_frame_rate": "0/0", "duration": "1.2"}
                ],
                "format": {"format_name": "png_pipe", "duration": "9.9"}
            }"#,
        )
        .unwrap();

        let info = to_media_info(&probe);
        assert_eq!(info.duration_seconds, 1.2);
    }

    #[test]
    fn bitrate_is_read_only_from_format_never_from_the_stream() {
        let probe: FfprobeOutput = serde_json::from_str(
            r#"{
                "streams": [
                    {"codec_type": "video", "width": 100, "height": 100, "r_frame_rate": "30/1"}
                ],
                "format": {"format_name": "webm", "bit_rate": "12345"}
            }"#,
        )
        .unwrap();

        let info = to_media_info(&probe);
        assert_eq!(info.bitrate_bps, 12_345);
    }
}
