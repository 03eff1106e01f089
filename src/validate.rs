use crate::constraints::{
    EMOJI_SIDE, MAX_STICKER_DURATION_SECONDS, MAX_STICKER_FPS, MAX_STICKER_SIDE,
    MAX_STICKER_SIZE_BYTES, STATIC_STICKER_SIDE,
};
use crate::media::{ImageInfo, MediaInfo};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidationIssue {
    pub(crate) code: &'static str,
    pub(crate) message: &'static str,
}

impl ValidationIssue {
    const fn new(code: &'static str, message: &'static str) -> Self {
        Self { code, message }
    }
}

/// Evaluates every video rule against the produced file; never short-circuits
/// on the first violation, so a caller sees the full list.
pub(crate) fn validate_video_output(info: &MediaInfo, size_bytes: u64) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if size_bytes > MAX_STICKER_SIZE_BYTES {
        issues.push(ValidationIssue::new("size", "size exceeds limit"));
    }
    if info.fps > f64::from(MAX_STICKER_FPS) {
        issues.push(ValidationIssue::new("fps", "fps exceeds limit"));
    }
    if info.duration_seconds > f64::from(MAX_STICKER_DURATION_SECONDS) {
        issues.push(ValidationIssue::new("duration", "duration exceeds limit"));
    }
    if info.has_audio {
        issues.push(ValidationIssue::new("audio", "audio stream present"));
    }
    if !info.codec_name.to_lowercase().contains("vp9") {
        issues.push(ValidationIssue::new("codec", "codec is not vp9"));
    }
    if !info.format_name.to_lowercase().contains("webm") {
        issues.push(ValidationIssue::new("format", "format is not webm"));
    }
    if info.width != MAX_STICKER_SIDE && info.height != MAX_STICKER_SIDE {
        issues.push(ValidationIssue::new("size", "one side must be 512"));
    }
    if info.width > MAX_STICKER_SIDE || info.height > MAX_STICKER_SIDE {
        issues.push(ValidationIssue::new("size", "dimension exceeds 512"));
    }

    issues
}

pub(crate) fn validate_static_sticker_image(info: &ImageInfo) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if !is_png(&info.format) {
        issues.push(ValidationIssue::new("format", "format is not png"));
    }
    if info.width != STATIC_STICKER_SIDE && info.height != STATIC_STICKER_SIDE {
        issues.push(ValidationIssue::new("size", "one side must be 512"));
    }
    if info.width > STATIC_STICKER_SIDE || info.height > STATIC_STICKER_SIDE {
        issues.push(ValidationIssue::new("size", "dimension exceeds 512"));
    }

    issues
}

pub(crate) fn validate_emoji_image(info: &ImageInfo) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if !is_png(&info.format) {
        issues.push(ValidationIssue::new("format", "format is not png"));
    }
    if info.width != EMOJI_SIDE || info.height != EMOJI_SIDE {
        issues.push(ValidationIssue::new("size", "dimension must be 100x100"));
    }

    issues
}

fn is_png(format: &str) -> bool {
    format.eq_ignore_ascii_case("png")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conforming_video() -> MediaInfo {
        MediaInfo {
            width: 512,
            height: 288,
            fps: 24.0,
            duration_seconds: 2.5,
            has_audio: false,
            format_name: "webm".to_owned(),
            codec_name: "vp9".to_owned(),
            bitrate_bps: 0,
            input_size_bytes: 0,
        }
    }

    #[test]
    fn conforming_video_has_no_issues() {
        assert_eq!(validate_video_output(&conforming_video(), 1000), Vec::new());
    }

    #[test]
    fn every_rule_can_fire_independently() {
        let mut info = conforming_video();
        info.width = 600;
        info.height = 600;
        let issues = validate_video_output(&info, MAX_STICKER_SIZE_BYTES + 1);
        let codes: Vec<_> = issues.iter().map(|i| i.code).collect();
        assert!(codes.contains(&"size"));
    }

    #[test]
    fn both_size_rules_fire_together() {
        // neither side is 512, and one side exceeds 512: both issues appear.
        let mut info = conforming_video();
        info.width = 600;
        info.height = 600;
        let issues = validate_video_output(&info, 0);
        let size_issues: Vec<_> = issues.iter().filter(|i| i.code == "size").collect();
        assert_eq!(size_issues.len(), 2);
        assert_eq!(size_issues[0].message, "one side must be 512");
        assert_eq!(size_issues[1].message, "dimension exceeds 512");
    }

    #[test]
    fn emoji_image_scenarios() {
        assert_eq!(
            validate_emoji_image(&ImageInfo { width: 100, height: 100, format: "png".into() }),
            Vec::new()
        );
        assert_eq!(
            validate_emoji_image(&ImageInfo { width: 100, height: 100, format: "jpeg".into() }),
            vec![ValidationIssue::new("format", "format is not png")]
        );
    }

    #[test]
    fn static_sticker_image_scenarios() {
        assert_eq!(
            validate_static_sticker_image(&ImageInfo { width: 512, height: 300, format: "png".into() }),
            Vec::new()
        );
        assert_eq!(
            validate_static_sticker_image(&ImageInfo { width: 600, height: 600, format: "png".into() })
                .len(),
            2
        );
    }
}
