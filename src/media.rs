use crate::prelude::*;

#[derive(strum::Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "kebab-case")]
pub(crate) enum InputKind {
    Image,
    Gif,
    Video,
}

/// Metadata populated by a [`crate::pipeline::Prober`]. Unknown values are left
/// at their zero defaults; the post-encode probe of a job is the one that's
/// authoritative for validation.
#[derive(Debug, Clone, Default)]
pub(crate) struct MediaInfo {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) fps: f64,
    pub(crate) duration_seconds: f64,
    pub(crate) has_audio: bool,
    pub(crate) format_name: String,
    pub(crate) codec_name: String,
    pub(crate) bitrate_bps: u64,
    pub(crate) input_size_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ImageInfo {
    pub(crate) width: u32,
    pub(crate) height: u32,
    /// Lowercased container/format name, e.g. `"png"`.
    pub(crate) format: String,
}

const VIDEO_EXTS: &[&str] = &["mp4", "mov", "webm", "mkv", "avi"];
const IMAGE_EXTS: &[&str] = &["png", "jpg", "jpeg", "webp"];
const GIF_EXTS: &[&str] = &["gif"];

/// Classifies a path by its (lowercased) extension. The extension sets are
/// closed: anything outside of them is a classification failure, which
/// callers at selection time turn into a [`crate::job::Skipped`] entry rather
/// than aborting the run.
pub(crate) fn detect_input_kind(path: &Utf8Path) -> Result<InputKind> {
    let ext = path
        .extension()
        .map(str::to_lowercase)
        .unwrap_or_default();

    if GIF_EXTS.contains(&ext.as_str()) {
        return Ok(InputKind::Gif);
    }
    if IMAGE_EXTS.contains(&ext.as_str()) {
        return Ok(InputKind::Image);
    }
    if VIDEO_EXTS.contains(&ext.as_str()) {
        return Ok(InputKind::Video);
    }

    bail!("unsupported input: {path}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_extensions() {
        assert_eq!(detect_input_kind(Utf8Path::new("a.gif")).unwrap(), InputKind::Gif);
        assert_eq!(detect_input_kind(Utf8Path::new("a.PNG")).unwrap(), InputKind::Image);
        assert_eq!(detect_input_kind(Utf8Path::new("a.mkv")).unwrap(), InputKind::Video);
    }

    #[test]
    fn rejects_unknown_extension() {
        detect_input_kind(Utf8Path::new("a.txt")).unwrap_err();
        detect_input_kind(Utf8Path::new("a")).unwrap_err();
    }
}
