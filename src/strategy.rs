//! The ordered `EncodeAttempt` generator. See `SPEC_FULL.md` §4.3 — this is
//! the single most load-bearing module in the crate.

use crate::constraints::{
    scale_to_fit, Size, DEFAULT_IMAGE_DURATION, DEFAULT_IMAGE_FPS, MAX_STICKER_DURATION_SECONDS,
    MAX_STICKER_FPS, MAX_STICKER_SIDE, MAX_STICKER_SIZE_BYTES,
};
use crate::media::{InputKind, MediaInfo};

const BITRATE_STEPS: [f64; 6] = [1.00, 0.85, 0.70, 0.55, 0.45, 0.30];
const SCALE_STEPS: [f64; 4] = [0.9, 0.8, 0.7, 0.6];
const FPS_FALLBACK_CANDIDATES: [u32; 3] = [24, 20, 15];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EncodeAttempt {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) fps: u32,
    pub(crate) bitrate_kbps: i64,
    pub(crate) duration_seconds: u32,
    pub(crate) input_kind: InputKind,
    pub(crate) loop_seconds: u32,
}

pub(crate) fn build_attempts(info: &MediaInfo, kind: InputKind) -> anyhow::Result<Vec<EncodeAttempt>> {
    let scaled = scale_to_fit(Size::new(info.width, info.height), MAX_STICKER_SIDE)?;

    let base_attempt_fps = pick_base_attempt_fps(info, kind);
    let (fallback_base_fps, allow_fps_fallback) = pick_fallback_base_fps(info, kind);
    let fps_fallback_steps = build_fps_fallback_steps(fallback_base_fps, allow_fps_fallback);

    let base_duration = pick_base_duration(info, kind);
    let bitrate_base = pick_bitrate_base(base_duration);

    let source_size = estimate_source_size_bytes(info.input_size_bytes, info.bitrate_bps, base_duration);
    let bitrate_steps = choose_bitrate_steps(&BITRATE_STEPS, source_size, MAX_STICKER_SIZE_BYTES);

    let loop_seconds = if matches!(kind, InputKind::Image | InputKind::Gif) {
        DEFAULT_IMAGE_DURATION
    } else {
        0
    };

    let mut attempts = Vec::with_capacity(bitrate_steps.len() * (1 + SCALE_STEPS.len() + fps_fallback_steps.len()));

    // Primary band: native (scaled) dimensions, base fps, every bitrate step.
    for &step in &bitrate_steps {
        attempts.push(EncodeAttempt {
            width: scaled.width,
            height: scaled.height,
            fps: base_attempt_fps,
            bitrate_kbps: truncate_bitrate(bitrate_base, step),
            duration_seconds: base_duration,
            input_kind: kind,
            loop_seconds,
        });
    }

    // Scale-down band: progressively smaller dimensions, same fps, every bitrate step.
    for &scale in &SCALE_STEPS {
        let width = ((f64::from(scaled.width) * scale) as u32).max(1);
        let height = ((f64::from(scaled.height) * scale) as u32).max(1);
        for &step in &bitrate_steps {
            attempts.push(EncodeAttempt {
                width,
                height,
                fps: base_attempt_fps,
                bitrate_kbps: truncate_bitrate(bitrate_base, step),
                duration_seconds: base_duration,
                input_kind: kind,
                loop_seconds,
            });
        }
    }

    // FPS-fallback band: native dimensions, a reduced fps, every bitrate step.
    for &fps in &fps_fallback_steps {
        for &step in &bitrate_steps {
            attempts.push(EncodeAttempt {
                width: scaled.width,
                height: scaled.height,
                fps,
                bitrate_kbps: truncate_bitrate(bitrate_base, step),
                duration_seconds: base_duration,
                input_kind: kind,
                loop_seconds,
            });
        }
    }

    Ok(attempts)
}

fn truncate_bitrate(bitrate_base: i64, step: f64) -> i64 {
    (bitrate_base as f64 * step) as i64
}

fn pick_base_duration(info: &MediaInfo, kind: InputKind) -> u32 {
    if matches!(kind, InputKind::Image | InputKind::Gif) {
        return DEFAULT_IMAGE_DURATION;
    }
    if info.duration_seconds > 0.0 && info.duration_seconds < f64::from(MAX_STICKER_DURATION_SECONDS) {
        return info.duration_seconds.ceil() as u32;
    }
    MAX_STICKER_DURATION_SECONDS
}

fn pick_bitrate_base(base_duration: u32) -> i64 {
    let bitrate = (f64::from(MAX_STICKER_SIZE_BYTES as u32) * 8.0 / f64::from(base_duration) / 1000.0) as i64;
    bitrate.max(150)
}

fn pick_base_attempt_fps(info: &MediaInfo, kind: InputKind) -> u32 {
    match kind {
        InputKind::Image => DEFAULT_IMAGE_FPS,
        InputKind::Video | InputKind::Gif if info.fps > f64::from(MAX_STICKER_FPS) => MAX_STICKER_FPS,
        _ => 0,
    }
}

fn pick_fallback_base_fps(info: &MediaInfo, kind: InputKind) -> (u32, bool) {
    if kind == InputKind::Image {
        return (DEFAULT_IMAGE_FPS, true);
    }
    if info.fps <= 0.0 {
        return (0, false);
    }
    let base_fps = info.fps.min(f64::from(MAX_STICKER_FPS)) as u32;
    if base_fps == 0 {
        return (0, false);
    }
    (base_fps, true)
}

fn build_fps_fallback_steps(base_fps: u32, allow: bool) -> Vec<u32> {
    if !allow {
        return Vec::new();
    }
    FPS_FALLBACK_CANDIDATES
        .into_iter()
        .filter(|&fps| fps > 0 && fps < base_fps)
        .collect()
}

fn estimate_source_size_bytes(input_size_bytes: u64, bitrate_bps: u64, duration_seconds: u32) -> u64 {
    let size_by_bitrate = if bitrate_bps > 0 && duration_seconds > 0 {
        bitrate_bps * u64::from(duration_seconds) / 8
    } else {
        0
    };
    input_size_bytes.max(size_by_bitrate)
}

fn choose_bitrate_steps(steps: &[f64; 6], source_size_bytes: u64, target_size_bytes: u64) -> Vec<f64> {
    if source_size_bytes == 0 || target_size_bytes == 0 {
        return steps.to_vec();
    }
    let ratio = target_size_bytes as f64 / source_size_bytes as f64;
    let preferred = pick_bitrate_step(ratio);
    reorder_steps(steps, preferred)
}

fn pick_bitrate_step(ratio: f64) -> f64 {
    if ratio >= 0.9 {
        1.0
    } else if ratio >= 0.7 {
        0.85
    } else if ratio >= 0.5 {
        0.70
    } else {
        0.55
    }
}

fn reorder_steps(steps: &[f64; 6], first: f64) -> Vec<f64> {
    if !steps.contains(&first) {
        return steps.to_vec();
    }
    let mut reordered: Vec<f64> = steps.iter().copied().filter(|&s| s == first).collect();
    reordered.extend(steps.iter().copied().filter(|&s| s != first));
    reordered
}
