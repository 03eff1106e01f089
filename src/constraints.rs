//! Hard-coded sticker/emoji budget constants and the aspect-preserving scale
//! helper every other module builds on.

pub(crate) const MAX_STICKER_SIDE: u32 = 512;
pub(crate) const MAX_STICKER_FPS: u32 = 30;
pub(crate) const MAX_STICKER_DURATION_SECONDS: u32 = 3;
pub(crate) const MAX_STICKER_SIZE_BYTES: u64 = 256 * 1024;

pub(crate) const DEFAULT_IMAGE_FPS: u32 = 30;
pub(crate) const DEFAULT_IMAGE_DURATION: u32 = 3;

pub(crate) const STATIC_STICKER_SIDE: u32 = 512;
pub(crate) const EMOJI_SIDE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Size {
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl Size {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Returns the largest `(w, h)` such that `max(w, h) == max_side` and the
/// source aspect ratio is preserved. The shorter side is floor-truncated and
/// clamped up to 1 so it is never zero.
pub(crate) fn scale_to_fit(src: Size, max_side: u32) -> anyhow::Result<Size> {
    anyhow::ensure!(
        src.width > 0 && src.height > 0,
        "invalid size: {}x{}",
        src.width,
        src.height
    );

    if src.width == src.height {
        return Ok(Size::new(max_side, max_side));
    }

    if src.width > src.height {
        let height = (f64::from(src.height) * f64::from(max_side) / f64::from(src.width)) as u32;
        return Ok(Size::new(max_side, height.max(1)));
    }

    let width = (f64::from(src.width) * f64::from(max_side) / f64::from(src.height)) as u32;
    Ok(Size::new(width.max(1), max_side))
}
