//! The two per-target execution pipelines (video retry loop, image
//! single-attempt) and the collaborator traits they drive.

pub(crate) mod image;
#[cfg(test)]
pub(crate) mod testing;
pub(crate) mod video;

use crate::media::{ImageInfo, MediaInfo};
use crate::options::{EncodeOptions, ImageEncodeOptions};
use crate::prelude::*;
use crate::strategy::EncodeAttempt;
use async_trait::async_trait;
use std::fmt;

/// Drives the external media toolchain. Implementations shell out to a real
/// `ffmpeg` binary in production; tests substitute a mock following the
/// shape of the teacher's `SharedMockFfmpeg`.
#[async_trait]
pub(crate) trait Transcoder: fmt::Debug + Send + Sync {
    async fn encode(
        &self,
        input: &Utf8Path,
        attempt: &EncodeAttempt,
        output: &Utf8Path,
        opts: &EncodeOptions,
    ) -> Result<()>;

    async fn encode_image(&self, input: &Utf8Path, opts: &ImageEncodeOptions, output: &Utf8Path) -> Result<()>;
}

#[async_trait]
pub(crate) trait Prober: fmt::Debug + Send + Sync {
    async fn probe(&self, path: &Utf8Path) -> Result<MediaInfo>;
    async fn probe_image(&self, path: &Utf8Path) -> Result<ImageInfo>;
}
