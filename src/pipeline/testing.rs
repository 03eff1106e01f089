use super::{Prober, Transcoder};
use crate::media::{ImageInfo, MediaInfo};
use crate::options::{EncodeOptions, ImageEncodeOptions};
use crate::prelude::*;
use crate::strategy::EncodeAttempt;
use async_trait::async_trait;
use std::sync::Mutex;

/// Fails the first `fail_until` calls to `encode`, then succeeds by writing a
/// placeholder file. Logs every attempt it was called with.
#[derive(Debug, Default)]
pub(crate) struct MockTranscoder {
    pub(crate) calls: Mutex<Vec<EncodeAttempt>>,
    fail_until: Mutex<usize>,
}

impl MockTranscoder {
    pub(crate) fn failing_first(n: usize) -> Self {
        Self { calls: Mutex::default(), fail_until: Mutex::new(n) }
    }
}

#[async_trait]
impl Transcoder for MockTranscoder {
    async fn encode(
        &self,
        _input: &Utf8Path,
        attempt: &EncodeAttempt,
        output: &Utf8Path,
        _opts: &EncodeOptions,
    ) -> Result<()> {
        self.calls.lock().unwrap().push(*attempt);

        let mut fail_until = self.fail_until.lock().unwrap();
        if *fail_until > 0 {
            *fail_until -= 1;
            bail!("mock transcode failure");
        }
        drop(fail_until);

        fs::write(output, b"mock-output").await?;
        Ok(())
    }

    async fn encode_image(&self, _input: &Utf8Path, _opts: &ImageEncodeOptions, output: &Utf8Path) -> Result<()> {
        fs::write(output, b"mock-image").await?;
        Ok(())
    }
}

/// Returns a fixed `MediaInfo`/`ImageInfo` regardless of the path probed.
#[derive(Debug)]
pub(crate) struct MockProber {
    pub(crate) media: MediaInfo,
    pub(crate) image: ImageInfo,
}

#[async_trait]
impl Prober for MockProber {
    async fn probe(&self, _path: &Utf8Path) -> Result<MediaInfo> {
        Ok(self.media.clone())
    }

    async fn probe_image(&self, _path: &Utf8Path) -> Result<ImageInfo> {
        Ok(self.image.clone())
    }
}
