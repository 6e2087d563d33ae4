//! Card illustration use case.
//!
//! Fetches one image per card from the image service and stores it in a
//! temporary file. When the service keeps failing a locally drawn gradient is
//! used instead. If even that cannot be written to disk the card is marked
//! [`Illustration::Fallback`] and the renderer draws the gradient itself, so
//! [`IllustrationProvider::fetch`] never fails and never names a missing file.
//! Fallbacks are counted and logged so a service outage stays visible.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use image::ImageFormat;

use cardforge_domain::Illustration;

use super::error::IllustrationError;
use crate::infrastructure::ports::{ImageGenPort, ImageRequest};
use crate::render::fallback_gradient;

/// Attempts per illustration before falling back.
pub const DEFAULT_ILLUSTRATION_ATTEMPTS: u32 = 3;

/// Wait between illustration attempts.
pub const DEFAULT_ILLUSTRATION_BACKOFF: Duration = Duration::from_secs(1);

/// Edge length of requested and fallback images, in pixels.
pub const ILLUSTRATION_SIZE: u32 = 1024;

const PROMPT_FRAMING: &str = "A family-friendly, cartoon-style illustration for a card game showing: ";

pub struct IllustrationProvider {
    image_gen: Arc<dyn ImageGenPort>,
    max_attempts: u32,
    backoff: Duration,
    scratch_dir: PathBuf,
    spare_dir: PathBuf,
    fallback_count: AtomicUsize,
}

impl IllustrationProvider {
    pub fn new(image_gen: Arc<dyn ImageGenPort>) -> Self {
        Self {
            image_gen,
            max_attempts: DEFAULT_ILLUSTRATION_ATTEMPTS,
            backoff: DEFAULT_ILLUSTRATION_BACKOFF,
            scratch_dir: std::env::temp_dir(),
            spare_dir: std::env::temp_dir(),
            fallback_count: AtomicUsize::new(0),
        }
    }

    pub fn with_retry(mut self, max_attempts: u32, backoff: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.backoff = backoff;
        self
    }

    /// Directory the temporary image files are created in.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    /// Directory the fallback image goes to when the scratch dir cannot be
    /// written. Defaults to the system temp dir.
    pub fn with_spare_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.spare_dir = dir.into();
        self
    }

    /// Number of times the fallback gradient has been used.
    pub fn fallback_count(&self) -> usize {
        self.fallback_count.load(Ordering::Relaxed)
    }

    /// Fetch an illustration for `prompt`. Never fails.
    pub async fn fetch(&self, prompt: &str) -> Illustration {
        let request = ImageRequest::square(format!("{PROMPT_FRAMING}{prompt}"), ILLUSTRATION_SIZE);

        for attempt in 1..=self.max_attempts {
            match self.attempt(request.clone()).await {
                Ok(path) => {
                    tracing::debug!(attempt, path = %path.display(), "Illustration stored");
                    return Illustration::File(path);
                }
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "Illustration attempt failed"
                    );
                    if attempt < self.max_attempts && !self.backoff.is_zero() {
                        tokio::time::sleep(self.backoff).await;
                    }
                }
            }
        }

        self.synthesize_fallback_image()
    }

    async fn attempt(&self, request: ImageRequest) -> Result<PathBuf, IllustrationError> {
        let result = self.image_gen.generate(request).await?;

        // Reject bytes the renderer would not be able to decode
        image::load_from_memory(&result.image_data)?;

        persist_png(&self.scratch_dir, &result.image_data)
    }

    /// Write the fallback gradient to a new temporary file.
    ///
    /// Tries the scratch dir, then the spare dir. When neither can be written
    /// the gradient is left for the renderer to draw.
    pub fn synthesize_fallback_image(&self) -> Illustration {
        let total = self.fallback_count.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::warn!(
            fallback_count = total,
            "Image service unavailable, using fallback illustration"
        );

        let bytes = match encode_png(&fallback_gradient(ILLUSTRATION_SIZE)) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(error = %e, "Could not encode fallback illustration");
                return Illustration::Fallback;
            }
        };

        for dir in [&self.scratch_dir, &self.spare_dir] {
            match persist_png(dir, &bytes) {
                Ok(path) => return Illustration::File(path),
                Err(e) => tracing::error!(
                    error = %e,
                    dir = %dir.display(),
                    "Could not write fallback illustration"
                ),
            }
        }

        tracing::error!("No writable directory for the fallback illustration, drawing it inline");
        Illustration::Fallback
    }
}

fn encode_png(image: &image::RgbImage) -> Result<Vec<u8>, IllustrationError> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

/// Write `bytes` to a uniquely named `.png` file that outlives this process.
///
/// The file is only kept once every byte is written; on error it is removed.
fn persist_png(dir: &Path, bytes: &[u8]) -> Result<PathBuf, IllustrationError> {
    let mut file = tempfile::Builder::new()
        .prefix("cardforge-")
        .suffix(".png")
        .tempfile_in(dir)?;
    file.write_all(bytes)?;
    file.flush()?;
    let (_, path) = file.keep().map_err(|e| IllustrationError::Io(e.error))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{ImageGenError, ImageResult, MockImageGenPort};
    use crate::test_fixtures::image_mocks::png_bytes;
    use image::RgbImage;
    use mockall::Sequence;

    fn open(illustration: &Illustration) -> RgbImage {
        let path = illustration.path().expect("illustration file");
        image::open(path).expect("decodable image").to_rgb8()
    }

    fn files_in(dir: &Path) -> usize {
        std::fs::read_dir(dir).expect("read dir").count()
    }

    fn always_unavailable() -> MockImageGenPort {
        let mut image_gen = MockImageGenPort::new();
        image_gen
            .expect_generate()
            .returning(|_| Err(ImageGenError::Unavailable));
        image_gen
    }

    #[tokio::test]
    async fn stores_generated_image_with_framed_prompt() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut image_gen = MockImageGenPort::new();
        image_gen
            .expect_generate()
            .withf(|request| {
                request.prompt
                    == "A family-friendly, cartoon-style illustration for a card game showing: a fox"
                    && request.width == 1024
                    && request.height == 1024
                    && request.quality == "standard"
            })
            .times(1)
            .returning(|_| {
                Ok(ImageResult {
                    image_data: png_bytes(8, 8),
                })
            });

        let provider = IllustrationProvider::new(Arc::new(image_gen))
            .with_retry(3, Duration::ZERO)
            .with_scratch_dir(dir.path());
        let illustration = provider.fetch("a fox").await;

        let path = illustration.path().expect("file");
        assert!(path.starts_with(dir.path()));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
        assert_eq!(open(&illustration).dimensions(), (8, 8));
        assert_eq!(provider.fallback_count(), 0);
    }

    #[tokio::test]
    async fn permanent_failure_returns_decodable_fallback() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut image_gen = MockImageGenPort::new();
        image_gen
            .expect_generate()
            .times(3)
            .returning(|_| Err(ImageGenError::Unavailable));

        let provider = IllustrationProvider::new(Arc::new(image_gen))
            .with_retry(3, Duration::ZERO)
            .with_scratch_dir(dir.path());
        let illustration = provider.fetch("a fox").await;

        assert!(illustration.path().is_some_and(Path::exists));
        assert_eq!(open(&illustration).dimensions(), (1024, 1024));
        assert_eq!(provider.fallback_count(), 1);
    }

    #[tokio::test]
    async fn undecodable_bytes_are_retried() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut seq = Sequence::new();
        let mut image_gen = MockImageGenPort::new();
        image_gen
            .expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(ImageResult {
                    image_data: b"<html>expired</html>".to_vec(),
                })
            });
        image_gen
            .expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(ImageResult {
                    image_data: png_bytes(4, 4),
                })
            });

        let provider = IllustrationProvider::new(Arc::new(image_gen))
            .with_retry(3, Duration::ZERO)
            .with_scratch_dir(dir.path());
        let illustration = provider.fetch("a fox").await;

        assert_eq!(open(&illustration).dimensions(), (4, 4));
        assert_eq!(provider.fallback_count(), 0);
        // the rejected attempt left nothing behind
        assert_eq!(files_in(dir.path()), 1);
    }

    #[tokio::test]
    async fn unwritable_scratch_dir_uses_spare_dir() {
        let spare = tempfile::tempdir().expect("tempdir");
        let provider = IllustrationProvider::new(Arc::new(always_unavailable()))
            .with_retry(1, Duration::ZERO)
            .with_scratch_dir("/nonexistent/cardforge/scratch")
            .with_spare_dir(spare.path());
        let illustration = provider.fetch("a fox").await;

        assert!(illustration.path().is_some_and(|p| p.starts_with(spare.path())));
        assert_eq!(open(&illustration).dimensions(), (1024, 1024));
    }

    #[tokio::test]
    async fn no_writable_dir_marks_inline_fallback() {
        let provider = IllustrationProvider::new(Arc::new(always_unavailable()))
            .with_retry(1, Duration::ZERO)
            .with_scratch_dir("/nonexistent/cardforge/scratch")
            .with_spare_dir("/nonexistent/cardforge/spare");
        let illustration = provider.fetch("a fox").await;

        assert_eq!(illustration, Illustration::Fallback);
        assert!(illustration.path().is_none());
        assert_eq!(provider.fallback_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn sleeps_between_attempts_only() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut image_gen = MockImageGenPort::new();
        image_gen
            .expect_generate()
            .times(3)
            .returning(|_| Err(ImageGenError::Unavailable));

        let provider = IllustrationProvider::new(Arc::new(image_gen)).with_scratch_dir(dir.path());
        let start = tokio::time::Instant::now();
        provider.fetch("a fox").await;

        assert_eq!(start.elapsed(), Duration::from_secs(2));
        assert_eq!(provider.fallback_count(), 1);
    }

    #[test]
    fn persisted_file_holds_every_byte() {
        let dir = tempfile::tempdir().expect("tempdir");
        let bytes = png_bytes(6, 6);

        let path = persist_png(dir.path(), &bytes).expect("persist");

        assert_eq!(std::fs::read(&path).expect("read back"), bytes);
        assert_eq!(files_in(dir.path()), 1);
    }

    #[test]
    fn gradient_runs_from_orange_to_blue() {
        let gradient = fallback_gradient(ILLUSTRATION_SIZE);

        let top = gradient.get_pixel(0, 0).0;
        assert_eq!(top, [255, 200, 0]);

        let bottom = gradient.get_pixel(512, 1023).0;
        assert!(bottom[0] <= 1, "red {}", bottom[0]);
        assert!(bottom[1] <= 1, "green {}", bottom[1]);
        assert!(bottom[2] >= 254, "blue {}", bottom[2]);

        // Every row is a single colour
        assert_eq!(gradient.get_pixel(0, 300), gradient.get_pixel(1023, 300));
    }
}
