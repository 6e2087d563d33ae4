//! Mock image generation for testing.
//!
//! Provides in-process image generators for tests so no image service is needed.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_fixtures::image_mocks::PlaceholderImageGen;
//!
//! #[tokio::test]
//! async fn test_image_flow() {
//!     let gen = PlaceholderImageGen::new();
//!     let result = gen.generate(request).await.unwrap();
//!     assert!(!result.image_data.is_empty());
//! }
//! ```

use async_trait::async_trait;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use image::{ImageFormat, Rgb, RgbImage};

use crate::infrastructure::ports::{ImageGenError, ImageGenPort, ImageRequest, ImageResult};

/// Encode a solid-colour PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    RgbImage::from_pixel(width, height, Rgb([40, 120, 200]))
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("encode png");
    buffer.into_inner()
}

/// Mock image generator that returns a small placeholder PNG.
pub struct PlaceholderImageGen {
    call_count: AtomicUsize,
}

impl PlaceholderImageGen {
    pub fn new() -> Self {
        Self {
            call_count: AtomicUsize::new(0),
        }
    }

    /// Get the number of generate calls made.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl Default for PlaceholderImageGen {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenPort for PlaceholderImageGen {
    async fn generate(&self, _request: ImageRequest) -> Result<ImageResult, ImageGenError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        Ok(ImageResult {
            image_data: png_bytes(16, 16),
        })
    }
}

/// Recording mock that captures all generate requests for verification.
pub struct RecordingImageGen {
    inner: PlaceholderImageGen,
    requests: Mutex<Vec<ImageRequest>>,
}

impl RecordingImageGen {
    pub fn new() -> Self {
        Self {
            inner: PlaceholderImageGen::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<ImageRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl Default for RecordingImageGen {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenPort for RecordingImageGen {
    async fn generate(&self, request: ImageRequest) -> Result<ImageResult, ImageGenError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        self.inner.generate(request).await
    }
}

/// Image service that is always down.
pub struct FailingImageGen {
    call_count: AtomicUsize,
}

impl FailingImageGen {
    pub fn new() -> Self {
        Self {
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ImageGenPort for FailingImageGen {
    async fn generate(&self, _request: ImageRequest) -> Result<ImageResult, ImageGenError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        Err(ImageGenError::Unavailable)
    }
}

/// Placeholder generator that answers slowly for prompts containing a keyword.
pub struct DelayedImageGen {
    keyword: String,
    delay: Duration,
    inner: PlaceholderImageGen,
}

impl DelayedImageGen {
    pub fn new(keyword: impl Into<String>, delay: Duration) -> Self {
        Self {
            keyword: keyword.into(),
            delay,
            inner: PlaceholderImageGen::new(),
        }
    }
}

#[async_trait]
impl ImageGenPort for DelayedImageGen {
    async fn generate(&self, request: ImageRequest) -> Result<ImageResult, ImageGenError> {
        if request.prompt.contains(&self.keyword) {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.generate(request).await
    }
}
