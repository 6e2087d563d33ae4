//! OpenAI image generation client
//!
//! Implements the ImageGenPort trait: requests one image, then downloads the
//! time-limited URL the service hands back.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::infrastructure::ports::{ImageGenError, ImageGenPort, ImageRequest, ImageResult};

/// Default image model.
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";

/// Client for the OpenAI images API
#[derive(Clone)]
pub struct OpenAiImageClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiImageClient {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(300)) // 5 minute timeout for generation
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    /// Ask the service for one image and return its URL
    async fn request_image(&self, request: &ImageRequest) -> Result<String, ImageGenError> {
        let body = GenerationRequest {
            model: self.model.clone(),
            prompt: request.prompt.clone(),
            size: format!("{}x{}", request.width, request.height),
            quality: request.quality.clone(),
            n: 1,
        };

        let response = self
            .client
            .post(format!("{}/v1/images/generations", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ImageGenError::GenerationFailed(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
            return Err(ImageGenError::Unavailable);
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ImageGenError::GenerationFailed(format!(
                "{status}: {error_text}"
            )));
        }

        let generation: GenerationResponse = response
            .json()
            .await
            .map_err(|e| ImageGenError::GenerationFailed(e.to_string()))?;

        generation
            .data
            .into_iter()
            .next()
            .and_then(|image| image.url)
            .ok_or_else(|| ImageGenError::GenerationFailed("No image URL in response".to_string()))
    }

    /// Download a generated image
    async fn download(&self, url: &str) -> Result<Vec<u8>, ImageGenError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ImageGenError::DownloadFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ImageGenError::DownloadFailed(format!(
                "{} fetching generated image",
                response.status()
            )));
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| ImageGenError::DownloadFailed(e.to_string()))
    }
}

#[async_trait]
impl ImageGenPort for OpenAiImageClient {
    async fn generate(&self, request: ImageRequest) -> Result<ImageResult, ImageGenError> {
        let url = self.request_image(&request).await?;
        tracing::debug!(url = %url, "Image generated, downloading");

        let image_data = self.download(&url).await?;
        tracing::debug!(bytes = image_data.len(), "Image downloaded");

        Ok(ImageResult { image_data })
    }
}

// =============================================================================
// OpenAI images API types
// =============================================================================

#[derive(Debug, Serialize)]
struct GenerationRequest {
    model: String,
    prompt: String,
    size: String,
    quality: String,
    n: u32,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    url: Option<String>,
}
