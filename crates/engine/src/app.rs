//! Application state and composition.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::infrastructure::{
    openai::OpenAiClient,
    openai_images::OpenAiImageClient,
    ports::{ImageGenPort, LlmPort},
    retry::{RetryPolicy, DEFAULT_UNIT_BACKOFF},
};
use crate::render::RenderConfig;
use crate::use_cases::{
    CardContentGenerator, IllustrationProvider, PipelineError, PipelineOrchestrator,
    PipelineReport, RulesGenerator,
};

/// Main application state.
///
/// Holds the port implementations and the use cases built on them.
pub struct App {
    pub llm: Arc<dyn LlmPort>,
    pub image_gen: Arc<dyn ImageGenPort>,
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub rules: Arc<RulesGenerator>,
    pub card_content: Arc<CardContentGenerator>,
    pub illustrations: Arc<IllustrationProvider>,
    pub pipeline: PipelineOrchestrator,
}

impl App {
    /// Wire the OpenAI adapters from configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        let llm: Arc<dyn LlmPort> = Arc::new(OpenAiClient::new(
            &config.base_url,
            &config.api_key,
            &config.text_model,
        ));
        let image_gen: Arc<dyn ImageGenPort> = Arc::new(OpenAiImageClient::new(
            &config.base_url,
            &config.api_key,
            &config.image_model,
        ));
        Self::new(llm, image_gen, config)
    }

    pub fn new(llm: Arc<dyn LlmPort>, image_gen: Arc<dyn ImageGenPort>, config: &AppConfig) -> Self {
        let rules = Arc::new(RulesGenerator::new(llm.clone()));
        let card_content = Arc::new(CardContentGenerator::new(llm.clone()));
        let illustrations = Arc::new(IllustrationProvider::new(image_gen.clone()));

        let unit_policy = RetryPolicy::from_config(config.unit_max_attempts, DEFAULT_UNIT_BACKOFF);
        tracing::info!(
            text_model = %config.text_model,
            image_model = %config.image_model,
            bounded = unit_policy.is_bounded(),
            max_attempts = config.unit_max_attempts,
            concurrency = config.illustration_concurrency,
            "Pipeline configured"
        );

        let pipeline = PipelineOrchestrator::new(
            rules.clone(),
            card_content.clone(),
            illustrations.clone(),
            RenderConfig::default(),
            config.output_dir.clone(),
        )
        .with_unit_policy(unit_policy)
        .with_illustration_concurrency(config.illustration_concurrency);

        Self {
            llm,
            image_gen,
            use_cases: UseCases {
                rules,
                card_content,
                illustrations,
                pipeline,
            },
        }
    }

    pub async fn generate(&self, concept: &str) -> Result<PipelineReport, PipelineError> {
        self.use_cases.pipeline.run(concept).await
    }
}
