//! Card generation pipeline.
//!
//! Rules first, then one unit per requested card (content, then illustration),
//! then both documents. Card content is requested one unit at a time; only
//! illustration fetches overlap. A unit whose content fails is restarted from
//! scratch until the unit retry policy gives up on it, at which point it is
//! abandoned and reported instead of rendered.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::stream::{self, StreamExt};

use cardforge_domain::{CardBatch, CardRecord, CardTypeQuota, GameSpecification, UnitState};

use super::card_content::CardContentGenerator;
use super::error::{PipelineError, UnitError};
use super::illustration::IllustrationProvider;
use super::rules::{format_rules_markdown, RulesGenerator};
use crate::infrastructure::retry::RetryPolicy;
use crate::render::{render_cards, render_rules, RenderConfig, RenderError};

/// File name of the rules document inside the output directory.
pub const RULES_FILE_NAME: &str = "rules.pdf";

/// File name of the card sheet inside the output directory.
pub const CARDS_FILE_NAME: &str = "cards.pdf";

/// A unit the retry policy gave up on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbandonedUnit {
    /// Position the card would have had in the batch
    pub index: usize,
    pub card_type: String,
    pub attempts: u32,
    pub last_error: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub path: PathBuf,
    pub pages: usize,
}

/// Outcome of a full run.
#[derive(Debug)]
pub struct PipelineReport {
    pub specification: GameSpecification,
    pub batch: CardBatch,
    pub abandoned: Vec<AbandonedUnit>,
    /// Cards illustrated with the fallback gradient during this run
    pub fallback_illustrations: usize,
    pub rules: RenderedDocument,
    pub cards: RenderedDocument,
}

/// A unit whose text is settled, waiting for its illustration.
struct ContentReady<'a> {
    index: usize,
    quota: &'a CardTypeQuota,
    record: CardRecord,
    state: UnitState,
    attempts: u32,
}

enum ContentOutcome<'a> {
    Ready(ContentReady<'a>),
    Abandoned(AbandonedUnit),
}

enum UnitOutcome {
    Complete(CardRecord),
    Abandoned(AbandonedUnit),
}

pub struct PipelineOrchestrator {
    rules: Arc<RulesGenerator>,
    content: Arc<CardContentGenerator>,
    illustrations: Arc<IllustrationProvider>,
    render_config: RenderConfig,
    output_dir: PathBuf,
    unit_policy: RetryPolicy,
    illustration_concurrency: usize,
}

impl PipelineOrchestrator {
    pub fn new(
        rules: Arc<RulesGenerator>,
        content: Arc<CardContentGenerator>,
        illustrations: Arc<IllustrationProvider>,
        render_config: RenderConfig,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            rules,
            content,
            illustrations,
            render_config,
            output_dir: output_dir.into(),
            unit_policy: RetryPolicy::default(),
            illustration_concurrency: 1,
        }
    }

    pub fn with_unit_policy(mut self, policy: RetryPolicy) -> Self {
        self.unit_policy = policy;
        self
    }

    /// Number of illustration fetches in flight at once. Card content is
    /// always generated one unit at a time, and batch order never depends on
    /// this setting.
    pub fn with_illustration_concurrency(mut self, concurrency: usize) -> Self {
        self.illustration_concurrency = concurrency.max(1);
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub async fn run(&self, concept: &str) -> Result<PipelineReport, PipelineError> {
        tracing::info!(concept = %concept, "Generating game rules");
        let specification = self
            .rules
            .generate(concept)
            .await
            .map_err(PipelineError::Rules)?;

        let units: Vec<&CardTypeQuota> = specification
            .card_types
            .iter()
            .flat_map(|quota| std::iter::repeat(quota).take(quota.quantity as usize))
            .collect();
        let total = units.len();
        tracing::info!(
            title = %specification.title,
            total_units = total,
            concurrency = self.illustration_concurrency,
            "Generating cards"
        );

        let fallbacks_before = self.illustrations.fallback_count();
        let outcomes: Vec<UnitOutcome> = stream::iter(units.into_iter().enumerate())
            .then(|(index, quota)| self.run_unit(concept, index, total, quota))
            .map(|outcome| self.illustrate_unit(outcome, total))
            .buffered(self.illustration_concurrency)
            .collect()
            .await;

        let mut batch = CardBatch::new();
        let mut abandoned = Vec::new();
        for outcome in outcomes {
            match outcome {
                UnitOutcome::Complete(record) => batch.push(record)?,
                UnitOutcome::Abandoned(unit) => abandoned.push(unit),
            }
        }
        let fallback_illustrations = self
            .illustrations
            .fallback_count()
            .saturating_sub(fallbacks_before);

        std::fs::create_dir_all(&self.output_dir).map_err(RenderError::from)?;

        let rules_path = self.output_dir.join(RULES_FILE_NAME);
        let rules_summary = render_rules(
            &format_rules_markdown(&specification),
            &rules_path,
            &self.render_config,
        )?;

        let cards_path = self.output_dir.join(CARDS_FILE_NAME);
        let cards_summary = render_cards(&batch, &cards_path, &self.render_config)?;

        if abandoned.is_empty() {
            tracing::info!(cards = batch.len(), fallback_illustrations, "Generation complete");
        } else {
            tracing::warn!(
                cards = batch.len(),
                abandoned = abandoned.len(),
                fallback_illustrations,
                "Generation finished with abandoned cards"
            );
        }

        Ok(PipelineReport {
            specification,
            batch,
            abandoned,
            fallback_illustrations,
            rules: RenderedDocument {
                path: rules_path,
                pages: rules_summary.pages,
            },
            cards: RenderedDocument {
                path: cards_path,
                pages: cards_summary.pages,
            },
        })
    }

    /// Drive one unit's content to `IllustrationPending`, restarting it
    /// under the unit policy, or give up on it.
    async fn run_unit<'a>(
        &self,
        concept: &str,
        index: usize,
        total: usize,
        quota: &'a CardTypeQuota,
    ) -> ContentOutcome<'a> {
        let mut state = UnitState::default();
        let mut attempt: u32 = 1;

        loop {
            match self.attempt_content(concept, quota, &mut state).await {
                Ok(record) => {
                    tracing::debug!(
                        unit = index + 1,
                        total,
                        card_type = %quota.card_type,
                        title = %record.title,
                        "Card content ready"
                    );
                    return ContentOutcome::Ready(ContentReady {
                        index,
                        quota,
                        record,
                        state,
                        attempts: attempt,
                    });
                }
                Err(e) => {
                    state = state.fail().unwrap_or(UnitState::Failed);
                    tracing::warn!(
                        unit = index + 1,
                        total,
                        attempt,
                        card_type = %quota.card_type,
                        error = %e,
                        "Card failed, retrying"
                    );

                    if !self.unit_policy.allows_attempt(attempt.saturating_add(1)) {
                        return ContentOutcome::Abandoned(abandon_unit(
                            index, quota, state, attempt, &e,
                        ));
                    }

                    self.unit_policy.wait().await;
                    state = state.retry().unwrap_or_default();
                    attempt = attempt.saturating_add(1);
                }
            }
        }
    }

    async fn attempt_content(
        &self,
        concept: &str,
        quota: &CardTypeQuota,
        state: &mut UnitState,
    ) -> Result<CardRecord, UnitError> {
        let content = self.content.generate(concept, quota, 1).await?;
        *state = state.content_ready()?;
        let record = CardRecord::from_content(content);
        *state = state.request_illustration()?;
        Ok(record)
    }

    /// Fetch the illustration for a unit whose content is ready.
    async fn illustrate_unit(&self, outcome: ContentOutcome<'_>, total: usize) -> UnitOutcome {
        let ready = match outcome {
            ContentOutcome::Ready(ready) => ready,
            ContentOutcome::Abandoned(unit) => return UnitOutcome::Abandoned(unit),
        };
        let ContentReady {
            index,
            quota,
            mut record,
            state,
            attempts,
        } = ready;

        let illustration = self.illustrations.fetch(&record.illustration_prompt).await;
        let completed = record
            .attach_illustration(illustration)
            .map_err(UnitError::from)
            .and_then(|()| state.complete().map_err(UnitError::from));

        match completed {
            Ok(_) => {
                tracing::info!(
                    unit = index + 1,
                    total,
                    card_type = %quota.card_type,
                    title = %record.title,
                    "Card complete"
                );
                UnitOutcome::Complete(record)
            }
            Err(e) => {
                let state = state.fail().unwrap_or(UnitState::Failed);
                UnitOutcome::Abandoned(abandon_unit(index, quota, state, attempts, &e))
            }
        }
    }
}

fn abandon_unit(
    index: usize,
    quota: &CardTypeQuota,
    state: UnitState,
    attempts: u32,
    error: &UnitError,
) -> AbandonedUnit {
    let state = state.abandon().unwrap_or(UnitState::Abandoned);
    tracing::error!(
        unit = index + 1,
        attempts,
        state = %state,
        card_type = %quota.card_type,
        error = %error,
        "Giving up on card"
    );
    AbandonedUnit {
        index,
        card_type: quota.card_type.clone(),
        attempts,
        last_error: error.to_string(),
    }
}
