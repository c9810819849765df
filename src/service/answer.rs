use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use strum_macros::Display;
use tracing::{debug, error, info, instrument};
use utoipa::ToSchema;

use super::classifier::{self, Example, Snapshot};
use super::completion::CompletionService;
use crate::store::{RecordStore, StoreError};

pub const SYSTEM_PROMPT: &str =
    "You are an AI receptionist. Answer user queries based on your training.";

const EMPTY_COMPLETION_TEXT: &str = "I don't know the answer yet!";
const FAILED_COMPLETION_TEXT: &str = "I couldn't fetch an answer right now.";
const INTERNAL_ERROR_TEXT: &str = "An error occurred while processing your request.";

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, ToSchema)]
pub enum AnswerSource {
    Predefined,
    #[serde(rename = "ML Prediction")]
    #[strum(serialize = "ML Prediction")]
    MlPrediction,
    #[serde(rename = "AI Generated")]
    #[strum(serialize = "AI Generated")]
    AiGenerated,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Answer {
    #[serde(rename = "answer")]
    #[schema(example = "9-5 Mon-Fri")]
    pub text: String,
    pub source: AnswerSource,
}

impl Answer {
    fn new(text: impl Into<String>, source: AnswerSource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrainingOutcome {
    Trained { examples: usize, labels: usize },
    Untrained { examples: usize },
}

/// Resolves free-text questions through the stored FAQs, the trained
/// classifier and finally the completion service.
pub struct AnswerResolver {
    store: Arc<dyn RecordStore>,
    completion: Option<Arc<dyn CompletionService>>,
    snapshot: RwLock<Option<Arc<Snapshot>>>,
    min_score: f64,
}

impl AnswerResolver {
    /// Without a completion service the last tier is skipped and unmatched
    /// queries resolve to nothing.
    pub fn new(
        store: Arc<dyn RecordStore>,
        completion: Option<Arc<dyn CompletionService>>,
        min_score: f64,
    ) -> Self {
        Self {
            store,
            completion,
            snapshot: RwLock::new(None),
            min_score,
        }
    }

    /// Never fails. `None` means no tier produced an answer.
    #[instrument(name = "answer", skip(self))]
    pub async fn answer(&self, query: &str) -> Option<Answer> {
        match self.resolve(query).await {
            Ok(answer) => {
                if let Some(answer) = &answer {
                    info!(source = %answer.source, "Query answered");
                }
                answer
            }
            Err(e) => {
                error!(error = %e, "Answer pipeline failed");
                Some(Answer::new(INTERNAL_ERROR_TEXT, AnswerSource::Error))
            }
        }
    }

    async fn resolve(&self, query: &str) -> Result<Option<Answer>, StoreError> {
        if let Some(faq) = self.store.find_faq_by_question(query).await? {
            return Ok(Some(Answer::new(faq.answer, AnswerSource::Predefined)));
        }

        if let Some(snapshot) = self.snapshot() {
            match snapshot.predict(query) {
                Some(prediction) if !prediction.trim().is_empty() => {
                    return Ok(Some(Answer::new(prediction, AnswerSource::MlPrediction)));
                }
                _ => debug!("Classifier had no prediction"),
            }
        }

        let Some(completion) = &self.completion else {
            return Ok(None);
        };

        let answer = match completion.complete(SYSTEM_PROMPT, query).await {
            Ok(text) if text.trim().is_empty() => {
                Answer::new(EMPTY_COMPLETION_TEXT, AnswerSource::AiGenerated)
            }
            Ok(text) => Answer::new(text, AnswerSource::AiGenerated),
            Err(e) => {
                error!(error = %e, "Falling back after completion failure");
                Answer::new(FAILED_COMPLETION_TEXT, AnswerSource::AiGenerated)
            }
        };
        Ok(Some(answer))
    }

    /// Rebuilds the classifier from the stored FAQs and swaps it in.
    /// Predictions already running keep the snapshot they started with.
    pub async fn retrain(&self) -> Result<TrainingOutcome, StoreError> {
        let corpus: Vec<Example> = self
            .store
            .list_faqs()
            .await?
            .into_iter()
            .map(|faq| Example {
                question: faq.question,
                answer: faq.answer,
            })
            .collect();

        let trained = classifier::train(&corpus, self.min_score).map(Arc::new);
        let outcome = match &trained {
            Some(snapshot) => TrainingOutcome::Trained {
                examples: corpus.len(),
                labels: snapshot.labels(),
            },
            None => TrainingOutcome::Untrained {
                examples: corpus.len(),
            },
        };

        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = trained;

        info!(?outcome, "Classifier retrained");
        Ok(outcome)
    }

    pub(crate) fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
