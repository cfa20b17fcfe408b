//! Scripted classifier for testing.
//!
//! Configurable stand-in for the opaque classification collaborator:
//! keyword-triggered classifications, a canned drift report, error
//! injection, and call capture for verification.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;

use crate::domain::catalog::PatternCatalogEntry;
use crate::domain::foundation::{DetectionScore, DomainError, ErrorCode};
use crate::ports::{Classification, Classifier, DriftReport};

/// One scripted rule: when `needle` appears in the text, answer with the
/// configured classification.
struct ScriptedRule {
    needle: String,
    classification: Classification,
}

/// Scripted [`Classifier`] for tests.
#[derive(Default)]
pub struct ScriptedClassifier {
    rules: RwLock<Vec<ScriptedRule>>,
    drift: RwLock<Option<DriftReport>>,
    failing: AtomicBool,
    classify_calls: Mutex<Vec<String>>,
}

impl ScriptedClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a keyword-triggered classification.
    pub fn recognize(
        &self,
        needle: impl Into<String>,
        pattern_id: impl Into<String>,
        confidence: u8,
    ) {
        self.rules
            .write()
            .expect("ScriptedClassifier: rules lock poisoned")
            .push(ScriptedRule {
                needle: needle.into(),
                classification: Classification {
                    confidence: DetectionScore::new(confidence),
                    labels: vec![pattern_id.into()],
                    justification: "scripted".to_string(),
                },
            });
    }

    /// Sets the drift report returned by every comparison.
    pub fn set_drift(&self, report: DriftReport) {
        *self
            .drift
            .write()
            .expect("ScriptedClassifier: drift lock poisoned") = Some(report);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Texts passed to `classify`, for verification.
    pub fn classified_texts(&self) -> Vec<String> {
        self.classify_calls
            .lock()
            .expect("ScriptedClassifier: calls lock poisoned")
            .clone()
    }

    fn unavailable() -> DomainError {
        DomainError::new(ErrorCode::ClassifierUnavailable, "classifier unavailable")
    }
}

#[async_trait]
impl Classifier for ScriptedClassifier {
    async fn classify(
        &self,
        text: &str,
        _catalog_context: &[PatternCatalogEntry],
    ) -> Result<Classification, DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.classify_calls
            .lock()
            .expect("ScriptedClassifier: calls lock poisoned")
            .push(text.to_string());

        let rules = self
            .rules
            .read()
            .expect("ScriptedClassifier: rules lock poisoned");
        let matched = rules
            .iter()
            .find(|rule| text.to_lowercase().contains(&rule.needle.to_lowercase()));

        Ok(match matched {
            Some(rule) => rule.classification.clone(),
            // No opinion: nothing recognized, zero confidence.
            None => Classification {
                confidence: DetectionScore::new(0),
                labels: vec![],
                justification: String::new(),
            },
        })
    }

    async fn compare_drift(
        &self,
        _current: &str,
        _historical: &str,
    ) -> Result<DriftReport, DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        Ok(self
            .drift
            .read()
            .expect("ScriptedClassifier: drift lock poisoned")
            .clone()
            .unwrap_or(DriftReport {
                delta: 0.0,
                confidence: None,
            }))
    }
}
