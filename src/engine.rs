//! Decision engine
//!
//! Two-stage triage decision: scan the expert severity rules first, and only
//! fall through to the statistical model when no urgent rule matched. A
//! matched rule with rank 1-3 bypasses the model entirely, so a known-critical
//! symptom can never be downgraded by model output.

use std::sync::Arc;

use tracing::info;

use crate::error::Result;
use crate::model::EsiClassifier;
use crate::record::PatientRecord;
use crate::rules::SYMPTOM_SEVERITY_TABLE;

/// Rule ranks at or below this value short-circuit the model.
const RULE_SHORT_CIRCUIT_THRESHOLD: u8 = 3;

/// Outcome of a triage decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Predicted ESI level, always in 1..=5.
    pub esi_level: u8,
    /// True when an expert rule decided without consulting the model.
    pub used_rule: bool,
    /// The rule symptom that decided, when `used_rule` is true.
    pub triggered_symptom: Option<&'static str>,
}

/// Hybrid rule+model decision engine.
///
/// Holds the classifier behind a trait object so tests can instrument it.
pub struct DecisionEngine {
    classifier: Arc<dyn EsiClassifier>,
}

impl DecisionEngine {
    pub fn new(classifier: Arc<dyn EsiClassifier>) -> Self {
        Self { classifier }
    }

    /// The feature names the underlying model expects.
    pub fn feature_names(&self) -> &[String] {
        self.classifier.feature_names()
    }

    /// Decide the ESI level for a patient record.
    ///
    /// Rules are scanned in table definition order with a strict `<`
    /// comparison, so the first-encountered rule wins on severity ties.
    pub fn decide(&self, record: &PatientRecord) -> Result<Decision> {
        // Sentinel 5 (least severe) with strict `<` keeps the first rule
        // encountered at any given severity.
        let mut best: Option<(&'static str, u8)> = None;

        for rule in SYMPTOM_SEVERITY_TABLE {
            if record.flag(rule.symptom) && rule.severity < best.map_or(5, |(_, s)| s) {
                best = Some((rule.symptom, rule.severity));
            }
        }

        if let Some((symptom, severity)) = best {
            if severity <= RULE_SHORT_CIRCUIT_THRESHOLD {
                info!(
                    "Expert rule triggered for '{}': returning ESI level {}",
                    symptom, severity
                );
                return Ok(Decision {
                    esi_level: severity,
                    used_rule: true,
                    triggered_symptom: Some(symptom),
                });
            }
        }

        info!("No high-risk expert rules triggered, proceeding with model");
        let esi_level = self.classifier.classify(record)?;
        Ok(Decision {
            esi_level,
            used_rule: false,
            triggered_symptom: None,
        })
    }
}
