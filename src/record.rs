//! Patient record boundary type
//!
//! The prediction endpoint accepts an open-ended key/value body. Known
//! attributes (`patientId`, `age`, `gender`) are lifted into typed optional
//! fields; everything else lands in a flattened map of symptom flags and
//! model feature values. Unknown keys are ignored downstream, missing keys
//! are treated as absent values.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Default patient identifier when the request omits one.
pub const UNKNOWN_PATIENT: &str = "Unknown";

/// Per-request patient data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientRecord {
    #[serde(rename = "patientId")]
    pub patient_id: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    /// Symptom flags and model feature values, keyed by field name.
    #[serde(flatten)]
    pub fields: HashMap<String, Value>,
}

impl PatientRecord {
    /// Patient identifier, defaulting to `"Unknown"`.
    pub fn patient_label(&self) -> &str {
        self.patient_id.as_deref().unwrap_or(UNKNOWN_PATIENT)
    }

    /// Whether a binary symptom flag is set.
    ///
    /// A flag counts as set when its value equals 1: integer 1, float 1.0,
    /// or boolean true. Strings never match, nor do absent fields.
    pub fn flag(&self, name: &str) -> bool {
        match self.fields.get(name) {
            Some(Value::Number(n)) => n.as_f64() == Some(1.0),
            Some(Value::Bool(b)) => *b,
            _ => false,
        }
    }

    /// Numeric value of a model feature, if present and numeric.
    ///
    /// `age` is lifted out of the flattened map at deserialization, so it is
    /// special-cased here to stay visible to the model.
    pub fn numeric(&self, name: &str) -> Option<f64> {
        if name == "age" {
            return self.age.map(|a| a as f64);
        }
        match self.fields.get(name) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// The sub-mapping of triggered symptom flags worth persisting.
    ///
    /// Restricted to known feature names with a set flag. `age`, `gender`
    /// and `patientId` never appear: they are lifted into typed fields and
    /// are not part of the flattened map.
    pub fn triggered_symptoms(&self, known_features: &[String]) -> serde_json::Map<String, Value> {
        let mut symptoms = serde_json::Map::new();
        for name in known_features {
            if name == "age" || name == "gender" || name == "patientId" {
                continue;
            }
            if self.flag(name) {
                symptoms.insert(name.clone(), Value::from(1));
            }
        }
        symptoms
    }
}
