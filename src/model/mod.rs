//! Model adapter
//!
//! Wraps the pre-trained ESI classifier and its feature preprocessor.
//! Artifacts are loaded once at startup, immutable thereafter, and shared
//! read-only across all concurrent requests. Inference is pure given the
//! loaded artifacts.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::record::PatientRecord;

pub mod artifacts;

pub use artifacts::{argmax, Activation, DenseLayer, FeatureList, Network, Preprocessor};

/// Classifier seam consumed by the decision engine.
///
/// A trait so tests can substitute instrumented stubs and count invocations.
pub trait EsiClassifier: Send + Sync {
    /// Predict an ESI level in 1..=5 for a patient record.
    fn classify(&self, record: &PatientRecord) -> Result<u8>;

    /// The ordered feature names the model expects.
    fn feature_names(&self) -> &[String];
}

/// The production classifier: feature list + preprocessor + network.
#[derive(Debug, Clone)]
pub struct ModelAdapter {
    features: FeatureList,
    preprocessor: Preprocessor,
    network: Network,
}

impl ModelAdapter {
    /// Assemble an adapter from already-parsed artifacts, validating shapes.
    pub fn new(features: FeatureList, preprocessor: Preprocessor, network: Network) -> Result<Self> {
        if features.is_empty() {
            return Err(Error::Model("feature list is empty".to_string()));
        }
        preprocessor.validate(features.len())?;
        network.validate(features.len())?;
        Ok(Self {
            features,
            preprocessor,
            network,
        })
    }

    /// Load the three JSON artifacts from disk.
    pub fn load(features_path: &Path, preprocessor_path: &Path, model_path: &Path) -> Result<Self> {
        let features: FeatureList = read_artifact(features_path)?;
        let preprocessor: Preprocessor = read_artifact(preprocessor_path)?;
        let network: Network = read_artifact(model_path)?;
        Self::new(features, preprocessor, network)
    }

    /// Build the single-row feature table for a record.
    ///
    /// Restricted to the ordered feature list; any feature absent from the
    /// record is filled with NaN, the explicit missing-value marker. The
    /// preprocessor was trained expecting missing-value semantics, so zero
    /// is never a valid stand-in.
    pub fn feature_row(&self, record: &PatientRecord) -> Vec<f64> {
        self.features
            .names()
            .iter()
            .map(|name| record.numeric(name).unwrap_or(f64::NAN))
            .collect()
    }
}

impl EsiClassifier for ModelAdapter {
    fn classify(&self, record: &PatientRecord) -> Result<u8> {
        let mut row = self.feature_row(record);
        self.preprocessor.transform(&mut row);
        let probabilities = self.network.forward(&row);
        debug!("Class probabilities: {:?}", probabilities);
        Ok(argmax(&probabilities) as u8 + 1)
    }

    fn feature_names(&self) -> &[String] {
        self.features.names()
    }
}

fn read_artifact<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Model(format!("failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| Error::Model(format!("failed to parse {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(list: &[&str]) -> FeatureList {
        FeatureList(list.iter().map(|s| s.to_string()).collect())
    }

    fn identity_preprocessor(n: usize) -> Preprocessor {
        Preprocessor {
            impute: vec![0.0; n],
            mean: vec![0.0; n],
            scale: vec![1.0; n],
        }
    }

    /// Softmax head whose output is fully determined by its bias vector.
    fn bias_head(input_dim: usize, bias: [f64; artifacts::ESI_CLASSES]) -> Network {
        Network {
            layers: vec![DenseLayer {
                weights: vec![vec![0.0; input_dim]; artifacts::ESI_CLASSES],
                bias: bias.to_vec(),
                activation: Activation::Softmax,
            }],
        }
    }

    fn record(body: serde_json::Value) -> PatientRecord {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_feature_row_marks_missing_with_nan() {
        let adapter = ModelAdapter::new(
            names(&["age", "heartrate", "resprate"]),
            identity_preprocessor(3),
            bias_head(3, [0.0; 5]),
        )
        .unwrap();

        let row = adapter.feature_row(&record(json!({"age": 30, "heartrate": 90})));
        assert_eq!(row[0], 30.0);
        assert_eq!(row[1], 90.0);
        assert!(row[2].is_nan(), "absent feature must be NaN, not zero");
    }

    #[test]
    fn test_feature_row_ignores_unknown_fields() {
        let adapter = ModelAdapter::new(
            names(&["heartrate"]),
            identity_preprocessor(1),
            bias_head(1, [0.0; 5]),
        )
        .unwrap();

        let row = adapter.feature_row(&record(json!({"heartrate": 72, "shoe_size": 44})));
        assert_eq!(row, vec![72.0]);
    }

    #[test]
    fn test_classify_returns_argmax_plus_one() {
        let adapter = ModelAdapter::new(
            names(&["age"]),
            identity_preprocessor(1),
            bias_head(1, [0.0, 0.0, 0.0, 2.0, 0.0]),
        )
        .unwrap();

        // Class index 3 dominates, so ESI level 4.
        let esi = adapter.classify(&record(json!({"age": 50}))).unwrap();
        assert_eq!(esi, 4);
    }

    #[test]
    fn test_classify_tie_prefers_more_severe_level() {
        let adapter = ModelAdapter::new(
            names(&["age"]),
            identity_preprocessor(1),
            bias_head(1, [1.0, 1.0, 0.0, 0.0, 0.0]),
        )
        .unwrap();

        let esi = adapter.classify(&record(json!({}))).unwrap();
        assert_eq!(esi, 1);
    }

    #[test]
    fn test_new_rejects_empty_feature_list() {
        let result = ModelAdapter::new(
            FeatureList(vec![]),
            identity_preprocessor(0),
            bias_head(0, [0.0; 5]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let features_path = dir.path().join("features.json");
        let preprocessor_path = dir.path().join("preprocessor.json");
        let model_path = dir.path().join("model.json");

        std::fs::write(&features_path, r#"["age", "heartrate"]"#).unwrap();
        std::fs::write(
            &preprocessor_path,
            json!({"impute": [40.0, 80.0], "mean": [0.0, 0.0], "scale": [1.0, 1.0]}).to_string(),
        )
        .unwrap();
        std::fs::write(
            &model_path,
            json!({"layers": [{
                "weights": [[0.0, 0.0], [0.0, 0.0], [0.0, 0.0], [0.0, 0.0], [0.0, 0.0]],
                "bias": [0.0, 3.0, 0.0, 0.0, 0.0],
                "activation": "softmax"
            }]})
            .to_string(),
        )
        .unwrap();

        let adapter = ModelAdapter::load(&features_path, &preprocessor_path, &model_path).unwrap();
        assert_eq!(adapter.feature_names(), &["age", "heartrate"]);
        assert_eq!(adapter.classify(&record(json!({}))).unwrap(), 2);
    }

    #[test]
    fn test_load_fails_on_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let result = ModelAdapter::load(&missing, &missing, &missing);
        assert!(matches!(result, Err(Error::Model(_))));
    }
}
