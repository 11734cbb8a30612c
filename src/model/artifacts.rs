//! Model artifact types
//!
//! The trained classifier and its preprocessor are external collaborators,
//! exported as three JSON artifacts: an ordered feature-name list, the
//! preprocessor parameters, and the network weights. This module defines
//! their on-disk shapes and the pure math applied at inference time.

use serde::Deserialize;

use crate::error::{Error, Result};

/// Ordered feature-name list defining the model's expected input schema.
///
/// Serialized as a bare JSON array of strings.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureList(pub Vec<String>);

impl FeatureList {
    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Per-feature imputation and standardization parameters.
///
/// Vectors are aligned to the feature list by position. The missing-value
/// marker (NaN) is replaced with `impute[i]` before standardization; the
/// trained model expects missing-value semantics, never default-zero.
#[derive(Debug, Clone, Deserialize)]
pub struct Preprocessor {
    pub impute: Vec<f64>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl Preprocessor {
    /// Validate parameter vectors against the feature list length.
    pub fn validate(&self, feature_count: usize) -> Result<()> {
        if self.impute.len() != feature_count
            || self.mean.len() != feature_count
            || self.scale.len() != feature_count
        {
            return Err(Error::Model(format!(
                "preprocessor parameter length mismatch: expected {} features, got impute={} mean={} scale={}",
                feature_count,
                self.impute.len(),
                self.mean.len(),
                self.scale.len()
            )));
        }
        if let Some(i) = self.scale.iter().position(|s| *s == 0.0 || !s.is_finite()) {
            return Err(Error::Model(format!(
                "preprocessor scale[{}] is not a usable divisor",
                i
            )));
        }
        Ok(())
    }

    /// Impute missing values, then standardize in place.
    pub fn transform(&self, row: &mut [f64]) {
        for (i, value) in row.iter_mut().enumerate() {
            let filled = if value.is_nan() { self.impute[i] } else { *value };
            *value = (filled - self.mean[i]) / self.scale[i];
        }
    }
}

/// Dense layer activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Softmax,
}

/// A single dense layer: `output = activation(weights * input + bias)`.
///
/// `weights` is row-major, one row per output unit.
#[derive(Debug, Clone, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    pub activation: Activation,
}

/// Feed-forward classifier head producing a 5-class ESI distribution.
#[derive(Debug, Clone, Deserialize)]
pub struct Network {
    pub layers: Vec<DenseLayer>,
}

/// Number of ESI classes (class index 0..4 maps to ESI level 1..5).
pub const ESI_CLASSES: usize = 5;

impl Network {
    /// Validate layer shapes against the input dimension.
    ///
    /// The final layer must be a 5-unit softmax.
    pub fn validate(&self, input_dim: usize) -> Result<()> {
        let Some(last) = self.layers.last() else {
            return Err(Error::Model("network has no layers".to_string()));
        };
        let mut dim = input_dim;
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.weights.len() != layer.bias.len() {
                return Err(Error::Model(format!(
                    "layer {}: {} weight rows but {} bias entries",
                    i,
                    layer.weights.len(),
                    layer.bias.len()
                )));
            }
            for row in &layer.weights {
                if row.len() != dim {
                    return Err(Error::Model(format!(
                        "layer {}: weight row has {} columns, expected {}",
                        i,
                        row.len(),
                        dim
                    )));
                }
            }
            dim = layer.weights.len();
        }
        if dim != ESI_CLASSES || last.activation != Activation::Softmax {
            return Err(Error::Model(format!(
                "final layer must be a {}-unit softmax, got {} units",
                ESI_CLASSES, dim
            )));
        }
        Ok(())
    }

    /// Forward pass producing the per-class probability distribution.
    pub fn forward(&self, input: &[f64]) -> Vec<f64> {
        let mut current = input.to_vec();
        for layer in &self.layers {
            let mut next = Vec::with_capacity(layer.weights.len());
            for (row, bias) in layer.weights.iter().zip(&layer.bias) {
                let z: f64 = row.iter().zip(&current).map(|(w, x)| w * x).sum::<f64>() + bias;
                next.push(z);
            }
            match layer.activation {
                Activation::Relu => {
                    for z in &mut next {
                        if *z < 0.0 {
                            *z = 0.0;
                        }
                    }
                }
                Activation::Softmax => softmax(&mut next),
            }
            current = next;
        }
        current
    }
}

fn softmax(logits: &mut [f64]) {
    let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let mut sum = 0.0;
    for z in logits.iter_mut() {
        *z = (*z - max).exp();
        sum += *z;
    }
    for z in logits.iter_mut() {
        *z /= sum;
    }
}

/// Index of the largest probability; the lowest index wins exact ties.
///
/// Ties resolving to the lower class index mean the more severe ESI level
/// wins, which is the safe direction for triage.
pub fn argmax(probabilities: &[f64]) -> usize {
    let mut best = 0;
    for (i, p) in probabilities.iter().enumerate().skip(1) {
        if *p > probabilities[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_list_parses_bare_array() {
        let features: FeatureList = serde_json::from_str(r#"["age", "heartrate"]"#).unwrap();
        assert_eq!(features.names(), &["age".to_string(), "heartrate".to_string()]);
    }

    #[test]
    fn test_transform_imputes_nan_then_standardizes() {
        let pre = Preprocessor {
            impute: vec![50.0, 0.0],
            mean: vec![40.0, 0.0],
            scale: vec![10.0, 1.0],
        };
        pre.validate(2).unwrap();

        let mut row = vec![f64::NAN, 1.0];
        pre.transform(&mut row);
        // NaN imputed to 50.0, standardized to (50-40)/10
        assert_eq!(row, vec![1.0, 1.0]);
    }

    #[test]
    fn test_transform_never_fills_zero_for_missing() {
        let pre = Preprocessor {
            impute: vec![7.0],
            mean: vec![0.0],
            scale: vec![1.0],
        };
        let mut row = vec![f64::NAN];
        pre.transform(&mut row);
        assert_eq!(row, vec![7.0]);
    }

    #[test]
    fn test_preprocessor_rejects_zero_scale() {
        let pre = Preprocessor {
            impute: vec![0.0],
            mean: vec![0.0],
            scale: vec![0.0],
        };
        assert!(pre.validate(1).is_err());
    }

    #[test]
    fn test_preprocessor_rejects_length_mismatch() {
        let pre = Preprocessor {
            impute: vec![0.0],
            mean: vec![0.0, 1.0],
            scale: vec![1.0],
        };
        assert!(pre.validate(1).is_err());
    }

    fn softmax_head(bias: Vec<f64>, input_dim: usize) -> Network {
        Network {
            layers: vec![DenseLayer {
                weights: vec![vec![0.0; input_dim]; ESI_CLASSES],
                bias,
                activation: Activation::Softmax,
            }],
        }
    }

    #[test]
    fn test_forward_distribution_sums_to_one() {
        let net = softmax_head(vec![0.0, 1.0, 2.0, 0.5, -1.0], 3);
        net.validate(3).unwrap();
        let probs = net.forward(&[0.1, 0.2, 0.3]);
        assert_eq!(probs.len(), ESI_CLASSES);
        let sum: f64 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert_eq!(argmax(&probs), 2);
    }

    #[test]
    fn test_argmax_tie_breaks_to_lowest_index() {
        // Equal probabilities: most severe class (index 0) must win.
        assert_eq!(argmax(&[0.2, 0.2, 0.2, 0.2, 0.2]), 0);
        assert_eq!(argmax(&[0.1, 0.3, 0.3, 0.2, 0.1]), 1);
    }

    #[test]
    fn test_validate_rejects_wrong_output_width() {
        let net = Network {
            layers: vec![DenseLayer {
                weights: vec![vec![0.0; 2]; 3],
                bias: vec![0.0; 3],
                activation: Activation::Softmax,
            }],
        };
        assert!(net.validate(2).is_err());
    }

    #[test]
    fn test_validate_rejects_row_width_mismatch() {
        let net = Network {
            layers: vec![DenseLayer {
                weights: vec![vec![0.0; 4]; ESI_CLASSES],
                bias: vec![0.0; ESI_CLASSES],
                activation: Activation::Softmax,
            }],
        };
        assert!(net.validate(2).is_err());
    }

    #[test]
    fn test_relu_hidden_layer_forward() {
        let net = Network {
            layers: vec![
                DenseLayer {
                    weights: vec![vec![1.0], vec![-1.0]],
                    bias: vec![0.0, 0.0],
                    activation: Activation::Relu,
                },
                DenseLayer {
                    weights: vec![vec![1.0, 0.0]; ESI_CLASSES],
                    bias: vec![0.0, 0.0, 0.0, 0.0, 3.0],
                    activation: Activation::Softmax,
                },
            ],
        };
        net.validate(1).unwrap();
        let probs = net.forward(&[2.0]);
        // Negative hidden unit clamps to zero; bias dominates the head.
        assert_eq!(argmax(&probs), 4);
    }
}
