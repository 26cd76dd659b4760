//! Fixed-topology autoencoder forward pass.
//!
//! The network reconstructs a normalized feature vector through a
//! `num_features -> 15 -> 7 -> 15 -> num_features` stack of affine layers,
//! with ReLU after the first layer of each stage and tanh on the output.
//! Weights are loaded once and never mutated, so a forward pass is a pure
//! function of its input.

use crate::error::{Result, ScoringError};
use ndarray::{Array1, Array2};
use serde::Deserialize;

/// Width of the outer hidden layers.
pub const HIDDEN_DIM: usize = 15;

/// Width of the latent code between encoder and decoder.
pub const LATENT_DIM: usize = 7;

/// Raw weight matrix and bias vector for one affine layer, as persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct LayerParams {
    /// Row-major weight matrix, one row per output unit.
    pub weight: Vec<Vec<f64>>,
    /// Bias vector, one entry per output unit.
    pub bias: Vec<f64>,
}

/// All layer parameters of the persisted weight artifact.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelWeights {
    pub encoder_in: LayerParams,
    pub encoder_out: LayerParams,
    pub decoder_in: LayerParams,
    pub decoder_out: LayerParams,
}

/// One affine stage: `weight . x + bias`.
#[derive(Debug, Clone)]
struct DenseLayer {
    weight: Array2<f64>,
    bias: Array1<f64>,
}

impl DenseLayer {
    /// Validate raw parameters against the expected dimensions and pack them
    /// into tensors.
    fn new(name: &str, in_dim: usize, out_dim: usize, params: LayerParams) -> Result<Self> {
        if params.weight.len() != out_dim {
            return Err(ScoringError::model_load(format!(
                "{name}: expected {out_dim} weight rows, got {}",
                params.weight.len()
            )));
        }
        if let Some(row) = params.weight.iter().find(|row| row.len() != in_dim) {
            return Err(ScoringError::model_load(format!(
                "{name}: expected {in_dim} columns per weight row, got {}",
                row.len()
            )));
        }
        if params.bias.len() != out_dim {
            return Err(ScoringError::model_load(format!(
                "{name}: expected {out_dim} bias entries, got {}",
                params.bias.len()
            )));
        }

        let flat: Vec<f64> = params.weight.into_iter().flatten().collect();
        if flat.iter().chain(params.bias.iter()).any(|v| !v.is_finite()) {
            return Err(ScoringError::model_load(format!(
                "{name}: parameters contain non-finite values"
            )));
        }

        let weight = Array2::from_shape_vec((out_dim, in_dim), flat)
            .map_err(|e| ScoringError::model_load(format!("{name}: {e}")))?;

        Ok(Self {
            weight,
            bias: Array1::from(params.bias),
        })
    }

    fn forward(&self, x: &Array1<f64>) -> Array1<f64> {
        self.weight.dot(x) + &self.bias
    }
}

/// Encoder/decoder network holding immutable weight tensors.
#[derive(Debug, Clone)]
pub struct Autoencoder {
    encoder_in: DenseLayer,
    encoder_out: DenseLayer,
    decoder_in: DenseLayer,
    decoder_out: DenseLayer,
    num_features: usize,
}

impl Autoencoder {
    /// Build the network from a persisted weight artifact.
    ///
    /// Every layer shape is checked against the fixed architecture; any
    /// mismatch is a model load error.
    pub fn new(num_features: usize, weights: ModelWeights) -> Result<Self> {
        Ok(Self {
            encoder_in: DenseLayer::new("encoder_in", num_features, HIDDEN_DIM, weights.encoder_in)?,
            encoder_out: DenseLayer::new("encoder_out", HIDDEN_DIM, LATENT_DIM, weights.encoder_out)?,
            decoder_in: DenseLayer::new("decoder_in", LATENT_DIM, HIDDEN_DIM, weights.decoder_in)?,
            decoder_out: DenseLayer::new("decoder_out", HIDDEN_DIM, num_features, weights.decoder_out)?,
            num_features,
        })
    }

    /// Input/output width of the network.
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Run one forward pass, reconstructing the input vector.
    ///
    /// Output values are bounded to [-1, 1] by the tanh output stage.
    pub fn reconstruct(&self, x: &Array1<f64>) -> Result<Array1<f64>> {
        if x.len() != self.num_features {
            return Err(ScoringError::validation(format!(
                "expected {} features, got {}",
                self.num_features,
                x.len()
            )));
        }

        let hidden = relu(self.encoder_in.forward(x));
        let code = self.encoder_out.forward(&hidden);
        let hidden = relu(self.decoder_in.forward(&code));
        Ok(self.decoder_out.forward(&hidden).mapv(f64::tanh))
    }
}

fn relu(x: Array1<f64>) -> Array1<f64> {
    x.mapv(|v| v.max(0.0))
}
