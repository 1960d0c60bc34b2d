//! Compact autoencoder and feature scaler backing the reconstruction scan.
//!
//! The network mirrors the shape used for the offline-trained artifact:
//! input -> 8 -> 8 -> latent(4) -> 8 -> 8 -> input, ReLU activations, and a
//! deterministic forward pass through the encoder mean. Training happens
//! outside this crate; freshly initialized parameters are valid but
//! meaningless until a trained artifact replaces them.

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

pub const HIDDEN_DIM: usize = 8;
pub const LATENT_DIM: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct DenseLayer {
    weights: DMatrix<f64>,
    bias: DVector<f64>,
}

impl DenseLayer {
    fn init<R: Rng>(rng: &mut R, inputs: usize, outputs: usize) -> Self {
        // Small Gaussian init, matching the scale a fresh untrained
        // checkpoint would carry.
        let normal = Normal::new(0.0, 0.1).expect("valid std");
        Self {
            weights: DMatrix::from_fn(outputs, inputs, |_, _| normal.sample(rng)),
            bias: DVector::zeros(outputs),
        }
    }

    fn forward(&self, input: &DVector<f64>, relu: bool) -> DVector<f64> {
        let mut out = &self.weights * input + &self.bias;
        if relu {
            out.apply(|v| *v = v.max(0.0));
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Autoencoder {
    input_dim: usize,
    encoder: Vec<DenseLayer>,
    latent: DenseLayer,
    decoder: Vec<DenseLayer>,
}

impl Autoencoder {
    pub fn new(input_dim: usize) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            input_dim,
            encoder: vec![
                DenseLayer::init(&mut rng, input_dim, HIDDEN_DIM),
                DenseLayer::init(&mut rng, HIDDEN_DIM, HIDDEN_DIM),
            ],
            latent: DenseLayer::init(&mut rng, HIDDEN_DIM, LATENT_DIM),
            decoder: vec![
                DenseLayer::init(&mut rng, LATENT_DIM, HIDDEN_DIM),
                DenseLayer::init(&mut rng, HIDDEN_DIM, HIDDEN_DIM),
                DenseLayer::init(&mut rng, HIDDEN_DIM, input_dim),
            ],
        }
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    /// Reconstruct a standardized feature vector through the latent mean.
    pub fn reconstruct(&self, input: &DVector<f64>) -> DVector<f64> {
        let mut h = input.clone();
        for layer in &self.encoder {
            h = layer.forward(&h, true);
        }
        let z = self.latent.forward(&h, false);

        let mut out = z;
        let last = self.decoder.len() - 1;
        for (i, layer) in self.decoder.iter().enumerate() {
            out = layer.forward(&out, i < last);
        }
        out
    }

    /// Mean squared deviation between a row and its reconstruction.
    pub fn reconstruction_error(&self, input: &DVector<f64>) -> f64 {
        let recon = self.reconstruct(input);
        let diff = input - recon;
        diff.iter().map(|v| v * v).sum::<f64>() / self.input_dim as f64
    }
}

/// Per-feature standardization: `(x - mean) / std`, with zero-variance
/// features passed through centered only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScaler {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl FeatureScaler {
    /// Fit column means and population stds over a batch of rows.
    pub fn fit(rows: &[Vec<f64>], num_features: usize) -> Self {
        let n = rows.len().max(1) as f64;
        let mut means = vec![0.0; num_features];
        for row in rows {
            for (m, v) in means.iter_mut().zip(row) {
                *m += v;
            }
        }
        for m in &mut means {
            *m /= n;
        }

        let mut stds = vec![0.0; num_features];
        for row in rows {
            for ((s, v), m) in stds.iter_mut().zip(row).zip(&means) {
                *s += (v - m).powi(2);
            }
        }
        for s in &mut stds {
            *s = (*s / n).sqrt();
        }

        Self { means, stds }
    }

    pub fn num_features(&self) -> usize {
        self.means.len()
    }

    pub fn transform(&self, row: &[f64]) -> DVector<f64> {
        DVector::from_iterator(
            row.len(),
            row.iter().zip(self.means.iter().zip(&self.stds)).map(|(v, (m, s))| {
                if *s == 0.0 {
                    v - m
                } else {
                    (v - m) / s
                }
            }),
        )
    }
}
