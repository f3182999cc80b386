//! Feed-forward scoring network
//!
//! A small stack of fully connected layers mapping an item-preference vector
//! to one score per item. Weights are drawn once at construction and are never
//! updated, so inference is a pure function of the input.

use crate::error::{RecError, RecResult};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Neural network layer trait
pub trait NeuralLayer: Send + Sync {
    /// Forward pass over a batch, one sample per row
    fn forward(&self, input: &Array2<f32>) -> RecResult<Array2<f32>>;

    fn input_dim(&self) -> usize;

    fn output_dim(&self) -> usize;

    fn name(&self) -> &str;
}

/// Activation functions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActivationFunction {
    ReLU,
    Sigmoid,
    Identity,
}

/// Apply activation function to array
pub fn apply_activation(x: Array2<f32>, activation: ActivationFunction) -> Array2<f32> {
    match activation {
        ActivationFunction::ReLU => x.mapv_into(|v| v.max(0.0)),
        ActivationFunction::Sigmoid => x.mapv_into(|v| 1.0 / (1.0 + (-v).exp())),
        ActivationFunction::Identity => x,
    }
}

/// Fully connected layer with a fused activation
#[derive(Debug, Clone)]
pub struct DenseLayer {
    name: String,
    /// Weight matrix, `input_dim x output_dim`
    weight: Array2<f32>,
    bias: Array1<f32>,
    activation: ActivationFunction,
}

impl DenseLayer {
    /// Glorot-uniform weights, zero bias
    pub fn new<R: Rng>(
        name: String,
        input_dim: usize,
        output_dim: usize,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> Self {
        let bound = (6.0 / (input_dim + output_dim) as f32).sqrt();
        let weight = Array2::from_shape_simple_fn((input_dim, output_dim), || {
            rng.gen_range(-bound..=bound)
        });

        Self {
            name,
            weight,
            bias: Array1::zeros(output_dim),
            activation,
        }
    }

    /// Build a layer from explicit parameters
    pub fn from_parameters(
        name: String,
        weight: Array2<f32>,
        bias: Array1<f32>,
        activation: ActivationFunction,
    ) -> RecResult<Self> {
        if bias.len() != weight.ncols() {
            return Err(RecError::DimensionMismatch {
                expected: weight.ncols(),
                got: bias.len(),
            });
        }
        Ok(Self {
            name,
            weight,
            bias,
            activation,
        })
    }

    pub fn weight(&self) -> &Array2<f32> {
        &self.weight
    }
}

impl NeuralLayer for DenseLayer {
    fn forward(&self, input: &Array2<f32>) -> RecResult<Array2<f32>> {
        if input.ncols() != self.input_dim() {
            return Err(RecError::DimensionMismatch {
                expected: self.input_dim(),
                got: input.ncols(),
            });
        }
        let output = input.dot(&self.weight) + &self.bias;
        Ok(apply_activation(output, self.activation))
    }

    fn input_dim(&self) -> usize {
        self.weight.nrows()
    }

    fn output_dim(&self) -> usize {
        self.weight.ncols()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Sequential stack of layers producing per-item scores
pub struct ScoringNetwork {
    layers: Vec<Box<dyn NeuralLayer>>,
}

impl std::fmt::Debug for ScoringNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shape: Vec<_> = self
            .layers
            .iter()
            .map(|l| format!("{}({}->{})", l.name(), l.input_dim(), l.output_dim()))
            .collect();
        f.debug_struct("ScoringNetwork")
            .field("layers", &shape)
            .finish()
    }
}

impl ScoringNetwork {
    /// `num_items -> hidden... -> num_items`, ReLU between, sigmoid on the output
    pub fn new<R: Rng>(num_items: usize, hidden_layers: &[usize], rng: &mut R) -> Self {
        let mut builder = ScoringNetworkBuilder::new();
        let mut input_dim = num_items;
        for (i, &width) in hidden_layers.iter().enumerate() {
            builder = builder.add_layer(DenseLayer::new(
                format!("dense_{i}"),
                input_dim,
                width,
                ActivationFunction::ReLU,
                rng,
            ));
            input_dim = width;
        }
        builder
            .add_layer(DenseLayer::new(
                format!("dense_{}", hidden_layers.len()),
                input_dim,
                num_items,
                ActivationFunction::Sigmoid,
                rng,
            ))
            .build()
    }

    /// Width of the expected input vector
    pub fn input_dim(&self) -> usize {
        self.layers.first().map(|l| l.input_dim()).unwrap_or(0)
    }

    /// Width of the produced score vector
    pub fn output_dim(&self) -> usize {
        self.layers.last().map(|l| l.output_dim()).unwrap_or(0)
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Batch forward pass
    pub fn forward(&self, input: &Array2<f32>) -> RecResult<Array2<f32>> {
        let mut output = input.clone();
        for layer in &self.layers {
            output = layer.forward(&output)?;
        }
        Ok(output)
    }

    /// Score a single query vector
    pub fn predict(&self, query: ArrayView1<'_, f32>) -> RecResult<Array1<f32>> {
        let batch = query.to_owned().insert_axis(Axis(0));
        let output = self.forward(&batch)?;
        Ok(output.index_axis_move(Axis(0), 0))
    }
}

/// Builder for a [`ScoringNetwork`]
#[derive(Default)]
pub struct ScoringNetworkBuilder {
    layers: Vec<Box<dyn NeuralLayer>>,
}

impl ScoringNetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_layer<L: NeuralLayer + 'static>(mut self, layer: L) -> Self {
        self.layers.push(Box::new(layer));
        self
    }

    pub fn build(self) -> ScoringNetwork {
        ScoringNetwork {
            layers: self.layers,
        }
    }
}
