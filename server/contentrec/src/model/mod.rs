//! Numeric building blocks: user ids, preference matrix, scoring network, ranking

pub mod matrix;
pub mod neural;
pub mod ranking;
pub mod user_id;

pub use matrix::PreferenceMatrix;
pub use neural::{ActivationFunction, DenseLayer, NeuralLayer, ScoringNetwork, ScoringNetworkBuilder};
pub use ranking::top_k_indices;
pub use user_id::UserId;
