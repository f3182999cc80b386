//! Dense user x item preference matrix

use super::user_id::UserId;
use crate::error::{RecError, RecResult};
use ndarray::{Array2, ArrayView1};
use rand::Rng;
use std::num::NonZeroUsize;

/// Per-user, per-item affinity scores in `[0, 1)`, fixed at construction
#[derive(Debug, Clone)]
pub struct PreferenceMatrix {
    values: Array2<f32>,
    num_users: NonZeroUsize,
}

impl PreferenceMatrix {
    /// Fill a `num_users x num_items` matrix from the given generator
    pub fn random<R: Rng>(num_users: usize, num_items: usize, rng: &mut R) -> RecResult<Self> {
        let values = Array2::from_shape_simple_fn((num_users, num_items), || rng.gen::<f32>());
        Self::from_values(values)
    }

    /// Wrap existing values, rejecting empty shapes and anything outside `[0, 1)`
    pub fn from_values(values: Array2<f32>) -> RecResult<Self> {
        let num_users = NonZeroUsize::new(values.nrows())
            .ok_or_else(|| RecError::validation("preference matrix needs at least one user"))?;
        if values.ncols() == 0 {
            return Err(RecError::validation("preference matrix needs at least one item"));
        }
        if let Some(bad) = values.iter().find(|v| !(0.0..1.0).contains(*v)) {
            return Err(RecError::validation(format!(
                "preference value {bad} outside [0, 1)"
            )));
        }
        Ok(Self { values, num_users })
    }

    pub fn num_users(&self) -> usize {
        self.num_users.get()
    }

    pub fn num_items(&self) -> usize {
        self.values.ncols()
    }

    /// Row selected for a user identifier, `user_id mod num_users`
    pub fn row_index(&self, user_id: &UserId) -> usize {
        user_id.rem_euclid(self.num_users)
    }

    /// Query vector for a user identifier
    pub fn query_vector(&self, user_id: &UserId) -> ArrayView1<'_, f32> {
        self.values.row(self.row_index(user_id))
    }

    pub fn values(&self) -> &Array2<f32> {
        &self.values
    }
}
