//! Recommendation engine
//!
//! Holds the startup-built preference matrix and scoring network and turns a
//! user identifier into a ranked list of content labels. Both structures are
//! immutable after construction, so a single `Arc<Recommender>` is shared by
//! every request without locking.

use crate::config::ModelConfig;
use crate::error::{RecError, RecResult};
use crate::model::{top_k_indices, PreferenceMatrix, ScoringNetwork, UserId};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};
use validator::Validate;

/// Label prefix for recommended items
pub const CONTENT_LABEL_PREFIX: &str = "content";

/// Synthetic label for an item index
pub fn content_label(index: usize) -> String {
    format!("{CONTENT_LABEL_PREFIX}{index}")
}

/// Scores users against the preference matrix with an untrained network
#[derive(Debug)]
pub struct Recommender {
    matrix: PreferenceMatrix,
    network: ScoringNetwork,
    top_k: usize,
}

impl Recommender {
    /// Build matrix and network from one seeded generator
    pub fn from_config(config: &ModelConfig) -> RecResult<Self> {
        config
            .validate()
            .map_err(|e| RecError::validation(format!("Invalid model configuration: {e}")))?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let matrix = PreferenceMatrix::random(config.num_users, config.num_items, &mut rng)?;
        let network = ScoringNetwork::new(config.num_items, &config.hidden_layers, &mut rng);

        info!(
            users = config.num_users,
            items = config.num_items,
            top_k = config.top_k,
            seed = config.seed,
            "Initialized recommender: {:?}",
            network
        );

        Self::new(matrix, network, config.top_k)
    }

    /// Assemble from prebuilt parts
    pub fn new(matrix: PreferenceMatrix, network: ScoringNetwork, top_k: usize) -> RecResult<Self> {
        if top_k == 0 {
            return Err(RecError::validation("top_k must be at least 1"));
        }
        if network.input_dim() != matrix.num_items() {
            return Err(RecError::DimensionMismatch {
                expected: matrix.num_items(),
                got: network.input_dim(),
            });
        }
        if network.output_dim() != matrix.num_items() {
            return Err(RecError::DimensionMismatch {
                expected: matrix.num_items(),
                got: network.output_dim(),
            });
        }
        Ok(Self {
            matrix,
            network,
            top_k,
        })
    }

    pub fn num_users(&self) -> usize {
        self.matrix.num_users()
    }

    pub fn num_items(&self) -> usize {
        self.matrix.num_items()
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Matrix row used for a user identifier
    pub fn row_index(&self, user_id: &UserId) -> usize {
        self.matrix.row_index(user_id)
    }

    /// Item indices ranked for a user, best first
    pub fn rank(&self, user_id: &UserId) -> RecResult<Vec<usize>> {
        let query = self.matrix.query_vector(user_id);
        let scores = self.network.predict(query)?;
        let ranked = top_k_indices(scores.view(), self.top_k);
        debug!(
            user_id = %user_id,
            row = self.row_index(user_id),
            ?ranked,
            "Scored user"
        );
        Ok(ranked)
    }

    /// Content labels recommended for a user, best first
    pub fn recommend(&self, user_id: &UserId) -> RecResult<Vec<String>> {
        Ok(self.rank(user_id)?.into_iter().map(content_label).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DenseLayer;
    use crate::model::{ActivationFunction, ScoringNetworkBuilder};

    fn recommender() -> Recommender {
        Recommender::from_config(&ModelConfig::default()).unwrap()
    }

    #[test]
    fn test_content_label() {
        assert_eq!(content_label(0), "content0");
        assert_eq!(content_label(17), "content17");
    }

    #[test]
    fn test_default_dimensions() {
        let rec = recommender();
        assert_eq!(rec.num_users(), 10);
        assert_eq!(rec.num_items(), 20);
        assert_eq!(rec.top_k(), 3);
    }

    #[test]
    fn test_always_three_distinct_items() {
        let rec = recommender();
        for user_id in -25i64..25 {
            let ranked = rec.rank(&UserId::from(user_id)).unwrap();
            assert_eq!(ranked.len(), 3);
            assert!(ranked.iter().all(|&i| i < 20));
            let mut unique = ranked.clone();
            unique.sort_unstable();
            unique.dedup();
            assert_eq!(unique.len(), 3);
        }
    }

    #[test]
    fn test_same_row_same_recommendations() {
        let rec = recommender();
        let recs = |id: i64| rec.recommend(&UserId::from(id)).unwrap();
        assert_eq!(recs(3), recs(13));
        assert_eq!(recs(3), recs(-7));
        assert_eq!(recs(3), recs(3));

        let wide = UserId::parse_decimal("100000000000000000000003").unwrap();
        assert_eq!(rec.recommend(&wide).unwrap(), recs(3));
    }

    #[test]
    fn test_same_seed_same_results_across_instances() {
        let a = recommender();
        let b = recommender();
        for user_id in 0..10i64 {
            let user_id = UserId::from(user_id);
            assert_eq!(a.recommend(&user_id).unwrap(), b.recommend(&user_id).unwrap());
        }
    }

    #[test]
    fn test_labels_follow_ranking() {
        let rec = recommender();
        let user_id = UserId::from(5i64);
        let ranked = rec.rank(&user_id).unwrap();
        let labels = rec.recommend(&user_id).unwrap();
        let expected: Vec<String> = ranked.into_iter().map(content_label).collect();
        assert_eq!(labels, expected);
    }

    #[test]
    fn test_custom_dimensions() {
        let config = ModelConfig {
            num_users: 4,
            num_items: 8,
            top_k: 8,
            seed: 7,
            hidden_layers: vec![16],
        };
        let rec = Recommender::from_config(&config).unwrap();
        let ranked = rec.rank(&UserId::from(2i64)).unwrap();
        let mut sorted = ranked.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ModelConfig {
            top_k: 30,
            ..ModelConfig::default()
        };
        assert!(matches!(
            Recommender::from_config(&config),
            Err(RecError::Validation(_))
        ));
    }

    #[test]
    fn test_mismatched_parts_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let matrix = PreferenceMatrix::random(3, 5, &mut rng).unwrap();
        let network = ScoringNetworkBuilder::new()
            .add_layer(DenseLayer::new(
                "narrow".to_string(),
                5,
                4,
                ActivationFunction::Sigmoid,
                &mut rng,
            ))
            .build();
        assert!(Recommender::new(matrix, network, 2).is_err());
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let matrix = PreferenceMatrix::random(3, 5, &mut rng).unwrap();
        let network = ScoringNetwork::new(5, &[4], &mut rng);
        assert!(matches!(
            Recommender::new(matrix, network, 0),
            Err(RecError::Validation(_))
        ));
    }
}
