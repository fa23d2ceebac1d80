use rand::Rng;

use crate::core::scoring::{display_score, match_reasons};
use crate::models::{PreferenceRecord, Property, ScoredProperty};

/// Default number of listings attached to a recommendation reply
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 2;

/// Result of a recommendation pass
#[derive(Debug)]
pub struct RecommendationResult {
    pub recommendations: Vec<ScoredProperty>,
    pub total_candidates: usize,
}

/// Turns the candidate pool into annotated recommendations
///
/// Selection is the first `limit` listings in pool order. Nothing is
/// filtered out or re-ranked; every listing gets match reasons and a
/// decorative score.
#[derive(Debug, Clone, Copy)]
pub struct Recommender {
    limit: usize,
}

impl Recommender {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn with_default_limit() -> Self {
        Self::new(DEFAULT_RECOMMENDATION_LIMIT)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Score the head of the pool against the collected preferences
    ///
    /// # Arguments
    /// * `preferences` - Facets gathered so far in the conversation
    /// * `pool` - Candidate listings, in display order
    /// * `rng` - Source for the decorative match score
    pub fn recommend<R: Rng + ?Sized>(
        &self,
        preferences: &PreferenceRecord,
        pool: &[Property],
        rng: &mut R,
    ) -> RecommendationResult {
        let recommendations = pool
            .iter()
            .take(self.limit)
            .map(|property| ScoredProperty {
                property: property.clone(),
                match_score: display_score(rng),
                match_reasons: match_reasons(preferences, property),
            })
            .collect();

        RecommendationResult {
            recommendations,
            total_candidates: pool.len(),
        }
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Self::with_default_limit()
    }
}
