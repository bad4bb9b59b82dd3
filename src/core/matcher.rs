use crate::core::scorer::CompatibilityScorer;
use crate::models::{MatchCandidate, MusicProfile, RankedMatch};

/// Result of ranking candidates for one user
#[derive(Debug)]
pub struct RankResult {
    pub matches: Vec<RankedMatch>,
    pub total_candidates: usize,
}

/// Ranks stored users against one seeker with a configured scorer
///
/// # Pipeline Stages
/// 1. Drop the seeker's own record
/// 2. Score seeker against each candidate
/// 3. Drop results below the minimum score
/// 4. Sort by score, then user id, and truncate
#[derive(Debug, Clone)]
pub struct Matcher {
    scorer: CompatibilityScorer,
    min_score: f64,
}

impl Matcher {
    pub fn new(scorer: CompatibilityScorer, min_score: f64) -> Self {
        Self { scorer, min_score }
    }

    pub fn with_default_scorer() -> Self {
        Self {
            scorer: CompatibilityScorer::with_defaults(),
            min_score: 0.0,
        }
    }

    pub fn scorer(&self) -> &CompatibilityScorer {
        &self.scorer
    }

    /// Rank candidates for a seeker
    ///
    /// # Arguments
    /// * `seeker_id` - Id of the user the ranking is for, excluded from results
    /// * `seeker` - The seeker's validated profile
    /// * `candidates` - All other stored users with valid profiles
    /// * `limit` - Maximum number of matches to return
    pub fn rank(
        &self,
        seeker_id: &str,
        seeker: &MusicProfile,
        candidates: Vec<MatchCandidate>,
        limit: usize,
    ) -> RankResult {
        let total_candidates = candidates.len();

        let mut ranked: Vec<RankedMatch> = candidates
            .into_iter()
            .filter(|candidate| candidate.user_id != seeker_id)
            .filter_map(|candidate| {
                let result = self.scorer.score(seeker, &candidate.profile);

                if result.score >= self.min_score {
                    Some(RankedMatch {
                        user_id: candidate.user_id,
                        username: candidate.username,
                        match_score: result.score,
                        match_strength: result.strength,
                        shared_artists: result.shared_artists,
                        shared_tracks: result.shared_tracks,
                        shared_genres: result.shared_genres,
                        compatibility_reasons: result.compatibility_reasons,
                    })
                } else {
                    None
                }
            })
            .collect();

        // Sort by score (descending) and then by user id for stable output
        ranked.sort_by(|a, b| {
            b.match_score
                .partial_cmp(&a.match_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });

        ranked.truncate(limit);

        RankResult {
            matches: ranked,
            total_candidates,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_scorer()
    }
}
