//! Recommendation orchestration.
//!
//! [`Recommender`] joins the read-only catalog and similarity index with a
//! caller-owned [`Session`] to produce two kinds of ranked lists:
//!
//! - content recommendations: nearest neighbours of one item;
//! - user recommendations: unrated catalog items ranked by the session's
//!   preference model, filtered by tags after ranking.
//!
//! When no model can be used for the user (the fit failed or the user is a
//! cold start) the configured [`FallbackPolicy`] decides what is returned.
//! Every user recommendation says which path produced it.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogStore, Item, ItemId};
use crate::error::{GameRecError, Result};
use crate::feedback::{FeedbackLedger, Label, UserId};
use crate::ml::PreferenceModel;
use crate::session::Session;
use crate::similarity::SimilarityIndex;
use crate::tags::{TagFilter, TagMatch};

/// What to return when the preference model cannot score a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Surface the fit or cold-start error.
    None,
    /// Rank by similarity to the user's liked items, else return candidates
    /// unranked in catalog order.
    #[default]
    ContentThenUnranked,
}

/// Configuration for the recommender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendConfig {
    /// Default result count for content recommendations.
    pub content_top_n: usize,
    /// Default result count for user recommendations.
    pub user_top_n: usize,
    /// Keep only this many top-scored candidates before tag filtering.
    ///
    /// `None` filters the full ranked list, so the result is the exact
    /// top-N among matching items. With a bound, fewer than `top_n` results
    /// come back when too few of the kept candidates match the filter.
    pub user_pool_size: Option<usize>,
    /// Tag matching rule for user recommendations.
    pub user_tag_match: TagMatch,
    /// Tag matching rule for catalog browsing.
    pub browse_tag_match: TagMatch,
    /// Behaviour when the model cannot score the user.
    pub fallback: FallbackPolicy,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            content_top_n: 10,
            user_top_n: 5,
            user_pool_size: None,
            user_tag_match: TagMatch::Any,
            browse_tag_match: TagMatch::All,
            fallback: FallbackPolicy::ContentThenUnranked,
        }
    }
}

impl RecommendConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.content_top_n == 0 {
            return Err(GameRecError::invalid_config("content_top_n must be > 0"));
        }
        if self.user_top_n == 0 {
            return Err(GameRecError::invalid_config("user_top_n must be > 0"));
        }
        if self.user_pool_size == Some(0) {
            return Err(GameRecError::invalid_config("user_pool_size must be > 0"));
        }
        Ok(())
    }
}

/// Which path produced a user recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    /// Scored by the fitted preference model.
    Model,
    /// Scored by similarity to items the user liked.
    ContentFallback,
    /// Not scored; catalog order.
    Unranked,
}

/// A neighbour of the requested item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecommendation {
    pub app_id: ItemId,
    pub title: String,
    pub similarity_score: f64,
    pub tags: Vec<String>,
    pub description: String,
}

/// An item recommended to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecommendation {
    pub app_id: ItemId,
    pub title: String,
    /// Model estimate, fallback similarity, or 0 for unranked results.
    pub predicted_score: f64,
    pub tags: Vec<String>,
    pub description: String,
    pub source: RecommendationSource,
}

/// A scored candidate: catalog position, item, score.
type Scored<'a> = (usize, &'a Item, f64);

/// Hybrid recommender over a shared catalog and similarity index.
#[derive(Debug, Clone)]
pub struct Recommender {
    catalog: Arc<CatalogStore>,
    similarity: Arc<SimilarityIndex>,
    config: RecommendConfig,
}

impl Recommender {
    /// Create a recommender with default configuration.
    pub fn new(catalog: Arc<CatalogStore>, similarity: Arc<SimilarityIndex>) -> Self {
        Self {
            catalog,
            similarity,
            config: RecommendConfig::default(),
        }
    }

    /// Create a recommender with a validated configuration.
    pub fn with_config(
        catalog: Arc<CatalogStore>,
        similarity: Arc<SimilarityIndex>,
        config: RecommendConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            catalog,
            similarity,
            config,
        })
    }

    /// The catalog.
    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    /// The similarity index.
    pub fn similarity(&self) -> &SimilarityIndex {
        &self.similarity
    }

    /// The configuration.
    pub fn config(&self) -> &RecommendConfig {
        &self.config
    }

    /// Tag filter using the configured user recommendation rule.
    pub fn user_filter<I, S>(&self, tags: I) -> TagFilter
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TagFilter::new(tags, self.config.user_tag_match)
    }

    /// Search the catalog by title with the configured browse tag rule.
    pub fn browse<I, S>(&self, query: Option<&str>, tags: I) -> Vec<&Item>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let filter = TagFilter::new(tags, self.config.browse_tag_match);
        self.catalog.browse(query, &filter)
    }

    /// Items most similar to `item_id`, best first.
    ///
    /// Fails with `NotFound` when the item is not in the catalog; an item
    /// without a similarity row yields an empty list.
    pub fn recommend_by_content(
        &self,
        item_id: ItemId,
        top_n: usize,
    ) -> Result<Vec<ContentRecommendation>> {
        self.catalog.get(item_id)?;

        let neighbors = self.similarity.neighbors(&self.catalog, item_id, top_n);
        if neighbors.is_empty() {
            debug!("no similarity neighbours for item {item_id}");
        }

        Ok(neighbors
            .into_iter()
            .map(|(item, score)| ContentRecommendation {
                app_id: item.id,
                title: item.title.clone(),
                similarity_score: score,
                tags: item.tags.iter().cloned().collect(),
                description: item.description.clone(),
            })
            .collect())
    }

    /// Personalised recommendations for the session user.
    ///
    /// The session's model is refitted first if the ledger changed. Items
    /// the user already rated are never returned. `candidate_pool` defaults
    /// to the whole catalog.
    pub fn recommend_for_user(
        &self,
        session: &mut Session,
        candidate_pool: Option<&[ItemId]>,
        top_n: usize,
        tag_filter: &TagFilter,
    ) -> Result<Vec<UserRecommendation>> {
        let user_id = session.user_id();

        let fitted = session.ensure_fitted().map(|_| ());
        if let Err(e) = fitted {
            return self.fallback(session.ledger(), user_id, candidate_pool, top_n, tag_filter, e);
        }
        let Some(model) = session.model() else {
            return Err(GameRecError::other("preference model missing after fit"));
        };

        match self.rank_with_model(
            model,
            session.ledger(),
            user_id,
            candidate_pool,
            top_n,
            tag_filter,
        ) {
            Err(e @ GameRecError::UnknownUser(_)) => {
                self.fallback(session.ledger(), user_id, candidate_pool, top_n, tag_filter, e)
            }
            other => other,
        }
    }

    /// Rank candidates for a user with an already fitted model.
    ///
    /// Fails with `UnknownUser` when the model has no vector for the user.
    /// Candidates without an item vector are skipped.
    pub fn rank_with_model(
        &self,
        model: &PreferenceModel,
        ledger: &FeedbackLedger,
        user_id: UserId,
        candidate_pool: Option<&[ItemId]>,
        top_n: usize,
        tag_filter: &TagFilter,
    ) -> Result<Vec<UserRecommendation>> {
        if !model.knows_user(user_id) {
            return Err(GameRecError::UnknownUser(user_id));
        }

        let candidates = self.candidates(ledger, user_id, candidate_pool);
        let scored: Vec<Scored<'_>> = candidates
            .par_iter()
            .filter_map(|&(position, item)| {
                // Cold items have no vector and are skipped.
                let score = model.predict(user_id, item.id).ok()?;
                Some((position, item, score))
            })
            .collect();

        debug!(
            "user {}: scored {} of {} candidates",
            user_id,
            scored.len(),
            candidates.len()
        );

        Ok(self.finish(scored, top_n, tag_filter, RecommendationSource::Model))
    }

    fn fallback(
        &self,
        ledger: &FeedbackLedger,
        user_id: UserId,
        candidate_pool: Option<&[ItemId]>,
        top_n: usize,
        tag_filter: &TagFilter,
        cause: GameRecError,
    ) -> Result<Vec<UserRecommendation>> {
        if self.config.fallback == FallbackPolicy::None {
            return Err(cause);
        }
        warn!("user {user_id}: preference model unavailable ({cause}), using fallback ranking");

        let candidates = self.candidates(ledger, user_id, candidate_pool);

        let liked = ledger.items_with_label(user_id, Label::Recommended);
        let content_scores = self.liked_similarity(&liked);
        let scored: Vec<Scored<'_>> = candidates
            .iter()
            .filter_map(|&(position, item)| {
                content_scores
                    .get(&item.id)
                    .map(|&score| (position, item, score))
            })
            .collect();

        let content_matches = scored.len();
        let results = self.finish(
            scored,
            top_n,
            tag_filter,
            RecommendationSource::ContentFallback,
        );
        if !results.is_empty() {
            return Ok(results);
        }
        if content_matches > 0 {
            debug!(
                "user {user_id}: none of {content_matches} content fallback candidates passed the tag filter, returning unranked candidates"
            );
        }

        let unranked = candidates
            .into_iter()
            .map(|(position, item)| (position, item, 0.0))
            .collect();
        Ok(self.finish(unranked, top_n, tag_filter, RecommendationSource::Unranked))
    }

    /// Best similarity of every item to any of `liked`.
    fn liked_similarity(&self, liked: &BTreeSet<ItemId>) -> HashMap<ItemId, f64> {
        let mut best: HashMap<ItemId, f64> = HashMap::new();
        for &source in liked {
            let Some(row) = self.similarity.row(source) else {
                continue;
            };
            for (&other, &score) in row {
                if other == source {
                    continue;
                }
                best.entry(other)
                    .and_modify(|current| *current = current.max(score))
                    .or_insert(score);
            }
        }
        best
    }

    /// Catalog items from the pool, deduplicated, minus the user's rated items.
    fn candidates(
        &self,
        ledger: &FeedbackLedger,
        user_id: UserId,
        candidate_pool: Option<&[ItemId]>,
    ) -> Vec<(usize, &Item)> {
        let rated = ledger.ratings_for(user_id);
        let items = self.catalog.all();

        match candidate_pool {
            None => items
                .iter()
                .enumerate()
                .filter(|(_, item)| !rated.contains(&item.id))
                .collect(),
            Some(pool) => {
                let mut seen = HashSet::with_capacity(pool.len());
                pool.iter()
                    .filter(|id| seen.insert(**id) && !rated.contains(*id))
                    .filter_map(|id| {
                        let position = self.catalog.position(*id);
                        if position.is_none() {
                            debug!("candidate {id} is not in the catalog, skipping");
                        }
                        position.map(|position| (position, &items[position]))
                    })
                    .collect()
            }
        }
    }

    /// Rank, optionally trim, filter by tags, and truncate.
    fn finish(
        &self,
        mut scored: Vec<Scored<'_>>,
        top_n: usize,
        tag_filter: &TagFilter,
        source: RecommendationSource,
    ) -> Vec<UserRecommendation> {
        if top_n == 0 {
            return Vec::new();
        }

        scored.sort_by(|a, b| {
            b.2.partial_cmp(&a.2)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        if let Some(pool_size) = self.config.user_pool_size {
            scored.truncate(pool_size);
        }

        let results: Vec<UserRecommendation> = scored
            .into_iter()
            .filter(|(_, item, _)| tag_filter.matches(&item.tags))
            .take(top_n)
            .map(|(_, item, score)| UserRecommendation {
                app_id: item.id,
                title: item.title.clone(),
                predicted_score: score,
                tags: item.tags.iter().cloned().collect(),
                description: item.description.clone(),
                source,
            })
            .collect();

        if let Some(pool_size) = self.config.user_pool_size
            && results.len() < top_n
            && !tag_filter.is_empty()
        {
            warn!(
                "only {} of {} requested results matched the tag filter within the top {} candidates",
                results.len(),
                top_n,
                pool_size
            );
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Item;
    use crate::feedback::Rating;
    use crate::ml::FactorizationConfig;

    fn catalog() -> Arc<CatalogStore> {
        Arc::new(
            CatalogStore::new(vec![
                Item::new(1, "A").with_tags(["rpg"]),
                Item::new(2, "B").with_tags(["rpg", "coop"]),
                Item::new(3, "C").with_tags(["shooter"]),
                Item::new(4, "D").with_tags(["shooter", "coop"]),
                Item::new(5, "E"),
            ])
            .unwrap(),
        )
    }

    fn similarity() -> Arc<SimilarityIndex> {
        let mut index = SimilarityIndex::new();
        index.insert(1, 1, 1.0).unwrap();
        index.insert(1, 2, 0.8).unwrap();
        index.insert(1, 3, 0.1).unwrap();
        index.insert(2, 4, 0.6).unwrap();
        Arc::new(index)
    }

    fn config() -> FactorizationConfig {
        FactorizationConfig {
            n_factors: 4,
            n_epochs: 30,
            seed: Some(3),
            ..Default::default()
        }
    }

    /// Users 10 and 11 rate everything; user 1 rated A and B.
    fn ledger() -> FeedbackLedger {
        let mut ratings = vec![
            Rating::new(1, 1, Label::Recommended),
            Rating::new(1, 2, Label::NotRecommended),
        ];
        for item in 1..=5 {
            ratings.push(Rating::new(10, item, Label::from_recommended(item % 2 == 1)));
            ratings.push(Rating::new(11, item, Label::from_recommended(item >= 3)));
        }
        FeedbackLedger::from_ratings(ratings)
    }

    #[test]
    fn test_recommend_config_default() {
        let config = RecommendConfig::default();
        assert_eq!(config.content_top_n, 10);
        assert_eq!(config.user_top_n, 5);
        assert_eq!(config.user_tag_match, TagMatch::Any);
        assert_eq!(config.browse_tag_match, TagMatch::All);
        assert!(config.validate().is_ok());

        let config = RecommendConfig {
            user_pool_size: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_content_recommendation() {
        let recommender = Recommender::new(catalog(), similarity());

        let results = recommender.recommend_by_content(1, 1).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].app_id, 2);
        assert_eq!(results[0].similarity_score, 0.8);
        assert_eq!(results[0].tags, vec!["coop".to_string(), "rpg".to_string()]);

        assert!(recommender.recommend_by_content(5, 10).unwrap().is_empty());
        assert!(matches!(
            recommender.recommend_by_content(42, 10),
            Err(GameRecError::NotFound(_))
        ));
    }

    #[test]
    fn test_rated_items_are_excluded() {
        let recommender = Recommender::new(catalog(), similarity());
        let mut session = Session::new(1, ledger()).with_config(config());

        let results = recommender
            .recommend_for_user(&mut session, None, 10, &TagFilter::none())
            .unwrap();
        let ids: Vec<ItemId> = results.iter().map(|r| r.app_id).collect();
        assert_eq!(ids.len(), 3);
        assert!(!ids.contains(&1));
        assert!(!ids.contains(&2));
        assert!(results.iter().all(|r| r.source == RecommendationSource::Model));
        assert!(results
            .windows(2)
            .all(|w| w[0].predicted_score >= w[1].predicted_score));
    }

    #[test]
    fn test_candidate_pool_is_respected() {
        let recommender = Recommender::new(catalog(), similarity());
        let mut session = Session::new(1, ledger()).with_config(config());

        let pool = [1, 2, 3, 3, 999];
        let results = recommender
            .recommend_for_user(&mut session, Some(&pool), 5, &TagFilter::none())
            .unwrap();
        assert_eq!(results.iter().map(|r| r.app_id).collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_tag_filter_applies_after_ranking() {
        let recommender = Recommender::new(catalog(), similarity());
        let mut session = Session::new(1, ledger()).with_config(config());

        let unfiltered = recommender
            .recommend_for_user(&mut session, None, 10, &TagFilter::none())
            .unwrap();
        let filtered = recommender
            .recommend_for_user(&mut session, None, 10, &TagFilter::any(["shooter"]))
            .unwrap();

        let expected: Vec<ItemId> = unfiltered
            .iter()
            .filter(|r| r.tags.iter().any(|t| t == "shooter"))
            .map(|r| r.app_id)
            .collect();
        assert_eq!(filtered.iter().map(|r| r.app_id).collect::<Vec<_>>(), expected);

        let all = recommender
            .recommend_for_user(&mut session, None, 10, &TagFilter::all(["shooter", "coop"]))
            .unwrap();
        assert_eq!(all.iter().map(|r| r.app_id).collect::<Vec<_>>(), vec![4]);
    }

    #[test]
    fn test_pool_size_bounds_filtered_results() {
        let config_rec = RecommendConfig {
            user_pool_size: Some(1),
            ..Default::default()
        };
        let recommender = Recommender::with_config(catalog(), similarity(), config_rec).unwrap();
        let mut session = Session::new(1, ledger()).with_config(config());

        let results = recommender
            .recommend_for_user(&mut session, None, 5, &TagFilter::none())
            .unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_pool_size_drops_matches_ranked_outside_pool() {
        // One distinct tag per item, so a filter can select any single item.
        let tagged = Arc::new(
            CatalogStore::new(
                (1..=5)
                    .map(|id| Item::new(id, format!("G{id}")).with_tags([format!("t{id}")]))
                    .collect(),
            )
            .unwrap(),
        );
        let exact = Recommender::new(tagged.clone(), similarity());
        let bounded = Recommender::with_config(
            tagged,
            similarity(),
            RecommendConfig {
                user_pool_size: Some(1),
                ..Default::default()
            },
        )
        .unwrap();
        let mut session = Session::new(1, ledger()).with_config(config());

        let ranked = exact
            .recommend_for_user(&mut session, None, 10, &TagFilter::none())
            .unwrap();
        assert_eq!(ranked.len(), 3);
        let last = ranked[2].app_id;
        let filter = TagFilter::any([format!("t{last}")]);

        let trimmed = bounded
            .recommend_for_user(&mut session, None, 5, &filter)
            .unwrap();
        assert!(trimmed.is_empty());

        let full = exact
            .recommend_for_user(&mut session, None, 5, &filter)
            .unwrap();
        assert_eq!(full.iter().map(|r| r.app_id).collect::<Vec<_>>(), vec![last]);
        assert_eq!(full[0].source, RecommendationSource::Model);
    }

    #[test]
    fn test_cold_start_user_gets_content_fallback() {
        let recommender = Recommender::new(catalog(), similarity());
        // User 50 has no ratings, so the fitted model has no vector for them.
        let mut session = Session::new(50, ledger()).with_config(config());

        let results = recommender
            .recommend_for_user(&mut session, None, 3, &TagFilter::none())
            .unwrap();
        assert_eq!(results.len(), 3);
        assert!(results
            .iter()
            .all(|r| r.source == RecommendationSource::Unranked));
        assert_eq!(
            results.iter().map(|r| r.app_id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_empty_ledger_falls_back_to_liked_similarity() {
        let recommender = Recommender::new(catalog(), similarity());
        let mut session = Session::new(1, FeedbackLedger::new()).with_config(config());

        let results = recommender
            .recommend_for_user(&mut session, None, 5, &TagFilter::none())
            .unwrap();
        assert!(results
            .iter()
            .all(|r| r.source == RecommendationSource::Unranked));
        assert_eq!(results.len(), 5);
        assert!(session.last_fit_error().is_some());
    }

    #[test]
    fn test_fallback_policy_none_surfaces_error() {
        let config_rec = RecommendConfig {
            fallback: FallbackPolicy::None,
            ..Default::default()
        };
        let recommender = Recommender::with_config(catalog(), similarity(), config_rec).unwrap();
        let mut session = Session::new(1, FeedbackLedger::new()).with_config(config());

        assert!(matches!(
            recommender.recommend_for_user(&mut session, None, 5, &TagFilter::none()),
            Err(GameRecError::EmptyRatings)
        ));
    }

    #[test]
    fn test_liked_similarity_fallback_ranks_neighbours() {
        let recommender = Recommender::new(catalog(), similarity());
        let ledger = FeedbackLedger::from_ratings([Rating::new(7, 1, Label::Recommended)]);

        // A model fitted without user 8 cannot score them.
        let model = PreferenceModel::fit(config(), &ledger.snapshot()).unwrap();
        assert!(matches!(
            recommender.rank_with_model(&model, &ledger, 8, None, 5, &TagFilter::none()),
            Err(GameRecError::UnknownUser(8))
        ));

        let mut session = Session::new(7, ledger).with_config(config());
        session.ensure_fitted().unwrap();
        // The model only knows item 1, which user 7 already rated.
        let results = recommender
            .recommend_for_user(&mut session, None, 5, &TagFilter::none())
            .unwrap();
        assert!(results.is_empty());

        let fallback = recommender
            .fallback(
                session.ledger(),
                7,
                None,
                5,
                &TagFilter::none(),
                GameRecError::EmptyRatings,
            )
            .unwrap();
        assert_eq!(
            fallback.iter().map(|r| r.app_id).collect::<Vec<_>>(),
            vec![2, 3]
        );
        assert!(fallback
            .iter()
            .all(|r| r.source == RecommendationSource::ContentFallback));
    }

    #[test]
    fn test_fallback_switches_to_unranked_when_filter_rejects_neighbours() {
        let recommender = Recommender::new(catalog(), similarity());
        let ledger = FeedbackLedger::from_ratings([Rating::new(7, 1, Label::Recommended)]);

        // Neighbours of item 1 are 2 and 3; neither is tagged shooter and coop.
        let results = recommender
            .fallback(
                &ledger,
                7,
                None,
                5,
                &TagFilter::all(["shooter", "coop"]),
                GameRecError::EmptyRatings,
            )
            .unwrap();
        assert_eq!(results.iter().map(|r| r.app_id).collect::<Vec<_>>(), vec![4]);
        assert_eq!(results[0].source, RecommendationSource::Unranked);
        assert_eq!(results[0].predicted_score, 0.0);
    }

    #[test]
    fn test_divergent_fit_falls_back_with_finite_scores() {
        let recommender = Recommender::new(catalog(), similarity());
        let divergent = FactorizationConfig {
            learning_rate: 10.0,
            n_epochs: 400,
            ..config()
        };
        let mut session = Session::new(1, ledger()).with_config(divergent);

        let results = recommender
            .recommend_for_user(&mut session, None, 5, &TagFilter::none())
            .unwrap();
        assert!(session.model().is_none());
        assert!(
            session
                .last_fit_error()
                .is_some_and(|e| e.starts_with("Training diverged"))
        );
        // User 1 liked item 1, whose neighbours 2 and 3 leave only 3 unrated.
        assert_eq!(results.iter().map(|r| r.app_id).collect::<Vec<_>>(), vec![3]);
        assert!(results.iter().all(|r| {
            r.source == RecommendationSource::ContentFallback
                && r.predicted_score.is_finite()
        }));
    }

    #[test]
    fn test_browse_uses_configured_rule() {
        let recommender = Recommender::new(catalog(), similarity());
        let ids: Vec<ItemId> = recommender
            .browse(None, ["shooter", "coop"])
            .iter()
            .map(|item| item.id)
            .collect();
        assert_eq!(ids, vec![4]);

        let filter = recommender.user_filter(["shooter", "coop"]);
        assert_eq!(filter.mode, TagMatch::Any);
    }
}
