//! Latent-factor preference model trained on binary feedback.
//!
//! Biased matrix factorization fitted with stochastic gradient descent:
//!
//! ```text
//! r̂(u, i) = μ + b_u + b_i + p_u · q_i
//! ```
//!
//! Labels are mapped onto the configured rating scale before training and
//! every estimate is clamped back into it. Users and items that never
//! appeared in the training ratings have no vectors, so predicting for them
//! fails with [`GameRecError::UnknownUser`] or [`GameRecError::UnknownItem`].

use std::collections::HashMap;
use std::time::Instant;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::catalog::ItemId;
use crate::error::{GameRecError, Result};
use crate::feedback::{Label, Rating, UserId};

/// Inclusive bounds of the rating scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingScale {
    pub min: f64,
    pub max: f64,
}

impl Default for RatingScale {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl RatingScale {
    /// Training target for a label: the scale minimum or maximum.
    pub fn target(&self, label: Label) -> f64 {
        if label.is_recommended() {
            self.max
        } else {
            self.min
        }
    }

    /// Clamp an estimate into the scale.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Hyperparameters of the factorization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorizationConfig {
    /// Latent factor count.
    pub n_factors: usize,
    /// Passes over the ratings per fit.
    pub n_epochs: usize,
    /// SGD step size.
    pub learning_rate: f64,
    /// L2 regularization applied to biases and factors.
    pub regularization: f64,
    /// Mean of the normal distribution used to initialize factors.
    pub init_mean: f64,
    /// Standard deviation of the normal distribution used to initialize factors.
    pub init_std: f64,
    /// Bounds of the rating scale.
    pub rating_scale: RatingScale,
    /// Learn a global mean and per-user/per-item biases.
    pub biased: bool,
    /// Seed for factor initialization. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// SGD steps applied per rating on the incremental update path.
    pub incremental_steps: usize,
}

impl Default for FactorizationConfig {
    fn default() -> Self {
        Self {
            n_factors: 100,
            n_epochs: 20,
            learning_rate: 0.005,
            regularization: 0.02,
            init_mean: 0.0,
            init_std: 0.1,
            rating_scale: RatingScale::default(),
            biased: true,
            seed: Some(42),
            incremental_steps: 10,
        }
    }
}

impl FactorizationConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.n_factors == 0 {
            return Err(GameRecError::invalid_config("n_factors must be > 0"));
        }
        if self.n_epochs == 0 {
            return Err(GameRecError::invalid_config("n_epochs must be > 0"));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(GameRecError::invalid_config("learning_rate must be > 0"));
        }
        if !(self.regularization.is_finite() && self.regularization >= 0.0) {
            return Err(GameRecError::invalid_config("regularization must be >= 0"));
        }
        if !(self.init_std.is_finite() && self.init_std >= 0.0) || !self.init_mean.is_finite() {
            return Err(GameRecError::invalid_config(
                "init_mean must be finite and init_std must be >= 0",
            ));
        }
        if !(self.rating_scale.min.is_finite()
            && self.rating_scale.max.is_finite()
            && self.rating_scale.min < self.rating_scale.max)
        {
            return Err(GameRecError::invalid_config(
                "rating_scale.min must be < rating_scale.max",
            ));
        }
        Ok(())
    }
}

/// Summary of the most recent fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingStats {
    /// Epochs run.
    pub epochs: usize,
    /// Ratings in the training snapshot.
    pub ratings: usize,
    /// Distinct users with vectors.
    pub users: usize,
    /// Distinct items with vectors.
    pub items: usize,
    /// Training RMSE after each epoch.
    pub epoch_losses: Vec<f64>,
    /// Wall time of the fit in milliseconds.
    pub training_time_ms: u64,
    /// Completion time of the fit.
    pub trained_at: chrono::DateTime<chrono::Utc>,
    /// Ratings applied through the incremental path since the fit.
    pub incremental_updates: usize,
}

impl TrainingStats {
    /// RMSE after the last epoch.
    pub fn final_loss(&self) -> Option<f64> {
        self.epoch_losses.last().copied()
    }
}

/// A fitted latent-factor model.
#[derive(Debug, Clone)]
pub struct PreferenceModel {
    config: FactorizationConfig,
    global_mean: f64,
    user_index: HashMap<UserId, usize>,
    item_index: HashMap<ItemId, usize>,
    user_bias: Vec<f64>,
    item_bias: Vec<f64>,
    /// Row-major, `n_factors` values per user.
    user_factors: Vec<f64>,
    /// Row-major, `n_factors` values per item.
    item_factors: Vec<f64>,
    rng: StdRng,
    stats: TrainingStats,
}

impl PreferenceModel {
    /// Fit a fresh model on a ratings snapshot.
    ///
    /// The ratings are put in canonical `(user, item)` order first, so the
    /// same multiset of ratings with the same seed yields the same model.
    pub fn fit(config: FactorizationConfig, ratings: &[Rating]) -> Result<Self> {
        config.validate()?;
        if ratings.is_empty() {
            return Err(GameRecError::EmptyRatings);
        }

        let start_time = Instant::now();
        let mut ordered = ratings.to_vec();
        ordered.sort_by_key(|r| (r.user_id, r.item_id));

        let mut user_index = HashMap::new();
        let mut item_index = HashMap::new();
        let mut samples = Vec::with_capacity(ordered.len());
        for rating in &ordered {
            let next_user = user_index.len();
            let u = *user_index.entry(rating.user_id).or_insert(next_user);
            let next_item = item_index.len();
            let i = *item_index.entry(rating.item_id).or_insert(next_item);
            samples.push((u, i, config.rating_scale.target(rating.label)));
        }

        let global_mean = if config.biased {
            samples.iter().map(|(_, _, r)| r).sum::<f64>() / samples.len() as f64
        } else {
            0.0
        };

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let k = config.n_factors;
        let user_factors = sample_factors(&mut rng, user_index.len() * k, &config);
        let item_factors = sample_factors(&mut rng, item_index.len() * k, &config);

        let mut model = Self {
            global_mean,
            user_bias: vec![0.0; user_index.len()],
            item_bias: vec![0.0; item_index.len()],
            user_factors,
            item_factors,
            rng,
            stats: TrainingStats {
                epochs: config.n_epochs,
                ratings: samples.len(),
                users: user_index.len(),
                items: item_index.len(),
                epoch_losses: Vec::with_capacity(config.n_epochs),
                training_time_ms: 0,
                trained_at: chrono::Utc::now(),
                incremental_updates: 0,
            },
            user_index,
            item_index,
            config,
        };

        for epoch in 0..model.config.n_epochs {
            let mut squared_error = 0.0;
            for &(u, i, target) in &samples {
                let err = model.sgd_step(u, i, target);
                squared_error += err * err;
            }
            let rmse = (squared_error / samples.len() as f64).sqrt();
            debug!("epoch {}/{}: rmse = {:.5}", epoch + 1, model.config.n_epochs, rmse);
            if !rmse.is_finite() {
                return Err(GameRecError::TrainingDiverged(format!(
                    "rmse is {rmse} after epoch {} (learning_rate {})",
                    epoch + 1,
                    model.config.learning_rate
                )));
            }
            model.stats.epoch_losses.push(rmse);
        }

        if !model.is_finite() {
            return Err(GameRecError::TrainingDiverged(format!(
                "non-finite parameters after {} epochs (learning_rate {})",
                model.config.n_epochs, model.config.learning_rate
            )));
        }

        model.stats.training_time_ms = start_time.elapsed().as_millis() as u64;
        model.stats.trained_at = chrono::Utc::now();
        info!(
            "fitted preference model: {} ratings, {} users, {} items, {} factors, rmse {:.5} in {} ms",
            model.stats.ratings,
            model.stats.users,
            model.stats.items,
            model.config.n_factors,
            model.stats.final_loss().unwrap_or(f64::NAN),
            model.stats.training_time_ms
        );

        Ok(model)
    }

    /// Predicted score for a user/item pair, clamped to the rating scale.
    pub fn predict(&self, user_id: UserId, item_id: ItemId) -> Result<f64> {
        let u = *self
            .user_index
            .get(&user_id)
            .ok_or(GameRecError::UnknownUser(user_id))?;
        let i = *self
            .item_index
            .get(&item_id)
            .ok_or(GameRecError::UnknownItem(item_id))?;

        Ok(self.config.rating_scale.clamp(self.estimate(u, i)))
    }

    /// Fold one rating into the model without refitting.
    ///
    /// A previously unseen user or item gets freshly initialized vectors.
    /// The global mean is left as fitted. Fails with `TrainingDiverged` when
    /// the updated vectors are no longer finite; the model must then be
    /// discarded.
    pub fn apply_rating(&mut self, rating: &Rating) -> Result<()> {
        let u = self.ensure_user(rating.user_id);
        let i = self.ensure_item(rating.item_id);
        let target = self.config.rating_scale.target(rating.label);

        for _ in 0..self.config.incremental_steps {
            self.sgd_step(u, i, target);
        }
        self.stats.incremental_updates += 1;

        let k = self.config.n_factors;
        let finite = self.user_bias[u].is_finite()
            && self.item_bias[i].is_finite()
            && self.user_factors[u * k..(u + 1) * k].iter().all(|v| v.is_finite())
            && self.item_factors[i * k..(i + 1) * k].iter().all(|v| v.is_finite());
        if !finite {
            return Err(GameRecError::TrainingDiverged(format!(
                "non-finite vectors after updating user {} and item {}",
                rating.user_id, rating.item_id
            )));
        }
        Ok(())
    }

    /// Whether the user has a learned vector.
    pub fn knows_user(&self, user_id: UserId) -> bool {
        self.user_index.contains_key(&user_id)
    }

    /// Whether the item has a learned vector.
    pub fn knows_item(&self, item_id: ItemId) -> bool {
        self.item_index.contains_key(&item_id)
    }

    /// Global mean rating (0 for an unbiased model).
    pub fn global_mean(&self) -> f64 {
        self.global_mean
    }

    /// The configuration the model was fitted with.
    pub fn config(&self) -> &FactorizationConfig {
        &self.config
    }

    /// Statistics of the most recent fit.
    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    fn is_finite(&self) -> bool {
        self.global_mean.is_finite()
            && self
                .user_bias
                .iter()
                .chain(&self.item_bias)
                .chain(&self.user_factors)
                .chain(&self.item_factors)
                .all(|v| v.is_finite())
    }

    fn estimate(&self, u: usize, i: usize) -> f64 {
        let k = self.config.n_factors;
        let pu = &self.user_factors[u * k..(u + 1) * k];
        let qi = &self.item_factors[i * k..(i + 1) * k];
        let dot: f64 = pu.iter().zip(qi).map(|(a, b)| a * b).sum();

        if self.config.biased {
            self.global_mean + self.user_bias[u] + self.item_bias[i] + dot
        } else {
            dot
        }
    }

    /// One gradient step on a single observation. Returns the pre-step error.
    fn sgd_step(&mut self, u: usize, i: usize, target: f64) -> f64 {
        let err = target - self.estimate(u, i);
        let lr = self.config.learning_rate;
        let reg = self.config.regularization;
        let k = self.config.n_factors;

        if self.config.biased {
            self.user_bias[u] += lr * (err - reg * self.user_bias[u]);
            self.item_bias[i] += lr * (err - reg * self.item_bias[i]);
        }

        let pu = &mut self.user_factors[u * k..(u + 1) * k];
        let qi = &mut self.item_factors[i * k..(i + 1) * k];
        for (p, q) in pu.iter_mut().zip(qi.iter_mut()) {
            let (puf, qif) = (*p, *q);
            *p += lr * (err * qif - reg * puf);
            *q += lr * (err * puf - reg * qif);
        }

        err
    }

    fn ensure_user(&mut self, user_id: UserId) -> usize {
        if let Some(&u) = self.user_index.get(&user_id) {
            return u;
        }
        let u = self.user_bias.len();
        let row = sample_factors(&mut self.rng, self.config.n_factors, &self.config);
        self.user_factors.extend(row);
        self.user_bias.push(0.0);
        self.user_index.insert(user_id, u);
        self.stats.users += 1;
        u
    }

    fn ensure_item(&mut self, item_id: ItemId) -> usize {
        if let Some(&i) = self.item_index.get(&item_id) {
            return i;
        }
        let i = self.item_bias.len();
        let row = sample_factors(&mut self.rng, self.config.n_factors, &self.config);
        self.item_factors.extend(row);
        self.item_bias.push(0.0);
        self.item_index.insert(item_id, i);
        self.stats.items += 1;
        i
    }
}

/// Draw `len` values from N(init_mean, init_std) with the Box-Muller transform.
fn sample_factors(rng: &mut StdRng, len: usize, config: &FactorizationConfig) -> Vec<f64> {
    (0..len)
        .map(|_| {
            let u1: f64 = 1.0 - rng.random::<f64>();
            let u2: f64 = rng.random::<f64>();
            let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
            config.init_mean + config.init_std * z
        })
        .collect()
}
