//! Per-user session context.
//!
//! A [`Session`] exclusively owns one feedback ledger and the preference
//! model fitted from it. It is passed explicitly to every personalised
//! recommendation call, so several sessions can share one catalog and
//! similarity index without sharing mutable state.
//!
//! Feedback never trains inline. Depending on [`RetrainPolicy`] a mutation
//! either marks the model stale, to be refitted at the next
//! recommendation boundary, or folds the single changed rating into the
//! current model.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::ItemId;
use crate::error::{GameRecError, Result};
use crate::feedback::{FeedbackLedger, Label, Rating, UserId};
use crate::ml::{FactorizationConfig, PreferenceModel};

/// When the preference model catches up with ledger changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrainPolicy {
    /// Refit from the full snapshot at the next recommendation boundary.
    #[default]
    Deferred,
    /// Apply a few gradient steps for each upserted rating. Removals still
    /// require a full refit.
    Incremental,
}

/// One user's feedback and the model fitted on it.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    user_id: UserId,
    ledger: FeedbackLedger,
    config: FactorizationConfig,
    policy: RetrainPolicy,
    model: Option<PreferenceModel>,
    fitted_revision: Option<u64>,
    last_fit_error: Option<String>,
}

impl Session {
    /// Create a session for `user_id` seeded with `ledger`.
    ///
    /// The ledger normally holds every user's ratings, since the model
    /// learns from all of them.
    pub fn new(user_id: UserId, ledger: FeedbackLedger) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            ledger,
            config: FactorizationConfig::default(),
            policy: RetrainPolicy::default(),
            model: None,
            fitted_revision: None,
            last_fit_error: None,
        }
    }

    /// Use a different factorization configuration.
    pub fn with_config(mut self, config: FactorizationConfig) -> Self {
        self.config = config;
        self.model = None;
        self.fitted_revision = None;
        self
    }

    /// Use a different retraining policy.
    pub fn with_policy(mut self, policy: RetrainPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Session identifier, for logs.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The user this session acts for.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// The owned ledger.
    pub fn ledger(&self) -> &FeedbackLedger {
        &self.ledger
    }

    /// The retraining policy.
    pub fn policy(&self) -> RetrainPolicy {
        self.policy
    }

    /// Mark an item as recommended by the session user.
    pub fn like(&mut self, item_id: ItemId) -> Option<Label> {
        self.rate_as(self.user_id, item_id, Label::Recommended)
    }

    /// Mark an item as not recommended by the session user.
    pub fn dislike(&mut self, item_id: ItemId) -> Option<Label> {
        self.rate_as(self.user_id, item_id, Label::NotRecommended)
    }

    /// Drop the session user's rating of an item.
    pub fn remove_rating(&mut self, item_id: ItemId) -> Option<Label> {
        self.remove_as(self.user_id, item_id)
    }

    /// Record a rating for any user. Returns the replaced label.
    pub fn rate_as(&mut self, user_id: UserId, item_id: ItemId, label: Label) -> Option<Label> {
        let was_fresh = !self.is_stale();
        let previous = self.ledger.upsert(user_id, item_id, label);

        if self.policy == RetrainPolicy::Incremental
            && was_fresh
            && let Some(model) = self.model.as_mut()
        {
            match model.apply_rating(&Rating::new(user_id, item_id, label)) {
                Ok(()) => self.fitted_revision = Some(self.ledger.revision()),
                Err(e) => {
                    warn!("session {}: incremental update failed: {}", self.id, e);
                    self.model = None;
                    self.fitted_revision = None;
                    self.last_fit_error = Some(e.to_string());
                }
            }
        }

        debug!(
            "session {}: user {} rated item {} as {:?} (previous {:?})",
            self.id, user_id, item_id, label, previous
        );
        previous
    }

    /// Remove a rating for any user. Absent ratings are a no-op.
    pub fn remove_as(&mut self, user_id: UserId, item_id: ItemId) -> Option<Label> {
        let removed = self.ledger.remove(user_id, item_id);
        if removed.is_some() {
            debug!(
                "session {}: user {} removed rating of item {}",
                self.id, user_id, item_id
            );
        }
        removed
    }

    /// True when no model matches the current ledger contents.
    pub fn is_stale(&self) -> bool {
        self.model.is_none() || self.fitted_revision != Some(self.ledger.revision())
    }

    /// The model, only when it reflects the current ledger.
    pub fn model(&self) -> Option<&PreferenceModel> {
        if self.is_stale() {
            None
        } else {
            self.model.as_ref()
        }
    }

    /// Message of the most recent failed fit, cleared by a successful one.
    pub fn last_fit_error(&self) -> Option<&str> {
        self.last_fit_error.as_deref()
    }

    /// Refit if the ledger changed since the last fit.
    pub fn ensure_fitted(&mut self) -> Result<&PreferenceModel> {
        if self.is_stale() {
            self.refit()?;
        }
        self.model
            .as_ref()
            .ok_or_else(|| GameRecError::other("preference model missing after fit"))
    }

    /// Refit from the full ledger snapshot.
    ///
    /// On failure the previous model is discarded, never kept as a stale
    /// fallback.
    pub fn refit(&mut self) -> Result<&PreferenceModel> {
        let revision = self.ledger.revision();
        self.model = None;
        self.fitted_revision = None;

        match PreferenceModel::fit(self.config.clone(), &self.ledger.snapshot()) {
            Ok(model) => {
                self.fitted_revision = Some(revision);
                self.last_fit_error = None;
                Ok(self.model.insert(model))
            }
            Err(e) => {
                warn!("session {}: preference model fit failed: {}", self.id, e);
                self.last_fit_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Predicted score of one item for the session user.
    pub fn predict(&mut self, item_id: ItemId) -> Result<f64> {
        let user_id = self.user_id;
        self.ensure_fitted()?.predict(user_id, item_id)
    }
}
