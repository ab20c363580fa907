//! Learned preference models.
//!
//! The only model today is the latent-factor factorization in
//! [`factorization`], fitted on the feedback ledger's snapshot.

pub mod factorization;

pub use factorization::{FactorizationConfig, PreferenceModel, RatingScale, TrainingStats};
