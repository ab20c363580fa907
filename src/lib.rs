//! # gamerec
//!
//! A hybrid game recommendation engine.
//!
//! ## Features
//!
//! - Item-to-item recommendations from a precomputed similarity index
//! - Personalised recommendations from a latent-factor model trained on
//!   binary (recommended / not recommended) feedback
//! - Explicit per-user sessions with deferred or incremental retraining
//! - Typed tag filtering applied after ranking
//! - Content-based and unranked fallbacks for cold-start users
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use gamerec::prelude::*;
//!
//! let catalog = Arc::new(CatalogStore::new(vec![
//!     Item::new(1, "A").with_tags(["rpg"]),
//!     Item::new(2, "B").with_tags(["rpg", "coop"]),
//!     Item::new(3, "C").with_tags(["shooter"]),
//! ])?);
//! let mut similarity = SimilarityIndex::new();
//! similarity.insert(1, 2, 0.8)?;
//! similarity.insert(1, 3, 0.1)?;
//!
//! let recommender = Recommender::new(catalog, Arc::new(similarity));
//! let similar = recommender.recommend_by_content(1, 1)?;
//! assert_eq!(similar[0].app_id, 2);
//! # Ok::<(), gamerec::error::GameRecError>(())
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod feedback;
pub mod loader;
pub mod ml;
pub mod recommend;
pub mod session;
pub mod similarity;
pub mod tags;

pub mod prelude {
    pub use crate::catalog::{CatalogStore, Item, ItemId};
    pub use crate::config::EngineConfig;
    pub use crate::error::{GameRecError, Result};
    pub use crate::feedback::{FeedbackLedger, Label, Rating, UserId, UserReview};
    pub use crate::ml::{FactorizationConfig, PreferenceModel};
    pub use crate::recommend::{
        ContentRecommendation, FallbackPolicy, RecommendConfig, RecommendationSource,
        Recommender, UserRecommendation,
    };
    pub use crate::session::{RetrainPolicy, Session};
    pub use crate::similarity::SimilarityIndex;
    pub use crate::tags::{TagFilter, TagMatch};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
