//! Engine configuration.
//!
//! All constants are fixed for the lifetime of a process. Configuration is
//! read from a JSON file in which every field is optional:
//!
//! ```json
//! {
//!   "factorization": { "n_factors": 50, "n_epochs": 30 },
//!   "recommend": { "user_top_n": 5, "user_pool_size": 100 },
//!   "retrain": "incremental"
//! }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ml::FactorizationConfig;
use crate::recommend::RecommendConfig;
use crate::session::RetrainPolicy;

/// Configuration for the whole engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Preference model hyperparameters.
    pub factorization: FactorizationConfig,
    /// Ranking, filtering and fallback settings.
    pub recommend: RecommendConfig,
    /// When feedback reaches the model.
    pub retrain: RetrainPolicy,
}

impl EngineConfig {
    /// Read and validate a JSON configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open config file {}", path.display()))?;
        let config: EngineConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.factorization.validate()?;
        self.recommend.validate()?;
        Ok(())
    }
}
