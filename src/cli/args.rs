//! Command line argument parsing for the gamerec CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::catalog::ItemId;
use crate::feedback::UserId;
use crate::tags::TagMatch;

/// gamerec - hybrid game recommendations from similarity and user feedback
#[derive(Parser, Debug, Clone)]
#[command(name = "gamerec")]
#[command(about = "Hybrid game recommendations from item similarity and user feedback")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct GameRecArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Engine configuration file (JSON)
    #[arg(long, env = "GAMEREC_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub data: DataArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl GameRecArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n + 1,
            }
        }
    }
}

/// Input tables.
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Catalog file (JSONL)
    #[arg(long, env = "GAMEREC_CATALOG", default_value = "data/games.jsonl", global = true)]
    pub catalog: PathBuf,

    /// Similarity table (CSV). Without it, similarity is derived from tags.
    #[arg(long, env = "GAMEREC_SIMILARITY", global = true)]
    pub similarity: Option<PathBuf>,

    /// Mirror every similarity entry
    #[arg(long, global = true)]
    pub symmetric: bool,

    /// Seed feedback table (CSV)
    #[arg(long, env = "GAMEREC_FEEDBACK", global = true)]
    pub feedback: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List every tag in the catalog
    Tags,

    /// Search the catalog by title and tags
    Browse(BrowseArgs),

    /// Show games similar to one game
    Similar(SimilarArgs),

    /// Recommend games to a user
    Recommend(RecommendArgs),

    /// List a user's reviews
    Reviews(ReviewsArgs),

    /// Predict one user's score for one game
    Predict(PredictArgs),
}

/// Arguments for browsing the catalog
#[derive(Parser, Debug, Clone)]
pub struct BrowseArgs {
    /// Case-insensitive title search
    #[arg(long)]
    pub query: Option<String>,

    /// Required tags (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Maximum number of results to return
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

/// Arguments for content recommendations
#[derive(Parser, Debug, Clone)]
pub struct SimilarArgs {
    /// Game to find neighbours of
    #[arg(value_name = "APP_ID")]
    pub app_id: ItemId,

    /// Maximum number of results (default from configuration)
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Feedback applied to the session before the command runs.
#[derive(Args, Debug, Clone, Default)]
pub struct FeedbackArgs {
    /// Games the user likes (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub like: Vec<ItemId>,

    /// Games the user dislikes (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub dislike: Vec<ItemId>,

    /// Games whose rating is removed (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub unrate: Vec<ItemId>,
}

/// Arguments for user recommendations
#[derive(Parser, Debug, Clone)]
pub struct RecommendArgs {
    /// User to recommend for
    #[arg(value_name = "USER_ID")]
    pub user_id: UserId,

    #[command(flatten)]
    pub feedback: FeedbackArgs,

    /// Tag filter (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Tag matching rule (default from configuration)
    #[arg(long = "match")]
    pub tag_match: Option<TagMatch>,

    /// Maximum number of results (default from configuration)
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for listing reviews
#[derive(Parser, Debug, Clone)]
pub struct ReviewsArgs {
    /// User whose reviews are listed
    #[arg(value_name = "USER_ID")]
    pub user_id: UserId,

    #[command(flatten)]
    pub feedback: FeedbackArgs,
}

/// Arguments for a single prediction
#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    /// User
    #[arg(value_name = "USER_ID")]
    pub user_id: UserId,

    /// Game
    #[arg(value_name = "APP_ID")]
    pub app_id: ItemId,

    #[command(flatten)]
    pub feedback: FeedbackArgs,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
