//! Error types for the gamerec library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`GameRecError`] enum. Errors are never retried inside the library; the
//! caller decides whether to show an empty state or an error message.
//!
//! # Examples
//!
//! ```
//! use gamerec::error::{GameRecError, Result};
//!
//! fn lookup() -> Result<()> {
//!     Err(GameRecError::not_found("item 42"))
//! }
//!
//! match lookup() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

use crate::catalog::ItemId;
use crate::feedback::UserId;

/// The main error type for gamerec operations.
#[derive(Error, Debug)]
pub enum GameRecError {
    /// I/O errors (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV decoding errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required item or user is absent from the catalog or ledger.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Two catalog items share an id. `position` is the load-order index
    /// of the second one.
    #[error("Duplicate item id {id} at catalog position {position}")]
    DuplicateItem { id: ItemId, position: usize },

    /// The user has no learned vector in the fitted preference model.
    #[error("Unknown user: {0}")]
    UnknownUser(UserId),

    /// The item has no learned vector in the fitted preference model.
    #[error("Unknown item: {0}")]
    UnknownItem(ItemId),

    /// A preference model cannot be fitted without ratings.
    #[error("Cannot fit a preference model on an empty ratings snapshot")]
    EmptyRatings,

    /// SGD produced non-finite parameters; the model is unusable.
    #[error("Training diverged: {0}")]
    TrainingDiverged(String),

    /// Invalid configuration values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Malformed input data
    #[error("Parse error: {0}")]
    Parse(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with GameRecError.
pub type Result<T> = std::result::Result<T, GameRecError>;

impl GameRecError {
    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        GameRecError::NotFound(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        GameRecError::InvalidConfig(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        GameRecError::InvalidArgument(msg.into())
    }

    /// Create a new parse error.
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        GameRecError::Parse(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        GameRecError::Other(msg.into())
    }

    /// Whether this error only means the model has no vector for the
    /// requested user or item, which callers may recover from.
    pub fn is_cold_start(&self) -> bool {
        matches!(
            self,
            GameRecError::UnknownUser(_) | GameRecError::UnknownItem(_)
        )
    }
}
