//! Output formatting for CLI commands.

use serde::Serialize;

use crate::catalog::{Item, ItemId};
use crate::cli::args::{GameRecArgs, OutputFormat};
use crate::error::Result;
use crate::feedback::{UserId, UserReview};
use crate::recommend::{ContentRecommendation, RecommendationSource, UserRecommendation};

/// Human-readable rendering of a command result.
pub trait HumanOutput {
    fn print_human(&self);
}

/// Every tag in the catalog.
#[derive(Debug, Serialize)]
pub struct TagList {
    pub tags: Vec<String>,
}

/// Catalog browse hits.
#[derive(Debug, Serialize)]
pub struct BrowseResults {
    pub total_matches: usize,
    pub items: Vec<Item>,
}

/// Content recommendations for one game.
#[derive(Debug, Serialize)]
pub struct SimilarResults {
    pub app_id: ItemId,
    pub title: String,
    pub recommendations: Vec<ContentRecommendation>,
}

/// Recommendations for one user.
#[derive(Debug, Serialize)]
pub struct UserResults {
    pub user_id: UserId,
    pub recommendations: Vec<UserRecommendation>,
}

/// A user's review listing.
#[derive(Debug, Serialize)]
pub struct ReviewList {
    pub user_id: UserId,
    pub reviews: Vec<UserReview>,
}

/// One prediction.
#[derive(Debug, Serialize)]
pub struct PredictionResult {
    pub user_id: UserId,
    pub app_id: ItemId,
    pub title: String,
    pub predicted_score: f64,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanOutput>(
    message: &str,
    result: &T,
    args: &GameRecArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                println!("{message}");
                println!();
            }
            result.print_human();
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &GameRecArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Shorten a description for display, on a character boundary.
fn excerpt(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

fn join_tags<S: AsRef<str>>(tags: &[S]) -> String {
    if tags.is_empty() {
        "-".to_string()
    } else {
        tags.iter().map(|t| t.as_ref()).collect::<Vec<&str>>().join(", ")
    }
}

impl HumanOutput for TagList {
    fn print_human(&self) {
        for tag in &self.tags {
            println!("{tag}");
        }
    }
}

impl HumanOutput for BrowseResults {
    fn print_human(&self) {
        println!(
            "Showing {} of {} games",
            self.items.len(),
            self.total_matches
        );
        for item in &self.items {
            let tags: Vec<&String> = item.tags.iter().collect();
            println!("{:>10}  {}  [{}]", item.id, item.title, join_tags(&tags));
        }
    }
}

impl HumanOutput for SimilarResults {
    fn print_human(&self) {
        println!("Games similar to {} ({})", self.title, self.app_id);
        println!("═══════════════");
        if self.recommendations.is_empty() {
            println!("No similar games found.");
        }
        for (rank, rec) in self.recommendations.iter().enumerate() {
            println!();
            println!(
                "{}. {} ({})  similarity {:.3}",
                rank + 1,
                rec.title,
                rec.app_id,
                rec.similarity_score
            );
            println!("   Tags: {}", join_tags(&rec.tags));
            println!("   {}", excerpt(&rec.description, 300));
        }
    }
}

impl HumanOutput for UserResults {
    fn print_human(&self) {
        println!("Recommended for user {}", self.user_id);
        println!("═══════════════");
        if self.recommendations.is_empty() {
            println!("No recommendations.");
        }
        for (rank, rec) in self.recommendations.iter().enumerate() {
            let score = match rec.source {
                RecommendationSource::Model => format!("predicted score {:.2}", rec.predicted_score),
                RecommendationSource::ContentFallback => {
                    format!("similar to your likes {:.2}", rec.predicted_score)
                }
                RecommendationSource::Unranked => "unranked".to_string(),
            };
            println!();
            println!("{}. {} ({})  {}", rank + 1, rec.title, rec.app_id, score);
            println!("   Tags: {}", join_tags(&rec.tags));
            println!("   {}", excerpt(&rec.description, 300));
        }
    }
}

impl HumanOutput for ReviewList {
    fn print_human(&self) {
        println!("Reviews by user {}", self.user_id);
        println!("═══════════════");
        if self.reviews.is_empty() {
            println!("No reviews yet.");
        }
        for review in &self.reviews {
            let verdict = if review.is_recommended {
                "recommended"
            } else {
                "not recommended"
            };
            let title = review.title.as_deref().unwrap_or("<unknown game>");
            println!("{title} ({}): {verdict}", review.app_id);
        }
    }
}

impl HumanOutput for PredictionResult {
    fn print_human(&self) {
        println!(
            "user {} / {} ({}): {:.4}",
            self.user_id, self.title, self.app_id, self.predicted_score
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("short", 10), "short");
        assert_eq!(excerpt("abcdef", 3), "abc...");
        assert_eq!(excerpt("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn test_join_tags() {
        assert_eq!(join_tags::<String>(&[]), "-");
        assert_eq!(join_tags(&["RPG", "Co-op"]), "RPG, Co-op");
    }
}
