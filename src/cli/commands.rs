//! Command implementations for the gamerec CLI.

use std::sync::Arc;

use log::{debug, info};

use crate::catalog::CatalogStore;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::feedback::FeedbackLedger;
use crate::loader;
use crate::recommend::Recommender;
use crate::session::Session;
use crate::similarity::SimilarityIndex;
use crate::tags::TagFilter;

/// Execute a CLI command.
pub fn execute_command(args: GameRecArgs) -> Result<()> {
    let engine = Engine::load(&args)?;

    match &args.command {
        Command::Tags => list_tags(&engine, &args),
        Command::Browse(browse_args) => browse(&engine, browse_args, &args),
        Command::Similar(similar_args) => similar(&engine, similar_args, &args),
        Command::Recommend(recommend_args) => recommend(&engine, recommend_args, &args),
        Command::Reviews(reviews_args) => reviews(&engine, reviews_args, &args),
        Command::Predict(predict_args) => predict(&engine, predict_args, &args),
    }
}

/// Everything loaded from the input tables.
struct Engine {
    config: EngineConfig,
    recommender: Recommender,
    ledger: FeedbackLedger,
}

impl Engine {
    fn load(args: &GameRecArgs) -> Result<Self> {
        let config = match &args.config {
            Some(path) => EngineConfig::from_file(path)?,
            None => EngineConfig::default(),
        };

        let catalog = Arc::new(loader::load_catalog(&args.data.catalog)?);
        let similarity = match &args.data.similarity {
            Some(path) => loader::load_similarity(path, args.data.symmetric)?,
            None => {
                info!("no similarity table given, deriving similarity from tags");
                SimilarityIndex::from_tag_cosine(&catalog, 0.0)
            }
        };
        let ledger = match &args.data.feedback {
            Some(path) => loader::load_feedback(path)?,
            None => FeedbackLedger::new(),
        };

        let recommender =
            Recommender::with_config(catalog, Arc::new(similarity), config.recommend.clone())?;

        Ok(Self {
            config,
            recommender,
            ledger,
        })
    }

    fn catalog(&self) -> &CatalogStore {
        self.recommender.catalog()
    }

    /// Open a session for `user_id` and apply the command line feedback.
    fn session(&self, user_id: u64, feedback: &FeedbackArgs) -> Session {
        let mut session = Session::new(user_id, self.ledger.clone())
            .with_config(self.config.factorization.clone())
            .with_policy(self.config.retrain);

        for &item in &feedback.like {
            session.like(item);
        }
        for &item in &feedback.dislike {
            session.dislike(item);
        }
        for &item in &feedback.unrate {
            session.remove_rating(item);
        }

        debug!(
            "session {} for user {}: {} ratings in ledger",
            session.id(),
            user_id,
            session.ledger().len()
        );
        session
    }
}

fn list_tags(engine: &Engine, args: &GameRecArgs) -> Result<()> {
    let result = TagList {
        tags: engine.catalog().tag_universe().iter().cloned().collect(),
    };
    output_result("Tags", &result, args)
}

fn browse(engine: &Engine, browse_args: &BrowseArgs, args: &GameRecArgs) -> Result<()> {
    let hits = engine
        .recommender
        .browse(browse_args.query.as_deref(), browse_args.tags.iter().cloned());

    let result = BrowseResults {
        total_matches: hits.len(),
        items: hits
            .into_iter()
            .take(browse_args.limit)
            .cloned()
            .collect(),
    };
    output_result("Browse results", &result, args)
}

fn similar(engine: &Engine, similar_args: &SimilarArgs, args: &GameRecArgs) -> Result<()> {
    let top_n = similar_args
        .limit
        .unwrap_or(engine.config.recommend.content_top_n);
    let item = engine.catalog().get(similar_args.app_id)?;
    let recommendations = engine
        .recommender
        .recommend_by_content(similar_args.app_id, top_n)?;

    let result = SimilarResults {
        app_id: item.id,
        title: item.title.clone(),
        recommendations,
    };
    output_result("Similar games", &result, args)
}

fn recommend(engine: &Engine, recommend_args: &RecommendArgs, args: &GameRecArgs) -> Result<()> {
    let mut session = engine.session(recommend_args.user_id, &recommend_args.feedback);

    let mode = recommend_args
        .tag_match
        .unwrap_or(engine.config.recommend.user_tag_match);
    let filter = TagFilter::new(recommend_args.tags.iter().cloned(), mode);
    let top_n = recommend_args
        .limit
        .unwrap_or(engine.config.recommend.user_top_n);

    let recommendations = engine
        .recommender
        .recommend_for_user(&mut session, None, top_n, &filter)?;

    let result = UserResults {
        user_id: recommend_args.user_id,
        recommendations,
    };
    output_result("Recommendations", &result, args)
}

fn reviews(engine: &Engine, reviews_args: &ReviewsArgs, args: &GameRecArgs) -> Result<()> {
    let session = engine.session(reviews_args.user_id, &reviews_args.feedback);

    let result = ReviewList {
        user_id: reviews_args.user_id,
        reviews: session
            .ledger()
            .reviews_for(reviews_args.user_id, engine.catalog()),
    };
    output_result("Reviews", &result, args)
}

fn predict(engine: &Engine, predict_args: &PredictArgs, args: &GameRecArgs) -> Result<()> {
    let item = engine.catalog().get(predict_args.app_id)?;
    let mut session = engine.session(predict_args.user_id, &predict_args.feedback);
    let predicted_score = session.predict(predict_args.app_id)?;

    let result = PredictionResult {
        user_id: predict_args.user_id,
        app_id: item.id,
        title: item.title.clone(),
        predicted_score,
    };
    output_result("Prediction", &result, args)
}
