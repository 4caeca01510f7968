use std::sync::Arc;

use pathway_algo::{ContentFormat, InteractionMode, InteractionSignal, KnowledgeGraph, PathwayEngine};
use serde_json::json;

use pathway_backend::config::Config;
use pathway_backend::logging;
use pathway_backend::seed::{seed_demo_learner, DEMO_USER_ID};
use pathway_backend::store::InMemoryStore;
use pathway_backend::PathwayService;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            std::process::exit(2);
        }
    };

    let _log_guard = logging::init_tracing(&config.logging);

    if let Err(err) = run(config).await {
        tracing::error!(error = %err, "demo failed");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let graph = Arc::new(KnowledgeGraph::standard_curriculum()?);
    let engine = Arc::new(PathwayEngine::new(graph, config.engine)?);
    tracing::info!(
        concepts = engine.graph().len(),
        config_path = ?config.engine_config_path,
        "engine ready"
    );

    let store = Arc::new(InMemoryStore::new());
    seed_demo_learner(&store);
    let service = PathwayService::with_store(engine, store).with_session_limit(config.session_limit);

    let style = service
        .update_learning_style(
            DEMO_USER_ID,
            &[
                InteractionSignal {
                    format: Some(ContentFormat::Exercise),
                    mode: Some(InteractionMode::Practiced),
                },
                InteractionSignal {
                    format: Some(ContentFormat::Video),
                    mode: None,
                },
            ],
        )
        .await?;
    let profile = service
        .refresh_mastery_many(DEMO_USER_ID, &["variables", "functions"])
        .await?;
    let difficulty = service
        .next_difficulty(DEMO_USER_ID, profile.preferred_difficulty)
        .await?;
    let planned = service.plan_path(DEMO_USER_ID, &["traits", "iterators"]).await?;
    let recommendations = service.refresh_recommendations(DEMO_USER_ID).await?;
    let minutes = service.session_minutes(DEMO_USER_ID).await?;

    let report = json!({
        "learningStyle": style,
        "profile": profile,
        "nextDifficulty": difficulty,
        "plannedPath": planned,
        "recommendations": recommendations,
        "sessionMinutes": minutes,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
