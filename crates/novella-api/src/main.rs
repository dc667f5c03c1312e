//! Novella API server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use novella_api::config::AppConfig;
use novella_api::error::AppError;
use novella_api::state::AppState;
use novella_content::source::FileChapterSource;
use novella_core::clock::SystemClock;
use novella_core::repository::ProgressRepository;
use novella_progress::in_memory::InMemoryProgressRepository;
use novella_progress_store::pg_progress_repository::PgProgressRepository;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Novella API server");

    let config = AppConfig::from_env()?;

    let progress_repository: Arc<dyn ProgressRepository> = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(database_url)
                .await?;
            let repository = PgProgressRepository::new(pool);
            repository.ensure_schema().await?;
            Arc::new(repository)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; player progress is kept in memory only");
            Arc::new(InMemoryProgressRepository::new())
        }
    };

    let chapter_source = Arc::new(FileChapterSource::with_template(
        config.content_dir.clone(),
        config.chapter_path_template.clone(),
    ));
    tracing::info!(
        content_dir = %config.content_dir.display(),
        final_chapter = %config.final_chapter,
        "serving chapter content"
    );

    let app_state = AppState::new(
        chapter_source,
        progress_repository,
        Arc::new(SystemClock),
        config.engine(),
    );

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = novella_api::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
