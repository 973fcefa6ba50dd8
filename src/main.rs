use std::sync::Arc;

use mal_recommender::{
    config::Config,
    db,
    routes::{create_router, AppState},
    services::{
        providers::{JikanClient, PredictionServerClient},
        Recommender,
    },
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mal_recommender=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // Static tables are read once; changing them means restarting the service
    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    let catalog = db::load_catalog(&pool).await?;
    let usernames = db::load_usernames(&pool).await?;
    pool.close().await;

    let recommender = Recommender::new(
        Arc::new(PredictionServerClient::new(config.predictor_url.clone())),
        Arc::new(JikanClient::new(config.jikan_api_url.clone())),
        usernames,
        catalog,
        config.page_delay(),
    );

    let state = Arc::new(AppState {
        recommender,
        default_result_count: config.default_result_count,
    });
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
