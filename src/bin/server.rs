use std::sync::Arc;

use bird_finder_api::AppState;
use bird_finder_api::config::AppConfig;
use bird_finder_api::db;
use bird_finder_api::routes::build_router;
use bird_finder_api::storage::LocalStorage;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bird_finder_api=debug,tower_http=debug".parse().unwrap()),
        )
        .init();

    let config = AppConfig::from_env();
    tracing::info!("starting server on {}", config.listen_addr);

    let pool = db::connect(&config.database_url)
        .await
        .expect("failed to connect to database");
    db::migrate(&pool).await.expect("failed to run migrations");
    db::species::seed_defaults(&pool)
        .await
        .expect("failed to seed bird species");

    let storage = Arc::new(
        LocalStorage::new(&config.upload_dir, config.max_upload_bytes)
            .expect("failed to create upload directory"),
    );

    let state = AppState {
        pool,
        config: config.clone(),
        storage,
    };

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("failed to bind");
    tracing::info!("listening on {}", config.listen_addr);
    axum::serve(listener, app).await.expect("server error");
}
