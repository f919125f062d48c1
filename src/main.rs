use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marketplace::api::router;
use marketplace::config::Config;
use marketplace::db::{self, SqliteStore};
use marketplace::notify::{Notifier, TracingNotifier, WebhookNotifier};
use marketplace::state::AppState;
use marketplace::storage::LocalStorage;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "marketplace=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::new_from_env()?;

    let pool = db::connect(&config.database_url).await?;
    db::migrate(&pool).await?;

    if config.seed_demo {
        SqliteStore::new(pool.clone()).seed_demo().await?;
    }

    let notifier: Arc<dyn Notifier> = match &config.notify_webhook_url {
        Some(url) => {
            info!("sending notifications to {}", url);
            Arc::new(WebhookNotifier::new(url.clone())?)
        }
        None => Arc::new(TracingNotifier),
    };
    let storage = Arc::new(LocalStorage::new(
        config.storage_root.clone(),
        config.storage_public_url.clone(),
    ));

    let state = AppState::new(pool, storage, notifier, config.per_page);
    let app = router(state);

    info!("listening on http://{}", config.bind_address);

    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
