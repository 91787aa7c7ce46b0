use std::time::Duration;
use ticketdesk::bootstrap;
use ticketdesk::config::Config;
use ticketdesk::infrastructure::http::router::{build_router, RouterSettings};
use ticketdesk::infrastructure::observability;
use ticketdesk::infrastructure::persistence::Database;

const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    let _observability = observability::init(&config)?;
    tracing::info!("Configuration loaded");

    // Initialize database connection
    let db = Database::connect(&config.database_url).await?;
    tracing::info!("Database connection established");

    db.run_migrations().await?;
    tracing::info!("Database migrations applied");

    let state = bootstrap::build_app_state(db, &config).await?;

    if let Err(e) = bootstrap::initialize_admin(&state.user_service, &config).await {
        tracing::error!("Failed to initialize admin user: {}", e);
        return Err(e.into());
    }

    // Expired sessions are also dropped lazily on lookup
    let auth_service = state.auth_service.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            match auth_service.cleanup_expired_sessions().await {
                Ok(0) => {}
                Ok(removed) => tracing::info!("Removed {} expired sessions", removed),
                Err(e) => tracing::warn!("Session cleanup failed: {}", e),
            }
        }
    });

    let app = build_router(state, &RouterSettings::from(&config));

    let addr = config.server_address();
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
