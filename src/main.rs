//! Service entry point.
//!
//! Loads configuration, installs tracing, picks PostgreSQL or in-memory
//! stores, and serves the REST API until interrupted.

use std::error::Error;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use creator_subscriptions::adapters::http::{
    api_router, CreatorApplicationAppState, PaymentAppState,
};
use creator_subscriptions::adapters::memory::{
    InMemoryAccountDirectory, InMemoryCreatorApplicationRepository, InMemoryPaymentStore,
};
use creator_subscriptions::adapters::notifications::{
    HttpNotificationDispatcher, LogNotificationDispatcher,
};
use creator_subscriptions::adapters::postgres::{
    PostgresAccountDirectory, PostgresCreatorApplicationRepository, PostgresPaymentReader,
    PostgresPaymentStore,
};
use creator_subscriptions::config::{AppConfig, DatabaseConfig, ServerConfig};
use creator_subscriptions::ports::{
    Clock, NotificationDispatcher, SystemClock,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let (payments, applications) = build_state(&config).await?;
    let app = api_router(payments, applications, config.server.request_timeout());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down");
    Ok(())
}

/// JSON logs in production, human-readable otherwise. `RUST_LOG` wins over
/// the configured filter.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if server.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn build_state(
    config: &AppConfig,
) -> Result<(PaymentAppState, CreatorApplicationAppState), Box<dyn Error>> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let notifier = build_notifier(config)?;
    let settings = config.apply_payment_settings();
    let policy = config.creator_applications.policy();

    if config.database.is_configured() {
        let pool = connect(&config.database).await?;
        let reader = Arc::new(PostgresPaymentReader::new(pool.clone()));
        let accounts = Arc::new(PostgresAccountDirectory::new(pool.clone()));

        let payments = PaymentAppState {
            store: Arc::new(PostgresPaymentStore::new(pool.clone())),
            accounts: accounts.clone(),
            notifier,
            clock: clock.clone(),
            ledger_reader: reader.clone(),
            subscription_reader: reader.clone(),
            stats_reader: reader,
            settings,
        };
        let applications = CreatorApplicationAppState {
            repository: Arc::new(PostgresCreatorApplicationRepository::new(pool)),
            accounts,
            clock,
            policy,
        };
        Ok((payments, applications))
    } else {
        tracing::warn!("No database configured, state is kept in memory and lost on exit");
        let store = Arc::new(InMemoryPaymentStore::new());
        let accounts = Arc::new(InMemoryAccountDirectory::new());

        let payments = PaymentAppState {
            store: store.clone(),
            accounts: accounts.clone(),
            notifier,
            clock: clock.clone(),
            ledger_reader: store.clone(),
            subscription_reader: store.clone(),
            stats_reader: store,
            settings,
        };
        let applications = CreatorApplicationAppState {
            repository: Arc::new(InMemoryCreatorApplicationRepository::new()),
            accounts,
            clock,
            policy,
        };
        Ok((payments, applications))
    }
}

async fn connect(database: &DatabaseConfig) -> Result<sqlx::PgPool, Box<dyn Error>> {
    let pool = PgPoolOptions::new()
        .min_connections(database.min_connections)
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .idle_timeout(database.idle_timeout())
        .max_lifetime(database.max_lifetime())
        .connect(&database.url)
        .await?;

    if database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Migrations applied");
    }

    Ok(pool)
}

fn build_notifier(config: &AppConfig) -> Result<Arc<dyn NotificationDispatcher>, Box<dyn Error>> {
    match config.notifications.endpoint() {
        Some(endpoint) => {
            tracing::info!(endpoint, "Delivering notifications over HTTP");
            Ok(Arc::new(HttpNotificationDispatcher::new(
                endpoint,
                config.notifications.timeout(),
            )?))
        }
        None => Ok(Arc::new(LogNotificationDispatcher)),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
