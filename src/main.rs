use portfolio_api::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    mailer::{MailConfig, MailerState, NoopMailer, SmtpMailer},
    storage::{LocalStorageService, StorageState},
    store::{Documents, PgDocumentStore, StoreState},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// The asynchronous entry point, responsible for initializing all core
/// components: Configuration, Logging, Database, Storage, Mail, and the HTTP
/// server.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (Fail-Fast)
    // Loads .env file settings before configuration can be read.
    dotenv::dotenv().ok();
    // AppConfig::load() implements the fail-fast principle for missing Production secrets.
    let config = AppConfig::load();

    // 2. Logging Filter Setup
    // Prioritizes RUST_LOG, falling back to sensible defaults for local work.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "portfolio_api=debug,tower_http=info,axum=trace".into());

    // 3. Initialize Logging based on Environment
    // The structured logging format is selected by APP_ENV.
    match config.env {
        Env::Local => {
            // LOCAL: pretty output for human readability during debugging.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // PROD: JSON output for ingestion by centralized log aggregators.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 4. Database Initialization (Postgres)
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.db_url)
        .await
        .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

    let pg_store = PgDocumentStore::new(pool);
    // The single documents table is created on startup if absent.
    pg_store
        .ensure_schema()
        .await
        .expect("FATAL: Failed to initialize the documents schema.");

    let documents = Documents::new(Arc::new(pg_store) as StoreState);

    // 5. Storage Initialization (Local Disk)
    let local_storage = LocalStorageService::new(&config.upload_dir);
    let storage = Arc::new(local_storage) as StorageState;
    {
        use portfolio_api::storage::StorageService;
        storage.ensure_ready().await;
    }

    // 6. Mailer Initialization
    // Falls back to a no-op when the SMTP environment is incomplete, so the
    // contact form keeps working without notifications.
    let mailer: MailerState = match MailConfig::from_env() {
        Some(mail_config) => {
            tracing::info!("SMTP configured; contact notifications enabled");
            Arc::new(SmtpMailer::new(mail_config))
        }
        None => {
            tracing::warn!("SMTP not configured; contact notifications disabled");
            Arc::new(NoopMailer)
        }
    };

    // 7. Unified State Assembly
    let app_state = AppState {
        documents,
        storage,
        mailer,
        config,
    };

    // 8. Router and Server Startup
    let app = create_router(app_state);

    let listener = TcpListener::bind("0.0.0.0:8000").await.unwrap();

    tracing::info!("HTTP server bound successfully.");
    tracing::info!("Listening on 0.0.0.0:8000");
    tracing::info!("API Documentation (Swagger UI) available at: http://localhost:8000/swagger-ui");

    axum::serve(listener, app).await.unwrap();
}
