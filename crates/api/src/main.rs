use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use fascicoli_core::booking::{BookingService, Stores};
use fascicoli_core::store::{InMemoryStore, StoreSeed};
use fascicoli_db::PgStore;
use tokio::sync::Notify;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fascicoli_api::auth::password::hash_password;
use fascicoli_api::config::{ServerConfig, StoreBackend};
use fascicoli_api::router::build_app_router;
use fascicoli_api::sessions::SessionRegistry;
use fascicoli_api::state::AppState;

#[tokio::main]
async fn main() {
    // `fascicoli-api hash-password <plaintext>` prints a value for APP_PASSWORD_HASH.
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(String::as_str) == Some("hash-password") {
        let plaintext = args
            .get(2)
            .expect("usage: fascicoli-api hash-password <plaintext>");
        let hash = hash_password(plaintext).expect("Failed to hash password");
        println!("{hash}");
        return;
    }

    dotenvy::dotenv().ok();

    // --- Tracing ---
    // LOG_FORMAT=json switches to one JSON object per line.
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fascicoli_api=debug,fascicoli_core=debug,tower_http=debug".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        backend = ?config.store_backend,
        "Loaded server configuration"
    );

    // --- Stores ---
    let mut stores = match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .expect("DATABASE_URL must be set");

            let pool = fascicoli_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            fascicoli_db::health_check(&pool)
                .await
                .expect("Database health check failed");

            fascicoli_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Stores::shared(Arc::new(PgStore::new(pool)))
        }
        StoreBackend::Memory => {
            let seed = match &config.memory_seed_path {
                Some(path) => StoreSeed::from_json_file(path).expect("Failed to load store seed"),
                None => StoreSeed::default(),
            };
            tracing::info!(
                catalog = seed.catalog.len(),
                reservations = seed.reservations.len(),
                "In-memory store seeded"
            );
            Stores::shared(Arc::new(InMemoryStore::new(seed)))
        }
    };
    if !config.cost_center_required {
        stores = stores.without_cost_centers();
    }

    // --- Booking service ---
    let settings = config
        .booking_settings()
        .expect("Invalid booking settings");
    tracing::info!(
        reasons = settings.requirements.rules.len(),
        cache_ttl_secs = settings.cache_ttl.as_secs(),
        "Booking service configured"
    );
    let booking = Arc::new(BookingService::new(stores, settings));

    // --- App state ---
    let session_ttl = Duration::from_secs(config.jwt.access_token_expiry_mins.max(1) as u64 * 60);
    let state = AppState {
        booking,
        config: Arc::new(config.clone()),
        sessions: Arc::new(SessionRegistry::new(session_ttl)),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let signalled = Arc::new(Notify::new());
    let notify = Arc::clone(&signalled);
    let mut server = tokio::spawn(
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                notify.notify_one();
            })
            .into_future(),
    );

    tokio::select! {
        result = &mut server => {
            report_server_exit(result);
            return;
        }
        () = signalled.notified() => {}
    }

    // --- Drain ---
    let drain = Duration::from_secs(config.shutdown_timeout_secs);
    match tokio::time::timeout(drain, server).await {
        Ok(result) => report_server_exit(result),
        Err(_) => tracing::warn!(
            timeout_secs = config.shutdown_timeout_secs,
            "In-flight requests did not drain in time"
        ),
    }

    tracing::info!("Graceful shutdown complete");
}

fn report_server_exit(result: Result<std::io::Result<()>, tokio::task::JoinError>) {
    match result {
        Ok(Ok(())) => tracing::info!("Server stopped accepting connections"),
        Ok(Err(e)) => tracing::error!(error = %e, "Server error"),
        Err(e) => tracing::error!(error = %e, "Server task failed"),
    }
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
