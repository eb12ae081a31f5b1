//! Router assembly and server lifecycle.

use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    security_headers::security_headers_middleware,
    tracing::{request_id, request_id_middleware},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::{SiudangConfig, StoreBackend};
use crate::handlers::{
    app::{health_check, index, metrics},
    auth::{dashboard, login_page, login_success, logout, register_page, send_otp, verify_otp},
    journal::{general_journal_page, journal_form, post_journal},
    registry::{coa_page, create_account},
    reports::{
        adjusted_trial_balance_page, adjustments_page, cogs_page, depreciation_page,
        financial_statement_page, ledger_page, trial_balance_page,
    },
};
use crate::services::{
    EmailProvider, EmailService, InMemoryStore, LedgerStore, LogEmailService, PgStore,
    PostgrestStore,
};
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(state.config.session.secure_cookie)
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(
            state.config.session.inactivity_hours,
        )));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/register", get(register_page))
        .route("/send_otp", post(send_otp))
        .route("/verify_otp", post(verify_otp))
        .route("/login", get(login_page))
        .route("/login_success", post(login_success))
        .route("/logout", get(logout))
        .route("/dashboard", get(dashboard))
        .route("/coa", get(coa_page).post(create_account))
        .route("/input_jurnal", get(journal_form).post(post_journal))
        .route("/jurnal_umum", get(general_journal_page))
        .route("/buku_besar", get(ledger_page))
        .route("/neraca_saldo", get(trial_balance_page))
        .route("/jurnal_penyesuaian", get(adjustments_page))
        .route("/nssp", get(adjusted_trial_balance_page))
        .route("/hitung_hpp", get(cogs_page))
        .route("/buku_pembantu_penyusutan", get(depreciation_page))
        .route("/laporan_keuangan", get(financial_statement_page))
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let id = request_id(request.headers()).unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Pick the store backend named in configuration.
async fn build_store(config: &SiudangConfig) -> Result<Arc<dyn LedgerStore>, AppError> {
    let store = &config.store;
    let timeout = Duration::from_secs(store.timeout_seconds);

    match store.backend {
        StoreBackend::Postgrest => {
            let (Some(url), Some(key)) = (store.supabase_url.as_deref(), store.supabase_key.clone())
            else {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "SUPABASE_URL and SUPABASE_KEY are required for the postgrest backend"
                )));
            };
            Ok(Arc::new(PostgrestStore::new(url, key, timeout)?))
        }
        StoreBackend::Postgres => {
            let Some(database_url) = store.database_url.as_ref() else {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "DATABASE_URL is required for the postgres backend"
                )));
            };
            let pg = PgStore::connect(database_url, store.max_connections, timeout)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to connect to PostgreSQL: {}", e);
                    e
                })?;
            pg.run_migrations().await?;
            Ok(Arc::new(pg))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Ok(Arc::new(InMemoryStore::new()))
        }
    }
}

fn build_email(config: &SiudangConfig) -> Result<Arc<dyn EmailProvider>, AppError> {
    match config.email.sender.as_deref() {
        Some(sender) => Ok(Arc::new(EmailService::new(&config.email, sender)?)),
        None => {
            tracing::warn!("EMAIL_SENDER not set, OTP codes are written to the log");
            Ok(Arc::new(LogEmailService))
        }
    }
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(config: SiudangConfig) -> Result<Self, AppError> {
        config.validate()?;

        let store = build_store(&config).await?;
        let email = build_email(&config)?;
        let address = config.common.bind_address();

        tracing::info!(
            backend = store.backend(),
            environment = ?config.environment,
            "Store and email providers ready"
        );

        let router = build_router(AppState::new(config, store, email));

        // Port 0 binds a random port for tests.
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), AppError> {
        tracing::info!("Starting siudang-service on port {}", self.port);
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
