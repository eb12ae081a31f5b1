//! Direct PostgreSQL store over a sqlx pool.

use async_trait::async_trait;
use chrono::Utc;
use secrecy::{ExposeSecret, Secret};
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

use super::LedgerStore;
use crate::models::{Account, CreateAccount, CreateUser, JournalEntry, PostJournalEntry, User};
use crate::services::metrics::STORE_QUERY_DURATION;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> AppError {
    move |e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(anyhow::anyhow!("{}: duplicate key", context))
        }
        _ => AppError::DatabaseError(anyhow::anyhow!("{}: {}", context, e)),
    }
}

impl PgStore {
    #[instrument(skip(database_url), fields(service = "siudang-service"))]
    pub async fn connect(
        database_url: &Secret<String>,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, AppError> {
        info!(max_connections = max_connections, "Connecting to PostgreSQL");

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url.expose_secret())
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    #[instrument(skip(self, user))]
    async fn insert_user(&self, user: &CreateUser) -> Result<(), AppError> {
        let timer = STORE_QUERY_DURATION
            .with_label_values(&[self.backend(), "insert_user"])
            .start_timer();

        sqlx::query("INSERT INTO users (email, password, created_at) VALUES ($1, $2, $3)")
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.created_at)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to insert user"))?;

        timer.observe_duration();
        Ok(())
    }

    #[instrument(skip(self, email))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let timer = STORE_QUERY_DURATION
            .with_label_values(&[self.backend(), "find_user_by_email"])
            .start_timer();

        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password, created_at FROM users WHERE email = $1 ORDER BY id LIMIT 1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find user"))?;

        timer.observe_duration();
        Ok(user)
    }

    #[instrument(skip(self, account), fields(code = %account.code))]
    async fn insert_account(&self, account: &CreateAccount) -> Result<(), AppError> {
        let timer = STORE_QUERY_DURATION
            .with_label_values(&[self.backend(), "insert_account"])
            .start_timer();

        sqlx::query(
            "INSERT INTO coa (kode_akun, nama_akun, tipe_akun, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(&account.code)
        .bind(&account.name)
        .bind(account.account_type.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert account"))?;

        timer.observe_duration();
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        let timer = STORE_QUERY_DURATION
            .with_label_values(&[self.backend(), "list_accounts"])
            .start_timer();

        let accounts = sqlx::query_as::<_, Account>(
            "SELECT id, kode_akun, nama_akun, tipe_akun, created_at FROM coa ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list accounts"))?;

        timer.observe_duration();
        Ok(accounts)
    }

    #[instrument(skip(self, entry), fields(date = %entry.date))]
    async fn insert_journal_entry(&self, entry: &PostJournalEntry) -> Result<(), AppError> {
        let timer = STORE_QUERY_DURATION
            .with_label_values(&[self.backend(), "insert_journal_entry"])
            .start_timer();

        sqlx::query(
            r#"
            INSERT INTO jurnal (tanggal, akun_debit, akun_kredit, keterangan, jumlah, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(entry.date)
        .bind(&entry.debit_label)
        .bind(&entry.credit_label)
        .bind(&entry.description)
        .bind(entry.amount)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert journal entry"))?;

        timer.observe_duration();
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_journal_entries(&self) -> Result<Vec<JournalEntry>, AppError> {
        let timer = STORE_QUERY_DURATION
            .with_label_values(&[self.backend(), "list_journal_entries"])
            .start_timer();

        let entries = sqlx::query_as::<_, JournalEntry>(
            r#"
            SELECT id, tanggal, akun_debit, akun_kredit, keterangan, jumlah, created_at
            FROM jurnal
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list journal entries"))?;

        timer.observe_duration();
        Ok(entries)
    }
}
