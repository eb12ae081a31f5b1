pub mod app;
pub mod auth;
pub mod journal;
pub mod registry;
pub mod reports;

use service_core::error::AppError;

use crate::models::{Account, JournalEntry};
use crate::services::metrics::STORE_ERRORS;
use crate::AppState;

/// Shown when a page had to render without its data.
pub(crate) const STORE_FAILURE_MESSAGE: &str =
    "❌ Gagal mengambil data dari database. Silakan coba lagi.";

/// Log a store failure behind a page and return the message to show.
pub(crate) fn store_failure(page: &'static str, err: &AppError) -> String {
    tracing::error!(page = page, error = %err, kind = err.kind(), "Store call failed");
    STORE_ERRORS.with_label_values(&[page, err.kind()]).inc();
    STORE_FAILURE_MESSAGE.to_string()
}

pub(crate) fn session_error(err: tower_sessions::session::Error) -> AppError {
    AppError::InternalError(anyhow::anyhow!("Session store error: {}", err))
}

/// Chart of accounts and journal, fetched concurrently.
pub(crate) async fn load_books(state: &AppState) -> Result<(Vec<Account>, Vec<JournalEntry>), AppError> {
    tokio::try_join!(state.store.list_accounts(), state.store.list_journal_entries())
}
