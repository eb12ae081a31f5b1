//! Persistence for the three tables the application owns: `users`, `coa`
//! and `jurnal`.

mod memory;
mod postgres;
mod postgrest;

pub use memory::InMemoryStore;
pub use postgres::PgStore;
pub use postgrest::PostgrestStore;

use async_trait::async_trait;
use service_core::error::AppError;

use crate::models::{Account, CreateAccount, CreateUser, JournalEntry, PostJournalEntry, User};

/// Row-level access to the bookkeeping tables.
///
/// Every call is attempted once. Listings return rows in insertion order.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Short backend name for logs and metrics.
    fn backend(&self) -> &'static str;

    async fn health_check(&self) -> Result<(), AppError>;

    /// Fails with `Conflict` when the email is taken.
    async fn insert_user(&self, user: &CreateUser) -> Result<(), AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Fails with `Conflict` when the code is taken.
    async fn insert_account(&self, account: &CreateAccount) -> Result<(), AppError>;

    async fn list_accounts(&self) -> Result<Vec<Account>, AppError>;

    async fn insert_journal_entry(&self, entry: &PostJournalEntry) -> Result<(), AppError>;

    async fn list_journal_entries(&self) -> Result<Vec<JournalEntry>, AppError>;
}
