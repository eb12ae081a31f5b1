//! Process-local store for development and tests.

use async_trait::async_trait;
use chrono::Utc;
use service_core::error::AppError;
use tokio::sync::RwLock;
use tracing::instrument;

use super::LedgerStore;
use crate::models::{Account, CreateAccount, CreateUser, JournalEntry, PostJournalEntry, User};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    accounts: Vec<Account>,
    entries: Vec<JournalEntry>,
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id(len: usize) -> Option<i64> {
    i64::try_from(len).ok().map(|n| n + 1)
}

#[async_trait]
impl LedgerStore for InMemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }

    #[instrument(skip(self, user))]
    async fn insert_user(&self, user: &CreateUser) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "User with this email already exists"
            )));
        }
        let id = next_id(tables.users.len());
        tables.users.push(User {
            id,
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            created_at: Some(user.created_at),
        });
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    #[instrument(skip(self, account), fields(code = %account.code))]
    async fn insert_account(&self, account: &CreateAccount) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        if tables.accounts.iter().any(|a| a.code == account.code) {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Account with code '{}' already exists",
                account.code
            )));
        }
        let id = next_id(tables.accounts.len());
        tables.accounts.push(Account {
            id,
            code: account.code.clone(),
            name: account.name.clone(),
            account_type: account.account_type.as_str().to_string(),
            created_at: Some(Utc::now()),
        });
        Ok(())
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        Ok(self.tables.read().await.accounts.clone())
    }

    #[instrument(skip(self, entry))]
    async fn insert_journal_entry(&self, entry: &PostJournalEntry) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        let id = next_id(tables.entries.len());
        tables.entries.push(JournalEntry {
            id,
            date: entry.date,
            debit_label: entry.debit_label.clone(),
            credit_label: entry.credit_label.clone(),
            description: entry.description.clone(),
            amount: Some(entry.amount),
            created_at: Some(entry.created_at),
        });
        Ok(())
    }

    async fn list_journal_entries(&self) -> Result<Vec<JournalEntry>, AppError> {
        Ok(self.tables.read().await.entries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountType;

    fn kas() -> CreateAccount {
        CreateAccount {
            code: "101".to_string(),
            name: "Kas".to_string(),
            account_type: AccountType::Asset,
        }
    }

    #[tokio::test]
    async fn duplicate_account_code_is_a_conflict() {
        let store = InMemoryStore::new();
        store.insert_account(&kas()).await.unwrap();

        let err = store.insert_account(&kas()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let accounts = store.list_accounts().await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].account_type, "Aset");
        assert_eq!(accounts[0].id, Some(1));
    }

    #[tokio::test]
    async fn users_are_found_by_exact_email() {
        let store = InMemoryStore::new();
        store
            .insert_user(&CreateUser {
                email: "petambak@siudang.id".to_string(),
                password_hash: "$argon2id$stub".to_string(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        assert!(store.find_user_by_email("petambak@siudang.id").await.unwrap().is_some());
        assert!(store.find_user_by_email("lain@siudang.id").await.unwrap().is_none());
    }
}
