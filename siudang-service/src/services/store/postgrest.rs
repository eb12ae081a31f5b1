//! Store backed by a hosted PostgREST endpoint (`<url>/rest/v1/<table>`).

use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{de::DeserializeOwned, Serialize};
use service_core::error::AppError;
use std::time::Duration;
use tracing::instrument;

use super::LedgerStore;
use crate::models::{Account, CreateAccount, CreateUser, JournalEntry, PostJournalEntry, User};
use crate::services::metrics::STORE_QUERY_DURATION;

const USERS: &str = "users";
const ACCOUNTS: &str = "coa";
const JOURNAL: &str = "jurnal";

#[derive(Clone)]
pub struct PostgrestStore {
    client: Client,
    base_url: String,
    api_key: Secret<String>,
}

impl PostgrestStore {
    pub fn new(base_url: &str, api_key: Secret<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        let key = self.api_key.expose_secret();
        self.client
            .request(method, self.table_url(table))
            .header("apikey", key)
            .bearer_auth(key)
            .header(header::ACCEPT, "application/json")
    }

    async fn insert<T: Serialize + Sync>(&self, table: &'static str, row: &T) -> Result<(), AppError> {
        let operation = format!("insert_{}", table);
        let timer = STORE_QUERY_DURATION
            .with_label_values(&[self.backend(), operation.as_str()])
            .start_timer();

        let response = self
            .request(Method::POST, table)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await
            .map_err(|e| AppError::BadGateway(format!("insert into {} failed: {}", table, e)))?;

        timer.observe_duration();
        check_status(table, response).await.map(|_| ())
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &'static str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>, AppError> {
        let operation = format!("select_{}", table);
        let timer = STORE_QUERY_DURATION
            .with_label_values(&[self.backend(), operation.as_str()])
            .start_timer();

        let response = self
            .request(Method::GET, table)
            .query(&[("select", "*"), ("order", "id.asc")])
            .query(filters)
            .send()
            .await
            .map_err(|e| AppError::BadGateway(format!("select from {} failed: {}", table, e)))?;

        timer.observe_duration();
        check_status(table, response)
            .await?
            .json::<Vec<T>>()
            .await
            .map_err(|e| AppError::BadGateway(format!("unreadable rows from {}: {}", table, e)))
    }
}

/// Map PostgREST error statuses; 409 is a unique-key violation.
async fn check_status(table: &str, response: reqwest::Response) -> Result<reqwest::Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    if status == StatusCode::CONFLICT {
        return Err(AppError::Conflict(anyhow::anyhow!("{}: {}", table, body)));
    }
    Err(AppError::BadGateway(format!("{} returned {}: {}", table, status, body)))
}

#[async_trait]
impl LedgerStore for PostgrestStore {
    fn backend(&self) -> &'static str {
        "postgrest"
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        self.select::<serde_json::Value>(ACCOUNTS, &[("limit", "1".to_string())])
            .await
            .map(|_| ())
    }

    #[instrument(skip(self, user))]
    async fn insert_user(&self, user: &CreateUser) -> Result<(), AppError> {
        self.insert(USERS, user).await
    }

    #[instrument(skip(self, email))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users: Vec<User> = self
            .select(USERS, &[("email", format!("eq.{}", email))])
            .await?;
        Ok(users.into_iter().next())
    }

    #[instrument(skip(self, account), fields(code = %account.code))]
    async fn insert_account(&self, account: &CreateAccount) -> Result<(), AppError> {
        self.insert(ACCOUNTS, account).await
    }

    #[instrument(skip(self))]
    async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        self.select(ACCOUNTS, &[]).await
    }

    #[instrument(skip(self, entry), fields(date = %entry.date))]
    async fn insert_journal_entry(&self, entry: &PostJournalEntry) -> Result<(), AppError> {
        self.insert(JOURNAL, entry).await
    }

    #[instrument(skip(self))]
    async fn list_journal_entries(&self) -> Result<Vec<JournalEntry>, AppError> {
        self.select(JOURNAL, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_urls_ignore_trailing_slash() {
        let store = PostgrestStore::new(
            "https://abc.supabase.co/",
            Secret::new("anon".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(store.table_url(JOURNAL), "https://abc.supabase.co/rest/v1/jurnal");
    }
}
