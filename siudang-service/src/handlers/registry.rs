use askama::Template;
use axum::{extract::State, response::IntoResponse, Form};
use serde::Deserialize;
use service_core::error::AppError;
use validator::Validate;

use super::auth::first_validation_message;
use super::store_failure;
use crate::models::{Account, AccountType, AuthUser, CreateAccount};
use crate::services::metrics::ACCOUNTS_CREATED;
use crate::AppState;

pub const ACCOUNT_SAVED: &str = "✅ Akun berhasil ditambahkan!";
pub const ACCOUNT_SAVE_FAILED: &str = "❌ Gagal menambahkan akun.";
pub const ACCOUNT_CODE_TAKEN: &str = "❌ Kode akun sudah terdaftar.";
pub const ACCOUNT_TYPE_INVALID: &str = "❌ Tipe akun tidak valid";
pub const ACCOUNT_PARENTHESES: &str = "❌ Kode dan nama akun tidak boleh mengandung tanda kurung";

pub struct AccountView {
    pub code: String,
    pub name: String,
    pub account_type: String,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            code: account.code.clone(),
            name: account.name.clone(),
            account_type: account.account_type.clone(),
        }
    }
}

#[derive(Template)]
#[template(path = "coa.html")]
pub struct CoaTemplate {
    pub accounts: Vec<AccountView>,
    pub account_types: Vec<&'static str>,
    pub message: Option<String>,
    pub current_page: &'static str,
}

impl CoaTemplate {
    fn new(accounts: &[Account], message: Option<String>) -> Self {
        Self {
            accounts: accounts.iter().map(AccountView::from).collect(),
            account_types: AccountType::ALL.iter().map(|t| t.as_str()).collect(),
            message,
            current_page: "coa",
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, max = 20, message = "❌ Kode akun wajib diisi (maksimal 20 karakter)"))]
    pub kode_akun: String,
    #[validate(length(min = 1, max = 100, message = "❌ Nama akun wajib diisi (maksimal 100 karakter)"))]
    pub nama_akun: String,
    pub tipe_akun: String,
}

impl CreateAccountRequest {
    fn trimmed(self) -> Self {
        Self {
            kode_akun: self.kode_akun.trim().to_string(),
            nama_akun: self.nama_akun.trim().to_string(),
            tipe_akun: self.tipe_akun.trim().to_string(),
        }
    }

    /// Parentheses would break the `"<name> (<code>)"` labels journal rows carry.
    fn has_parentheses(&self) -> bool {
        [&self.kode_akun, &self.nama_akun]
            .iter()
            .any(|v| v.contains('(') || v.contains(')'))
    }
}

pub async fn coa_page(State(state): State<AppState>, _user: AuthUser) -> impl IntoResponse {
    match state.store.list_accounts().await {
        Ok(accounts) => CoaTemplate::new(&accounts, None),
        Err(e) => CoaTemplate::new(&[], Some(store_failure("coa", &e))),
    }
}

pub async fn create_account(
    State(state): State<AppState>,
    user: AuthUser,
    Form(payload): Form<CreateAccountRequest>,
) -> impl IntoResponse {
    let payload = payload.trimmed();
    let accounts = match state.store.list_accounts().await {
        Ok(accounts) => accounts,
        Err(e) => return CoaTemplate::new(&[], Some(store_failure("coa", &e))),
    };

    if let Err(errors) = payload.validate() {
        return CoaTemplate::new(&accounts, Some(first_validation_message(&errors)));
    }
    if payload.has_parentheses() {
        return CoaTemplate::new(&accounts, Some(ACCOUNT_PARENTHESES.to_string()));
    }
    let Some(account_type) = AccountType::parse(&payload.tipe_akun) else {
        return CoaTemplate::new(&accounts, Some(ACCOUNT_TYPE_INVALID.to_string()));
    };
    if accounts.iter().any(|a| a.code == payload.kode_akun) {
        return CoaTemplate::new(&accounts, Some(ACCOUNT_CODE_TAKEN.to_string()));
    }

    let account = CreateAccount {
        code: payload.kode_akun,
        name: payload.nama_akun,
        account_type,
    };

    let message = match state.store.insert_account(&account).await {
        Ok(()) => {
            tracing::info!(
                user = %user.email,
                code = %account.code,
                account_type = %account.account_type,
                "Account created"
            );
            ACCOUNTS_CREATED
                .with_label_values(&[account.account_type.as_str()])
                .inc();
            ACCOUNT_SAVED
        }
        Err(AppError::Conflict(_)) => ACCOUNT_CODE_TAKEN,
        Err(e) => {
            tracing::error!(code = %account.code, error = %e, "Failed to insert account");
            ACCOUNT_SAVE_FAILED
        }
    };

    // Re-read so the list reflects the write.
    match state.store.list_accounts().await {
        Ok(accounts) => CoaTemplate::new(&accounts, Some(message.to_string())),
        Err(e) => {
            store_failure("coa", &e);
            CoaTemplate::new(&accounts, Some(message.to_string()))
        }
    }
}
