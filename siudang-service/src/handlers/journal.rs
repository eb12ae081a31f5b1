use askama::Template;
use axum::{extract::State, response::IntoResponse, Form};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use super::{load_books, store_failure};
use crate::models::{Account, AuthUser, JournalEntry, PostJournalEntry};
use crate::reports::general_journal;
use crate::services::metrics::JOURNAL_ENTRIES_POSTED;
use crate::utils::amount::parse_amount;
use crate::utils::format::{iso_date, rupiah, rupiah_or_dash};
use crate::AppState;

pub const ENTRY_SAVED: &str = "✅ Jurnal berhasil disimpan!";
pub const ENTRY_SAVE_FAILED: &str = "❌ Terjadi kesalahan saat menyimpan jurnal.";
pub const INVALID_DATE: &str = "❌ Format tanggal tidak valid";
pub const UNKNOWN_ACCOUNT: &str = "❌ Akun tidak ditemukan di daftar akun";

pub struct AccountOption {
    pub code: String,
    pub label: String,
}

#[derive(Template)]
#[template(path = "journal_form.html")]
pub struct JournalFormTemplate {
    pub accounts: Vec<AccountOption>,
    pub today: String,
    pub message: Option<String>,
    pub current_page: &'static str,
}

impl JournalFormTemplate {
    fn new(accounts: &[Account], message: Option<String>) -> Self {
        Self {
            accounts: accounts
                .iter()
                .map(|a| AccountOption {
                    code: a.code.clone(),
                    label: a.label(),
                })
                .collect(),
            today: iso_date(Utc::now().date_naive()),
            message,
            current_page: "input_jurnal",
        }
    }
}

/// Form fields for a posting; accounts are chosen by registry code.
#[derive(Debug, Deserialize)]
pub struct JournalRequest {
    pub tanggal: String,
    pub akun_debit: String,
    pub akun_kredit: String,
    #[serde(default)]
    pub keterangan: String,
    pub jumlah: String,
}

/// Check a submitted posting against the registry and build the row to store.
pub(crate) fn build_entry(
    request: &JournalRequest,
    accounts: &[Account],
) -> Result<PostJournalEntry, String> {
    let date = NaiveDate::parse_from_str(request.tanggal.trim(), "%Y-%m-%d")
        .map_err(|_| INVALID_DATE.to_string())?;

    let find = |code: &str| {
        accounts
            .iter()
            .find(|a| a.code == code.trim())
            .ok_or_else(|| UNKNOWN_ACCOUNT.to_string())
    };
    let debit = find(&request.akun_debit)?;
    let credit = find(&request.akun_kredit)?;

    let amount = parse_amount(&request.jumlah).map_err(|e| format!("❌ {}", e))?;

    Ok(PostJournalEntry {
        date,
        debit_label: debit.label(),
        credit_label: credit.label(),
        description: request.keterangan.trim().to_string(),
        amount,
        created_at: Utc::now(),
    })
}

pub async fn journal_form(State(state): State<AppState>, _user: AuthUser) -> impl IntoResponse {
    match state.store.list_accounts().await {
        Ok(accounts) => JournalFormTemplate::new(&accounts, None),
        Err(e) => JournalFormTemplate::new(&[], Some(store_failure("input_jurnal", &e))),
    }
}

pub async fn post_journal(
    State(state): State<AppState>,
    user: AuthUser,
    Form(payload): Form<JournalRequest>,
) -> impl IntoResponse {
    let accounts = match state.store.list_accounts().await {
        Ok(accounts) => accounts,
        Err(e) => {
            JOURNAL_ENTRIES_POSTED.with_label_values(&["store_error"]).inc();
            return JournalFormTemplate::new(&[], Some(store_failure("input_jurnal", &e)));
        }
    };

    let entry = match build_entry(&payload, &accounts) {
        Ok(entry) => entry,
        Err(message) => {
            JOURNAL_ENTRIES_POSTED.with_label_values(&["invalid"]).inc();
            return JournalFormTemplate::new(&accounts, Some(message));
        }
    };

    let message = match state.store.insert_journal_entry(&entry).await {
        Ok(()) => {
            tracing::info!(
                user = %user.email,
                date = %entry.date,
                debit = %entry.debit_label,
                credit = %entry.credit_label,
                amount = %entry.amount,
                "Journal entry posted"
            );
            JOURNAL_ENTRIES_POSTED.with_label_values(&["posted"]).inc();
            ENTRY_SAVED
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to insert journal entry");
            JOURNAL_ENTRIES_POSTED.with_label_values(&["store_error"]).inc();
            ENTRY_SAVE_FAILED
        }
    };

    JournalFormTemplate::new(&accounts, Some(message.to_string()))
}

pub struct GeneralJournalView {
    pub date: String,
    pub description: String,
    pub debit_name: String,
    pub debit_code: String,
    pub credit_name: String,
    pub credit_code: String,
    pub amount: String,
}

#[derive(Template)]
#[template(path = "general_journal.html")]
pub struct GeneralJournalTemplate {
    pub rows: Vec<GeneralJournalView>,
    pub total_debit: String,
    pub total_kredit: String,
    pub message: Option<String>,
    pub current_page: &'static str,
}

impl GeneralJournalTemplate {
    fn new(entries: &[JournalEntry], message: Option<String>) -> Self {
        let journal = general_journal(entries);
        Self {
            rows: journal
                .rows
                .into_iter()
                .map(|row| GeneralJournalView {
                    date: iso_date(row.date),
                    description: row.description,
                    debit_name: row.debit_name,
                    debit_code: row.debit_code,
                    credit_name: row.credit_name,
                    credit_code: row.credit_code,
                    amount: rupiah_or_dash(row.amount),
                })
                .collect(),
            total_debit: rupiah(journal.total_debit),
            total_kredit: rupiah(journal.total_kredit),
            message,
            current_page: "jurnal_umum",
        }
    }
}

pub async fn general_journal_page(
    State(state): State<AppState>,
    _user: AuthUser,
) -> impl IntoResponse {
    match load_books(&state).await {
        Ok((_, entries)) => GeneralJournalTemplate::new(&entries, None),
        Err(e) => GeneralJournalTemplate::new(&[], Some(store_failure("jurnal_umum", &e))),
    }
}
