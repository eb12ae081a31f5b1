#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use service_core::error::AppError;
use siudang_service::config::SiudangConfig;
use siudang_service::models::{
    Account, CreateAccount, CreateUser, JournalEntry, PostJournalEntry, User,
};
use siudang_service::services::{EmailProvider, InMemoryStore, LedgerStore};
use siudang_service::startup::build_router;
use siudang_service::AppState;
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

/// Email double that keeps every code it was asked to send.
#[derive(Default)]
pub struct RecordingEmail {
    sent: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingEmail {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, code)| code.clone())
    }
}

#[async_trait]
impl EmailProvider for RecordingEmail {
    async fn send_otp_email(&self, to_email: &str, code: &str) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::EmailError("relay refused".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to_email.to_string(), code.to_string()));
        Ok(())
    }
}

/// Keeps users working but fails every chart and journal call.
#[derive(Default)]
pub struct FailingStore {
    users: InMemoryStore,
}

fn unavailable() -> AppError {
    AppError::DatabaseError(anyhow::anyhow!("connection refused"))
}

#[async_trait]
impl LedgerStore for FailingStore {
    fn backend(&self) -> &'static str {
        "failing"
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Err(unavailable())
    }

    async fn insert_user(&self, user: &CreateUser) -> Result<(), AppError> {
        self.users.insert_user(user).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.users.find_user_by_email(email).await
    }

    async fn insert_account(&self, _account: &CreateAccount) -> Result<(), AppError> {
        Err(unavailable())
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        Err(unavailable())
    }

    async fn insert_journal_entry(&self, _entry: &PostJournalEntry) -> Result<(), AppError> {
        Err(unavailable())
    }

    async fn list_journal_entries(&self) -> Result<Vec<JournalEntry>, AppError> {
        Err(unavailable())
    }
}

pub struct TestApp {
    pub router: Router,
    pub email: Arc<RecordingEmail>,
    cookie: Mutex<Option<String>>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_parts(Arc::new(InMemoryStore::new()), RecordingEmail::default())
    }

    pub fn with_store(store: Arc<dyn LedgerStore>) -> Self {
        Self::with_parts(store, RecordingEmail::default())
    }

    pub fn with_parts(store: Arc<dyn LedgerStore>, email: RecordingEmail) -> Self {
        let email = Arc::new(email);
        let state = AppState::new(SiudangConfig::development(), store, email.clone());
        Self {
            router: build_router(state),
            email,
            cookie: Mutex::new(None),
        }
    }

    /// Send a request, carrying and refreshing the session cookie.
    pub async fn send(&self, mut request: Request<Body>) -> Response<Body> {
        if let Some(cookie) = self.cookie.lock().unwrap().clone() {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie
                .to_str()
                .unwrap()
                .split(';')
                .next()
                .unwrap()
                .to_string();
            *self.cookie.lock().unwrap() = Some(pair);
        }
        response
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)]) -> Response<Body> {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(encode_form(fields)))
                .unwrap(),
        )
        .await
    }

    /// Register through the OTP flow; leaves the session signed in.
    pub async fn register(&self, email: &str, password: &str) {
        let response = self
            .post_form("/send_otp", &[("email", email), ("password", password)])
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let code = self.email.last_code_for(email).expect("OTP was not sent");
        let response = self.post_form("/verify_otp", &[("otp", &code)]).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/dashboard");
    }

    pub async fn add_account(&self, code: &str, name: &str, account_type: &str) {
        let body = body_text(
            self.post_form(
                "/coa",
                &[("kode_akun", code), ("nama_akun", name), ("tipe_akun", account_type)],
            )
            .await,
        )
        .await;
        assert!(body.contains("Akun berhasil ditambahkan"), "{}", body);
    }

    pub async fn post_entry(&self, date: &str, debit: &str, credit: &str, description: &str, amount: &str) {
        let body = body_text(
            self.post_form(
                "/input_jurnal",
                &[
                    ("tanggal", date),
                    ("akun_debit", debit),
                    ("akun_kredit", credit),
                    ("keterangan", description),
                    ("jumlah", amount),
                ],
            )
            .await,
        )
        .await;
        assert!(body.contains("Jurnal berhasil disimpan"), "{}", body);
    }
}

pub fn encode_form(fields: &[(&str, &str)]) -> String {
    serde_urlencoded::to_string(fields).unwrap()
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// The chart used by the report tests.
pub const CHART: [(&str, &str, &str); 12] = [
    ("101", "Kas", "Aset"),
    ("113", "Perlengkapan", "Aset"),
    ("114", "Akumulasi Penyusutan Peralatan", "Aset"),
    ("115", "Persediaan Udang", "Aset"),
    ("121", "Peralatan Tambak", "Aset"),
    ("211", "Utang Gaji", "Kewajiban"),
    ("301", "Modal Pemilik", "Modal"),
    ("302", "Prive Pemilik", "Modal"),
    ("411", "Pendapatan Penjualan Udang", "Pendapatan"),
    ("511", "Beban Penyusutan Peralatan", "Beban"),
    ("512", "Beban Gaji", "Beban"),
    ("513", "Beban Perlengkapan", "Beban"),
];
