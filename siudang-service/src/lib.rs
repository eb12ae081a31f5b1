pub mod config;
pub mod handlers;
pub mod models;
pub mod reports;
pub mod services;
pub mod startup;
pub mod utils;

use config::SiudangConfig;
use services::{EmailProvider, LedgerStore, RegistrationStore};
use std::sync::Arc;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SiudangConfig>,
    pub store: Arc<dyn LedgerStore>,
    pub email: Arc<dyn EmailProvider>,
    pub registrations: RegistrationStore,
}

impl AppState {
    pub fn new(
        config: SiudangConfig,
        store: Arc<dyn LedgerStore>,
        email: Arc<dyn EmailProvider>,
    ) -> Self {
        let registrations =
            RegistrationStore::new(config.otp.expiry_seconds, config.otp.max_attempts);
        Self {
            config: Arc::new(config),
            store,
            email,
            registrations,
        }
    }
}
