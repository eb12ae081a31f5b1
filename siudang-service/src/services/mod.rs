pub mod email;
pub mod metrics;
pub mod registration;
pub mod store;

pub use email::{EmailProvider, EmailService, LogEmailService};
pub use registration::{OtpRejection, PendingUser, RegistrationStore};
pub use store::{InMemoryStore, LedgerStore, PgStore, PostgrestStore};
