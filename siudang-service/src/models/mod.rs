pub mod account;
pub mod journal;
pub mod timestamp;
pub mod user;

pub use account::{Account, AccountType, CreateAccount};
pub use journal::{JournalEntry, PostJournalEntry, Side};
pub use user::{AuthUser, CreateUser, User};
