pub mod amount;
pub mod format;
pub mod otp;
pub mod password;

pub use password::{hash_password, verify_password, Password, PasswordHashString};
