pub mod credential;
pub mod expiry;
pub mod flow;
pub mod signin;

pub use credential::{Credential, Platform, Token};
pub use expiry::{expiry_from, is_expired_at, NON_EXPIRING_SECS};
pub use flow::{ensure_fresh, exchange_code, refresh};
pub use signin::sign_in_url;
