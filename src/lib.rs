pub mod auth;
pub mod config;
pub mod error;
pub mod providers;

pub use auth::{Credential, Platform, Token};
pub use config::{load_config, CrosscastConfig};
pub use error::CrosscastError;
pub use providers::{ProviderAdapter, ProviderConfig, SoundCloud, YouTube};
