use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CrosscastError {
    #[error("Can't make request: {0}")]
    RequestConstruction(String),

    #[error("Error with request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Unable to decode response JSON: {0}")]
    Decode(String),

    #[error("Error in config {}: {detail}", path.display())]
    Config { path: PathBuf, detail: String },

    #[error("No refresh token stored for this credential")]
    MissingRefreshToken,

    #[error("Unknown platform '{0}'. Known platforms: youtube, soundcloud")]
    UnknownPlatform(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CrosscastError {
    /// HTTP-style status code: the upstream status when the provider answered
    /// with a non-success status, 500 for every local failure.
    pub fn status(&self) -> u16 {
        match self {
            CrosscastError::UpstreamStatus { status, .. } => *status,
            _ => 500,
        }
    }

    /// Error code string for structured JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            CrosscastError::RequestConstruction(_) => "request_error",
            CrosscastError::Transport(_) => "transport_error",
            CrosscastError::UpstreamStatus { .. } => "upstream_status",
            CrosscastError::Decode(_) => "decode_error",
            CrosscastError::Config { .. } => "config_error",
            CrosscastError::MissingRefreshToken => "missing_refresh_token",
            CrosscastError::UnknownPlatform(_) => "unknown_platform",
            CrosscastError::Io(_) => "io_error",
        }
    }

    /// Produce a structured JSON error object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "message": self.to_string(),
                "code": self.code(),
                "status": self.status(),
            }
        })
    }
}
