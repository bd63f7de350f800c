use thiserror::Error;

#[derive(Error, Debug)]
pub enum MorseError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{component}.{service} returned {status}: {message}")]
    Status {
        component: String,
        service: String,
        status: String,
        message: String,
    },

    #[error("malformed reply {0:?}")]
    Protocol(String),
}
