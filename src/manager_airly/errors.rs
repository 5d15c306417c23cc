use thiserror::Error;

#[derive(Error, Debug)]
pub enum AirlyError {
    #[error("AirlyError::Provider: status {status:?}: {detail}")]
    Provider { status: Option<u16>, detail: String },
    #[error("AirlyError::Document: {0}")]
    Document(#[from] serde_json::Error),
}
