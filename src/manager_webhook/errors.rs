use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("WebhookError::InvalidColor: {0}")]
    InvalidColor(String),
    #[error("WebhookError::Document: {0}")]
    Document(#[from] serde_json::Error),
    #[error("WebhookError::Delivery: {0}")]
    Delivery(String),
}

impl From<ureq::Error> for WebhookError {
    fn from(e: ureq::Error) -> Self { WebhookError::Delivery(e.to_string()) }
}
