use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuctionPaymentError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for AuctionPaymentError {
    fn from(e: serde_json::Error) -> Self {
        AuctionPaymentError::SerializationError(e.to_string())
    }
}
