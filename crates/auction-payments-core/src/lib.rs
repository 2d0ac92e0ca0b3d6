pub mod breakdown;
pub mod error;
pub mod lot;
pub mod report;
pub mod summary;
pub mod types;

pub use error::AuctionPaymentError;
pub use types::*;

/// Standard result type for all auction-payments operations
pub type AuctionPaymentResult<T> = Result<T, AuctionPaymentError>;
