pub mod lot;
pub mod session;
