//! Domain layer for Lobe Sessions.
//!
//! Holds the session model, the pure reducer and partitioner that derive
//! display state from a flat session collection, and the service traits the
//! application layer depends on.

pub mod error;
pub mod session;
pub mod settings;

// Re-export common error type
pub use error::{LobeError, Result};
