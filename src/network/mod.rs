//! # Network
//!
//! - `session` - the [`Fetcher`] seam, its blocking HTTP implementation and
//!   the non-fatal [`FetchFailure`] taxonomy

pub mod session;

// Re-export commonly used items for convenience
pub use session::{FetchFailure, Fetcher, Session};
