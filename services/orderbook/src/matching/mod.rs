//! Matching logic
//!
//! Crossing detection lives with the side books; this module holds the
//! trade executor that turns a crossed quantity into a ledger-ready
//! trade record.

pub mod executor;

pub use executor::{MatchError, MatchExecutor};
