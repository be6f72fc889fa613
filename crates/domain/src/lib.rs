//! # Helpkit Domain
//!
//! Plain data types shared by the Helpkit crates.
//!
//! This crate contains:
//! - The workspace error type and `Result` alias
//! - Configuration structures
//! - Data holders (`Organization`, `CommandResult`, `OutputFile`, `Table`)
//! - Constants
//!
//! ## Architecture
//! - No dependencies on other Helpkit crates
//! - Only external dependencies allowed

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
