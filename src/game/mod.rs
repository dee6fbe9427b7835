//! # Game Module - Enhancement Economy Core
//!
//! All game-state transitions live here, isolated from chat-platform and
//! persistence plumbing so the rules stay synchronous, total, and testable.
//!
//! ## Components
//!
//! - [`economy`] - The economy engine: ledger, enhancement, sales, ranking
//! - [`market`] - The periodic market-rate distribution
//! - [`errors`] - User-facing rule violations and fatal storage errors

pub mod economy;
pub mod errors;
pub mod market;

pub use economy::EconomyEngine;
pub use errors::EconomyError;
