//! # Bot Module - Dispatch Layer
//!
//! Everything between the chat gateway and the economy engine:
//!
//! - [`server`] - Event loop, market tick, shutdown, error routing
//! - [`commands`] - Prefix-command parsing into a [`commands::Command`]
//! - [`format`] - Reply string formatting
//!
//! The flow for one message: parse → ensure account → engine operation →
//! format reply → send via gateway.

pub mod commands;
pub mod format;
pub mod server;

pub use server::BotServer;
