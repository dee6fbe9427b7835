//! # Forgebot - Item-Enhancement Economy Bot
//!
//! Forgebot is a chat-platform bot running a small virtual-economy game:
//! users earn gold by chatting, gamble it on an item "enhancement" mechanic
//! with escalating risk, and sell enhanced items at a fluctuating market
//! rate. Persistent state is two flat JSON documents.
//!
//! ## Features
//!
//! - **Prefix Commands**: `-출석`, `-지갑`, `-강화`, `-정보`, `-랭킹`,
//!   `-판매`, `-시세`, `-도움`; ordinary chat earns a small gold reward.
//! - **Enhancement State Machine**: levels climb on success with a
//!   diminishing success chance; failure resets the item to zero.
//! - **Volatile Market**: a global sale-price multiplier re-rolled every 30
//!   minutes from a fixed discrete distribution.
//! - **Best Record**: the all-time highest level survives the sale or
//!   destruction of the item that set it.
//! - **Single-Threaded Core**: one event is fully processed before the
//!   next; the market tick shares the same timeline, so the engine needs
//!   no locks.
//! - **Status Endpoint**: a tiny HTTP responder for platform health checks.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use forgebot::bot::BotServer;
//! use forgebot::config::Config;
//! use forgebot::game::EconomyEngine;
//! use forgebot::storage::Storage;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let storage = Storage::new(&config.storage.data_dir).await?;
//!     let engine = EconomyEngine::load(storage).await?;
//!     let (server, channels) = BotServer::new(engine, config.command_prefix());
//!     forgebot::gateway::start_console(channels);
//!     server.run().await
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`bot`] - Event loop, command parsing, and reply formatting
//! - [`game`] - The economy engine: every game-state transition
//! - [`gateway`] - Chat-platform boundary types and the console connector
//! - [`storage`] - The two persisted JSON documents
//! - [`config`] - Configuration management
//! - [`web`] - HTTP status endpoint

pub mod bot;
pub mod config;
pub mod game;
pub mod gateway;
pub mod storage;
pub mod web;
