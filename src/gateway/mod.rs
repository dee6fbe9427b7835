//! Chat-platform boundary: event and reply types plus a console connector.
//!
//! The actual platform connection (login, reconnect, event delivery) is an
//! external collaborator. This module fixes the shapes that cross the
//! boundary: inbound [`ChatEvent`]s arrive on an unbounded channel, and the
//! bot pushes [`OutgoingReply`]s back on another. Delivery is at-most-once
//! per event; the connector owns any retry semantics.
//!
//! For credential-less local runs, [`start_console`] bridges stdin/stdout
//! onto the same channels so `forgebot start --console` behaves like a
//! single-user chat room.

use log::debug;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// One inbound chat message, already attributed by the platform.
#[derive(Debug, Clone)]
pub struct ChatEvent {
    /// Opaque platform-supplied user ID. Stable across name changes.
    pub user_id: String,
    /// Human-readable display name at the time of the message.
    pub username: String,
    /// Raw message text.
    pub content: String,
}

/// One outbound reply addressed to the user whose command produced it.
#[derive(Debug, Clone)]
pub struct OutgoingReply {
    pub user_id: String,
    pub text: String,
}

/// Channel pair handed to a connector.
pub struct GatewayChannels {
    pub events: mpsc::UnboundedSender<ChatEvent>,
    pub replies: mpsc::UnboundedReceiver<OutgoingReply>,
}

/// Read the gateway credential from the environment, if present.
pub fn token_from_env() -> Option<String> {
    std::env::var("FORGEBOT_TOKEN").ok().filter(|t| !t.is_empty())
}

const CONSOLE_USER_ID: &str = "console";
const CONSOLE_USERNAME: &str = "console";

/// Bridge stdin lines to chat events and replies to stdout.
///
/// Returns the reader task handle; the task ends when stdin closes, which
/// drops the event sender and lets the server loop drain out.
pub fn start_console(channels: GatewayChannels) -> JoinHandle<()> {
    let GatewayChannels {
        events,
        mut replies,
    } = channels;

    tokio::spawn(async move {
        while let Some(reply) = replies.recv().await {
            println!("{}", reply.text);
        }
    });

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let content = line.trim();
                    if content.is_empty() {
                        continue;
                    }
                    debug!("console event: {} byte(s)", content.len());
                    let event = ChatEvent {
                        user_id: CONSOLE_USER_ID.to_string(),
                        username: CONSOLE_USERNAME.to_string(),
                        content: content.to_string(),
                    };
                    if events.send(event).is_err() {
                        break;
                    }
                }
                Ok(None) | Err(_) => break,
            }
        }
    })
}
