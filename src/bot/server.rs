//! Bot server: the single-threaded event loop tying everything together.
//!
//! One `tokio::select!` loop owns the whole timeline: inbound chat events,
//! the 30-minute market-rate tick, and shutdown. An event is fully
//! processed (parsed, applied, persisted, replied) before the next is
//! dequeued, and the tick never interleaves with an in-flight handler, so
//! the engine needs no locking.
//!
//! Domain errors become reply strings; a persistence failure propagates
//! out of [`BotServer::run`] and ends the process.

use anyhow::Result;
use chrono::Utc;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{thread_rng, SeedableRng};
use tokio::sync::mpsc;
use tokio::time::{interval, Duration};

use crate::bot::commands::{Command, CommandParser};
use crate::bot::format;
use crate::game::economy::EconomyEngine;
use crate::game::errors::EconomyError;
use crate::game::market;
use crate::gateway::{ChatEvent, GatewayChannels, OutgoingReply};

pub struct BotServer {
    engine: EconomyEngine,
    parser: CommandParser,
    events: mpsc::UnboundedReceiver<ChatEvent>,
    replies: mpsc::UnboundedSender<OutgoingReply>,
}

impl BotServer {
    /// Build the server around a loaded engine and return the channel pair
    /// a gateway connector plugs into.
    pub fn new(engine: EconomyEngine, prefix: char) -> (Self, GatewayChannels) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();
        let server = Self {
            engine,
            parser: CommandParser::new(prefix),
            events: event_rx,
            replies: reply_tx,
        };
        let channels = GatewayChannels {
            events: event_tx,
            replies: reply_rx,
        };
        (server, channels)
    }

    /// Run until the event source closes or ctrl-c arrives.
    ///
    /// The market interval fires immediately on entry (tokio interval
    /// semantics), giving the roll-at-startup behavior, then every
    /// [`market::REROLL_MINUTES`] minutes.
    pub async fn run(mut self) -> Result<()> {
        let mut market_tick = interval(Duration::from_secs(market::REROLL_MINUTES * 60));
        loop {
            tokio::select! {
                _ = market_tick.tick() => {
                    let rate = market::roll(&mut thread_rng());
                    self.engine.set_market_rate(rate);
                    info!("📉📈 market rate swing: x{rate}");
                }
                maybe_event = self.events.recv() => {
                    match maybe_event {
                        Some(event) => {
                            if let Err(e) = self.handle_event(event).await {
                                // Only fatal (storage) errors reach here.
                                return Err(e);
                            }
                        }
                        None => {
                            info!("event source closed; shutting down");
                            break;
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("interrupt received; shutting down");
                    break;
                }
            }
        }
        Ok(())
    }

    /// Process one inbound message end to end.
    async fn handle_event(&mut self, event: ChatEvent) -> Result<()> {
        debug!(
            "event from {} ({} byte(s))",
            event.user_id,
            event.content.len()
        );
        self.engine.ensure_account(&event.user_id, &event.username);

        let command = self.parser.parse(&event.content);
        let reply = match self.dispatch(&event.user_id, command).await {
            Ok(reply) => reply,
            Err(EconomyError::Storage(e)) => return Err(e),
            Err(e) => {
                // Dispatch maps domain errors to replies itself; anything
                // else reaching here is a missed mapping, not a crash.
                warn!("unmapped domain error: {e}");
                None
            }
        };

        if let Some(text) = reply {
            let _ = self.replies.send(OutgoingReply {
                user_id: event.user_id,
                text,
            });
        }
        Ok(())
    }

    /// Apply one parsed command and produce the reply, if any. Domain
    /// errors are folded into reply strings here; only storage errors
    /// escape.
    async fn dispatch(
        &mut self,
        user_id: &str,
        command: Command,
    ) -> Result<Option<String>, EconomyError> {
        let reply = match command {
            Command::Chat => {
                self.engine.apply_chat_reward(user_id).await?;
                None
            }
            Command::Unknown => None,
            Command::Attend => {
                let today = Utc::now().date_naive();
                match self.engine.claim_attendance(user_id, today).await {
                    Ok(_) => Some(format::attendance_done()),
                    Err(EconomyError::AlreadyClaimed) => Some(format::attendance_already()),
                    Err(e) => return Err(e),
                }
            }
            Command::Wallet => Some(format::wallet(self.engine.wallet(user_id))),
            Command::Enhance(item_name) => {
                // ThreadRng is !Send and would be held across the await,
                // making `run` unspawnable; StdRng is the same generator
                // behind a Send handle.
                let mut rng = StdRng::from_entropy();
                match self.engine.enhance(user_id, &item_name, &mut rng).await {
                    Ok(outcome) => Some(format::enhance_result(&item_name, &outcome)),
                    Err(EconomyError::MissingItemName) => Some(format::missing_item_name_enhance()),
                    Err(EconomyError::InsufficientFunds { .. }) => {
                        Some(format::insufficient_funds())
                    }
                    Err(e) => return Err(e),
                }
            }
            Command::Info(item_name) => match self.engine.inspect(user_id, &item_name) {
                Ok(report) => Some(format::item_info(&item_name, &report)),
                Err(EconomyError::NoSuchItem(name)) => Some(format::no_such_item(&name)),
                Err(e) => return Err(e),
            },
            Command::Ranking => Some(format::ranking(&self.engine.rank())),
            Command::Sell(item_name) => match self.engine.sell(user_id, &item_name).await {
                Ok(receipt) => Some(format::sold(&item_name, &receipt)),
                Err(EconomyError::MissingItemName) => Some(format::missing_item_name_sell()),
                Err(EconomyError::NoSuchItem(name)) => Some(format::not_owned(&name)),
                Err(EconomyError::NotSellable) => Some(format::not_sellable()),
                Err(e) => return Err(e),
            },
            Command::Market => Some(format::market(self.engine.market_rate())),
            Command::Help => Some(format::help()),
        };
        Ok(reply)
    }
}
