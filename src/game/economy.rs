//! Economy engine: every game-state transition for the enhancement economy.
//!
//! Overview
//! - Ledger: one [`UserAccount`] per chat participant, created lazily with
//!   10000 gold; never deleted
//! - Income: 10 gold per ordinary chat message, 1000 gold daily attendance
//! - Enhancement: 50 gold per attempt on a named item track; success raises
//!   the level and erodes the success chance, failure resets the track to
//!   level 0 / 80%
//! - Sale: items at level 5+ sell for `floor(350 * 1.5^level * rate)` where
//!   `rate` is the current market multiplier
//! - Records: the all-time best level ever reached survives the sale or
//!   destruction of the item that set it
//!
//! The engine owns the full in-memory state (ledger, best record, market
//! rate) and writes through to [`Storage`] after every mutation. Operations
//! validate before mutating: a domain error leaves state untouched and
//! triggers no flush. All randomness comes in through a caller-supplied
//! [`Rng`] so outcomes can be forced in tests.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::errors::EconomyError;
use crate::game::market;
use crate::storage::Storage;

/// Gold granted when an account is first created.
pub const STARTING_GOLD: u64 = 10_000;
/// Gold credited for each ordinary (non-command) chat message.
pub const CHAT_REWARD: u64 = 10;
/// Gold credited by the once-per-day attendance claim.
pub const ATTENDANCE_REWARD: u64 = 1_000;
/// Gold debited per enhancement attempt.
pub const ENHANCE_COST: u64 = 50;
/// Success chance (percent) of a fresh or freshly-reset item.
pub const BASE_CHANCE: u8 = 80;
/// Minimum level at which an item may be sold.
pub const SELLABLE_LEVEL: u32 = 5;

const BASE_PRICE: f64 = 350.0;
const PRICE_MULTIPLIER: f64 = 1.5;

/// One enhancement track. Created on the first attempt for an item name,
/// removed when the item is sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemState {
    pub level: u32,
    pub chance: u8,
}

impl Default for ItemState {
    fn default() -> Self {
        Self {
            level: 0,
            chance: BASE_CHANCE,
        }
    }
}

/// Persistent per-user state, keyed by the platform-supplied user ID.
///
/// Field names stay camelCase on disk so ledgers written by earlier
/// deployments load unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    /// Last-seen display name; refreshed on every inbound message.
    pub username: String,
    pub gold: u64,
    #[serde(default)]
    pub items: BTreeMap<String, ItemState>,
    /// UTC calendar date of the last attendance claim.
    #[serde(default)]
    pub last_attendance: Option<NaiveDate>,
}

/// The full user ledger. A `BTreeMap` so ranking scans visit users in a
/// deterministic order (ascending user ID).
pub type Ledger = BTreeMap<String, UserAccount>;

/// All-time highest enhancement level ever reached, across all users,
/// retained after the record-holding item is sold or destroyed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestRecord {
    pub username: String,
    pub item_name: String,
    pub level: u32,
}

impl Default for BestRecord {
    fn default() -> Self {
        Self {
            username: "없음".to_string(),
            item_name: "없음".to_string(),
            level: 0,
        }
    }
}

/// Result of a single enhancement attempt, for reply formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnhanceOutcome {
    /// The item advanced to `level` with `chance`% on the next attempt.
    Success { level: u32, chance: u8 },
    /// The item was destroyed: its track is back at level 0 / base chance.
    Destroyed,
}

/// Snapshot of one item for the info command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    pub level: u32,
    pub chance: u8,
    /// Sale price at the current market rate; `None` below [`SELLABLE_LEVEL`].
    pub price: Option<u64>,
}

/// Receipt returned by a completed sale.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleReceipt {
    /// Level the item held at the moment of sale.
    pub level: u32,
    pub price: u64,
    /// Market rate in effect at sale time.
    pub rate: f64,
}

/// Ranking response: the persisted all-time record plus the best item
/// currently held live by any user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankReport {
    pub all_time: BestRecord,
    pub current: BestRecord,
}

/// How much the success chance drops after reaching `level`.
///
/// Step function: early levels erode the chance quickly, later levels
/// barely at all, so the long-run chance trends down without collapsing.
pub fn chance_decrease(level: u32) -> u8 {
    if level < 10 {
        5
    } else if level < 20 {
        3
    } else if level < 30 {
        2
    } else {
        1
    }
}

/// Sale price for an item at `level` under market multiplier `rate`.
pub fn price_at(level: u32, rate: f64) -> u64 {
    (BASE_PRICE * PRICE_MULTIPLIER.powi(level as i32) * rate).floor() as u64
}

/// The economy engine. Owns the ledger, the best record, and the current
/// market rate; writes through to [`Storage`] after every mutation.
pub struct EconomyEngine {
    users: Ledger,
    best: BestRecord,
    market_rate: f64,
    storage: Storage,
}

impl EconomyEngine {
    /// Load both persisted documents and build the engine. Missing or
    /// unparsable files become defaults (first-run posture).
    pub async fn load(storage: Storage) -> anyhow::Result<Self> {
        let users = storage.load_ledger().await;
        let best = storage.load_record().await;
        info!(
            "economy loaded: {} account(s), best record +{} ({})",
            users.len(),
            best.level,
            best.item_name
        );
        Ok(Self {
            users,
            best,
            market_rate: market::DEFAULT_RATE,
            storage,
        })
    }

    /// Create the account if absent and refresh its display name.
    /// Not flushed on its own; the first mutating operation persists it.
    pub fn ensure_account(&mut self, user_id: &str, username: &str) {
        let account = self.account_mut(user_id);
        account.username = username.to_string();
    }

    fn account_mut(&mut self, user_id: &str) -> &mut UserAccount {
        self.users
            .entry(user_id.to_string())
            .or_insert_with(|| UserAccount {
                gold: STARTING_GOLD,
                ..UserAccount::default()
            })
    }

    /// Credit the per-message chat reward. The caller guarantees at most
    /// one call per inbound message and skips command messages.
    pub async fn apply_chat_reward(&mut self, user_id: &str) -> Result<u64, EconomyError> {
        let account = self.account_mut(user_id);
        account.gold += CHAT_REWARD;
        let balance = account.gold;
        self.flush_ledger().await?;
        Ok(balance)
    }

    /// Claim the daily attendance bonus for `today` (caller-supplied UTC
    /// date). Fails with [`EconomyError::AlreadyClaimed`] on a repeat claim.
    pub async fn claim_attendance(
        &mut self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<u64, EconomyError> {
        let account = self.account_mut(user_id);
        if account.last_attendance == Some(today) {
            return Err(EconomyError::AlreadyClaimed);
        }
        account.last_attendance = Some(today);
        account.gold += ATTENDANCE_REWARD;
        let balance = account.gold;
        self.flush_ledger().await?;
        Ok(balance)
    }

    /// Current gold balance.
    pub fn wallet(&self, user_id: &str) -> u64 {
        self.users.get(user_id).map_or(0, |a| a.gold)
    }

    /// Attempt one enhancement on `item_name`.
    ///
    /// Contract:
    /// - Fails with `MissingItemName` / `InsufficientFunds` before any
    ///   state change
    /// - Creates the track at level 0 / base chance on first use
    /// - Debits [`ENHANCE_COST`] unconditionally once the attempt starts
    /// - Success (`r <= chance` on a uniform draw in `[0,100)`): level +1,
    ///   chance drops by [`chance_decrease`] floored at 1, best record
    ///   updated and flushed when the new level beats it
    /// - Failure: the track resets to level 0 / base chance (entry kept)
    /// - The ledger is flushed either way
    pub async fn enhance<R: Rng>(
        &mut self,
        user_id: &str,
        item_name: &str,
        rng: &mut R,
    ) -> Result<EnhanceOutcome, EconomyError> {
        if item_name.is_empty() {
            return Err(EconomyError::MissingItemName);
        }
        // Mutate the account within a limited scope to avoid borrow
        // conflicts with the best-record update below.
        let (outcome, username) = {
            let account = self.account_mut(user_id);
            if account.gold < ENHANCE_COST {
                return Err(EconomyError::InsufficientFunds { cost: ENHANCE_COST });
            }
            let username = account.username.clone();
            account.gold -= ENHANCE_COST;

            let item = account.items.entry(item_name.to_string()).or_default();
            let roll: f64 = rng.gen_range(0.0..100.0);
            let outcome = if roll <= f64::from(item.chance) {
                item.level += 1;
                item.chance = item.chance.saturating_sub(chance_decrease(item.level)).max(1);
                EnhanceOutcome::Success {
                    level: item.level,
                    chance: item.chance,
                }
            } else {
                *item = ItemState::default();
                EnhanceOutcome::Destroyed
            };
            (outcome, username)
        };
        if let EnhanceOutcome::Success { level, .. } = &outcome {
            let level = *level;
            if level > self.best.level {
                self.best = BestRecord {
                    username,
                    item_name: item_name.to_string(),
                    level,
                };
                info!("new best record: {} +{}", item_name, level);
                self.flush_record().await?;
            }
        }
        self.flush_ledger().await?;
        Ok(outcome)
    }

    /// Report level, chance, and (for level 5+) the sale price of an item.
    pub fn inspect(&self, user_id: &str, item_name: &str) -> Result<ItemReport, EconomyError> {
        let item = self
            .users
            .get(user_id)
            .and_then(|a| a.items.get(item_name))
            .ok_or_else(|| EconomyError::NoSuchItem(item_name.to_string()))?;
        let price = (item.level >= SELLABLE_LEVEL).then(|| self.sell_price(item.level));
        Ok(ItemReport {
            level: item.level,
            chance: item.chance,
            price,
        })
    }

    /// All-time record plus the best item currently held, by full scan.
    /// O(total items); the ledger is expected to stay small. Ties go to
    /// the first item in iteration order (ascending user ID, then name).
    pub fn rank(&self) -> RankReport {
        let mut current = BestRecord::default();
        for account in self.users.values() {
            for (name, item) in &account.items {
                if item.level > current.level {
                    current = BestRecord {
                        username: account.username.clone(),
                        item_name: name.clone(),
                        level: item.level,
                    };
                }
            }
        }
        RankReport {
            all_time: self.best.clone(),
            current,
        }
    }

    /// Sell an item at level 5+: credit the price at the current market
    /// rate and remove the track entirely.
    pub async fn sell(
        &mut self,
        user_id: &str,
        item_name: &str,
    ) -> Result<SaleReceipt, EconomyError> {
        if item_name.is_empty() {
            return Err(EconomyError::MissingItemName);
        }
        let rate = self.market_rate;
        let account = self.account_mut(user_id);
        let item = account
            .items
            .get(item_name)
            .ok_or_else(|| EconomyError::NoSuchItem(item_name.to_string()))?;
        if item.level < SELLABLE_LEVEL {
            return Err(EconomyError::NotSellable);
        }
        let level = item.level;
        let price = price_at(level, rate);
        account.gold += price;
        account.items.remove(item_name);
        self.flush_ledger().await?;
        Ok(SaleReceipt { level, price, rate })
    }

    /// Sale price of `level` at the market rate currently in effect.
    pub fn sell_price(&self, level: u32) -> u64 {
        price_at(level, self.market_rate)
    }

    pub fn market_rate(&self) -> f64 {
        self.market_rate
    }

    /// Install a freshly rolled market rate. Called from the server's
    /// 30-minute tick; never persisted.
    pub fn set_market_rate(&mut self, rate: f64) {
        self.market_rate = rate;
    }

    pub fn best_record(&self) -> &BestRecord {
        &self.best
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn total_gold(&self) -> u64 {
        self.users.values().map(|a| a.gold).sum()
    }

    async fn flush_ledger(&self) -> Result<(), EconomyError> {
        self.storage.save_ledger(&self.users).await?;
        Ok(())
    }

    async fn flush_record(&self) -> Result<(), EconomyError> {
        self.storage.save_record(&self.best).await?;
        Ok(())
    }
}
