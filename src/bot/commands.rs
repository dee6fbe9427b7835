//! Prefix-command parser for the game's chat surface.
//!
//! Commands are recognized only when the message starts with the configured
//! prefix (default `-`) to keep ordinary conversation from triggering them.
//! Keywords are case-sensitive Korean words, matching the surface users
//! already know: `-출석`, `-지갑`, `-강화`, `-정보`, `-랭킹`, `-판매`,
//! `-시세`, `-도움`. Item-name arguments are the rest of the line after the
//! keyword, trimmed but otherwise untouched (case-sensitive, arbitrary
//! Unicode).
//!
//! Anything without the prefix is [`Command::Chat`] and earns the chat
//! reward; a prefixed but unrecognized keyword is [`Command::Unknown`] and
//! earns nothing, mirroring the original surface.

/// One parsed inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Daily attendance bonus.
    Attend,
    /// Balance report.
    Wallet,
    /// Enhancement attempt; argument is the item name (may be empty).
    Enhance(String),
    /// Item report; argument is the item name (may be empty).
    Info(String),
    /// All-time and current-best records.
    Ranking,
    /// Sell an item; argument is the item name (may be empty).
    Sell(String),
    /// Current market multiplier.
    Market,
    /// Static help text.
    Help,
    /// Ordinary chat; credits the chat reward, no reply.
    Chat,
    /// Prefixed but unrecognized; no reward, no reply.
    Unknown,
}

/// Minimal command parser bound to one prefix character.
pub struct CommandParser {
    prefix: char,
}

impl CommandParser {
    pub fn new(prefix: char) -> Self {
        Self { prefix }
    }

    pub fn parse(&self, raw: &str) -> Command {
        let trimmed = raw.trim();
        if !trimmed.starts_with(self.prefix) {
            return Command::Chat;
        }
        let (keyword, rest) = match trimmed.split_once(' ') {
            Some((head, tail)) => (head, tail.trim()),
            None => (trimmed, ""),
        };
        // Keyword comparison is on the body after the prefix, exact match.
        match &keyword[self.prefix.len_utf8()..] {
            "출석" => Command::Attend,
            "지갑" => Command::Wallet,
            "강화" => Command::Enhance(rest.to_string()),
            "정보" => Command::Info(rest.to_string()),
            "랭킹" => Command::Ranking,
            "판매" => Command::Sell(rest.to_string()),
            "시세" => Command::Market,
            "도움" => Command::Help,
            _ => Command::Unknown,
        }
    }
}
