use thiserror::Error;

/// Errors that can arise while applying an economy operation.
///
/// Every variant except [`EconomyError::Storage`] is a user-facing rule
/// violation: the operation makes no state change and triggers no
/// persistence write, and the dispatcher turns it into a reply string.
/// `Storage` wraps a failed persistence flush and is fatal.
#[derive(Debug, Error)]
pub enum EconomyError {
    /// Daily attendance bonus already claimed for the given date.
    #[error("attendance already claimed today")]
    AlreadyClaimed,

    /// Balance is below the cost of the requested operation.
    #[error("insufficient gold (need {cost})")]
    InsufficientFunds { cost: u64 },

    /// An item-name argument was required but empty.
    #[error("item name required")]
    MissingItemName,

    /// No enhancement track exists for the named item.
    #[error("no enhancement record for '{0}'")]
    NoSuchItem(String),

    /// Item has not reached the minimum sellable level.
    #[error("item below sellable level")]
    NotSellable,

    /// Persistence write failure. There is no recovery path; the server
    /// loop propagates this and exits.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl EconomyError {
    /// True for rule violations that should be reported to the invoking
    /// user rather than terminating the server.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, EconomyError::Storage(_))
    }
}
