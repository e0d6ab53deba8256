pub mod entities;
pub mod error;
pub mod ids;

// Re-export all entities (explicit list in entities/mod.rs)
pub use entities::{
    pending_balance_cents, ActiveReservation, Company, CompanyRef, CompanySummary, ListingStatus,
    PixKind, Profile, ProofRef, ReviewHistoryEntry, ReviewSlot, SlotStatus, TransactionKind,
    Wallet, WalletTransaction, WithdrawRequest, WithdrawalStatus,
    DEFAULT_RESERVATION_WINDOW_SECS, REVIEW_REWARD_CENTS,
};

pub use error::DomainError;

// Re-export ID types
pub use ids::{CompanyId, SlotId, TransactionId, WithdrawalId};
