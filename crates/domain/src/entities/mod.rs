//! Domain entities

mod company;
mod profile;
mod review_slot;
mod wallet;
mod withdrawal;

pub use company::{Company, CompanySummary, ListingStatus};
pub use profile::{PixKind, Profile};
pub use review_slot::{
    ActiveReservation, CompanyRef, ProofRef, ReviewHistoryEntry, ReviewSlot, SlotStatus,
    DEFAULT_RESERVATION_WINDOW_SECS,
};
pub use wallet::{
    pending_balance_cents, TransactionKind, Wallet, WalletTransaction, REVIEW_REWARD_CENTS,
};
pub use withdrawal::{WithdrawRequest, WithdrawalStatus};
