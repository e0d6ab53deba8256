//! Table, view, and stored-procedure names on the hosted backend
//!
//! Kept in one place so a backend rename is a one-line change here instead
//! of a string hunt through the adapters.

/// Read models (tables and views, `GET /<name>`)
pub mod views {
    /// The user's own slot records (row-level security scopes to the caller).
    pub const REVIEW_SLOTS: &str = "review_slots";
    /// Companies with open capacity, for the availability feed.
    pub const AVAILABLE_COMPANIES: &str = "available_companies";
    /// The user's review history, newest first.
    pub const MY_REVIEWS: &str = "my_reviews";
    /// The user's wallet balances.
    pub const WALLETS: &str = "wallets";
    /// The user's wallet movements.
    pub const WALLET_TRANSACTIONS: &str = "wallet_transactions";
    /// The user's withdrawal requests.
    pub const WITHDRAW_REQUESTS: &str = "withdraw_requests";
    /// The user's profile row.
    pub const PROFILES: &str = "profiles";
    /// Moderation queue of submitted reviews (admin only).
    pub const ADMIN_REVIEW_QUEUE: &str = "admin_review_queue";
    /// All withdrawal requests with requester details (admin only).
    pub const ADMIN_WITHDRAWALS: &str = "admin_withdrawals";
    /// All companies with package progress (admin only).
    pub const ADMIN_COMPANIES: &str = "admin_companies";
}

/// Stored procedures (`POST /rpc/<name>`)
pub mod functions {
    /// Atomically reserve a slot for the caller; returns the reservation.
    pub const RESERVE_SLOT: &str = "reserve_slot";
    /// Release or expire a held slot; idempotent.
    pub const RELEASE_SLOT: &str = "release_slot";
    /// Attach proof to a held slot and move it to moderation.
    pub const SUBMIT_REVIEW_PROOF: &str = "submit_review_proof";
    /// Request a payout of the full available balance.
    pub const REQUEST_WITHDRAWAL: &str = "request_withdrawal";
    /// Whether the caller is an admin.
    pub const IS_ADMIN: &str = "is_admin";
    /// Approve a submitted review and credit the reward (admin only).
    pub const APPROVE_REVIEW: &str = "approve_review";
    /// Reject a submitted review (admin only).
    pub const REJECT_REVIEW: &str = "reject_review";
    /// Mark a withdrawal request as paid (admin only).
    pub const MARK_WITHDRAWAL_PAID: &str = "mark_withdrawal_paid";
    /// Register a new company listing (admin only).
    pub const CREATE_COMPANY: &str = "create_company";
    /// Update the caller's profile row.
    pub const UPDATE_PROFILE: &str = "update_profile";
}
