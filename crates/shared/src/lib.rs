//! Commenter Pay Contract - Shared types for talking to the hosted backend
//!
//! This crate contains everything the client knows about the backend's wire
//! surface:
//! - Read-model row DTOs (REST selects on tables and views)
//! - Stored-procedure names and parameter payloads (`POST /rpc/<fn>`)
//! - The error body and error-code vocabulary
//! - Conversions from wire rows into domain entities
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - serde, serde_json, uuid, chrono, tracing
//! 2. **No business logic** - pure data types, serialization, conversions
//! 3. **No domain IDs in DTOs** - rows carry raw `uuid::Uuid`; typed ids
//!    appear only after conversion into domain entities
//! 4. **Snake_case wire format** - rows mirror the relational backend's
//!    column names verbatim; breaking a field name breaks the contract
//!
//! # Stability
//!
//! The backend evolves server-first. Enums deserialized from the wire keep a
//! `#[serde(other)] Unknown` variant so old clients survive new vocabulary;
//! removing or renaming a row field is a breaking change and needs a
//! coordinated release.

pub mod endpoints;
pub mod errors;
pub mod rows;
pub mod rpc;

// =============================================================================
// Error vocabulary
// =============================================================================
pub use errors::{ApiErrorBody, ErrorCode};

// =============================================================================
// Read-model rows
// =============================================================================
pub use rows::{
    ActiveSlotRow, AdminCompanyRow, AdminReviewRow, AdminWithdrawalRow, AvailableCompanyRow,
    CompanyRefRow, MyReviewRow, ProfileRow, ProofKind, ReservationRow, TransactionRow, WalletRow,
    WithdrawalRow,
};

// =============================================================================
// Stored-procedure payloads
// =============================================================================
pub use rpc::{
    ApproveReviewParams, CreateCompanyParams, MarkWithdrawalPaidParams, RejectReviewParams,
    ReleaseSlotParams, ReserveSlotParams, SubmitProofParams, UpdateProfileParams,
};
