//! Display-ready snapshots of application state
//!
//! Monetary amounts stay integer cents throughout; turning them into a
//! currency string is the rendering shell's concern.

use commenter_domain::{ReviewHistoryEntry, WithdrawRequest};

use super::format::{format_remaining, format_short_date};
use crate::application::services::{EarningsOverview, LifecyclePhase, LifecycleSnapshot};

/// What the reservation screens render: browse, countdown, and proof entry
/// all read from this one struct.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationView {
    pub phase_label: &'static str,
    pub company_name: Option<String>,
    pub review_link: Option<String>,
    pub remaining_secs: Option<i64>,
    /// Countdown as `M:SS`, present whenever a deadline is running.
    pub countdown_label: Option<String>,
    pub can_submit: bool,
    pub can_abandon: bool,
}

impl ReservationView {
    pub fn from_snapshot(snapshot: &LifecycleSnapshot) -> Self {
        let reservation = snapshot.reservation.as_ref();
        let holding = matches!(
            snapshot.phase,
            LifecyclePhase::Active | LifecyclePhase::AwaitingConfirmation
        );
        Self {
            phase_label: snapshot.phase.display_name(),
            company_name: reservation.map(|r| r.company().name().to_string()),
            review_link: reservation.map(|r| r.company().review_link().to_string()),
            remaining_secs: snapshot.remaining_secs,
            countdown_label: snapshot.remaining_secs.map(format_remaining),
            can_submit: holding,
            can_abandon: holding,
        }
    }
}

/// One row of the review-history screen.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRowView {
    pub company_name: String,
    pub status_label: &'static str,
    pub date_label: Option<String>,
    /// Only link proofs are openable from the history screen.
    pub proof_link: Option<String>,
}

impl From<&ReviewHistoryEntry> for HistoryRowView {
    fn from(entry: &ReviewHistoryEntry) -> Self {
        Self {
            company_name: entry.company_name().to_string(),
            status_label: entry.status().display_name(),
            date_label: entry.created_at().map(format_short_date),
            proof_link: entry
                .proof_ref()
                .filter(|proof| proof.is_link())
                .map(|proof| proof.value().to_string()),
        }
    }
}

/// Balance panel of the earnings screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EarningsView {
    pub available_cents: i64,
    pub pending_cents: i64,
    pub lifetime_cents: i64,
    pub submitted_count: u32,
}

impl From<&EarningsOverview> for EarningsView {
    fn from(overview: &EarningsOverview) -> Self {
        Self {
            available_cents: overview.wallet.available_cents(),
            pending_cents: overview.pending_cents,
            lifetime_cents: overview.wallet.lifetime_cents(),
            submitted_count: overview.submitted_count,
        }
    }
}

/// One row of the withdrawal-history list.
#[derive(Debug, Clone, PartialEq)]
pub struct WithdrawalRowView {
    pub amount_cents: i64,
    pub status_label: &'static str,
    pub pix_key: String,
    pub date_label: Option<String>,
}

impl From<&WithdrawRequest> for WithdrawalRowView {
    fn from(request: &WithdrawRequest) -> Self {
        Self {
            amount_cents: request.amount_cents(),
            status_label: request.status().display_name(),
            pix_key: request.pix_key().to_string(),
            date_label: request.requested_at().map(format_short_date),
        }
    }
}
