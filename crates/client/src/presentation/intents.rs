//! Intent handlers routing screen actions into the services

use commenter_domain::{CompanyId, CompanySummary, ProofRef};

use super::view::ReservationView;
use crate::application::services::{Services, SubmitReceipt};
use crate::ports::outbound::ServiceError;

/// Dispatches user actions into the application services.
///
/// One instance is shared by every screen; methods take `&self` and the
/// underlying services are cheap cloneable handles.
#[derive(Clone)]
pub struct UserIntents {
    services: Services,
}

impl UserIntents {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Instant, possibly stale companies for the first paint of the browse
    /// screen.
    pub fn cached_companies(&self) -> Vec<CompanySummary> {
        self.services.feed.load_cached().unwrap_or_default()
    }

    /// Fresh availability from the backend.
    pub async fn refresh_companies(&self) -> Result<Vec<CompanySummary>, ServiceError> {
        self.services.feed.refresh().await
    }

    /// "Start review" on a company card.
    pub async fn start_review(
        &self,
        company_id: CompanyId,
    ) -> Result<ReservationView, ServiceError> {
        self.services.lifecycle.start_reservation(company_id).await?;
        Ok(self.current_view())
    }

    /// "I posted my review" on the countdown screen; opens proof entry.
    pub async fn mark_review_posted(&self) -> Result<(), ServiceError> {
        self.services.lifecycle.confirm_review_posted().await
    }

    /// Back out of proof entry to the countdown.
    pub async fn return_to_countdown(&self) -> Result<(), ServiceError> {
        self.services.lifecycle.cancel_confirmation().await
    }

    /// Submit a link to the published review.
    pub async fn submit_review_link(&self, link: &str) -> Result<SubmitReceipt, ServiceError> {
        let proof = ProofRef::link(link)?;
        self.services.lifecycle.submit(proof).await
    }

    /// Submit the storage path of an already-uploaded screenshot.
    pub async fn submit_screenshot(
        &self,
        stored_path: &str,
    ) -> Result<SubmitReceipt, ServiceError> {
        let proof = ProofRef::upload(stored_path)?;
        self.services.lifecycle.submit(proof).await
    }

    /// "Give up" on the countdown screen.
    pub async fn give_up(&self) -> Result<(), ServiceError> {
        self.services.lifecycle.abandon().await
    }

    /// Current reservation state for rendering.
    pub fn current_view(&self) -> ReservationView {
        ReservationView::from_snapshot(&self.services.lifecycle.snapshot())
    }
}
