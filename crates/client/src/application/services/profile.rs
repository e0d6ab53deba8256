//! Profile service - name, PIX payout key, and contact details.

use std::sync::Arc;

use commenter_domain::Profile;

use crate::ports::outbound::{AccountPort, ServiceError};

#[derive(Clone)]
pub struct ProfileService {
    account: Arc<dyn AccountPort>,
}

impl ProfileService {
    pub fn new(account: Arc<dyn AccountPort>) -> Self {
        Self { account }
    }

    pub async fn fetch(&self) -> Result<Profile, ServiceError> {
        self.account.fetch_profile().await
    }

    /// Save the profile, validating locally before any network traffic.
    pub async fn update(&self, profile: Profile) -> Result<(), ServiceError> {
        profile.validate()?;
        self.account.update_profile(profile).await?;
        tracing::info!("profile updated");
        Ok(())
    }
}
