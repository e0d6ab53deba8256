//! Review history service - the user's past and outstanding reviews.

use std::sync::Arc;

use commenter_domain::ReviewHistoryEntry;

use crate::ports::outbound::{AccountPort, ServiceError};

#[derive(Clone)]
pub struct ReviewHistoryService {
    account: Arc<dyn AccountPort>,
}

impl ReviewHistoryService {
    pub fn new(account: Arc<dyn AccountPort>) -> Self {
        Self { account }
    }

    /// All of the user's reviews, newest first.
    ///
    /// The backend already orders the view; sorting again here keeps the
    /// display stable if that ever changes.
    pub async fn list(&self) -> Result<Vec<ReviewHistoryEntry>, ServiceError> {
        let mut entries = self.account.list_my_reviews().await?;
        entries.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::MockAccountPort;
    use chrono::{Duration, TimeZone, Utc};
    use commenter_domain::{SlotId, SlotStatus};

    #[tokio::test]
    async fn test_history_is_sorted_newest_first() {
        let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).single().unwrap();
        let mut account = MockAccountPort::new();
        account.expect_list_my_reviews().times(1).returning(move || {
            Ok(vec![
                ReviewHistoryEntry::new(SlotId::new(), "Oldest", SlotStatus::Approved)
                    .with_created_at(t0),
                ReviewHistoryEntry::new(SlotId::new(), "Newest", SlotStatus::Submitted)
                    .with_created_at(t0 + Duration::days(2)),
                ReviewHistoryEntry::new(SlotId::new(), "Middle", SlotStatus::Rejected)
                    .with_created_at(t0 + Duration::days(1)),
            ])
        });

        let service = ReviewHistoryService::new(Arc::new(account));
        let entries = service.list().await.unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.company_name()).collect();
        assert_eq!(names, vec!["Newest", "Middle", "Oldest"]);
    }
}
