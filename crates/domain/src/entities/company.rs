//! Company entities - the listings users review
//!
//! A company buys a package of paid review slots. The availability feed works
//! on the lightweight summary; the full entity backs the admin overview.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::CompanyId;

/// A feed row: a company with open review capacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummary {
    id: CompanyId,
    name: String,
    open_capacity: u32,
}

impl CompanySummary {
    pub fn new(id: CompanyId, name: impl Into<String>, open_capacity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            open_capacity,
        }
    }

    pub fn id(&self) -> CompanyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn open_capacity(&self) -> u32 {
        self.open_capacity
    }

    pub fn has_capacity(&self) -> bool {
        self.open_capacity > 0
    }
}

/// Where a listing stands against its purchased package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    /// Capacity still open for reservation
    Open,
    /// All slots taken, reviews not yet all approved
    Waiting,
    /// Package fulfilled
    Completed,
}

impl ListingStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Waiting => "WAITING",
            Self::Completed => "COMPLETED",
        }
    }
}

/// A registered company with its package progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    id: CompanyId,
    name: String,
    review_link: String,
    package_limit: u32,
    approved_count: u32,
    open_capacity: u32,
}

impl Company {
    pub fn new(
        id: CompanyId,
        name: impl Into<String>,
        review_link: impl Into<String>,
        package_limit: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            review_link: review_link.into(),
            package_limit,
            approved_count: 0,
            open_capacity: package_limit,
        }
    }

    // === Accessors ===

    pub fn id(&self) -> CompanyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn review_link(&self) -> &str {
        &self.review_link
    }

    pub fn package_limit(&self) -> u32 {
        self.package_limit
    }

    pub fn approved_count(&self) -> u32 {
        self.approved_count
    }

    pub fn open_capacity(&self) -> u32 {
        self.open_capacity
    }

    // === Builder Methods ===

    pub fn with_approved_count(mut self, approved_count: u32) -> Self {
        self.approved_count = approved_count;
        self
    }

    pub fn with_open_capacity(mut self, open_capacity: u32) -> Self {
        self.open_capacity = open_capacity;
        self
    }

    /// `(approved, purchased)` pair for progress display.
    pub fn progress(&self) -> (u32, u32) {
        (self.approved_count, self.package_limit)
    }

    pub fn is_completed(&self) -> bool {
        self.approved_count >= self.package_limit
    }

    pub fn listing_status(&self) -> ListingStatus {
        if self.is_completed() {
            ListingStatus::Completed
        } else if self.open_capacity == 0 {
            ListingStatus::Waiting
        } else {
            ListingStatus::Open
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("company name cannot be empty"));
        }
        if self.review_link.trim().is_empty() {
            return Err(DomainError::validation("company review link cannot be empty"));
        }
        if self.package_limit == 0 {
            return Err(DomainError::validation(
                "company package must include at least one slot",
            ));
        }
        Ok(())
    }
}
