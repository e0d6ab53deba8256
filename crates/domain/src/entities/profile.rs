//! User profile - payout details and contact
//!
//! Registering a PIX key is the precondition for withdrawals; the server
//! enforces it, the client only mirrors the check for form affordances.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Kind of PIX key the payout goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixKind {
    Cpf,
    Email,
    Phone,
    Random,
    /// Unknown kind for forward compatibility
    #[serde(other)]
    Unknown,
}

impl PixKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Cpf => "CPF",
            Self::Email => "E-mail",
            Self::Phone => "Phone",
            Self::Random => "Random key",
            Self::Unknown => "Unknown",
        }
    }
}

/// The current user's editable profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    name: String,
    pix_key: Option<String>,
    pix_kind: Option<PixKind>,
    whatsapp: Option<String>,
}

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pix_key: None,
            pix_kind: None,
            whatsapp: None,
        }
    }

    // === Accessors ===

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pix_key(&self) -> Option<&str> {
        self.pix_key.as_deref()
    }

    pub fn pix_kind(&self) -> Option<PixKind> {
        self.pix_kind
    }

    pub fn whatsapp(&self) -> Option<&str> {
        self.whatsapp.as_deref()
    }

    // === Builder Methods ===

    pub fn with_pix(mut self, key: impl Into<String>, kind: PixKind) -> Self {
        self.pix_key = Some(key.into());
        self.pix_kind = Some(kind);
        self
    }

    pub fn with_whatsapp(mut self, whatsapp: impl Into<String>) -> Self {
        self.whatsapp = Some(whatsapp.into());
        self
    }

    /// Whether withdrawals can be requested for this profile.
    pub fn has_payout_details(&self) -> bool {
        self.pix_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("profile name cannot be empty"));
        }
        if let Some(key) = &self.pix_key {
            if key.trim().is_empty() {
                return Err(DomainError::validation("PIX key cannot be blank"));
            }
        }
        Ok(())
    }
}
