//! Raw REST transport port.
//!
//! Object-safe, JSON-level boundary to the hosted backend. Typed adapters
//! (`SlotApi`, `AccountApi`, `AdminApi`) sit on top of this and own the
//! row/param types; this trait only moves `serde_json::Value`s and maps
//! transport failures into [`ServiceError`].

use async_trait::async_trait;
use serde_json::Value;

use super::service_error::ServiceError;

/// Raw backend access: view reads and stored-procedure calls.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait RestApiPort: Send + Sync {
    /// GET a view path (including any query string); returns the JSON body,
    /// which for row selects is always an array.
    async fn get_json(&self, path: &str) -> Result<Value, ServiceError>;

    /// POST a stored-procedure call and return its JSON result.
    async fn post_rpc(&self, function: &str, params: Value) -> Result<Value, ServiceError>;

    /// POST a stored-procedure call whose result body is ignored.
    ///
    /// Used for void functions; an empty or `null` body is success.
    async fn post_rpc_no_response(
        &self,
        function: &str,
        params: Value,
    ) -> Result<(), ServiceError>;
}
