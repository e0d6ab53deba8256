//! HTTP adapters for the hosted backend's REST surface
//!
//! [`RestClient`] owns the transport (auth headers, error body decoding);
//! the per-concern adapters ([`SlotApi`], [`AccountApi`], [`AdminApi`])
//! build paths and payloads on top of the [`RestApiPort`] it implements,
//! which keeps them testable against a mocked transport.

pub mod account_api;
pub mod admin_api;
pub mod client;
pub mod slot_api;

pub use account_api::AccountApi;
pub use admin_api::AdminApi;
pub use client::{RestClient, DEFAULT_API_BASE_URL};
pub use slot_api::SlotApi;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::ports::outbound::{RestApiPort, ServiceError};

/// Decode a REST select response, which is always a JSON array of rows.
fn decode_rows<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, ServiceError> {
    serde_json::from_value(value)
        .map_err(|err| ServiceError::Parse(format!("unexpected rows shape: {err}")))
}

/// Decode a stored-procedure response that carries a single record.
///
/// Depending on the function's return type the backend answers with either
/// the record itself or a one-element array around it.
fn decode_record<T: DeserializeOwned>(value: Value) -> Result<T, ServiceError> {
    let inner = match value {
        Value::Array(mut items) if !items.is_empty() => items.remove(0),
        other => other,
    };
    serde_json::from_value(inner)
        .map_err(|err| ServiceError::Parse(format!("unexpected record shape: {err}")))
}

/// Serialize a stored-procedure parameter struct into the request body.
fn encode_params<T: Serialize>(params: &T) -> Result<Value, ServiceError> {
    serde_json::to_value(params).map_err(|err| ServiceError::Parse(err.to_string()))
}
