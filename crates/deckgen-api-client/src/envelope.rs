//! Response-shape normalization.
//!
//! The API gateway answers in one of two shapes: the target JSON object
//! directly, or a Lambda proxy envelope `{"statusCode": …, "body": "<json
//! string>"}` whose `body` is a JSON-encoded string of the target object.
//! Every call site goes through [`decode_body`] instead of guessing.

use deckgen_core::AppError;
use serde::de::DeserializeOwned;

/// Which of the two wire shapes a response arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// The response body was the target object itself.
    Direct,
    /// The target object was JSON-encoded inside an envelope's `body` field.
    Enveloped,
}

/// Decode a response body in either wire shape into `T`.
pub fn decode_body<T: DeserializeOwned>(raw: &str) -> Result<(T, ResponseShape), AppError> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|err| AppError::InvalidInput(format!("Response is not JSON: {}", err)))?;

    if let Some(inner) = value.get("body").and_then(|body| body.as_str()) {
        let decoded = serde_json::from_str(inner).map_err(|err| {
            AppError::InvalidInput(format!("Enveloped response body is not valid: {}", err))
        })?;
        return Ok((decoded, ResponseShape::Enveloped));
    }

    let decoded = serde_json::from_value(value)
        .map_err(|err| AppError::InvalidInput(format!("Response body is not valid: {}", err)))?;
    Ok((decoded, ResponseShape::Direct))
}
