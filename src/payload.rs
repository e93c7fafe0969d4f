use axum::Json;
use serde::de::DeserializeOwned;
use tracing::warn;
use validator::{Validate, ValidationErrors};

use crate::error::ApiError;

/// Decodes a JSON body and applies its field rules.
///
/// Handlers take the raw body instead of `Json<T>` so decoding can happen
/// after an existence check (update) rather than before the handler runs.
pub fn decode_body<T>(body: &[u8]) -> Result<T, ApiError>
where
    T: DeserializeOwned + Validate,
{
    let Json(payload) = Json::<T>::from_bytes(body).map_err(|rejection| {
        let msg = rejection.body_text();
        warn!(error = %msg, "malformed payload");
        ApiError::Malformed(msg)
    })?;

    payload.validate().map_err(|errors| {
        let messages = validation_messages(&errors);
        warn!(?messages, "payload failed validation");
        ApiError::Invalid(messages)
    })?;

    Ok(payload)
}

/// One `Error validate <field>, condition: <rule>` line per failed rule,
/// sorted so responses are stable.
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter()
                .map(move |e| format!("Error validate {}, condition: {}", field, e.code))
        })
        .collect();
    messages.sort();
    messages
}
