use serde::Deserialize;
use validator::Validate;

/// Request body for login. Emptiness is checked by the handler so that it
/// answers with a single message rather than per-field errors.
// No field rules: `Validate` is derived only so the body goes through `decode_body`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}
