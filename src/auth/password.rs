use anyhow::Context;
use tracing::{error, warn};

/// bcrypt work factor used unless `BCRYPT_COST` overrides it.
pub const HASH_COST: u32 = 14;

pub fn hash_password(plain: &str, cost: u32) -> anyhow::Result<String> {
    bcrypt::hash(plain, cost).map_err(|e| {
        error!(error = %e, "bcrypt hash error");
        anyhow::anyhow!(e.to_string())
    })
}

/// Returns `true` iff `plain` matches `hash`. A stored hash that cannot be
/// parsed counts as a mismatch.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    match bcrypt::verify(plain, hash) {
        Ok(ok) => ok,
        Err(e) => {
            warn!(error = %e, "bcrypt verify on malformed hash");
            false
        }
    }
}

/// Runs [`hash_password`] on the blocking pool; at cost 14 a hash takes long
/// enough to stall a runtime worker.
pub async fn hash_password_blocking(plain: String, cost: u32) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&plain, cost))
        .await
        .context("hash task failed")?
}

pub async fn verify_password_blocking(plain: String, hash: String) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&plain, &hash))
        .await
        .context("verify task failed")
}
