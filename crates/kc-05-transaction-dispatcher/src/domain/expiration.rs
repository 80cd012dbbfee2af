//! Request expiration window.

use crate::domain::errors::DispatchError;

/// Farthest accepted expiration, relative to the transaction timestamp.
pub const MAX_EXPIRATION_AHEAD_MS: i64 = 365 * 24 * 60 * 60 * 1000;

/// Accept `expires_at` only inside `(now, now + 1 year]`. No timestamp means
/// no check.
pub fn check_expiration(expires_at: Option<i64>, now_ms: i64) -> Result<(), DispatchError> {
    let Some(expires_at) = expires_at else {
        return Ok(());
    };
    if expires_at <= now_ms {
        return Err(DispatchError::Expired {
            expires_at,
            now: now_ms,
        });
    }
    if expires_at > now_ms.saturating_add(MAX_EXPIRATION_AHEAD_MS) {
        return Err(DispatchError::ExpirationTooFar {
            expires_at,
            now: now_ms,
        });
    }
    Ok(())
}
