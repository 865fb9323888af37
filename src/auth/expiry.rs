use chrono::{DateTime, Duration, Utc};

/// Lifetime substituted when a provider reports a missing or non-positive
/// `expires_in`: roughly 100 years, so the token never trips the expiry
/// check. SoundCloud's `non-expiring` scope omits the field entirely.
pub const NON_EXPIRING_SECS: i64 = 3_153_600_000;

/// Absolute expiry for a token issued at `now` with the given relative
/// lifetime. Non-positive lifetimes get the non-expiring fallback, and
/// lifetimes beyond it are capped there: the provider controls this value,
/// and anything past ~100 years would overflow the date math.
pub fn expiry_from(now: DateTime<Utc>, lifetime_secs: i64) -> DateTime<Utc> {
    let secs = if lifetime_secs < 1 {
        NON_EXPIRING_SECS
    } else {
        lifetime_secs.min(NON_EXPIRING_SECS)
    };
    now + Duration::seconds(secs)
}

/// True iff `expires_at` is strictly before `now`. A token expiring exactly
/// at `now` is still usable.
pub fn is_expired_at(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    expires_at < now
}

pub fn expiry_from_now(lifetime_secs: i64) -> DateTime<Utc> {
    expiry_from(Utc::now(), lifetime_secs)
}

pub fn is_expired(expires_at: DateTime<Utc>) -> bool {
    is_expired_at(expires_at, Utc::now())
}
