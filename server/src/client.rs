//! Ticket holder side: turn a seed into the code shown at the gate.

use chrono::{DateTime, Utc};
use gatepass_core::{Seed, SeedError, Totp, TotpConfig};

/// Code displayed for `seed_base64` at `at`.
///
/// # Errors
///
/// Returns [`SeedError`] if the seed is empty or not valid base64.
pub fn code_at(seed_base64: &str, config: TotpConfig, at: DateTime<Utc>) -> Result<String, SeedError> {
    Ok(Totp::from_seed(&Seed::new(seed_base64), config)?.generate(at))
}
