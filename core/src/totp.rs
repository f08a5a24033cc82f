//! Time-based one-time codes derived from ticket seeds.
//!
//! Code derivation itself is delegated to `totp-lite` (HMAC-SHA1, RFC 6238).
//! This module fixes how the engine uses it: the seed encoding, the time step,
//! the number of digits, and how many neighbouring steps verification accepts.

use crate::seed::{Seed, SeedError, TotpSecret};
use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use thiserror::Error;

/// Default time step in seconds.
pub const DEFAULT_STEP_SECONDS: u64 = 60;

/// Default code length.
pub const DEFAULT_DIGITS: u32 = 6;

/// Default verification window: the current step only.
pub const DEFAULT_WINDOW: u64 = 0;

/// Largest accepted verification window.
pub const MAX_WINDOW: u64 = 2;

/// Accepted code lengths.
pub const DIGITS_RANGE: RangeInclusive<u32> = 6..=8;

/// Rejected TOTP parameters.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TotpConfigError {
    /// Time step of zero seconds.
    #[error("TOTP step must be at least one second")]
    ZeroStep,

    /// Code length outside [`DIGITS_RANGE`].
    #[error("TOTP codes must have 6 to 8 digits, got {0}")]
    Digits(u32),

    /// Window wider than [`MAX_WINDOW`].
    #[error("TOTP window must be at most 2, got {0}")]
    Window(u64),
}

/// TOTP parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotpConfig {
    /// Seconds during which one code is valid.
    pub step_seconds: u64,
    /// Number of decimal digits per code.
    pub digits: u32,
    /// Adjacent steps accepted on each side of the current one.
    ///
    /// `0` means exact match only. Raising it tolerates clock drift at the
    /// cost of a longer replay window.
    pub window: u64,
}

impl Default for TotpConfig {
    fn default() -> Self {
        Self {
            step_seconds: DEFAULT_STEP_SECONDS,
            digits: DEFAULT_DIGITS,
            window: DEFAULT_WINDOW,
        }
    }
}

impl TotpConfig {
    /// Build a checked configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TotpConfigError`] if `step_seconds` is zero, `digits` is
    /// outside [`DIGITS_RANGE`], or `window` exceeds [`MAX_WINDOW`].
    pub fn new(step_seconds: u64, digits: u32, window: u64) -> Result<Self, TotpConfigError> {
        if step_seconds == 0 {
            return Err(TotpConfigError::ZeroStep);
        }
        if !DIGITS_RANGE.contains(&digits) {
            return Err(TotpConfigError::Digits(digits));
        }
        if window > MAX_WINDOW {
            return Err(TotpConfigError::Window(window));
        }
        Ok(Self {
            step_seconds,
            digits,
            window,
        })
    }

    /// Override the verification window, capped at [`MAX_WINDOW`].
    #[must_use]
    pub const fn with_window(mut self, window: u64) -> Self {
        self.window = if window > MAX_WINDOW { MAX_WINDOW } else { window };
        self
    }

    /// Copy with out-of-range fields replaced: zero step and bad digits fall
    /// back to the defaults, the window is capped at [`MAX_WINDOW`].
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            step_seconds: if self.step_seconds == 0 {
                DEFAULT_STEP_SECONDS
            } else {
                self.step_seconds
            },
            digits: if DIGITS_RANGE.contains(&self.digits) {
                self.digits
            } else {
                DEFAULT_DIGITS
            },
            window: self.window.min(MAX_WINDOW),
        }
    }
}

/// Code generator/verifier bound to one secret.
#[derive(Clone)]
pub struct Totp {
    secret: Vec<u8>,
    config: TotpConfig,
}

impl Totp {
    /// Build from a base32 secret.
    ///
    /// Out-of-range parameters are normalized, see [`TotpConfig::normalized`].
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::InvalidBase32`] if the secret does not decode.
    pub fn new(secret: &TotpSecret, config: TotpConfig) -> Result<Self, SeedError> {
        Ok(Self {
            secret: secret.to_bytes()?,
            config: config.normalized(),
        })
    }

    /// Build from a stored ticket seed.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError`] if the seed is empty or not valid base64.
    pub fn from_seed(seed: &Seed, config: TotpConfig) -> Result<Self, SeedError> {
        Self::new(&seed.to_totp_secret()?, config)
    }

    /// Parameters in use.
    #[must_use]
    pub const fn config(&self) -> TotpConfig {
        self.config
    }

    /// Index of the time step containing `at`.
    #[must_use]
    pub fn time_step(&self, at: DateTime<Utc>) -> u64 {
        unix_seconds(at) / self.config.step_seconds
    }

    /// Code valid during the step containing `at`.
    #[must_use]
    pub fn generate(&self, at: DateTime<Utc>) -> String {
        self.code_for_step(self.time_step(at))
    }

    /// Check `code` against the step containing `at`, plus `window` steps on
    /// either side.
    #[must_use]
    pub fn verify(&self, code: &str, at: DateTime<Utc>) -> bool {
        let code = code.trim();
        let current = self.time_step(at);
        let earliest = current.saturating_sub(self.config.window);
        let latest = current.saturating_add(self.config.window);

        // Every candidate is compared so timing does not reveal which step matched.
        let mut matched = false;
        for step in earliest..=latest {
            let expected = self.code_for_step(step);
            matched |= constant_time_eq(expected.as_bytes(), code.as_bytes());
        }
        matched
    }

    fn code_for_step(&self, step: u64) -> String {
        let step_seconds = self.config.step_seconds;
        totp_lite::totp_custom::<totp_lite::Sha1>(
            step_seconds,
            self.config.digits,
            &self.secret,
            step.saturating_mul(step_seconds),
        )
    }
}

impl fmt::Debug for Totp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Totp")
            .field("secret", &"<redacted>")
            .field("config", &self.config)
            .finish()
    }
}

fn unix_seconds(at: DateTime<Utc>) -> u64 {
    u64::try_from(at.timestamp()).unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Tests use unwrap on known-good fixtures
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn hello_totp(window: u64) -> Totp {
        Totp::from_seed(&Seed::new("SGVsbG8h"), TotpConfig::default().with_window(window)).unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn rfc6238_sha1_vector() {
        let secret = TotpSecret::from_base32("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ").unwrap();
        let config = TotpConfig {
            step_seconds: 30,
            digits: 8,
            window: 0,
        };
        let totp = Totp::new(&secret, config).unwrap();
        assert_eq!(totp.generate(at(59)), "94287082");
    }

    #[test]
    fn sixty_second_step_codes() {
        let totp = hello_totp(0);
        assert_eq!(totp.generate(at(1_735_689_600)), "707088");
        assert_eq!(totp.generate(at(1_735_689_659)), "707088");
        assert_eq!(totp.generate(at(1_735_689_660)), "670452");
    }

    #[test]
    fn window_zero_rejects_next_step() {
        let totp = hello_totp(0);
        let code = totp.generate(at(1_735_689_600));
        assert!(totp.verify(&code, at(1_735_689_659)));
        assert!(!totp.verify(&code, at(1_735_689_660)));
        assert!(!totp.verify(&code, at(1_735_689_599)));
    }

    #[test]
    fn window_one_tolerates_adjacent_steps() {
        let totp = hello_totp(1);
        let code = totp.generate(at(1_735_689_600));
        assert!(totp.verify(&code, at(1_735_689_660)));
        assert!(totp.verify(&code, at(1_735_689_540)));
        assert!(!totp.verify(&code, at(1_735_689_720)));
    }

    #[test]
    fn checked_config_rejects_out_of_range_values() {
        assert_eq!(TotpConfig::new(60, 6, 0), Ok(TotpConfig::default()));
        assert_eq!(TotpConfig::new(0, 6, 0), Err(TotpConfigError::ZeroStep));
        assert_eq!(TotpConfig::new(60, 20, 0), Err(TotpConfigError::Digits(20)));
        assert_eq!(TotpConfig::new(60, 5, 0), Err(TotpConfigError::Digits(5)));
        assert_eq!(
            TotpConfig::new(60, 6, 1_000_000),
            Err(TotpConfigError::Window(1_000_000))
        );
    }

    #[test]
    fn wide_window_is_capped() {
        let config = TotpConfig::default().with_window(1_000_000);
        assert_eq!(config.window, MAX_WINDOW);

        let unchecked = TotpConfig {
            window: u64::MAX,
            ..TotpConfig::default()
        };
        let totp = Totp::from_seed(&Seed::new("SGVsbG8h"), unchecked).unwrap();
        assert_eq!(totp.config().window, MAX_WINDOW);
        let code = totp.generate(at(1_735_689_600));
        assert!(totp.verify(&code, at(1_735_689_600 + 120)));
        assert!(!totp.verify(&code, at(1_735_689_600 + 180)));
    }

    #[test]
    fn unchecked_digits_do_not_panic() {
        let config = TotpConfig {
            step_seconds: 60,
            digits: 20,
            window: 0,
        };
        let totp = Totp::from_seed(&Seed::new("SGVsbG8h"), config).unwrap();
        assert_eq!(totp.config().digits, DEFAULT_DIGITS);
        assert_eq!(totp.generate(at(1_735_689_600)), "707088");
    }

    #[test]
    fn surrounding_whitespace_is_ignored_but_other_text_is_not() {
        let totp = hello_totp(0);
        assert!(totp.verify(" 707088\n", at(1_735_689_600)));
        assert!(!totp.verify("70708", at(1_735_689_600)));
        assert!(!totp.verify("", at(1_735_689_600)));
    }
}
