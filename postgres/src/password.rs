//! Password hashing for stored accounts.
//!
//! Hashes are argon2 PHC strings (`$argon2id$v=19$...`) carrying their own
//! salt and cost parameters, so verification needs only the stored value.

use rand::RngCore;

const SALT_LEN: usize = 16;

/// Hash `password` with argon2 and a fresh random salt.
///
/// # Errors
///
/// Returns [`argon2::Error`] if the hasher rejects its parameters.
pub fn hash_password(password: &str) -> Result<String, argon2::Error> {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let config = argon2::Config {
        variant: argon2::Variant::Argon2id,
        ..argon2::Config::default()
    };
    argon2::hash_encoded(password.as_bytes(), &salt, &config)
}

/// Check `password` against a value produced by [`hash_password`].
///
/// Malformed stored values never verify.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    argon2::verify_encoded(stored, password.as_bytes()).unwrap_or(false)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_original_password() {
        let stored = hash_password("Str0ng_pass").unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(!stored.contains("Str0ng_pass"));
        assert!(verify_password("Str0ng_pass", &stored));
        assert!(!verify_password("Str0ng_pasS", &stored));
    }

    #[test]
    fn salts_differ_between_hashes() {
        assert_ne!(
            hash_password("Str0ng_pass").unwrap(),
            hash_password("Str0ng_pass").unwrap()
        );
    }

    #[test]
    fn fast_digests_are_not_accepted() {
        // Salted SHA-256 values must never pass as stored hashes.
        for stored in [
            "",
            "sha256",
            "sha256$c2FsdHNhbHRzYWx0c2FsdA==$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=",
            "$argon2id$v=19$m=19456,t=2,p=1$%%%$BBBB",
        ] {
            assert!(!verify_password("Str0ng_pass", stored), "{stored}");
        }
    }
}
