//! Credential hashing and verification (bcrypt).
//!
//! Both functions are CPU bound; async callers run them on the blocking pool.

/// Hash a plaintext password with the given bcrypt cost.
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, cost)
}

/// Check a plaintext candidate against a stored bcrypt hash.
///
/// A malformed stored hash never verifies.
pub fn verify_password(candidate: &str, stored_hash: &str) -> bool {
    bcrypt::verify(candidate, stored_hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COST: u32 = 4;

    #[test]
    fn test_password_hashing() {
        let hash = hash_password("TestPassword123!", COST).unwrap();

        assert_ne!(hash, "TestPassword123!");
        assert!(verify_password("TestPassword123!", &hash));
        assert!(!verify_password("WrongPassword", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same-password", COST).unwrap();
        let b = hash_password("same-password", COST).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_does_not_verify() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
        assert!(!verify_password("", ""));
    }
}
