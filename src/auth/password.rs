use bcrypt::{hash, verify, DEFAULT_COST};

/// Hash a plaintext password with a fresh salt. Two calls on the same
/// input produce different digests.
pub fn hash_password(plain: &str) -> Result<String, bcrypt::BcryptError> {
    hash(plain, DEFAULT_COST)
}

/// Check a plaintext password against a stored digest. Malformed digests
/// verify false instead of failing the request.
pub fn verify_password(plain: &str, digest: &str) -> bool {
    verify(plain, digest).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_round_trip() {
        let digest = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &digest));
        assert!(!verify_password("hunter3", &digest));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("same-password", &a));
        assert!(verify_password("same-password", &b));
    }

    #[test]
    fn malformed_digest_verifies_false() {
        assert!(!verify_password("anything", "not-a-bcrypt-digest"));
        assert!(!verify_password("anything", ""));
    }
}
