use crate::error::AppError;

/// One-way hash for a new credential. The plaintext is never persisted.
pub fn hash_password(plain: &str) -> Result<String, AppError> {
    bcrypt::hash(plain, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
}

/// Constant-time credential check (inside the bcrypt verify routine).
/// A malformed stored hash counts as a mismatch.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    bcrypt::verify(plain, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    // low cost keeps the tests fast; production uses DEFAULT_COST
    fn quick_hash(plain: &str) -> String {
        bcrypt::hash(plain, 4).unwrap()
    }

    #[test]
    fn test_verify_matches_own_hash() {
        let hash = quick_hash("hunter2");
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
        assert!(!verify_password("", &hash));
    }

    #[test]
    fn test_hash_is_salted() {
        assert_ne!(quick_hash("hunter2"), quick_hash("hunter2"));
    }

    #[test]
    fn test_malformed_hash_is_mismatch() {
        assert!(!verify_password("hunter2", "not-a-bcrypt-hash"));
    }
}
