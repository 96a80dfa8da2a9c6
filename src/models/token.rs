// Token record held by the session store.

/// One active session handed out by the token authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    pub token: String,
    /// Unix timestamp (seconds). The token is still valid during this second.
    pub expires_at: i64,
    pub uploader_slug: String,
}

impl TokenRecord {
    pub fn new(token: impl Into<String>, expires_at: i64, uploader_slug: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expires_at,
            uploader_slug: uploader_slug.into(),
        }
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        now > self.expires_at
    }
}

/// Current Unix time in whole seconds.
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_boundary() {
        let record = TokenRecord::new("tok", 1_000, "shaky");
        assert!(!record.is_expired_at(999));
        assert!(!record.is_expired_at(1_000), "valid through its expiry second");
        assert!(record.is_expired_at(1_001));
    }
}
