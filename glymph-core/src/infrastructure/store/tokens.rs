use super::{Store, StoreError};

impl Store {
    /// Record a token id as spent. Returns `false` when it already was, so
    /// exactly one of several concurrent callers wins.
    pub async fn revoke_token(&self, jti: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("INSERT OR IGNORE INTO revoked_tokens (jti) VALUES (?)")
            .bind(jti)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    pub async fn is_token_revoked(&self, jti: &str) -> Result<bool, StoreError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT jti FROM revoked_tokens WHERE jti = ?")
            .bind(jti)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn a_token_is_spent_once() {
        let store = Store::in_memory().await.unwrap();

        assert!(store.revoke_token("jti-1").await.unwrap());
        assert!(!store.revoke_token("jti-1").await.unwrap());
        assert!(store.is_token_revoked("jti-1").await.unwrap());
        assert!(!store.is_token_revoked("jti-2").await.unwrap());
    }
}
