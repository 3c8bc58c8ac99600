//! Token validation: a narrow external collaborator, used by
//! the connection hub to authenticate inbound connections and reject
//! invalid tokens.

use async_trait::async_trait;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenValidator: Send + Sync {
    /// Resolves a bearer token to the user id it authenticates, or
    /// `Err(Unauthorized)` if invalid or expired.
    async fn validate(&self, token: &str) -> crate::error::Result<Uuid>;
}

/// Fixed-map validator, used for tests and local development.
pub struct StaticTokenValidator {
    tokens: std::collections::HashMap<String, Uuid>,
}

impl StaticTokenValidator {
    pub fn new(tokens: std::collections::HashMap<String, Uuid>) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl TokenValidator for StaticTokenValidator {
    async fn validate(&self, token: &str) -> crate::error::Result<Uuid> {
        self.tokens
            .get(token)
            .copied()
            .ok_or(crate::error::DraftCoreError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_token_is_unauthorized() {
        let validator = StaticTokenValidator::new(Default::default());
        let err = validator.validate("nope").await.unwrap_err();
        assert!(matches!(err, crate::error::DraftCoreError::Unauthorized));
    }

    #[tokio::test]
    async fn known_token_resolves_user() {
        let user = Uuid::new_v4();
        let mut tokens = std::collections::HashMap::new();
        tokens.insert("tok".to_string(), user);
        let validator = StaticTokenValidator::new(tokens);
        assert_eq!(validator.validate("tok").await.unwrap(), user);
    }

    #[tokio::test]
    async fn mocked_validator_controls_the_resolved_user() {
        let user = Uuid::new_v4();
        let mut mock = MockTokenValidator::new();
        mock.expect_validate()
            .withf(|token| token == "session-token")
            .returning(move |_| Ok(user));

        assert_eq!(mock.validate("session-token").await.unwrap(), user);
    }

    #[tokio::test]
    async fn mocked_validator_can_simulate_rejection() {
        let mut mock = MockTokenValidator::new();
        mock.expect_validate()
            .returning(|_| Err(crate::error::DraftCoreError::Unauthorized));

        let err = mock.validate("anything").await.unwrap_err();
        assert!(matches!(err, crate::error::DraftCoreError::Unauthorized));
    }
}
