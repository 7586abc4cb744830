//! Registration, login and user lookup.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{User, validate_credentials};
use crate::error::{DomainError, RepoError};
use crate::ports::{PasswordService, TokenService, UserRepository};

/// A successful login: the user and a freshly issued session token.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub token: String,
}

/// Credential store: owns password hashing and token issuance for users.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Register a new user. The password is hashed here, before it reaches the store.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let username = username.trim();
        validate_credentials(username, password)?;

        if self.users.find_by_username(username).await?.is_some() {
            return Err(DomainError::Duplicate(format!(
                "Username '{username}' is already taken"
            )));
        }

        let password_hash = self.passwords.hash(password)?;
        let user = User::new(username.to_string(), password_hash);

        let saved = self.users.create(user).await.map_err(|e| match e {
            // Lost a race with a concurrent registration.
            RepoError::Constraint(_) => {
                DomainError::Duplicate(format!("Username '{username}' is already taken"))
            }
            other => other.into(),
        })?;

        tracing::info!(user_id = %saved.id, "User registered");
        Ok(saved)
    }

    /// Check credentials and issue a session token.
    ///
    /// Unknown usernames and wrong passwords fail the same way.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, DomainError> {
        let user = self
            .users
            .find_by_username(username.trim())
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        if !self.passwords.verify(password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(DomainError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id, &user.username)?;
        Ok(LoginOutcome { user, token })
    }

    pub async fn find_user(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.users.find_by_id(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{FakePasswords, FakeTokens, FakeUsers};

    fn service() -> AccountService {
        AccountService::new(
            Arc::new(FakeUsers::default()),
            Arc::new(FakePasswords),
            Arc::new(FakeTokens),
        )
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let accounts = service();

        let user = accounts.register("writer", "secret").await.unwrap();

        assert_eq!(user.username, "writer");
        assert_ne!(user.password_hash, "secret");
        assert_eq!(user.password_hash, "hashed:secret");
    }

    #[tokio::test]
    async fn test_register_same_username_twice_fails() {
        let accounts = service();
        accounts.register("writer", "secret").await.unwrap();

        let err = accounts.register("writer", "other-secret").await.unwrap_err();

        assert!(matches!(err, DomainError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_register_rejects_short_fields() {
        let accounts = service();

        assert!(matches!(
            accounts.register("abc", "secret").await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            accounts.register("writer", "abc").await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_register_trims_username_before_validation() {
        let accounts = service();

        let user = accounts.register("  writer  ", "secret").await.unwrap();
        assert_eq!(user.username, "writer");

        // Six characters with padding, two without.
        assert!(matches!(
            accounts.register("  ab  ", "secret").await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_login_issues_token_for_user() {
        let accounts = service();
        let user = accounts.register("writer", "secret").await.unwrap();

        let outcome = accounts.login("writer", "secret").await.unwrap();

        assert_eq!(outcome.user.id, user.id);
        assert_eq!(outcome.token, format!("tok:{}:writer", user.id));
    }

    #[tokio::test]
    async fn test_login_wrong_password_fails() {
        let accounts = service();
        accounts.register("writer", "secret").await.unwrap();

        let err = accounts.login("writer", "wrong").await.unwrap_err();

        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_unknown_user_fails() {
        let accounts = service();

        let err = accounts.login("nobody", "secret").await.unwrap_err();

        assert!(matches!(err, DomainError::InvalidCredentials));
    }
}
