//! User service - Handles user-related business logic.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use domain::{timestamp_now, DomainError, DomainResult, User, UserDetails};

use crate::repository::UserRepository;

/// User service trait for dependency injection.
///
/// Lookups report absence as `None`; mutations report a missing record as
/// [`DomainError::NotFound`] and a taken username or email as
/// [`DomainError::Duplicate`].
#[async_trait]
pub trait UserService: Send + Sync {
    /// List all users in ascending id order
    async fn list_users(&self) -> DomainResult<Vec<User>>;

    /// Get user by ID
    async fn get_user_by_id(&self, id: i64) -> DomainResult<Option<User>>;

    /// Get user by username
    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>>;

    /// Get user by email
    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    /// Check whether a user with this ID exists
    async fn user_exists(&self, id: i64) -> DomainResult<bool>;

    /// Create a new user. Any id preset on the candidate is discarded.
    async fn create_user(&self, candidate: User) -> DomainResult<User>;

    /// Replace the mutable fields of an existing user
    async fn update_user(&self, id: i64, details: UserDetails) -> DomainResult<User>;

    /// Delete user by ID
    async fn delete_user(&self, id: i64) -> DomainResult<()>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
    // Held across the uniqueness checks and the save of create/update
    write_lock: Mutex<()>,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self {
            repo,
            write_lock: Mutex::new(()),
        }
    }

    async fn ensure_username_free(&self, username: &str) -> DomainResult<()> {
        if self.repo.exists_by_username(username).await? {
            warn!(username, "Username already taken");
            return Err(DomainError::duplicate_username(username));
        }
        Ok(())
    }

    async fn ensure_email_free(&self, email: &str) -> DomainResult<()> {
        if self.repo.exists_by_email(email).await? {
            warn!(email, "Email already taken");
            return Err(DomainError::duplicate_email(email));
        }
        Ok(())
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn list_users(&self) -> DomainResult<Vec<User>> {
        self.repo.find_all().await
    }

    async fn get_user_by_id(&self, id: i64) -> DomainResult<Option<User>> {
        self.repo.find_by_id(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        self.repo.find_by_username(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        self.repo.find_by_email(email).await
    }

    async fn user_exists(&self, id: i64) -> DomainResult<bool> {
        self.repo.exists_by_id(id).await
    }

    async fn create_user(&self, mut candidate: User) -> DomainResult<User> {
        let _guard = self.write_lock.lock().await;

        self.ensure_username_free(&candidate.username).await?;
        self.ensure_email_free(&candidate.email).await?;

        let now = timestamp_now();
        candidate.id = None;
        candidate.created_at = now;
        candidate.updated_at = now;

        let user = self.repo.save(candidate).await?;
        info!(id = ?user.id, username = %user.username, "User created");
        Ok(user)
    }

    async fn update_user(&self, id: i64, details: UserDetails) -> DomainResult<User> {
        let _guard = self.write_lock.lock().await;

        let Some(mut user) = self.repo.find_by_id(id).await? else {
            warn!(id, "Update of unknown user");
            return Err(DomainError::not_found(id));
        };

        if details.username != user.username {
            self.ensure_username_free(&details.username).await?;
        }
        if details.email != user.email {
            self.ensure_email_free(&details.email).await?;
        }

        user.apply(details);
        let user = self.repo.save(user).await?;
        info!(id, username = %user.username, "User updated");
        Ok(user)
    }

    async fn delete_user(&self, id: i64) -> DomainResult<()> {
        let Some(user) = self.repo.find_by_id(id).await? else {
            warn!(id, "Delete of unknown user");
            return Err(DomainError::not_found(id));
        };

        self.repo.delete(&user).await?;
        info!(id, "User deleted");
        Ok(())
    }
}
