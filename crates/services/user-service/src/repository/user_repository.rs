//! User repository contract and its SeaORM implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, SqlErr,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use domain::{DomainError, DomainResult, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Lookups return `None` for absent records; only `save` and `delete`
/// report a missing row as [`DomainError::NotFound`].
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// List all users in ascending id order
    async fn find_all(&self) -> DomainResult<Vec<User>>;

    /// Find user by ID
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<User>>;

    /// Find user by username
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    /// Check whether a user with this ID is stored
    async fn exists_by_id(&self, id: i64) -> DomainResult<bool>;

    /// Check whether any user holds this username
    async fn exists_by_username(&self, username: &str) -> DomainResult<bool>;

    /// Check whether any user holds this email
    async fn exists_by_email(&self, email: &str) -> DomainResult<bool>;

    /// Insert a transient user (assigning its id) or update a persisted one in place.
    ///
    /// Fails with [`DomainError::Duplicate`] if another record holds the
    /// username or email.
    async fn save(&self, user: User) -> DomainResult<User>;

    /// Remove a stored user
    async fn delete(&self, user: &User) -> DomainResult<()>;

    /// Check that the store is reachable
    async fn ping(&self) -> DomainResult<()>;
}

/// Concrete implementation of UserRepository backed by SeaORM
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Work out which unique field a rejected save collided on.
    async fn conflict_for(&self, user: &User) -> DomainError {
        match self.find_by_username(&user.username).await {
            Ok(Some(existing)) if existing.id != user.id => {
                DomainError::duplicate_username(&user.username)
            }
            Ok(_) => DomainError::duplicate_email(&user.email),
            Err(err) => err,
        }
    }
}

/// Store failures surface as unexpected errors
fn db_error(err: DbErr) -> DomainError {
    DomainError::unexpected(err.to_string())
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_all(&self) -> DomainResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(result.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(result.map(User::from))
    }

    async fn exists_by_id(&self, id: i64) -> DomainResult<bool> {
        let count = UserEntity::find()
            .filter(user::Column::Id.eq(id))
            .count(&self.db)
            .await
            .map_err(db_error)?;

        Ok(count > 0)
    }

    async fn exists_by_username(&self, username: &str) -> DomainResult<bool> {
        let count = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .count(&self.db)
            .await
            .map_err(db_error)?;

        Ok(count > 0)
    }

    async fn exists_by_email(&self, email: &str) -> DomainResult<bool> {
        let count = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.db)
            .await
            .map_err(db_error)?;

        Ok(count > 0)
    }

    async fn save(&self, user: User) -> DomainResult<User> {
        let active = ActiveModel::from(&user);

        let result = match user.id {
            None => active.insert(&self.db).await,
            Some(_) => active.update(&self.db).await,
        };

        match result {
            Ok(model) => Ok(User::from(model)),
            Err(DbErr::RecordNotUpdated) => match user.id {
                Some(id) => Err(DomainError::not_found(id)),
                None => Err(DomainError::unexpected("insert affected no rows")),
            },
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(self.conflict_for(&user).await)
            }
            Err(err) => Err(db_error(err)),
        }
    }

    async fn delete(&self, user: &User) -> DomainResult<()> {
        // A transient record was never stored
        let Some(id) = user.id else {
            return Ok(());
        };

        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error)?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found(id));
        }

        Ok(())
    }

    async fn ping(&self) -> DomainResult<()> {
        crate::infra::ping(&self.db).await.map_err(db_error)
    }
}
