//! In-memory user store for development and testing.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::UserRepository;
use domain::{DomainError, DomainResult, User};

/// In-memory user store.
///
/// Uniqueness of username and email is checked under the write lock, so the
/// store never holds two records sharing either value.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    state: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    users: BTreeMap<i64, User>,
    last_id: i64,
}

impl MemoryState {
    /// Reject `user` if another stored record holds its username or email.
    fn check_unique(&self, user: &User) -> DomainResult<()> {
        let others = || self.users.values().filter(|u| u.id != user.id);

        if others().any(|u| u.username == user.username) {
            return Err(DomainError::duplicate_username(&user.username));
        }
        if others().any(|u| u.email == user.email) {
            return Err(DomainError::duplicate_email(&user.email));
        }
        Ok(())
    }
}

impl InMemoryUserStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn find_all(&self) -> DomainResult<Vec<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn exists_by_id(&self, id: i64) -> DomainResult<bool> {
        let state = self.state.read().await;
        Ok(state.users.contains_key(&id))
    }

    async fn exists_by_username(&self, username: &str) -> DomainResult<bool> {
        let state = self.state.read().await;
        Ok(state.users.values().any(|u| u.username == username))
    }

    async fn exists_by_email(&self, email: &str) -> DomainResult<bool> {
        let state = self.state.read().await;
        Ok(state.users.values().any(|u| u.email == email))
    }

    async fn save(&self, mut user: User) -> DomainResult<User> {
        let mut state = self.state.write().await;
        state.check_unique(&user)?;

        let id = match user.id {
            Some(id) => {
                if !state.users.contains_key(&id) {
                    return Err(DomainError::not_found(id));
                }
                id
            }
            None => {
                state.last_id += 1;
                state.last_id
            }
        };

        user.id = Some(id);
        state.users.insert(id, user.clone());
        Ok(user)
    }

    async fn delete(&self, user: &User) -> DomainResult<()> {
        let Some(id) = user.id else {
            return Ok(());
        };

        let mut state = self.state.write().await;
        if state.users.remove(&id).is_none() {
            return Err(DomainError::not_found(id));
        }
        Ok(())
    }

    async fn ping(&self) -> DomainResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_assigns_sequential_ids() {
        let store = InMemoryUserStore::new();

        let first = store
            .save(User::new("alice", "a@x.com", "Alice", "A"))
            .await
            .unwrap();
        let second = store
            .save(User::new("bob", "b@x.com", "Bob", "B"))
            .await
            .unwrap();

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert_eq!(store.find_all().await.unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn test_save_rejects_duplicates() {
        let store = InMemoryUserStore::new();
        store
            .save(User::new("alice", "a@x.com", "Alice", "A"))
            .await
            .unwrap();

        let err = store
            .save(User::new("alice", "other@x.com", "Alice", "A"))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::duplicate_username("alice"));

        let err = store
            .save(User::new("other", "a@x.com", "Alice", "A"))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::duplicate_email("a@x.com"));
    }

    #[tokio::test]
    async fn test_update_in_place_keeps_own_values() {
        let store = InMemoryUserStore::new();
        let mut user = store
            .save(User::new("alice", "a@x.com", "Alice", "A"))
            .await
            .unwrap();

        user.first_name = "Alicia".to_string();
        let updated = store.save(user).await.unwrap();

        assert_eq!(updated.id, Some(1));
        assert_eq!(store.find_all().await.unwrap().len(), 1);
        assert_eq!(
            store.find_by_id(1).await.unwrap().unwrap().first_name,
            "Alicia"
        );
    }

    #[tokio::test]
    async fn test_save_unknown_id_is_not_found() {
        let store = InMemoryUserStore::new();
        let mut user = User::new("ghost", "g@x.com", "G", "H");
        user.id = Some(42);

        assert_eq!(store.save(user).await.unwrap_err(), DomainError::not_found(42));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemoryUserStore::new();
        let user = store
            .save(User::new("alice", "a@x.com", "Alice", "A"))
            .await
            .unwrap();

        store.delete(&user).await.unwrap();

        assert!(!store.exists_by_id(1).await.unwrap());
        assert!(store.find_by_username("alice").await.unwrap().is_none());
        assert_eq!(store.delete(&user).await.unwrap_err(), DomainError::not_found(1));
    }
}
