//! User service tests over the in-memory store.

use std::sync::Arc;

use domain::{DomainError, User, UserDetails};
use user_service_lib::repository::InMemoryUserStore;
use user_service_lib::service::{UserManager, UserService};

fn service() -> Arc<UserManager> {
    Arc::new(UserManager::new(Arc::new(InMemoryUserStore::new())))
}

#[tokio::test]
async fn test_alice_lifecycle() {
    let service = service();

    let alice = service
        .create_user(User::new("alice", "a@x.com", "Alice", "Liddell"))
        .await
        .unwrap();
    assert_eq!(alice.id, Some(1));

    let err = service
        .create_user(User::new("alice", "b@y.com", "Alice", "Other"))
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::duplicate_username("alice"));

    let updated = service
        .update_user(1, UserDetails::new("alice2", "a@x.com", "Alice", "Liddell"))
        .await
        .unwrap();
    assert_eq!(updated.username, "alice2");
    assert_eq!(updated.created_at, alice.created_at);

    service.delete_user(1).await.unwrap();

    assert!(service.get_user_by_id(1).await.unwrap().is_none());
    assert!(service.get_user_by_username("alice2").await.unwrap().is_none());
}

#[tokio::test]
async fn test_created_record_matches_fetched_record() {
    let service = service();

    let created = service
        .create_user(User::new("bob", "bob@example.com", "Bob", "Builder"))
        .await
        .unwrap();
    assert_eq!(created.created_at, created.updated_at);

    let fetched = service.get_user_by_id(created.id.unwrap()).await.unwrap();
    assert_eq!(fetched, Some(created.clone()));

    let by_email = service.get_user_by_email("bob@example.com").await.unwrap();
    assert_eq!(by_email, Some(created));
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let service = service();
    service
        .create_user(User::new("alice", "a@x.com", "Alice", "Liddell"))
        .await
        .unwrap();

    let err = service
        .create_user(User::new("other", "a@x.com", "Other", "Person"))
        .await
        .unwrap_err();

    assert_eq!(err, DomainError::duplicate_email("a@x.com"));
    assert_eq!(service.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_refreshes_timestamp_and_rejects_unknown_id() {
    let service = service();
    let created = service
        .create_user(User::new("carol", "c@x.com", "Carol", "C"))
        .await
        .unwrap();

    let first = service
        .update_user(1, UserDetails::new("carol", "c@x.com", "Caroline", "C"))
        .await
        .unwrap();
    let second = service
        .update_user(1, UserDetails::new("carol", "c@x.com", "Carrie", "C"))
        .await
        .unwrap();

    assert!(first.updated_at > created.updated_at);
    assert!(second.updated_at > first.updated_at);

    let err = service
        .update_user(42, UserDetails::new("ghost", "g@x.com", "G", "H"))
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::not_found(42));
    assert!(!service.user_exists(42).await.unwrap());
    assert_eq!(service.list_users().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_with_same_username() {
    let service = service();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .create_user(User::new(
                        "racer",
                        format!("racer{}@x.com", i),
                        "Race",
                        "Condition",
                    ))
                    .await
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(err) => assert_eq!(err, DomainError::duplicate_username("racer")),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(service.list_users().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_with_same_email() {
    let service = service();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .create_user(User::new(
                        format!("racer{}", i),
                        "shared@x.com",
                        "Race",
                        "Condition",
                    ))
                    .await
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(err) => assert_eq!(err, DomainError::duplicate_email("shared@x.com")),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(service.list_users().await.unwrap().len(), 1);
}
