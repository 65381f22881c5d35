mod common;

use chrono::Utc;
use common::TestDb;
use credential_service::domain::user::models::EmailAddress;
use credential_service::domain::user::models::NewUser;
use credential_service::domain::user::models::UserId;
use credential_service::domain::user::models::Username;
use credential_service::domain::user::ports::UserRepository;
use credential_service::outbound::repositories::PostgresUserRepository;
use credential_service::user::errors::UniqueField;
use credential_service::user::errors::UserError;

fn new_user(username: &str, email: Option<&str>) -> NewUser {
    NewUser {
        username: Username::new(username.to_string()).unwrap(),
        email: email.map(|e| EmailAddress::new(e.to_string()).unwrap()),
        password_hash: "$argon2id$hash".to_string(),
        created_at: Utc::now(),
    }
}

fn username(value: &str) -> Username {
    Username::new(value.to_string()).unwrap()
}

fn email(value: &str) -> EmailAddress {
    EmailAddress::new(value.to_string()).unwrap()
}

#[tokio::test]
async fn test_insert_and_find_case_insensitive() {
    let Some(db) = TestDb::new().await else {
        return;
    };
    let repository = PostgresUserRepository::new(db.pool.clone());

    let created = repository
        .insert(new_user("Alice1234", Some("Alice@X.com")))
        .await
        .expect("Failed to insert user");

    let by_id = repository
        .find_by_id(&created.id)
        .await
        .unwrap()
        .expect("User not found by id");
    assert_eq!(by_id.username.as_str(), "Alice1234");
    assert_eq!(by_id.password_hash, "$argon2id$hash");

    let by_username = repository
        .find_by_username(&username("ALICE1234"))
        .await
        .unwrap()
        .expect("User not found by username");
    assert_eq!(by_username.id, created.id);
    assert_eq!(by_username.username.as_str(), "Alice1234");

    let by_email = repository
        .find_by_email(&email("alice@x.com"))
        .await
        .unwrap()
        .expect("User not found by email");
    assert_eq!(by_email.id, created.id);
    assert_eq!(
        by_email.email.as_ref().map(|e| e.as_str()),
        Some("Alice@X.com")
    );

    assert!(repository
        .find_by_username(&username("nobody_here"))
        .await
        .unwrap()
        .is_none());
    assert!(repository.find_by_id(&UserId::new()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_insert_conflicts_map_to_unique_field() {
    let Some(db) = TestDb::new().await else {
        return;
    };
    let repository = PostgresUserRepository::new(db.pool.clone());
    repository
        .insert(new_user("alice1234", Some("a@x.com")))
        .await
        .unwrap();

    let username_clash = repository.insert(new_user("ALICE1234", None)).await;
    assert!(matches!(
        username_clash,
        Err(UserError::Conflict(UniqueField::Username))
    ));

    let email_clash = repository
        .insert(new_user("bob_builder", Some("A@X.COM")))
        .await;
    assert!(matches!(
        email_clash,
        Err(UserError::Conflict(UniqueField::Email))
    ));

    // Missing emails never collide with each other.
    repository.insert(new_user("carol_1234", None)).await.unwrap();
    repository.insert(new_user("dave_12345", None)).await.unwrap();
}

#[tokio::test]
async fn test_replace() {
    let Some(db) = TestDb::new().await else {
        return;
    };
    let repository = PostgresUserRepository::new(db.pool.clone());
    repository.insert(new_user("alice1234", None)).await.unwrap();
    let mut bob = repository
        .insert(new_user("bob_builder", Some("b@x.com")))
        .await
        .unwrap();

    bob.email = Some(email("bob@x.com"));
    repository.replace(bob.clone()).await.expect("Failed to replace");
    let stored = repository.find_by_id(&bob.id).await.unwrap().unwrap();
    assert_eq!(stored.email.as_ref().map(|e| e.as_str()), Some("bob@x.com"));
    assert!(repository
        .find_by_email(&email("b@x.com"))
        .await
        .unwrap()
        .is_none());

    bob.username = username("Alice1234");
    let clash = repository.replace(bob).await;
    assert!(matches!(
        clash,
        Err(UserError::Conflict(UniqueField::Username))
    ));

    let unknown = new_user("ghost_user", None).with_id(UserId::new());
    let result = repository.replace(unknown).await;
    assert!(matches!(result, Err(UserError::NotFound(_))));
}
