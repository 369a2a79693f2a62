use std::time::Duration;

use database_traits::dao::GenericDao;
use test_utils::{TestPostgresContainer, create_sql_connect};
use user_commands::{CreateUserCommand, UpdateUserCommand};
use user_dao::{UserDao, UserStore};
use user_errors::UserError;

async fn setup() -> (TestPostgresContainer, UserDao) {
    let container = TestPostgresContainer::new().await.unwrap();
    let dao = UserDao::new(create_sql_connect(&container));
    (container, dao)
}

fn create_command(email: &str) -> CreateUserCommand {
    CreateUserCommand {
        email: email.to_string(),
        name: "Test User".to_string(),
        password: "hash".to_string(),
    }
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_create_and_find() {
    let (_container, dao) = setup().await;

    let created = dao.create(create_command("ada@example.com")).await.unwrap();
    assert!(created.id > 0);

    let by_id = dao.find_by_id(created.id).await.unwrap();
    assert_eq!(by_id, Some(created.clone()));

    let by_email = dao.find_by_email("ada@example.com").await.unwrap();
    assert_eq!(by_email, Some(created));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_find_missing_is_none() {
    let (_container, dao) = setup().await;

    assert_eq!(dao.find_by_id(999_999).await.unwrap(), None);
    assert_eq!(dao.find_by_email("nobody@example.com").await.unwrap(), None);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_duplicate_email_is_rejected() {
    let (_container, dao) = setup().await;
    dao.create(create_command("dup@example.com")).await.unwrap();

    let result = dao.create(create_command("dup@example.com")).await;

    assert!(matches!(result, Err(UserError::EmailExists)));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_update_returns_fresh_row() {
    let (_container, dao) = setup().await;
    let created = dao.create(create_command("old@example.com")).await.unwrap();

    let updated = dao
        .update(created.id, UpdateUserCommand {
            email: "new@example.com".to_string(),
            name: "Renamed".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.email, "new@example.com");
    assert_eq!(updated.password, created.password);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_update_and_delete_missing_are_not_found() {
    let (_container, dao) = setup().await;

    let update = dao
        .update(404, UpdateUserCommand {
            email: "x@example.com".to_string(),
            name: "x".to_string(),
        })
        .await;
    assert!(matches!(update, Err(UserError::NotFound { user_id: 404 })));

    let delete = dao.delete(404).await;
    assert!(matches!(delete, Err(UserError::NotFound { user_id: 404 })));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_all_is_ordered_by_id() {
    let (_container, dao) = setup().await;
    let first = dao.create(create_command("a@example.com")).await.unwrap();
    let second = dao.create(create_command("b@example.com")).await.unwrap();

    let ids: Vec<i64> = dao.all().await.unwrap().iter().map(|u| u.id).collect();

    assert_eq!(ids, vec![first.id, second.id]);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_query_past_deadline_is_timeout() {
    let (_container, dao) = setup().await;
    let created = dao.create(create_command("ada@example.com")).await.unwrap();

    let dao = dao.with_deadline(Duration::ZERO);
    let err = dao.find_by_id(created.id).await.unwrap_err();

    assert!(matches!(err, UserError::Timeout(_)));
}
