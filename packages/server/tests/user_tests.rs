//! Integration tests for user storage and credential checks.

mod common;

use crate::common::{create_user, TestHarness};
use api_core::domains::users::User;
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
async fn test_create_and_find_user(ctx: &TestHarness) {
    let user = create_user("Casey", &ctx.db_pool).await;

    let by_id = User::find_by_id(user.id, &ctx.db_pool)
        .await
        .unwrap()
        .expect("User should be found by id");
    assert_eq!(by_id.email, user.email);

    // Email lookup is case-insensitive
    let by_email = User::find_by_email(&user.email.to_uppercase(), &ctx.db_pool)
        .await
        .unwrap()
        .expect("User should be found by email");
    assert_eq!(by_email.id, user.id);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_password_verification(ctx: &TestHarness) {
    let user = create_user("Robin", &ctx.db_pool).await;

    assert!(user.verify_password("password123"));
    assert!(!user.verify_password("wrong-password"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_duplicate_email_is_rejected(ctx: &TestHarness) {
    let user = create_user("Sam", &ctx.db_pool).await;

    let result = User::create("Sam Again", &user.email, "x", &ctx.db_pool).await;
    assert!(result.is_err());
}
