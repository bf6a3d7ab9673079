//! Shared fixtures for integration tests.

use api_core::common::{GigId, UserId};
use api_core::domains::bids::Bid;
use api_core::domains::gigs::Gig;
use api_core::domains::users::User;
use rust_decimal::Decimal;
use sqlx::PgPool;

/// Create a user with a unique email. Low bcrypt cost to keep tests fast.
pub async fn create_user(name: &str, pool: &PgPool) -> User {
    let email = format!(
        "{}-{}@example.com",
        name.to_lowercase(),
        uuid::Uuid::new_v4()
    );
    let hash = bcrypt::hash("password123", 4).expect("Failed to hash password");
    User::create(name, &email, &hash, pool)
        .await
        .expect("Failed to create user")
}

pub async fn create_gig(owner_id: UserId, title: &str, budget: i64, pool: &PgPool) -> Gig {
    Gig::create(
        title,
        "Integration test gig description.",
        Decimal::from(budget),
        owner_id,
        pool,
    )
    .await
    .expect("Failed to create gig")
}

pub async fn create_bid(gig_id: GigId, freelancer_id: UserId, price: i64, pool: &PgPool) -> Bid {
    Bid::place(
        gig_id,
        freelancer_id,
        "I can take this on right away.",
        Decimal::from(price),
        pool,
    )
    .await
    .expect("Failed to place bid")
}
