use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{GigId, UserId};

/// Lifecycle of a gig. `Assigned` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "gig_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GigStatus {
    Open,
    Assigned,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Gig {
    pub id: GigId,
    pub title: String,
    pub description: String,
    pub budget: Decimal,
    pub owner_id: UserId,
    pub status: GigStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Gig joined with its owner's public details, for list and detail views.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GigWithOwner {
    pub id: GigId,
    pub title: String,
    pub description: String,
    pub budget: Decimal,
    pub owner_id: UserId,
    pub status: GigStatus,
    pub created_at: DateTime<Utc>,
    pub owner_name: String,
    pub owner_email: String,
}

/// Gig with its bid count, for the owner's dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GigWithBidCount {
    pub id: GigId,
    pub title: String,
    pub description: String,
    pub budget: Decimal,
    pub owner_id: UserId,
    pub status: GigStatus,
    pub created_at: DateTime<Utc>,
    pub bid_count: i64,
}

impl Gig {
    pub async fn create(
        title: &str,
        description: &str,
        budget: Decimal,
        owner_id: UserId,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO gigs (id, title, description, budget, owner_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(GigId::new())
        .bind(title)
        .bind(description)
        .bind(budget)
        .bind(owner_id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: GigId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM gigs WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_with_owner(id: GigId, pool: &PgPool) -> Result<Option<GigWithOwner>> {
        sqlx::query_as::<_, GigWithOwner>(
            r#"
            SELECT g.id, g.title, g.description, g.budget, g.owner_id, g.status,
                   g.created_at, u.name AS owner_name, u.email AS owner_email
            FROM gigs g
            INNER JOIN users u ON u.id = g.owner_id
            WHERE g.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// List open gigs, newest first, with optional case-insensitive search
    /// over title and description. Returns the page plus the total match
    /// count for pagination metadata.
    pub async fn list_open(
        search: Option<&str>,
        page: i64,
        limit: i64,
        pool: &PgPool,
    ) -> Result<(Vec<GigWithOwner>, i64)> {
        let pattern = search.map(|s| format!("%{}%", s));

        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT count(*)
            FROM gigs
            WHERE status = 'open'
              AND ($1::text IS NULL OR title ILIKE $1 OR description ILIKE $1)
            "#,
        )
        .bind(pattern.as_deref())
        .fetch_one(pool)
        .await?;

        let gigs = sqlx::query_as::<_, GigWithOwner>(
            r#"
            SELECT g.id, g.title, g.description, g.budget, g.owner_id, g.status,
                   g.created_at, u.name AS owner_name, u.email AS owner_email
            FROM gigs g
            INNER JOIN users u ON u.id = g.owner_id
            WHERE g.status = 'open'
              AND ($1::text IS NULL OR g.title ILIKE $1 OR g.description ILIKE $1)
            ORDER BY g.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(pattern.as_deref())
        .bind(limit)
        .bind((page - 1) * limit)
        .fetch_all(pool)
        .await?;

        Ok((gigs, total))
    }

    /// All gigs owned by a user, any status, with bid counts.
    pub async fn find_by_owner(owner_id: UserId, pool: &PgPool) -> Result<Vec<GigWithBidCount>> {
        sqlx::query_as::<_, GigWithBidCount>(
            r#"
            SELECT g.id, g.title, g.description, g.budget, g.owner_id, g.status,
                   g.created_at, count(b.id) AS bid_count
            FROM gigs g
            LEFT JOIN bids b ON b.gig_id = g.id
            WHERE g.owner_id = $1
            GROUP BY g.id
            ORDER BY g.created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Owner-guarded edit. The `status = 'open'` condition makes this a
    /// conditional write: an edit racing a hire loses and returns `None`.
    pub async fn update(
        id: GigId,
        owner_id: UserId,
        title: &str,
        description: &str,
        budget: Decimal,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE gigs
            SET title = $3, description = $4, budget = $5, updated_at = now()
            WHERE id = $1 AND owner_id = $2 AND status = 'open'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(title)
        .bind(description)
        .bind(budget)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Owner-guarded delete, open gigs only. Bids cascade. Returns whether a
    /// row was actually removed.
    pub async fn delete(id: GigId, owner_id: UserId, pool: &PgPool) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM gigs WHERE id = $1 AND owner_id = $2 AND status = 'open'")
                .bind(id)
                .bind(owner_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
