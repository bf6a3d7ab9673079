use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;

use crate::common::{BidId, GigId, UserId};
use crate::domains::gigs::{Gig, GigStatus};

/// Lifecycle of a bid. `Hired` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "bid_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BidStatus {
    Pending,
    Hired,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: BidId,
    pub gig_id: GigId,
    pub freelancer_id: UserId,
    pub message: String,
    pub price: Decimal,
    pub status: BidStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Bid joined with the bidder's public details, for the gig owner's view.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BidWithFreelancer {
    pub id: BidId,
    pub gig_id: GigId,
    pub freelancer_id: UserId,
    pub message: String,
    pub price: Decimal,
    pub status: BidStatus,
    pub created_at: DateTime<Utc>,
    pub freelancer_name: String,
    pub freelancer_email: String,
}

/// Bid joined with a summary of its gig, for the bidder's own view.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BidWithGig {
    pub id: BidId,
    pub gig_id: GigId,
    pub freelancer_id: UserId,
    pub message: String,
    pub price: Decimal,
    pub status: BidStatus,
    pub created_at: DateTime<Utc>,
    pub gig_title: String,
    pub gig_budget: Decimal,
    pub gig_status: GigStatus,
    pub gig_owner_name: String,
}

/// Why a bid could not be placed.
#[derive(Debug, Error)]
pub enum PlaceBidError {
    #[error("Gig not found")]
    GigNotFound,

    #[error("Cannot bid on assigned gigs")]
    GigNotOpen,

    #[error("Cannot bid on your own gig")]
    OwnGig,

    #[error("You have already bid on this gig")]
    AlreadyBid,

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl Bid {
    /// Place a bid against an open gig.
    ///
    /// The gig row is locked for the duration of the check-and-insert, so a
    /// bid racing a hire either lands before the hire (and gets swept into
    /// `rejected` by it) or observes the gig already assigned. A pending bid
    /// can never appear on an assigned gig. The (gig, freelancer) uniqueness
    /// is enforced by the database constraint.
    pub async fn place(
        gig_id: GigId,
        freelancer_id: UserId,
        message: &str,
        price: Decimal,
        pool: &PgPool,
    ) -> Result<Self, PlaceBidError> {
        let mut tx = pool.begin().await.map_err(anyhow::Error::from)?;

        let gig = sqlx::query_as::<_, Gig>("SELECT * FROM gigs WHERE id = $1 FOR UPDATE")
            .bind(gig_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(anyhow::Error::from)?
            .ok_or(PlaceBidError::GigNotFound)?;

        if gig.status != GigStatus::Open {
            return Err(PlaceBidError::GigNotOpen);
        }
        if gig.owner_id == freelancer_id {
            return Err(PlaceBidError::OwnGig);
        }

        let inserted = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO bids (id, gig_id, freelancer_id, message, price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(BidId::new())
        .bind(gig_id)
        .bind(freelancer_id)
        .bind(message)
        .bind(price)
        .fetch_one(&mut *tx)
        .await;

        match inserted {
            Ok(bid) => {
                tx.commit().await.map_err(anyhow::Error::from)?;
                Ok(bid)
            }
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(PlaceBidError::AlreadyBid)
            }
            Err(e) => Err(anyhow::Error::from(e).into()),
        }
    }

    pub async fn find_by_id(id: BidId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM bids WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_gig(gig_id: GigId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM bids WHERE gig_id = $1 ORDER BY created_at DESC")
            .bind(gig_id)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Bids on a gig with bidder details, newest first (gig owner's view).
    pub async fn find_by_gig_with_freelancer(
        gig_id: GigId,
        pool: &PgPool,
    ) -> Result<Vec<BidWithFreelancer>> {
        sqlx::query_as::<_, BidWithFreelancer>(
            r#"
            SELECT b.id, b.gig_id, b.freelancer_id, b.message, b.price, b.status,
                   b.created_at, u.name AS freelancer_name, u.email AS freelancer_email
            FROM bids b
            INNER JOIN users u ON u.id = b.freelancer_id
            WHERE b.gig_id = $1
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(gig_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// A freelancer's bids with gig summaries, newest first.
    pub async fn find_by_freelancer(
        freelancer_id: UserId,
        pool: &PgPool,
    ) -> Result<Vec<BidWithGig>> {
        sqlx::query_as::<_, BidWithGig>(
            r#"
            SELECT b.id, b.gig_id, b.freelancer_id, b.message, b.price, b.status,
                   b.created_at, g.title AS gig_title, g.budget AS gig_budget,
                   g.status AS gig_status, u.name AS gig_owner_name
            FROM bids b
            INNER JOIN gigs g ON g.id = b.gig_id
            INNER JOIN users u ON u.id = g.owner_id
            WHERE b.freelancer_id = $1
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(freelancer_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
