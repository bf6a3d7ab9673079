//! The hire transition: pick one winning bid on a gig, atomically.
//!
//! Concurrency control is optimistic and lives in the store, not in process
//! memory (several server instances may share one database). Each attempt is
//! a read, evaluate, conditional-write cycle inside one transaction; the
//! `status = 'open'` guard on the gig update is the fence that admits exactly
//! one winner among racing attempts. A loser's guard matches zero rows, the
//! cycle is retried from a fresh read, and the re-read observes the gig
//! already assigned, which converges to `Conflict`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{BidId, GigId, UserId};
use crate::domains::bids::Bid;
use crate::domains::gigs::Gig;

use super::{machine, HireError};

/// Attempts per hire call before surfacing the failure.
const MAX_HIRE_ATTEMPTS: u32 = 3;

/// Push payload for the hired freelancer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiredNotification {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub gig_id: GigId,
    pub gig_title: String,
    pub gig_budget: Decimal,
    pub bid_id: BidId,
    pub bid_price: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl HiredNotification {
    fn new(gig: &Gig, bid: &Bid) -> Self {
        Self {
            kind: "hired".to_string(),
            message: format!("Congratulations! You have been hired for \"{}\"", gig.title),
            gig_id: gig.id,
            gig_title: gig.title.clone(),
            gig_budget: gig.budget,
            bid_id: bid.id,
            bid_price: bid.price,
            timestamp: Utc::now(),
        }
    }
}

/// Result of a committed hire. The caller is responsible for delivering the
/// notification; the coordinator itself has no dependency on the transport,
/// and the push only ever happens after the commit is confirmed.
#[derive(Debug)]
pub struct HireOutcome {
    /// The winning bid, as committed.
    pub bid: Bid,
    /// The freelancer to notify.
    pub recipient: UserId,
    pub notification: HiredNotification,
}

#[derive(Clone)]
pub struct HireCoordinator {
    pool: PgPool,
}

impl HireCoordinator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Hire the freelancer behind `bid_id`, on behalf of `actor`.
    ///
    /// On success the gig is assigned, the bid is hired, and every other
    /// pending bid on the gig is rejected, all in one transaction. On any
    /// error nothing has been written, and re-issuing the call is safe.
    pub async fn hire(&self, actor: UserId, bid_id: BidId) -> Result<HireOutcome, HireError> {
        for attempt in 1..=MAX_HIRE_ATTEMPTS {
            match self.try_hire(actor, bid_id).await {
                Ok(Some(outcome)) => return Ok(outcome),
                Ok(None) => {
                    tracing::debug!(%bid_id, attempt, "hire guard failed, retrying");
                }
                Err(HireError::Store(e)) if attempt < MAX_HIRE_ATTEMPTS && is_retryable(&e) => {
                    tracing::warn!(%bid_id, attempt, error = %e, "hire commit conflicted, retrying");
                }
                Err(HireError::InvariantViolation(msg)) => {
                    tracing::error!(%bid_id, "hire invariant violation: {msg}");
                    return Err(HireError::InvariantViolation(msg));
                }
                Err(e) => return Err(e),
            }
        }

        // The guard kept failing but every fresh read still saw the gig open;
        // treat the exhausted budget as losing the race.
        Err(HireError::Conflict)
    }

    /// One read, evaluate, conditional-write cycle. `Ok(None)` means the guard
    /// lost a race and the cycle should be retried from a fresh read.
    async fn try_hire(
        &self,
        actor: UserId,
        bid_id: BidId,
    ) -> Result<Option<HireOutcome>, HireError> {
        let mut tx = self.pool.begin().await?;

        let bid = sqlx::query_as::<_, Bid>("SELECT * FROM bids WHERE id = $1")
            .bind(bid_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(HireError::NotFound)?;

        let gig = sqlx::query_as::<_, Gig>("SELECT * FROM gigs WHERE id = $1")
            .bind(bid.gig_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(HireError::NotFound)?;

        // Precondition failures abort with the transaction untouched.
        machine::authorize_hire(&gig, &bid, actor)?;

        // The concurrency fence: only commits if the gig is still open at
        // write time. Zero rows means a concurrent hire got there first.
        let assigned = sqlx::query(
            "UPDATE gigs SET status = 'assigned', updated_at = now() \
             WHERE id = $1 AND status = 'open'",
        )
        .bind(gig.id)
        .execute(&mut *tx)
        .await?;

        if assigned.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let hired_bid = sqlx::query_as::<_, Bid>(
            "UPDATE bids SET status = 'hired', updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(bid.id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE bids SET status = 'rejected', updated_at = now() \
             WHERE gig_id = $1 AND id <> $2 AND status = 'pending'",
        )
        .bind(gig.id)
        .bind(bid.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(gig_id = %gig.id, bid_id = %hired_bid.id, "gig assigned");

        let notification = HiredNotification::new(&gig, &hired_bid);
        Ok(Some(HireOutcome {
            recipient: hired_bid.freelancer_id,
            notification,
            bid: hired_bid,
        }))
    }
}

/// Serialization failures and deadlocks are worth a fresh cycle; anything
/// else is a real store fault.
fn is_retryable(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => {
            matches!(db.code().as_deref(), Some("40001") | Some("40P01"))
        }
        _ => false,
    }
}
