//! Pure decision logic for the hire transition. No I/O.
//!
//! The transition itself (hired bid, rejected siblings, assigned gig) is
//! applied by the coordinator as a single atomic write; this module only
//! answers whether the transition is legal for a given snapshot.

use crate::common::UserId;
use crate::domains::bids::{Bid, BidStatus};
use crate::domains::gigs::{Gig, GigStatus};

use super::HireError;

/// Check the hire preconditions for `actor` hiring `bid` on `gig`.
///
/// - the actor must own the gig (`Unauthorized`);
/// - the gig must still be open (`Conflict`);
/// - the bid must belong to the gig and be pending; anything else means the
///   stored state broke the one-winner invariant (`InvariantViolation`).
pub fn authorize_hire(gig: &Gig, bid: &Bid, actor: UserId) -> Result<(), HireError> {
    if gig.owner_id != actor {
        return Err(HireError::Unauthorized);
    }

    if gig.status != GigStatus::Open {
        return Err(HireError::Conflict);
    }

    if bid.gig_id != gig.id {
        return Err(HireError::InvariantViolation(format!(
            "bid {} belongs to gig {}, not gig {}",
            bid.id, bid.gig_id, gig.id
        )));
    }

    // An open gig must only carry pending bids.
    if bid.status != BidStatus::Pending {
        return Err(HireError::InvariantViolation(format!(
            "bid {} on open gig {} has terminal status {:?}",
            bid.id, gig.id, bid.status
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{BidId, GigId};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn gig(owner: UserId, status: GigStatus) -> Gig {
        Gig {
            id: GigId::new(),
            title: "Build a landing page".to_string(),
            description: "Five sections, responsive, dark mode.".to_string(),
            budget: Decimal::from(500),
            owner_id: owner,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn bid(gig_id: GigId, freelancer: UserId, status: BidStatus) -> Bid {
        Bid {
            id: BidId::new(),
            gig_id,
            freelancer_id: freelancer,
            message: "I can have this done by Friday.".to_string(),
            price: Decimal::from(450),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_can_hire_pending_bid_on_open_gig() {
        let owner = UserId::new();
        let g = gig(owner, GigStatus::Open);
        let b = bid(g.id, UserId::new(), BidStatus::Pending);

        assert!(authorize_hire(&g, &b, owner).is_ok());
    }

    #[test]
    fn test_non_owner_is_unauthorized() {
        let g = gig(UserId::new(), GigStatus::Open);
        let b = bid(g.id, UserId::new(), BidStatus::Pending);

        let result = authorize_hire(&g, &b, UserId::new());
        assert!(matches!(result, Err(HireError::Unauthorized)));
    }

    #[test]
    fn test_assigned_gig_is_conflict() {
        let owner = UserId::new();
        let g = gig(owner, GigStatus::Assigned);
        let b = bid(g.id, UserId::new(), BidStatus::Pending);

        let result = authorize_hire(&g, &b, owner);
        assert!(matches!(result, Err(HireError::Conflict)));
    }

    #[test]
    fn test_unauthorized_wins_over_conflict() {
        // Ownership is checked before openness.
        let g = gig(UserId::new(), GigStatus::Assigned);
        let b = bid(g.id, UserId::new(), BidStatus::Pending);

        let result = authorize_hire(&g, &b, UserId::new());
        assert!(matches!(result, Err(HireError::Unauthorized)));
    }

    #[test]
    fn test_detached_bid_is_invariant_violation() {
        let owner = UserId::new();
        let g = gig(owner, GigStatus::Open);
        let b = bid(GigId::new(), UserId::new(), BidStatus::Pending);

        let result = authorize_hire(&g, &b, owner);
        assert!(matches!(result, Err(HireError::InvariantViolation(_))));
    }

    #[test]
    fn test_terminal_bid_on_open_gig_is_invariant_violation() {
        let owner = UserId::new();
        let g = gig(owner, GigStatus::Open);
        let b = bid(g.id, UserId::new(), BidStatus::Rejected);

        let result = authorize_hire(&g, &b, owner);
        assert!(matches!(result, Err(HireError::InvariantViolation(_))));
    }
}
