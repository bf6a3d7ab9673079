//! Integration tests for bid placement and listing.

mod common;

use crate::common::{create_bid, create_gig, create_user, TestHarness};
use api_core::domains::bids::{Bid, BidStatus, PlaceBidError};
use api_core::domains::gigs::{Gig, GigStatus};
use api_core::domains::hiring::HireCoordinator;
use rust_decimal::Decimal;
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
async fn test_place_bid_on_open_gig(ctx: &TestHarness) {
    let owner = create_user("Owner", &ctx.db_pool).await;
    let worker = create_user("Worker", &ctx.db_pool).await;
    let gig = create_gig(owner.id, "Edit a podcast", 100, &ctx.db_pool).await;

    let bid = Bid::place(
        gig.id,
        worker.id,
        "Ten years of audio editing experience.",
        Decimal::from(85),
        &ctx.db_pool,
    )
    .await
    .expect("Bid should be placed");

    assert_eq!(bid.gig_id, gig.id);
    assert_eq!(bid.freelancer_id, worker.id);
    assert_eq!(bid.status, BidStatus::Pending);
    assert_eq!(bid.price, Decimal::from(85));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_cannot_bid_on_own_gig(ctx: &TestHarness) {
    let owner = create_user("Owner", &ctx.db_pool).await;
    let gig = create_gig(owner.id, "Paint a mural", 500, &ctx.db_pool).await;

    let result = Bid::place(
        gig.id,
        owner.id,
        "I will just do it myself.",
        Decimal::from(1),
        &ctx.db_pool,
    )
    .await;

    assert!(matches!(result, Err(PlaceBidError::OwnGig)));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_cannot_bid_twice_on_same_gig(ctx: &TestHarness) {
    let owner = create_user("Owner", &ctx.db_pool).await;
    let worker = create_user("Worker", &ctx.db_pool).await;
    let gig = create_gig(owner.id, "Assemble furniture", 60, &ctx.db_pool).await;
    create_bid(gig.id, worker.id, 50, &ctx.db_pool).await;

    let result = Bid::place(
        gig.id,
        worker.id,
        "Actually I can do it cheaper.",
        Decimal::from(45),
        &ctx.db_pool,
    )
    .await;

    assert!(matches!(result, Err(PlaceBidError::AlreadyBid)));

    // The original bid is untouched
    let bids = Bid::find_by_gig(gig.id, &ctx.db_pool).await.unwrap();
    assert_eq!(bids.len(), 1);
    assert_eq!(bids[0].price, Decimal::from(50));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_cannot_bid_on_assigned_gig(ctx: &TestHarness) {
    let owner = create_user("Owner", &ctx.db_pool).await;
    let worker = create_user("Worker", &ctx.db_pool).await;
    let latecomer = create_user("Latecomer", &ctx.db_pool).await;
    let gig = create_gig(owner.id, "Cater an event", 700, &ctx.db_pool).await;
    let bid = create_bid(gig.id, worker.id, 650, &ctx.db_pool).await;

    HireCoordinator::new(ctx.db_pool.clone())
        .hire(owner.id, bid.id)
        .await
        .expect("Hire should succeed");

    let result = Bid::place(
        gig.id,
        latecomer.id,
        "Is this still available by any chance?",
        Decimal::from(600),
        &ctx.db_pool,
    )
    .await;

    assert!(matches!(result, Err(PlaceBidError::GigNotOpen)));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_bid_racing_hire_never_stays_pending(ctx: &TestHarness) {
    let owner = create_user("Owner", &ctx.db_pool).await;
    let worker = create_user("Worker", &ctx.db_pool).await;
    let rival = create_user("Rival", &ctx.db_pool).await;
    let gig = create_gig(owner.id, "Restore an old chair", 140, &ctx.db_pool).await;
    let bid = create_bid(gig.id, worker.id, 120, &ctx.db_pool).await;

    let coordinator = HireCoordinator::new(ctx.db_pool.clone());

    // Act: race a new bid against the hire
    let hire = tokio::spawn({
        let coordinator = coordinator.clone();
        let actor = owner.id;
        let bid_id = bid.id;
        async move { coordinator.hire(actor, bid_id).await }
    });
    let place = tokio::spawn({
        let pool = ctx.db_pool.clone();
        let gig_id = gig.id;
        let rival_id = rival.id;
        async move {
            Bid::place(
                gig_id,
                rival_id,
                "Happy to take this on as well.",
                Decimal::from(110),
                &pool,
            )
            .await
        }
    });

    hire.await
        .expect("hire task panicked")
        .expect("Hire should succeed");
    let placed = place.await.expect("place task panicked");

    // Either the bid landed first and the hire rejected it, or the bid
    // observed the gig already assigned.
    match placed {
        Ok(_) | Err(PlaceBidError::GigNotOpen) => {}
        Err(e) => panic!("unexpected place error: {e}"),
    }

    let gig = Gig::find_by_id(gig.id, &ctx.db_pool).await.unwrap().unwrap();
    assert_eq!(gig.status, GigStatus::Assigned);
    let bids = Bid::find_by_gig(gig.id, &ctx.db_pool).await.unwrap();
    assert!(bids.iter().all(|b| b.status != BidStatus::Pending));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_schema_rejects_too_short_message(ctx: &TestHarness) {
    let owner = create_user("Owner", &ctx.db_pool).await;
    let worker = create_user("Worker", &ctx.db_pool).await;
    let gig = create_gig(owner.id, "Sharpen some knives", 30, &ctx.db_pool).await;

    let result = Bid::place(gig.id, worker.id, "short", Decimal::from(25), &ctx.db_pool).await;

    assert!(matches!(result, Err(PlaceBidError::Store(_))));
    let bids = Bid::find_by_gig(gig.id, &ctx.db_pool).await.unwrap();
    assert!(bids.is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_bid_on_unknown_gig_is_not_found(ctx: &TestHarness) {
    let worker = create_user("Worker", &ctx.db_pool).await;

    let result = Bid::place(
        api_core::common::GigId::new(),
        worker.id,
        "Bidding into the void here.",
        Decimal::from(10),
        &ctx.db_pool,
    )
    .await;

    assert!(matches!(result, Err(PlaceBidError::GigNotFound)));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_gig_bids_listing_includes_freelancer_details(ctx: &TestHarness) {
    let owner = create_user("Owner", &ctx.db_pool).await;
    let worker_a = create_user("Worker A", &ctx.db_pool).await;
    let worker_b = create_user("Worker B", &ctx.db_pool).await;
    let gig = create_gig(owner.id, "Landscape a garden", 900, &ctx.db_pool).await;
    create_bid(gig.id, worker_a.id, 800, &ctx.db_pool).await;
    create_bid(gig.id, worker_b.id, 850, &ctx.db_pool).await;

    let bids = Bid::find_by_gig_with_freelancer(gig.id, &ctx.db_pool)
        .await
        .unwrap();

    assert_eq!(bids.len(), 2);
    assert!(bids.iter().any(|b| b.freelancer_name == "Worker A"));
    assert!(bids.iter().any(|b| b.freelancer_name == "Worker B"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_my_bids_listing_carries_gig_summary(ctx: &TestHarness) {
    let owner = create_user("Owner", &ctx.db_pool).await;
    let worker = create_user("Worker", &ctx.db_pool).await;
    let gig_a = create_gig(owner.id, "Shoot product photos", 120, &ctx.db_pool).await;
    let gig_b = create_gig(owner.id, "Retouch product photos", 80, &ctx.db_pool).await;
    create_bid(gig_a.id, worker.id, 110, &ctx.db_pool).await;
    create_bid(gig_b.id, worker.id, 70, &ctx.db_pool).await;

    let bids = Bid::find_by_freelancer(worker.id, &ctx.db_pool)
        .await
        .unwrap();

    assert_eq!(bids.len(), 2);
    for bid in &bids {
        assert_eq!(bid.freelancer_id, worker.id);
        assert_eq!(bid.gig_owner_name, "Owner");
    }
    assert!(bids.iter().any(|b| b.gig_title == "Shoot product photos"));
    assert!(bids.iter().any(|b| b.gig_title == "Retouch product photos"));
}
