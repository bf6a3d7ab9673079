//! Typed ID definitions for all domain entities.

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for User entities.
pub struct User;

/// Marker type for Gig entities (work postings).
pub struct Gig;

/// Marker type for Bid entities (offers against a gig).
pub struct Bid;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for User entities.
pub type UserId = Id<User>;

/// Typed ID for Gig entities.
pub type GigId = Id<Gig>;

/// Typed ID for Bid entities.
pub type BidId = Id<Bid>;
