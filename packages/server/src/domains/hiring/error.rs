use thiserror::Error;

/// Everything that can go wrong while hiring for a gig.
///
/// The first three are user-facing (4xx). `InvariantViolation` means stored
/// state contradicts the gig/bid state machine and indicates a bug.
/// `Store` is a transport/commit failure that survived the retry budget.
#[derive(Debug, Error)]
pub enum HireError {
    #[error("Bid not found")]
    NotFound,

    #[error("Not authorized to hire for this gig")]
    Unauthorized,

    #[error("Gig is already assigned")]
    Conflict,

    #[error("State invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),
}
