//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Validation
// =============================================================================

/// Maximum username length (matches the `users.username` column)
pub const MAX_USERNAME_LENGTH: u64 = 50;

/// Maximum email length (matches the `users.email` column)
pub const MAX_EMAIL_LENGTH: u64 = 100;

/// Maximum first/last name length
pub const MAX_NAME_LENGTH: u64 = 50;

// =============================================================================
// Timestamps
// =============================================================================

/// Fractional-second digits kept on record timestamps.
///
/// Postgres stores microseconds; anything finer would not survive a round trip.
pub const TIMESTAMP_PRECISION_DIGITS: u16 = 6;
