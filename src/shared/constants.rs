/// Upper bound on `-2`, `-3`, ... suffixes tried before a submission is rejected
pub const MAX_SLUG_ATTEMPTS: u32 = 50;

/// Slug used when a name has no ASCII letters or digits at all
pub const FALLBACK_SLUG: &str = "tool";

// =============================================================================
// FIELD LIMITS
// =============================================================================

pub const MAX_NAME_LENGTH: u64 = 120;
pub const MAX_SHORT_DESCRIPTION_LENGTH: u64 = 280;
pub const MAX_LONG_DESCRIPTION_LENGTH: u64 = 5000;
pub const MAX_URL_LENGTH: u64 = 2048;
pub const MAX_SHORT_FIELD_LENGTH: u64 = 255;

// =============================================================================
// COOKIES
// =============================================================================

/// Name of the signed cookie carrying one-shot notices across redirects
pub const FLASH_COOKIE_NAME: &str = "spectra_flash";

/// Flash cookies are consumed on the next page view; this only bounds stale ones
pub const FLASH_COOKIE_MAX_AGE_SECS: u64 = 300;
