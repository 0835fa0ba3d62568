//! Keyword classification of provider failure messages.
//!
//! Providers only hand back free text, so all matching is substring based
//! and case-insensitive. Every caller goes through this module so it can be
//! swapped for structured error codes if the upstream ever exposes them.
//! Known weakness: English-only keywords, and "rate" also matches words such
//! as "generate".

/// Which retry horizon a quota failure points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaKind {
    /// Short per-minute throttling; a retry in a few seconds is likely to work.
    RateLimit,
    /// Daily (or otherwise long-lived) quota exhaustion.
    DailyQuota,
}

const QUOTA_KEYWORDS: &[&str] = &["quota", "rate"];

const RESOURCE_EXHAUSTED_KEYWORDS: &[&str] = &[
    "resource_exhausted",
    "resource exhausted",
    "resource has been exhausted",
    "insufficient_quota",
    "quota",
    "rate limit",
    "rate_limit",
    "too many requests",
];

fn contains_any(message: &str, keywords: &[&str]) -> bool {
    let lowered = message.to_lowercase();
    keywords.iter().any(|keyword| lowered.contains(keyword))
}

/// Loose check used by the status probe: any mention of quota or rate.
pub fn is_quota_message(message: &str) -> bool {
    contains_any(message, QUOTA_KEYWORDS)
}

/// Whether a raw provider failure signals resource exhaustion.
pub fn is_resource_exhausted(message: &str) -> bool {
    contains_any(message, RESOURCE_EXHAUSTED_KEYWORDS)
}

/// Splits a resource-exhaustion failure into rate limit vs daily quota.
pub fn quota_kind(message: &str) -> QuotaKind {
    if contains_any(message, &["rate limit"]) {
        QuotaKind::RateLimit
    } else {
        QuotaKind::DailyQuota
    }
}
