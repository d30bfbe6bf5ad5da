//! # Core Traits (Ports)
//!
//! Any storage plugin must implement these traits to be used by the binary.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{AdvertEdit, AdvertState, AdvertSummary, CancelSnapshot, NewAdvert};

/// Data persistence contract for adverts.
///
/// Every write is atomic at single-row granularity; no multi-row
/// transactions are required. Restore and edit are read-then-write at the
/// service layer without a compare-and-swap guard, so two callers hitting
/// the same advert concurrently can lose an update — a known limitation
/// of the current contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdvertRepo: Send + Sync {
    /// Inserts a new advert owned by `owner_uuid` and returns its id.
    async fn create_advert(&self, owner_uuid: &str, draft: NewAdvert) -> anyhow::Result<i64>;

    /// Every advert owned by `owner_uuid`, in no particular order.
    async fn list_adverts(&self, owner_uuid: &str) -> anyhow::Result<Vec<AdvertSummary>>;

    /// Conditionally cancels an advert: the update is guarded by
    /// `is_canceled = false AND expires_at > now` and applied in a single
    /// statement. Returns whether any row matched the guard.
    async fn cancel_advert(&self, id: i64) -> anyhow::Result<bool>;

    /// Reads the cancellation snapshot used to compute a restore.
    async fn cancel_snapshot(&self, id: i64) -> anyhow::Result<CancelSnapshot>;

    /// Unconditionally clears cancellation and writes the shifted expiry.
    async fn restore_advert(&self, id: i64, new_expires_at: DateTime<Utc>) -> anyhow::Result<()>;

    /// Resolves the advert's immutable owner identity.
    async fn owner_uuid(&self, id: i64) -> anyhow::Result<String>;

    /// Reads the flags validity is derived from.
    async fn active_state(&self, id: i64) -> anyhow::Result<AdvertState>;

    /// Replaces title, content, and filter. Owner, timestamps, and the
    /// cancel/ban flags are untouched.
    async fn update_content(&self, id: i64, edit: AdvertEdit) -> anyhow::Result<()>;
}
