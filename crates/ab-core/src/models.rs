//! # Domain Models
//!
//! These structs represent the core entities of Advert-Board.
//! An advert's id is assigned by the persistence backend on insert;
//! the owner identity is an opaque string supplied by the transport.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single owned, time-bounded text listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advert {
    pub id: i64,
    /// Identity of the creator. Immutable after creation.
    pub owner_uuid: String,
    pub title: Option<String>,
    pub text_content: String,
    /// Opaque targeting payload, persisted verbatim and never interpreted.
    pub user_filter: UserFilter,
    pub expires_at: DateTime<Utc>,
    pub is_canceled: bool,
    /// Set exactly when `is_canceled` is true.
    pub canceled_at: Option<DateTime<Utc>>,
    /// Written by an external moderation actor; read-only here.
    pub is_banned: bool,
}

/// Payload for creating a new advert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAdvert {
    pub title: Option<String>,
    pub text_content: String,
    #[serde(default)]
    pub user_filter: UserFilter,
    pub expires_at: DateTime<Utc>,
}

/// Projection returned when listing an owner's adverts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvertSummary {
    pub id: i64,
    pub title: Option<String>,
    pub text_content: String,
    pub expires_at: DateTime<Utc>,
}

/// Replacement content for an edit. Owner, timestamps, and the
/// cancel/ban flags are never part of an edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvertEdit {
    pub title: Option<String>,
    pub text_content: String,
    #[serde(default)]
    pub user_filter: UserFilter,
}

/// Cancellation snapshot read before a restore.
#[derive(Debug, Clone, PartialEq)]
pub struct CancelSnapshot {
    pub is_canceled: bool,
    pub canceled_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
}

/// The state flags validity is derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvertState {
    pub is_canceled: bool,
    pub is_banned: bool,
    pub expires_at: DateTime<Utc>,
}

impl AdvertState {
    /// Derived validity: never stored, always computed at decision time.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.is_canceled && !self.is_banned && self.expires_at > now
    }
}

/// Opaque audience-targeting payload (set of platform codes).
///
/// Round-tripped through the persistence layer as UTF-8 JSON via
/// [`UserFilter::to_json`] / [`UserFilter::from_json`]; malformed stored
/// data is an error, never silently defaulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserFilter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub os: Vec<i64>,
}

impl UserFilter {
    /// Fixed encoding for the storage boundary.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}
