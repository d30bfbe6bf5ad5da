//! # Advert Lifecycle Service
//!
//! The authorization and transition engine: caller-identity gates,
//! active-state checks, the restore time-shift, and classification of
//! every outcome into [`AppError`]. The service itself is stateless and
//! holds only the persistence port.

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::{AdvertEdit, AdvertSummary, NewAdvert};
use crate::traits::AdvertRepo;

pub struct AdvertService {
    repo: Box<dyn AdvertRepo>,
}

impl AdvertService {
    pub fn new(repo: Box<dyn AdvertRepo>) -> Self {
        Self { repo }
    }

    /// Creates a new advert owned by `caller`. No prior-state check.
    pub async fn create_advert(&self, caller: Option<&str>, draft: NewAdvert) -> Result<i64> {
        let owner = require_caller(caller)?;

        self.repo
            .create_advert(owner, draft)
            .await
            .map_err(internal("failed to create advert"))
    }

    /// Every advert owned by `caller`. An empty list is a valid result.
    pub async fn list_adverts(&self, caller: Option<&str>) -> Result<Vec<AdvertSummary>> {
        let owner = require_caller(caller)?;

        self.repo
            .list_adverts(owner)
            .await
            .map_err(internal("failed to find adverts"))
    }

    /// Cancels an active, not-yet-canceled advert.
    ///
    /// The transition is a single guarded update at the storage layer; if
    /// the advert is already canceled or already expired the guard matches
    /// nothing and the call fails with `FailedPrecondition`.
    pub async fn cancel_advert(&self, id: i64) -> Result<()> {
        let matched = self
            .repo
            .cancel_advert(id)
            .await
            .map_err(internal("failed to cancel advert"))?;

        if !matched {
            log::error!("cancel matched no row for advert {id}");
            return Err(AppError::FailedPrecondition(
                "advert is already canceled or expired".into(),
            ));
        }

        Ok(())
    }

    /// Restores a canceled advert, shifting its expiry forward.
    ///
    /// The remaining validity window, frozen at the moment of cancellation,
    /// resumes counting down from the moment of restoration: the time spent
    /// canceled does not count against the advert's lifetime.
    pub async fn restore_advert(&self, id: i64) -> Result<()> {
        let snapshot = self
            .repo
            .cancel_snapshot(id)
            .await
            .map_err(internal("failed to get advert cancel info"))?;

        if !snapshot.is_canceled {
            log::error!("restore rejected: advert {id} has no cancellation record");
            return Err(AppError::Internal(
                "failed to restore the advert due to a missing cancellation record".into(),
            ));
        }

        // is_canceled without a timestamp is a data-consistency violation.
        let canceled_at = snapshot.canceled_at.ok_or_else(|| {
            log::error!("advert {id} is canceled but has no cancellation timestamp");
            AppError::Internal("canceled advert is missing its cancellation timestamp".into())
        })?;

        let parked = Utc::now() - canceled_at;
        let new_expires_at = snapshot.expires_at + parked;

        self.repo
            .restore_advert(id, new_expires_at)
            .await
            .map_err(internal("failed to restore advert"))
    }

    /// Replaces an active advert's title, content, and filter.
    ///
    /// The active-state check deliberately precedes the ownership check: a
    /// non-owner probing a non-active advert sees `Unavailable` before
    /// learning anything about ownership.
    pub async fn edit_advert(
        &self,
        caller: Option<&str>,
        id: i64,
        edit: AdvertEdit,
    ) -> Result<()> {
        let state = self
            .repo
            .active_state(id)
            .await
            .map_err(internal("failed to read advert state"))?;

        if !state.is_active(Utc::now()) {
            log::error!("edit rejected: advert {id} is not active");
            return Err(AppError::Unavailable("advert is not active".into()));
        }

        let caller = require_caller(caller)?;

        let owner = self
            .repo
            .owner_uuid(id)
            .await
            .map_err(internal("failed to get owner uuid"))?;

        if owner != caller {
            log::error!("edit rejected: caller is not the owner of advert {id}");
            return Err(AppError::PermissionDenied(
                "caller is not the advert owner".into(),
            ));
        }

        self.repo
            .update_content(id, edit)
            .await
            .map_err(internal("failed to edit advert"))
    }
}

fn require_caller(caller: Option<&str>) -> Result<&str> {
    caller.ok_or_else(|| {
        log::error!("failed to find caller identity");
        AppError::Unauthenticated("failed to retrieve caller identity".into())
    })
}

fn internal(context: &'static str) -> impl FnOnce(anyhow::Error) -> AppError {
    move |err| {
        log::error!("{context}: {err:#}");
        AppError::Internal(format!("{context}: {err}"))
    }
}
