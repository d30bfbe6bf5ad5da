//! # ab-db-sqlite Implementation
//!
//! This module implements the data mapping between the SQLite relational
//! model and the `ab-core` domain models. One logical table holds the
//! advert record; every write is a single-row statement.

use std::str::FromStr;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use ab_core::models::{Advert, AdvertEdit, AdvertState, AdvertSummary, CancelSnapshot, NewAdvert};
use ab_core::traits::AdvertRepo;

pub struct SqliteAdvertRepo {
    pool: SqlitePool,
}

impl SqliteAdvertRepo {
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("invalid sqlite url: {url}"))?
            .create_if_missing(true);
        // One long-lived connection: SQLite serializes writes anyway, and a
        // `:memory:` database exists per connection, not per pool.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS adverts (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                owner_uuid   TEXT    NOT NULL,
                title        TEXT,
                text_content TEXT    NOT NULL,
                user_filter  TEXT    NOT NULL DEFAULT '{}',
                expires_at   TEXT    NOT NULL,
                is_canceled  INTEGER NOT NULL DEFAULT 0,
                canceled_at  TEXT,
                is_banned    INTEGER NOT NULL DEFAULT 0
            )",
        )
        .execute(&pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_adverts_owner ON adverts (owner_uuid)")
            .execute(&pool)
            .await?;

        log::info!("sqlite advert store ready at {url}");
        Ok(Self { pool })
    }

    /// Full-row read, including the filter blob.
    ///
    /// Not part of the service's persistence contract; exposed for callers
    /// that need the whole record. A stored filter that fails to decode is
    /// an error, never a silent default.
    pub async fn get_advert(&self, id: i64) -> anyhow::Result<Advert> {
        let row = sqlx::query(
            "SELECT id, owner_uuid, title, text_content, user_filter, expires_at,
                    is_canceled, canceled_at, is_banned
             FROM adverts WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("failed to get advert {id}"))?;

        let raw_filter: String = row.get("user_filter");
        let user_filter = ab_core::models::UserFilter::from_json(&raw_filter)
            .with_context(|| format!("malformed user_filter stored for advert {id}"))?;

        Ok(Advert {
            id: row.get("id"),
            owner_uuid: row.get("owner_uuid"),
            title: row.get("title"),
            text_content: row.get("text_content"),
            user_filter,
            expires_at: row.get("expires_at"),
            is_canceled: row.get("is_canceled"),
            canceled_at: row.get("canceled_at"),
            is_banned: row.get("is_banned"),
        })
    }
}

#[async_trait]
impl AdvertRepo for SqliteAdvertRepo {
    async fn create_advert(&self, owner_uuid: &str, draft: NewAdvert) -> anyhow::Result<i64> {
        let filter = draft
            .user_filter
            .to_json()
            .context("failed to encode user filter")?;

        let result = sqlx::query(
            "INSERT INTO adverts (owner_uuid, title, text_content, user_filter, expires_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(owner_uuid)
        .bind(&draft.title)
        .bind(&draft.text_content)
        .bind(filter)
        .bind(draft.expires_at)
        .execute(&self.pool)
        .await
        .context("failed to create advert")?;

        Ok(result.last_insert_rowid())
    }

    async fn list_adverts(&self, owner_uuid: &str) -> anyhow::Result<Vec<AdvertSummary>> {
        let rows = sqlx::query(
            "SELECT id, title, text_content, expires_at FROM adverts WHERE owner_uuid = ?",
        )
        .bind(owner_uuid)
        .fetch_all(&self.pool)
        .await
        .context("failed to get adverts from db")?;

        Ok(rows
            .into_iter()
            .map(|row| AdvertSummary {
                id: row.get("id"),
                title: row.get("title"),
                text_content: row.get("text_content"),
                expires_at: row.get("expires_at"),
            })
            .collect())
    }

    /// The guard and the write are one statement, so concurrent cancels of
    /// the same advert cannot both match.
    async fn cancel_advert(&self, id: i64) -> anyhow::Result<bool> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE adverts SET is_canceled = 1, canceled_at = ?1
             WHERE id = ?2 AND is_canceled = 0 AND expires_at > ?1",
        )
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("failed to set cancel status")?;

        Ok(result.rows_affected() > 0)
    }

    async fn cancel_snapshot(&self, id: i64) -> anyhow::Result<CancelSnapshot> {
        let row = sqlx::query("SELECT is_canceled, canceled_at, expires_at FROM adverts WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("failed to get cancel data for advert {id}"))?;

        Ok(CancelSnapshot {
            is_canceled: row.get("is_canceled"),
            canceled_at: row.get("canceled_at"),
            expires_at: row.get("expires_at"),
        })
    }

    async fn restore_advert(&self, id: i64, new_expires_at: DateTime<Utc>) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE adverts SET is_canceled = 0, canceled_at = NULL, expires_at = ? WHERE id = ?",
        )
        .bind(new_expires_at)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("failed to restore advert")?;

        Ok(())
    }

    async fn owner_uuid(&self, id: i64) -> anyhow::Result<String> {
        let row = sqlx::query("SELECT owner_uuid FROM adverts WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("failed to query owner of advert {id}"))?;

        Ok(row.get("owner_uuid"))
    }

    async fn active_state(&self, id: i64) -> anyhow::Result<AdvertState> {
        let row = sqlx::query("SELECT is_canceled, is_banned, expires_at FROM adverts WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("failed to query state of advert {id}"))?;

        Ok(AdvertState {
            is_canceled: row.get("is_canceled"),
            is_banned: row.get("is_banned"),
            expires_at: row.get("expires_at"),
        })
    }

    async fn update_content(&self, id: i64, edit: AdvertEdit) -> anyhow::Result<()> {
        let filter = edit
            .user_filter
            .to_json()
            .context("failed to encode user filter")?;

        sqlx::query("UPDATE adverts SET title = ?, text_content = ?, user_filter = ? WHERE id = ?")
            .bind(&edit.title)
            .bind(&edit.text_content)
            .bind(filter)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("failed to update advert")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ab_core::models::UserFilter;
    use chrono::Duration;

    async fn repo() -> SqliteAdvertRepo {
        SqliteAdvertRepo::new("sqlite::memory:").await.unwrap()
    }

    async fn seed(repo: &SqliteAdvertRepo, owner: &str, expires_in: Duration) -> i64 {
        repo.create_advert(
            owner,
            NewAdvert {
                title: Some("woodwork".into()),
                text_content: "handmade wooden crafts".into(),
                user_filter: UserFilter { os: vec![7] },
                expires_at: Utc::now() + expires_in,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn create_assigns_ids_and_list_is_scoped_to_owner() {
        let repo = repo().await;
        let a1 = seed(&repo, "owner-a", Duration::days(3)).await;
        let a2 = seed(&repo, "owner-a", Duration::days(5)).await;
        seed(&repo, "owner-b", Duration::days(1)).await;
        assert_ne!(a1, a2);

        let mut listed = repo.list_adverts("owner-a").await.unwrap();
        listed.sort_by_key(|s| s.id);
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, a1);
        assert_eq!(listed[0].text_content, "handmade wooden crafts");
        assert_eq!(listed[0].title.as_deref(), Some("woodwork"));
    }

    #[tokio::test]
    async fn list_for_unknown_owner_is_empty() {
        let repo = repo().await;
        assert!(repo.list_adverts("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn cancel_sets_flag_and_timestamp_together() {
        let repo = repo().await;
        let id = seed(&repo, "owner-a", Duration::days(3)).await;

        assert!(repo.cancel_advert(id).await.unwrap());

        let advert = repo.get_advert(id).await.unwrap();
        assert!(advert.is_canceled);
        assert!(advert.canceled_at.is_some());
    }

    #[tokio::test]
    async fn cancel_of_an_already_canceled_advert_matches_nothing() {
        let repo = repo().await;
        let id = seed(&repo, "owner-a", Duration::days(3)).await;

        assert!(repo.cancel_advert(id).await.unwrap());
        assert!(!repo.cancel_advert(id).await.unwrap());
    }

    #[tokio::test]
    async fn cancel_past_expiry_does_not_flip_the_flag() {
        let repo = repo().await;
        let id = seed(&repo, "owner-a", Duration::hours(-1)).await;

        assert!(!repo.cancel_advert(id).await.unwrap());

        let advert = repo.get_advert(id).await.unwrap();
        assert!(!advert.is_canceled);
        assert!(advert.canceled_at.is_none());
    }

    #[tokio::test]
    async fn restore_clears_cancellation_and_writes_the_new_expiry() {
        let repo = repo().await;
        let id = seed(&repo, "owner-a", Duration::days(3)).await;
        assert!(repo.cancel_advert(id).await.unwrap());

        let new_expires_at = Utc::now() + Duration::days(2);
        repo.restore_advert(id, new_expires_at).await.unwrap();

        let advert = repo.get_advert(id).await.unwrap();
        assert!(!advert.is_canceled);
        assert!(advert.canceled_at.is_none());
        assert!((advert.expires_at - new_expires_at).num_seconds().abs() <= 1);
    }

    #[tokio::test]
    async fn cancel_snapshot_reflects_the_stored_row() {
        let repo = repo().await;
        let id = seed(&repo, "owner-a", Duration::days(3)).await;

        let before = repo.cancel_snapshot(id).await.unwrap();
        assert!(!before.is_canceled);
        assert!(before.canceled_at.is_none());

        assert!(repo.cancel_advert(id).await.unwrap());
        let after = repo.cancel_snapshot(id).await.unwrap();
        assert!(after.is_canceled);
        assert!(after.canceled_at.is_some());
        assert_eq!(after.expires_at, before.expires_at);
    }

    #[tokio::test]
    async fn owner_is_resolved_and_missing_rows_error() {
        let repo = repo().await;
        let id = seed(&repo, "owner-a", Duration::days(3)).await;

        assert_eq!(repo.owner_uuid(id).await.unwrap(), "owner-a");
        assert!(repo.owner_uuid(9999).await.is_err());
    }

    #[tokio::test]
    async fn active_state_reflects_the_ban_flag() {
        let repo = repo().await;
        let id = seed(&repo, "owner-a", Duration::days(3)).await;

        let state = repo.active_state(id).await.unwrap();
        assert!(state.is_active(Utc::now()));

        // Bans are written by an external moderation actor.
        sqlx::query("UPDATE adverts SET is_banned = 1 WHERE id = ?")
            .bind(id)
            .execute(&repo.pool)
            .await
            .unwrap();

        let state = repo.active_state(id).await.unwrap();
        assert!(state.is_banned);
        assert!(!state.is_active(Utc::now()));
    }

    #[tokio::test]
    async fn update_content_leaves_owner_and_flags_alone() {
        let repo = repo().await;
        let id = seed(&repo, "owner-a", Duration::days(3)).await;
        let before = repo.get_advert(id).await.unwrap();

        repo.update_content(
            id,
            AdvertEdit {
                title: None,
                text_content: "fresh content".into(),
                user_filter: UserFilter { os: vec![1, 2] },
            },
        )
        .await
        .unwrap();

        let after = repo.get_advert(id).await.unwrap();
        assert_eq!(after.text_content, "fresh content");
        assert_eq!(after.title, None);
        assert_eq!(after.user_filter, UserFilter { os: vec![1, 2] });
        assert_eq!(after.owner_uuid, before.owner_uuid);
        assert_eq!(after.expires_at, before.expires_at);
        assert!(!after.is_canceled);
        assert!(!after.is_banned);
    }

    #[tokio::test]
    async fn filter_blob_round_trips_verbatim() {
        let repo = repo().await;
        let id = seed(&repo, "owner-a", Duration::days(3)).await;

        let raw: String = sqlx::query("SELECT user_filter FROM adverts WHERE id = ?")
            .bind(id)
            .fetch_one(&repo.pool)
            .await
            .unwrap()
            .get("user_filter");
        assert_eq!(raw, r#"{"os":[7]}"#);

        let advert = repo.get_advert(id).await.unwrap();
        assert_eq!(advert.user_filter, UserFilter { os: vec![7] });
    }

    #[tokio::test]
    async fn malformed_stored_filter_is_an_error() {
        let repo = repo().await;
        let id = seed(&repo, "owner-a", Duration::days(3)).await;

        sqlx::query("UPDATE adverts SET user_filter = 'not-json' WHERE id = ?")
            .bind(id)
            .execute(&repo.pool)
            .await
            .unwrap();

        assert!(repo.get_advert(id).await.is_err());
    }
}
