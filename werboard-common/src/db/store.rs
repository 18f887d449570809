//! Reference and leaderboard stores
//!
//! `Store` is a cheap-to-clone handle over the connection pool. It is created
//! once at startup and passed to request handlers explicitly; every call
//! acquires its own connection or transaction for the duration of the call.
//!
//! Leaderboard writes replace the whole table and are guarded by a version
//! counter: a write succeeds only if nobody else wrote since the snapshot it
//! was computed from was read.

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::leaderboard::{Leaderboard, LeaderboardEntry};
use crate::reference::{ReferenceEntry, ReferenceSet};
use crate::{Error, Result};

/// Leaderboard as read, with the version it was read at
#[derive(Debug, Clone)]
pub struct LeaderboardSnapshot {
    pub version: i64,
    pub leaderboard: Leaderboard,
}

/// Store handle shared through application state
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Load every reference transcript in import order
    pub async fn fetch_reference(&self) -> Result<ReferenceSet> {
        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT id, correct_transcript FROM reference_transcripts ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        ReferenceSet::from_entries(
            rows.into_iter()
                .map(|(id, text)| ReferenceEntry::new(id, text))
                .collect(),
        )
    }

    /// Replace all reference transcripts
    pub async fn replace_reference(&self, reference: &ReferenceSet) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM reference_transcripts")
            .execute(&mut *tx)
            .await?;

        for entry in reference.entries() {
            sqlx::query("INSERT INTO reference_transcripts (id, correct_transcript) VALUES (?, ?)")
                .bind(&entry.id)
                .bind(&entry.correct_transcript)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        info!(entries = reference.len(), "Replaced reference transcripts");
        Ok(())
    }

    /// Read the leaderboard and its version in one transaction
    pub async fn fetch_leaderboard(&self) -> Result<LeaderboardSnapshot> {
        let mut tx = self.pool.begin().await?;

        let version: i64 = sqlx::query_scalar("SELECT version FROM leaderboard_version WHERE id = 1")
            .fetch_one(&mut *tx)
            .await?;

        let rows = sqlx::query_as::<_, (String, f64, i64)>(
            "SELECT username, best_wer, submissions FROM leaderboard ORDER BY rowid",
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let leaderboard = Leaderboard::from_entries(
            rows.into_iter()
                .map(|(username, best_wer, submissions)| {
                    LeaderboardEntry::new(username, best_wer, submissions)
                })
                .collect(),
        )?;

        debug!(version, entries = leaderboard.len(), "Fetched leaderboard snapshot");
        Ok(LeaderboardSnapshot {
            version,
            leaderboard,
        })
    }

    /// Overwrite the whole leaderboard if it is still at `expected_version`
    ///
    /// Returns the new version.
    ///
    /// # Errors
    /// [`Error::ConcurrentUpdate`] when another write landed after the
    /// snapshot was taken; nothing is written in that case.
    pub async fn replace_leaderboard(
        &self,
        expected_version: i64,
        leaderboard: &Leaderboard,
    ) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let bumped = sqlx::query(
            "UPDATE leaderboard_version SET version = version + 1 WHERE id = 1 AND version = ?",
        )
        .bind(expected_version)
        .execute(&mut *tx)
        .await?;

        if bumped.rows_affected() == 0 {
            let found: i64 =
                sqlx::query_scalar("SELECT version FROM leaderboard_version WHERE id = 1")
                    .fetch_one(&mut *tx)
                    .await?;
            tx.rollback().await?;
            warn!(
                expected = expected_version,
                found, "Leaderboard write rejected: snapshot is stale"
            );
            return Err(Error::ConcurrentUpdate {
                expected: expected_version,
                found,
            });
        }

        sqlx::query("DELETE FROM leaderboard")
            .execute(&mut *tx)
            .await?;

        for entry in leaderboard.entries() {
            insert_entry(&mut tx, entry).await?;
        }

        tx.commit().await?;

        let version = expected_version + 1;
        info!(version, entries = leaderboard.len(), "Wrote leaderboard");
        Ok(version)
    }

    /// Insert or overwrite a single row regardless of version
    ///
    /// Used for seeding (e.g. the baseline entry). Still bumps the version so
    /// in-flight submissions notice the change.
    pub async fn upsert_entry(&self, entry: &LeaderboardEntry) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO leaderboard (username, best_wer, submissions) VALUES (?, ?, ?)
            ON CONFLICT(username) DO UPDATE SET
                best_wer = excluded.best_wer,
                submissions = excluded.submissions
            "#,
        )
        .bind(&entry.username)
        .bind(entry.best_wer)
        .bind(entry.submissions)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE leaderboard_version SET version = version + 1 WHERE id = 1")
            .execute(&mut *tx)
            .await?;

        let version: i64 = sqlx::query_scalar("SELECT version FROM leaderboard_version WHERE id = 1")
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(username = %entry.username, best_wer = entry.best_wer, "Upserted leaderboard entry");
        Ok(version)
    }
}

async fn insert_entry(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    entry: &LeaderboardEntry,
) -> Result<()> {
    sqlx::query("INSERT INTO leaderboard (username, best_wer, submissions) VALUES (?, ?, ?)")
        .bind(&entry.username)
        .bind(entry.best_wer)
        .bind(entry.submissions)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
