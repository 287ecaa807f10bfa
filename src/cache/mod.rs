//! Stream-to-event match cache, sitting on top of [`StreamMatchCacheRepository`].
//!
//! Caches successful stream-to-event matches so a full match attempt only
//! runs once per stream per fingerprint. The fingerprint is a truncated
//! SHA-256 of `group_id:stream_id:stream_name` — renaming a stream upstream
//! changes its fingerprint and forces a fresh match.
//!
//! Grounded on `teamarr/consumers/stream_match_cache.py`.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

use crate::database::entities::stream_match_cache::FAILED_MATCH_EVENT_ID;
use crate::database::repositories::stream_match_cache::{StreamCacheRow, StreamMatchCacheRepository};
use crate::errors::CacheResult;
use crate::models::Event;

/// A resolved cache lookup.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub event_id: String,
    pub league: String,
    pub cached_data: Option<serde_json::Value>,
    pub match_method: Option<String>,
    pub user_corrected: bool,
}

impl CacheEntry {
    pub fn is_failed(&self) -> bool {
        self.event_id == FAILED_MATCH_EVENT_ID
    }
}

#[derive(Debug, Default)]
pub struct CacheStats {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub sets: AtomicU64,
    pub purged: AtomicU64,
    pub failed_cached: AtomicU64,
    pub user_corrections: AtomicU64,
}

impl CacheStats {
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            sets: self.sets.load(Ordering::Relaxed),
            purged: self.purged.load(Ordering::Relaxed),
            failed_cached: self.failed_cached.load(Ordering::Relaxed),
            user_corrections: self.user_corrections.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub purged: u64,
    pub failed_cached: u64,
    pub user_corrections: u64,
}

/// 16-character hex fingerprint of `group_id:stream_id:stream_name`.
pub fn compute_fingerprint(group_id: Uuid, stream_id: i64, stream_name: &str) -> String {
    let key = format!("{group_id}:{stream_id}:{stream_name}");
    let digest = Sha256::digest(key.as_bytes());
    hex::encode(digest)[..16].to_string()
}

/// Serializes an [`Event`] into the JSON blob stored in `cached_data`. Only
/// static fields survive a cache hit; dynamic fields (score, status) are
/// refreshed from the provider on every run regardless of cache state.
pub fn event_to_cache_data(event: &Event) -> CacheResult<serde_json::Value> {
    Ok(serde_json::to_value(event)?)
}

pub struct StreamMatchCache {
    repository: StreamMatchCacheRepository,
    purge_after_generations: i64,
    purge_failed_after_generations: i64,
    stats: CacheStats,
}

impl StreamMatchCache {
    pub fn new(
        repository: StreamMatchCacheRepository,
        purge_after_generations: i64,
        purge_failed_after_generations: i64,
    ) -> Self {
        Self {
            repository,
            purge_after_generations,
            purge_failed_after_generations,
            stats: CacheStats::default(),
        }
    }

    pub async fn get(
        &self,
        group_id: Uuid,
        stream_id: i64,
        stream_name: &str,
        include_failed: bool,
    ) -> CacheResult<Option<CacheEntry>> {
        let fingerprint = compute_fingerprint(group_id, stream_id, stream_name);
        let row = self.repository.get(&fingerprint).await?;

        match row {
            Some(row) if row.is_failed() && !include_failed => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
            Some(row) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                Ok(Some(to_entry(row)))
            }
            None => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    pub async fn is_user_corrected(
        &self,
        group_id: Uuid,
        stream_id: i64,
        stream_name: &str,
    ) -> CacheResult<bool> {
        Ok(self
            .get(group_id, stream_id, stream_name, true)
            .await?
            .is_some_and(|e| e.user_corrected))
    }

    pub async fn is_failed_cached(
        &self,
        group_id: Uuid,
        stream_id: i64,
        stream_name: &str,
    ) -> CacheResult<bool> {
        Ok(self
            .get(group_id, stream_id, stream_name, true)
            .await?
            .is_some_and(|e| e.is_failed()))
    }

    /// Cache a successful match. No-op (by virtue of the repository's
    /// `user_corrected`-respecting upsert) if the entry is pinned by a user
    /// correction.
    #[allow(clippy::too_many_arguments)]
    pub async fn set(
        &self,
        group_id: Uuid,
        stream_id: i64,
        stream_name: &str,
        event_id: &str,
        league: &str,
        cached_data: serde_json::Value,
        generation: i64,
        match_method: &str,
    ) -> CacheResult<()> {
        if self.is_user_corrected(group_id, stream_id, stream_name).await? {
            return Ok(());
        }

        let fingerprint = compute_fingerprint(group_id, stream_id, stream_name);
        self.repository
            .upsert(StreamCacheRow {
                fingerprint,
                group_id,
                stream_id,
                stream_name: stream_name.to_string(),
                event_id: event_id.to_string(),
                league: league.to_string(),
                cached_data: Some(cached_data),
                match_method: match_method.to_string(),
                user_corrected: false,
                last_seen_generation: generation,
            })
            .await?;
        self.stats.sets.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    pub async fn set_failed(
        &self,
        group_id: Uuid,
        stream_id: i64,
        stream_name: &str,
        generation: i64,
    ) -> CacheResult<()> {
        if self.is_user_corrected(group_id, stream_id, stream_name).await? {
            return Ok(());
        }

        let fingerprint = compute_fingerprint(group_id, stream_id, stream_name);
        self.repository
            .upsert(StreamCacheRow {
                fingerprint,
                group_id,
                stream_id,
                stream_name: stream_name.to_string(),
                event_id: FAILED_MATCH_EVENT_ID.to_string(),
                league: String::new(),
                cached_data: None,
                match_method: "no_match".to_string(),
                user_corrected: false,
                last_seen_generation: generation,
            })
            .await?;
        self.stats.failed_cached.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    pub async fn set_user_correction(
        &self,
        group_id: Uuid,
        stream_id: i64,
        stream_name: &str,
        event_id: &str,
        league: &str,
        cached_data: serde_json::Value,
    ) -> CacheResult<()> {
        let fingerprint = compute_fingerprint(group_id, stream_id, stream_name);
        self.repository
            .upsert(StreamCacheRow {
                fingerprint,
                group_id,
                stream_id,
                stream_name: stream_name.to_string(),
                event_id: event_id.to_string(),
                league: league.to_string(),
                cached_data: Some(cached_data),
                match_method: "user_corrected".to_string(),
                user_corrected: true,
                last_seen_generation: 0,
            })
            .await?;
        self.stats.user_corrections.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    pub async fn remove_user_correction(
        &self,
        group_id: Uuid,
        stream_id: i64,
        stream_name: &str,
    ) -> CacheResult<()> {
        let fingerprint = compute_fingerprint(group_id, stream_id, stream_name);
        self.repository.delete(&fingerprint).await
    }

    pub async fn touch(
        &self,
        group_id: Uuid,
        stream_id: i64,
        stream_name: &str,
        generation: i64,
    ) -> CacheResult<()> {
        let fingerprint = compute_fingerprint(group_id, stream_id, stream_name);
        self.repository.touch(&fingerprint, generation).await
    }

    /// Purges non-user-corrected entries past their horizon. Failed matches
    /// use a shorter horizon than successful ones so streams that never
    /// match get re-attempted sooner.
    pub async fn purge_stale(&self, current_generation: i64) -> CacheResult<u64> {
        let purged = self
            .repository
            .purge_stale(
                current_generation,
                self.purge_after_generations,
                self.purge_failed_after_generations,
            )
            .await?;
        self.stats.purged.fetch_add(purged, Ordering::Relaxed);
        Ok(purged)
    }

    pub async fn delete(&self, group_id: Uuid, stream_id: i64, stream_name: &str) -> CacheResult<()> {
        let fingerprint = compute_fingerprint(group_id, stream_id, stream_name);
        self.repository.delete(&fingerprint).await
    }

    pub async fn clear_group(&self, group_id: Uuid) -> CacheResult<u64> {
        self.repository.clear_group(group_id).await
    }

    pub async fn clear_all(&self) -> CacheResult<u64> {
        self.repository.clear_all().await
    }

    pub fn get_stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    pub async fn get_size(&self) -> CacheResult<u64> {
        self.repository.count().await
    }
}

fn to_entry(row: StreamCacheRow) -> CacheEntry {
    CacheEntry {
        event_id: row.event_id,
        league: row.league,
        cached_data: row.cached_data,
        match_method: Some(row.match_method),
        user_corrected: row.user_corrected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_changes_when_name_changes() {
        let group = Uuid::nil();
        let a = compute_fingerprint(group, 42, "ESPN+ Channel 1");
        let b = compute_fingerprint(group, 42, "ESPN+ Channel 2");
        assert_ne!(a, b);
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let group = Uuid::nil();
        let a = compute_fingerprint(group, 7, "Sky Sports Main Event");
        let b = compute_fingerprint(group, 7, "Sky Sports Main Event");
        assert_eq!(a, b);
    }
}
