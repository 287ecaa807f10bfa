//! Top-level generation run: the batch pipeline spec.md §2 diagrams as
//! `Scheduler -> Generation Driver -> (fetch, match, lifecycle, render,
//! enforce, housekeep)`.
//!
//! Grounded on `teamarr/consumers/orchestrator.py` (stage ordering) and
//! `teamarr/consumers/generation.py` (run bookkeeping).

use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::cache::StreamMatchCache;
use crate::channel_gateway::ChannelGateway;
use crate::config::Config;
use crate::database::repositories::{AuditRepository, GroupRepository, ManagedChannelRepository};
use crate::database::Database;
use crate::enforcement::{cross_group, is_aggregator_orphan, is_orphan, keyword_ordering};
use crate::errors::TeamarrResult;
use crate::group_processor::{topo_sort, GroupProcessor, GroupRunSummary};
use crate::lifecycle::NumberingPlan;
use crate::matching::StreamMatcher;
use crate::models::audit::{ChannelHistoryEntry, ProcessingRun, RunStatus};
use crate::models::channel::ManagedChannel;

/// Owns one full run of every enabled group, bracketed by a
/// `ProcessingRun` audit row, and the enforcement/housekeeping sweeps
/// that follow it.
pub struct GenerationDriver {
    database: Database,
    groups: GroupRepository,
    channels: ManagedChannelRepository,
    audit: AuditRepository,
    processor: GroupProcessor,
    gateway: Arc<dyn ChannelGateway>,
    cache: Arc<StreamMatchCache>,
}

impl GenerationDriver {
    pub fn new(
        database: Database,
        groups: GroupRepository,
        channels: ManagedChannelRepository,
        audit: AuditRepository,
        matcher: StreamMatcher,
        gateway: Arc<dyn ChannelGateway>,
        cache: Arc<StreamMatchCache>,
        config: &Config,
    ) -> Self {
        let numbering = NumberingPlan::new(
            config.channel_numbering.range_start,
            config.channel_numbering.range_end.unwrap_or(u32::MAX),
        );
        let processor = GroupProcessor::new(matcher, channels.clone(), audit.clone(), gateway.clone(), numbering);
        Self {
            database,
            groups,
            channels,
            audit,
            processor,
            gateway,
            cache,
        }
    }

    /// Runs every enabled group once, in topological order, then the
    /// enforcement and housekeeping sweeps. Failures in one group never
    /// abort the run for the others — each is recorded and the run is
    /// still marked `Success` unless the generation counter itself or the
    /// run bookkeeping fails.
    pub async fn run(&self) -> TeamarrResult<Vec<GroupRunSummary>> {
        let run_id = Uuid::new_v4();
        let generation = self.database.increment_generation_counter().await?;
        let started_at = Utc::now();

        self.audit
            .start_run(ProcessingRun {
                id: run_id,
                generation,
                started_at,
                finished_at: None,
                status: RunStatus::Running,
                errors: Vec::new(),
            })
            .await?;

        info!(generation, %run_id, "starting generation run");

        let groups = self.groups.all_enabled().await?;
        let order = topo_sort(&groups);
        let by_id: std::collections::HashMap<Uuid, _> = groups.into_iter().map(|g| (g.id, g)).collect();

        let mut summaries = Vec::with_capacity(order.len());
        let mut errors = Vec::new();

        for group_id in order {
            let Some(group) = by_id.get(&group_id) else { continue };
            if !group.enabled {
                continue;
            }

            let streams = match self.gateway.list_streams_in_m3u_group(&group.name, group.id).await {
                Ok(streams) => streams,
                Err(e) => {
                    warn!(group = %group.name, error = %e, "failed to fetch stream pool for group");
                    errors.push(format!("group {}: stream fetch failed: {e}", group.name));
                    continue;
                }
            };

            self.groups.set_total_stream_count(group.id, streams.len() as u32).await?;

            match self
                .processor
                .process_group(group, streams, generation, run_id, Utc::now(), None)
                .await
            {
                Ok(summary) => {
                    info!(
                        group = %group.name,
                        matched = summary.matched,
                        filtered = summary.filtered,
                        failed = summary.failed,
                        channels_created = summary.channels_created,
                        "group processed"
                    );
                    summaries.push(summary);
                }
                Err(e) => {
                    error!(group = %group.name, error = %e, "group processing failed");
                    errors.push(format!("group {}: {e}", group.name));
                }
            }
        }

        let disabled_count = self.sweep_disabled_groups().await.unwrap_or_else(|e| {
            errors.push(format!("disabled-group cleanup failed: {e}"));
            0
        });
        let consolidated_count = self.sweep_cross_group_duplicates().await.unwrap_or_else(|e| {
            errors.push(format!("cross-group consolidation failed: {e}"));
            0
        });
        let reordered_count = self.sweep_keyword_ordering().await.unwrap_or_else(|e| {
            errors.push(format!("keyword ordering sweep failed: {e}"));
            0
        });
        let orphan_count = self.sweep_orphans().await.unwrap_or_else(|e| {
            errors.push(format!("orphan sweep failed: {e}"));
            0
        });
        let aggregator_orphan_count = self.sweep_aggregator_orphans().await.unwrap_or_else(|e| {
            errors.push(format!("aggregator orphan sweep failed: {e}"));
            0
        });
        let deleted_count = self.sweep_scheduled_deletions(Utc::now()).await.unwrap_or_else(|e| {
            errors.push(format!("deletion sweep failed: {e}"));
            0
        });
        let epg_associated = self.associate_epg().await.unwrap_or_else(|e| {
            errors.push(format!("epg association failed: {e}"));
            0
        });
        let purged = self.cache.purge_stale(generation).await.unwrap_or_else(|e| {
            errors.push(format!("cache purge failed: {e}"));
            0
        });

        info!(
            disabled_count,
            consolidated_count,
            reordered_count,
            orphan_count,
            aggregator_orphan_count,
            deleted_count,
            epg_associated,
            purged,
            "enforcement and housekeeping complete"
        );

        let status = if errors.is_empty() { RunStatus::Success } else { RunStatus::Failed };
        self.audit.finish_run(run_id, status, errors, Utc::now()).await?;

        Ok(summaries)
    }

    async fn sweep_orphans(&self) -> TeamarrResult<u32> {
        let groups = self.groups.all_enabled().await?;
        let mut count = 0;
        for group in groups {
            for channel in self.channels.find_for_group(group.id, false).await? {
                let streams = self.channels.streams_for_channel(channel.id, true).await?;
                if is_orphan(&streams) {
                    self.channels.mark_deleted(channel.id, "all streams removed").await?;
                    if let Some(dispatcharr_id) = channel.dispatcharr_channel_id {
                        self.gateway.delete_channel(dispatcharr_id).await.ok();
                    }
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    async fn sweep_scheduled_deletions(&self, now: chrono::DateTime<Utc>) -> TeamarrResult<u32> {
        let due = self.channels.due_for_deletion(now).await?;
        let count = due.len() as u32;
        for channel in due {
            self.channels.mark_deleted(channel.id, "delete timing elapsed").await?;
            if let Some(dispatcharr_id) = channel.dispatcharr_channel_id {
                self.gateway.delete_channel(dispatcharr_id).await.ok();
            }
        }
        Ok(count)
    }

    /// Retires every channel left behind by a group that was disabled
    /// since the last run (spec.md §4.7) — `all_enabled` in the main loop
    /// above never sees these groups again, so nothing else would ever
    /// clean them up.
    async fn sweep_disabled_groups(&self) -> TeamarrResult<u32> {
        let disabled = self.groups.all_disabled().await?;
        let mut count = 0;
        for group in disabled {
            for channel in self.channels.find_for_group(group.id, false).await? {
                self.channels.mark_deleted(channel.id, "owning group disabled").await?;
                self.record_history(channel.id, "disabled_group_cleanup", "owning group disabled").await?;
                if let Some(dispatcharr_id) = channel.dispatcharr_channel_id {
                    self.gateway.delete_channel(dispatcharr_id).await.ok();
                }
                count += 1;
            }
        }
        Ok(count)
    }

    /// Folds every cross-group duplicate set (spec.md §4.7 scenario S5)
    /// into its winner: moves the losers' streams onto the winner channel,
    /// soft-deletes the losers, and leaves a history row behind for both
    /// sides of every fold.
    async fn sweep_cross_group_duplicates(&self) -> TeamarrResult<u32> {
        let groups_by_id: HashMap<Uuid, _> =
            self.groups.all_enabled().await?.into_iter().map(|g| (g.id, g)).collect();
        let active = self.channels.find_all_active().await?;
        let duplicate_sets = cross_group::find_duplicate_sets(active);

        let mut count = 0;
        for (winner, losers) in duplicate_sets {
            for loser in losers {
                let Some(loser_group) = groups_by_id.get(&loser.event_epg_group_id) else { continue };
                if !cross_group::should_consolidate(loser_group.overlap_handling) {
                    continue;
                }

                let moved = self.channels.reassign_streams(loser.id, winner.id).await?;
                if let Some(winner_dispatcharr_id) = winner.dispatcharr_channel_id {
                    for stream in &moved {
                        self.gateway
                            .attach_stream(winner_dispatcharr_id, stream.dispatcharr_stream_id, stream.priority)
                            .await
                            .ok();
                    }
                }

                self.channels.mark_deleted(loser.id, "cross_group_consolidation").await?;
                if let Some(dispatcharr_id) = loser.dispatcharr_channel_id {
                    self.gateway.delete_channel(dispatcharr_id).await.ok();
                }

                self.record_history(winner.id, "cross_group_consolidation", "absorbed duplicate from another group")
                    .await?;
                self.record_history(loser.id, "cross_group_consolidation", "consolidated into duplicate in another group")
                    .await?;
                count += 1;
            }
        }
        Ok(count)
    }

    /// Guarantees every matched main/keyword channel pair sorts main
    /// before keyword (spec.md §4.7) by swapping their numbers whenever a
    /// keyword channel happened to land at or below its main channel.
    async fn sweep_keyword_ordering(&self) -> TeamarrResult<u32> {
        let groups = self.groups.all_enabled().await?;
        let mut count = 0;
        for group in groups {
            let channels = self.channels.find_for_group(group.id, false).await?;
            let mut by_event: HashMap<(String, String), Vec<ManagedChannel>> = HashMap::new();
            for channel in channels {
                by_event
                    .entry((channel.event_id.clone(), channel.event_provider.clone()))
                    .or_default()
                    .push(channel);
            }

            for set in by_event.values() {
                for (main, keyword) in keyword_ordering::pair_main_with_keyword_channels(set) {
                    if !keyword_ordering::is_misordered(main, keyword) {
                        continue;
                    }
                    let (main_number, keyword_number) = (main.channel_number, keyword.channel_number);
                    self.channels.renumber(main.id, keyword_number).await?;
                    self.channels.renumber(keyword.id, main_number).await?;
                    if let Some(dispatcharr_id) = main.dispatcharr_channel_id {
                        self.gateway.renumber_channel(dispatcharr_id, keyword_number).await.ok();
                    }
                    if let Some(dispatcharr_id) = keyword.dispatcharr_channel_id {
                        self.gateway.renumber_channel(dispatcharr_id, main_number).await.ok();
                    }
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    /// Deletes aggregator channels carrying teamarr's `teamarr-event-`
    /// tvg-id prefix that no longer correspond to any active
    /// `ManagedChannel` (spec.md §4.7) — distinct from `sweep_orphans`,
    /// which reconciles this crate's own bookkeeping against the streams
    /// still attached to a channel it already knows about.
    async fn sweep_aggregator_orphans(&self) -> TeamarrResult<u32> {
        let known: HashSet<String> =
            self.channels.find_all_active().await?.into_iter().map(|c| c.tvg_id).collect();
        let gateway_channels = self.gateway.list_channels().await?;
        let mut count = 0;
        for channel in gateway_channels {
            if is_aggregator_orphan(&channel.tvg_id, &known) {
                self.gateway.delete_channel(channel.id).await.ok();
                count += 1;
            }
        }
        Ok(count)
    }

    /// Links each active `ManagedChannel`'s current EPG record by asking
    /// the aggregator for its tvg_id-keyed EPG lookup once (spec.md §4.6)
    /// rather than once per channel.
    async fn associate_epg(&self) -> TeamarrResult<u32> {
        let lookup = self.gateway.build_epg_lookup().await?;
        let mut count = 0;
        for channel in self.channels.find_all_active().await? {
            let Some(epg_data_id) = lookup.get(&channel.tvg_id) else { continue };
            let Some(dispatcharr_id) = channel.dispatcharr_channel_id else { continue };
            if self.gateway.set_channel_epg(dispatcharr_id, epg_data_id).await.is_ok() {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn record_history(&self, channel_id: Uuid, action: &str, reason: &str) -> TeamarrResult<()> {
        self.audit
            .record_channel_history(ChannelHistoryEntry {
                id: Uuid::new_v4(),
                channel_id,
                action: action.to_string(),
                reason: reason.to_string(),
                recorded_at: Utc::now(),
            })
            .await
    }
}
