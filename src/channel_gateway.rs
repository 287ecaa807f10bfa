//! Abstraction over the external channel/EPG manager (Dispatcharr) spec.md
//! §6 names as a collaborator outside this crate's scope. Kept as a trait
//! so the lifecycle/group-processor code never depends on Dispatcharr's
//! wire format directly, and so tests can substitute an in-memory fake.
//!
//! Grounded on the teacher's `reqwest::Client` usage pattern
//! (`sources/m3u.rs`) for the concrete implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use std::collections::HashMap;

use crate::config::DispatcharrConfig;
use crate::errors::{LifecycleError, LifecycleResult};
use crate::models::stream::Stream;

/// One aggregator-side channel as Dispatcharr reports it, for the orphan
/// reconciliation sweep (spec.md §4.7) and the EPG-association step
/// (spec.md §4.6) — both need to walk the aggregator's own channel list,
/// not just this crate's `ManagedChannel` bookkeeping.
#[derive(Debug, Clone)]
pub struct GatewayChannel {
    pub id: i64,
    pub tvg_id: String,
}

#[async_trait]
pub trait ChannelGateway: Send + Sync {
    async fn create_channel(&self, name: &str, number: u32, tvg_id: &str) -> LifecycleResult<i64>;
    async fn rename_channel(&self, channel_id: i64, name: &str) -> LifecycleResult<()>;
    async fn renumber_channel(&self, channel_id: i64, number: u32) -> LifecycleResult<()>;
    async fn delete_channel(&self, channel_id: i64) -> LifecycleResult<()>;
    async fn attach_stream(&self, channel_id: i64, stream_id: i64, priority: i32) -> LifecycleResult<()>;
    async fn detach_stream(&self, channel_id: i64, stream_id: i64) -> LifecycleResult<()>;

    /// The "M3U refresh" step (spec.md §2 stage 1) is an external concern;
    /// this is the read side of it the core depends on, keyed by the
    /// upstream M3U group name the core's `EventEpgGroup.name` mirrors.
    async fn list_streams_in_m3u_group(&self, m3u_group_name: &str, group_id: Uuid) -> LifecycleResult<Vec<Stream>>;

    /// Every channel the aggregator currently knows about, for the orphan
    /// reconciliation sweep (spec.md §4.7).
    async fn list_channels(&self) -> LifecycleResult<Vec<GatewayChannel>>;

    async fn get_channel(&self, channel_id: i64) -> LifecycleResult<Option<GatewayChannel>>;

    /// The aggregator's EPG records keyed by `tvg_id`, so the EPG-association
    /// step (spec.md §4.6) can look up which record belongs to a given
    /// `ManagedChannel` without a separate call per channel.
    async fn build_epg_lookup(&self) -> LifecycleResult<HashMap<String, String>>;

    async fn set_channel_epg(&self, channel_id: i64, epg_data_id: &str) -> LifecycleResult<()>;

    async fn add_to_profile(&self, channel_id: i64, profile_id: i64) -> LifecycleResult<()>;
}

pub struct DispatcharrGateway {
    client: Client,
    base_url: String,
    username: String,
    password: String,
    token: RwLock<Option<String>>,
}

impl DispatcharrGateway {
    pub fn new(config: &DispatcharrConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent("teamarr/0.1")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            token: RwLock::new(None),
        }
    }

    async fn bearer_token(&self) -> LifecycleResult<String> {
        if let Some(token) = self.token.read().await.clone() {
            return Ok(token);
        }
        self.login().await
    }

    async fn login(&self) -> LifecycleResult<String> {
        #[derive(Deserialize)]
        struct LoginResponse {
            access: String,
        }

        let response = self
            .client
            .post(format!("{}/api/accounts/token/", self.base_url))
            .json(&serde_json::json!({ "username": self.username, "password": self.password }))
            .send()
            .await
            .map_err(|e| LifecycleError::Gateway(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LifecycleError::Gateway(format!(
                "dispatcharr login failed with status {}",
                response.status()
            )));
        }

        let body: LoginResponse = response.json().await.map_err(|e| LifecycleError::Gateway(e.to_string()))?;
        *self.token.write().await = Some(body.access.clone());
        Ok(body.access)
    }

    async fn authed_request(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> LifecycleResult<reqwest::RequestBuilder> {
        let token = self.bearer_token().await?;
        Ok(self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(token))
    }
}

#[async_trait]
impl ChannelGateway for DispatcharrGateway {
    async fn create_channel(&self, name: &str, number: u32, tvg_id: &str) -> LifecycleResult<i64> {
        #[derive(Deserialize)]
        struct CreateResponse {
            id: i64,
        }

        let response = self
            .authed_request(reqwest::Method::POST, "/api/channels/channels/")
            .await?
            .json(&serde_json::json!({
                "name": name,
                "channel_number": number,
                "tvg_id": tvg_id,
            }))
            .send()
            .await
            .map_err(|e| LifecycleError::Gateway(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LifecycleError::Gateway(format!(
                "create_channel failed with status {}",
                response.status()
            )));
        }

        let body: CreateResponse = response.json().await.map_err(|e| LifecycleError::Gateway(e.to_string()))?;
        Ok(body.id)
    }

    async fn rename_channel(&self, channel_id: i64, name: &str) -> LifecycleResult<()> {
        self.authed_request(reqwest::Method::PATCH, &format!("/api/channels/channels/{channel_id}/"))
            .await?
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await
            .map_err(|e| LifecycleError::Gateway(e.to_string()))?;
        Ok(())
    }

    async fn renumber_channel(&self, channel_id: i64, number: u32) -> LifecycleResult<()> {
        self.authed_request(reqwest::Method::PATCH, &format!("/api/channels/channels/{channel_id}/"))
            .await?
            .json(&serde_json::json!({ "channel_number": number }))
            .send()
            .await
            .map_err(|e| LifecycleError::Gateway(e.to_string()))?;
        Ok(())
    }

    async fn delete_channel(&self, channel_id: i64) -> LifecycleResult<()> {
        self.authed_request(reqwest::Method::DELETE, &format!("/api/channels/channels/{channel_id}/"))
            .await?
            .send()
            .await
            .map_err(|e| LifecycleError::Gateway(e.to_string()))?;
        Ok(())
    }

    async fn attach_stream(&self, channel_id: i64, stream_id: i64, priority: i32) -> LifecycleResult<()> {
        self.authed_request(
            reqwest::Method::POST,
            &format!("/api/channels/channels/{channel_id}/streams/"),
        )
        .await?
        .json(&serde_json::json!({ "stream_id": stream_id, "priority": priority }))
        .send()
        .await
        .map_err(|e| LifecycleError::Gateway(e.to_string()))?;
        Ok(())
    }

    async fn detach_stream(&self, channel_id: i64, stream_id: i64) -> LifecycleResult<()> {
        self.authed_request(
            reqwest::Method::DELETE,
            &format!("/api/channels/channels/{channel_id}/streams/{stream_id}/"),
        )
        .await?
        .send()
        .await
        .map_err(|e| LifecycleError::Gateway(e.to_string()))?;
        Ok(())
    }

    async fn list_streams_in_m3u_group(&self, m3u_group_name: &str, group_id: Uuid) -> LifecycleResult<Vec<Stream>> {
        #[derive(Deserialize)]
        struct StreamEntry {
            id: i64,
            name: String,
            tvg_id: Option<String>,
            m3u_account: Option<i64>,
            is_stale: Option<bool>,
        }

        let response = self
            .authed_request(reqwest::Method::GET, "/api/channels/streams/")
            .await?
            .query(&[("channel_group", m3u_group_name)])
            .send()
            .await
            .map_err(|e| LifecycleError::Gateway(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LifecycleError::Gateway(format!(
                "list_streams_in_m3u_group failed with status {}",
                response.status()
            )));
        }

        let entries: Vec<StreamEntry> = response.json().await.map_err(|e| LifecycleError::Gateway(e.to_string()))?;
        Ok(entries
            .into_iter()
            .map(|e| Stream {
                id: e.id,
                name: e.name,
                tvg_id: e.tvg_id,
                group_id,
                account_id: e.m3u_account.map(|a| a.to_string()),
                stale: e.is_stale.unwrap_or(false),
            })
            .collect())
    }

    async fn list_channels(&self) -> LifecycleResult<Vec<GatewayChannel>> {
        #[derive(Deserialize)]
        struct ChannelEntry {
            id: i64,
            tvg_id: Option<String>,
        }

        let response = self
            .authed_request(reqwest::Method::GET, "/api/channels/channels/")
            .await?
            .send()
            .await
            .map_err(|e| LifecycleError::Gateway(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LifecycleError::Gateway(format!(
                "list_channels failed with status {}",
                response.status()
            )));
        }

        let entries: Vec<ChannelEntry> = response.json().await.map_err(|e| LifecycleError::Gateway(e.to_string()))?;
        Ok(entries
            .into_iter()
            .filter_map(|e| e.tvg_id.map(|tvg_id| GatewayChannel { id: e.id, tvg_id }))
            .collect())
    }

    async fn get_channel(&self, channel_id: i64) -> LifecycleResult<Option<GatewayChannel>> {
        #[derive(Deserialize)]
        struct ChannelEntry {
            id: i64,
            tvg_id: Option<String>,
        }

        let response = self
            .authed_request(reqwest::Method::GET, &format!("/api/channels/channels/{channel_id}/"))
            .await?
            .send()
            .await
            .map_err(|e| LifecycleError::Gateway(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(LifecycleError::Gateway(format!(
                "get_channel failed with status {}",
                response.status()
            )));
        }

        let entry: ChannelEntry = response.json().await.map_err(|e| LifecycleError::Gateway(e.to_string()))?;
        Ok(entry.tvg_id.map(|tvg_id| GatewayChannel { id: entry.id, tvg_id }))
    }

    async fn build_epg_lookup(&self) -> LifecycleResult<HashMap<String, String>> {
        #[derive(Deserialize)]
        struct EpgDataEntry {
            id: i64,
            tvg_id: String,
        }

        let response = self
            .authed_request(reqwest::Method::GET, "/api/epg/epgdata/")
            .await?
            .send()
            .await
            .map_err(|e| LifecycleError::Gateway(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LifecycleError::Gateway(format!(
                "build_epg_lookup failed with status {}",
                response.status()
            )));
        }

        let entries: Vec<EpgDataEntry> = response.json().await.map_err(|e| LifecycleError::Gateway(e.to_string()))?;
        Ok(entries.into_iter().map(|e| (e.tvg_id, e.id.to_string())).collect())
    }

    async fn set_channel_epg(&self, channel_id: i64, epg_data_id: &str) -> LifecycleResult<()> {
        self.authed_request(reqwest::Method::PATCH, &format!("/api/channels/channels/{channel_id}/"))
            .await?
            .json(&serde_json::json!({ "epg_data_id": epg_data_id }))
            .send()
            .await
            .map_err(|e| LifecycleError::Gateway(e.to_string()))?;
        Ok(())
    }

    async fn add_to_profile(&self, channel_id: i64, profile_id: i64) -> LifecycleResult<()> {
        self.authed_request(
            reqwest::Method::POST,
            &format!("/api/channels/profiles/{profile_id}/channels/"),
        )
        .await?
        .json(&serde_json::json!({ "channel_id": channel_id }))
        .send()
        .await
        .map_err(|e| LifecycleError::Gateway(e.to_string()))?;
        Ok(())
    }
}
