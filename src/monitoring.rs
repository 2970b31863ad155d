//! Read-only monitoring endpoints. Payloads are handed through untouched.

use crate::api;
use crate::error::GatewayResult;
use crate::gateway::{ApiRequest, RequestGateway};
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct MonitoringClient {
    gateway: Arc<RequestGateway>,
}

impl MonitoringClient {
    pub fn new(gateway: Arc<RequestGateway>) -> Self {
        Self { gateway }
    }

    pub async fn source_health(&self) -> GatewayResult<Value> {
        self.gateway.execute(ApiRequest::get(api::SOURCE_HEALTH)).await
    }

    /// Health of one source, by source identifier
    pub async fn source_health_for(&self, source_id: &str) -> GatewayResult<Value> {
        let endpoint = format!("{}/{}", api::SOURCE_HEALTH, source_id.trim_matches('/'));
        self.gateway.execute(ApiRequest::get(endpoint)).await
    }

    pub async fn system_status(&self) -> GatewayResult<Value> {
        self.gateway.execute(ApiRequest::get(api::SYSTEM_STATUS)).await
    }

    /// Search pattern analytics over the last `days` days
    pub async fn search_patterns(&self, days: u32) -> GatewayResult<Value> {
        let request = ApiRequest::get(api::SEARCH_PATTERNS).with_query("days", days);
        self.gateway.execute(request).await
    }
}
