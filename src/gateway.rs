//! Backend call executor.
//!
//! The gateway owns the transport, the per-call timeout and the latency
//! counters. It never touches search state; recovery is the caller's job.

use crate::error::{GatewayError, GatewayResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// A single backend call, independent of the transport carrying it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub endpoint: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            endpoint: endpoint.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post<B: Serialize>(endpoint: impl Into<String>, body: &B) -> GatewayResult<Self> {
        Ok(Self {
            method: Method::Post,
            endpoint: endpoint.into(),
            query: Vec::new(),
            body: Some(serde_json::to_value(body)?),
        })
    }

    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Carries an [`ApiRequest`] to the backend and returns the JSON body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> GatewayResult<serde_json::Value>;
}

/// HTTP transport over `reqwest`
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> GatewayResult<serde_json::Value> {
        let url = format!("{}{}", self.base_url, request.endpoint);

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointStats {
    pub requests: u64,
    pub successes: u64,
    pub failures: u64,
}

/// Point-in-time view of the gateway counters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GatewayStats {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub average_latency_ms: f64,
    pub latency_samples: usize,
    pub endpoints: BTreeMap<String, EndpointStats>,
}

struct Counters {
    total: u64,
    successes: u64,
    failures: u64,
    latencies: VecDeque<f64>,
    window: usize,
    endpoints: BTreeMap<String, EndpointStats>,
}

impl Counters {
    fn begin(&mut self, endpoint: &str) {
        self.total += 1;
        self.endpoints.entry(endpoint.to_string()).or_default().requests += 1;
    }

    /// `latency_ms` is `None` for a failed call
    fn finish(&mut self, endpoint: &str, latency_ms: Option<f64>) {
        let endpoint = self.endpoints.entry(endpoint.to_string()).or_default();

        match latency_ms {
            Some(latency_ms) => {
                self.successes += 1;
                endpoint.successes += 1;
                self.latencies.push_back(latency_ms);
                while self.latencies.len() > self.window {
                    self.latencies.pop_front();
                }
            }
            None => {
                self.failures += 1;
                endpoint.failures += 1;
            }
        }
    }

    fn average(&self) -> f64 {
        if self.latencies.is_empty() {
            0.0
        } else {
            self.latencies.iter().sum::<f64>() / self.latencies.len() as f64
        }
    }
}

pub struct RequestGateway {
    transport: Arc<dyn Transport>,
    timeout: Duration,
    counters: Mutex<Counters>,
}

impl RequestGateway {
    pub fn new(transport: Arc<dyn Transport>, timeout: Duration, latency_window: usize) -> Self {
        Self {
            transport,
            timeout,
            counters: Mutex::new(Counters {
                total: 0,
                successes: 0,
                failures: 0,
                latencies: VecDeque::with_capacity(latency_window),
                window: latency_window.max(1),
                endpoints: BTreeMap::new(),
            }),
        }
    }

    /// Run one call under the timeout and decode the body into `T`.
    ///
    /// The attempt is counted before the call starts, so a call whose future
    /// is dropped midway still shows in `total_requests`.
    #[tracing::instrument(skip(self, request), fields(method = %request.method, endpoint = %request.endpoint))]
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> GatewayResult<T> {
        self.counters.lock().begin(&request.endpoint);
        let started = Instant::now();

        let result = match tokio::time::timeout(self.timeout, self.transport.send(&request)).await {
            Ok(Ok(value)) => serde_json::from_value::<T>(value).map_err(GatewayError::from),
            Ok(Err(err)) => Err(err),
            Err(_) => Err(GatewayError::Timeout(self.timeout)),
        };

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        let latency_ms = match &result {
            Ok(_) => {
                tracing::debug!(elapsed_ms, "Backend call succeeded");
                Some(elapsed_ms)
            }
            Err(err) => {
                tracing::warn!(elapsed_ms, error = %err, "Backend call failed");
                None
            }
        };
        self.counters.lock().finish(&request.endpoint, latency_ms);

        result
    }

    pub fn stats(&self) -> GatewayStats {
        let counters = self.counters.lock();
        GatewayStats {
            total_requests: counters.total,
            successful_requests: counters.successes,
            failed_requests: counters.failures,
            average_latency_ms: counters.average(),
            latency_samples: counters.latencies.len(),
            endpoints: counters.endpoints.clone(),
        }
    }
}
