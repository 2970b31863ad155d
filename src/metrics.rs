use crate::storage::Storage;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One search attempt as seen by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub timestamp: DateTime<Utc>,
    pub execution_time_ms: f64,
    pub success: bool,
}

/// Persisted search telemetry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchMetrics {
    pub total_searches: u64,
    pub successful_searches: u64,
    pub last_execution_time_ms: f64,
    pub average_response_time_ms: f64,
    pub history: VecDeque<MetricRecord>,
}

impl SearchMetrics {
    pub fn success_rate(&self) -> f64 {
        if self.total_searches == 0 {
            0.0
        } else {
            self.successful_searches as f64 / self.total_searches as f64
        }
    }
}

/// Rolling-window aggregation over recent search attempts.
pub struct MetricsAggregator {
    metrics: SearchMetrics,
    window: usize,
    storage: Storage,
}

impl MetricsAggregator {
    pub fn load(storage: Storage, window: usize) -> Result<Self> {
        let mut metrics = storage.load_metrics()?.unwrap_or_default();
        while metrics.history.len() > window {
            metrics.history.pop_front();
        }
        Ok(Self {
            metrics,
            window,
            storage,
        })
    }

    /// Record one attempt and persist the new state
    pub fn record(&mut self, execution_time_ms: f64, success: bool) -> Result<()> {
        let metrics = &mut self.metrics;

        metrics.history.push_back(MetricRecord {
            timestamp: Utc::now(),
            execution_time_ms,
            success,
        });
        while metrics.history.len() > self.window {
            metrics.history.pop_front();
        }

        metrics.total_searches += 1;
        if success {
            metrics.successful_searches += 1;
        }
        metrics.last_execution_time_ms = execution_time_ms;

        let (sum, count) = metrics
            .history
            .iter()
            .filter(|record| record.success)
            .fold((0.0, 0usize), |(sum, count), record| {
                (sum + record.execution_time_ms, count + 1)
            });
        metrics.average_response_time_ms = if count == 0 { 0.0 } else { sum / count as f64 };

        self.storage.save_metrics(&self.metrics)
    }

    pub fn snapshot(&self) -> SearchMetrics {
        self.metrics.clone()
    }
}
