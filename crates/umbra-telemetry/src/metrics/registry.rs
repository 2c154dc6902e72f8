// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Registry for pipeline metrics.

use crate::storage::{InMemoryBackend, MetricsBackend};
use std::sync::Arc;
use umbra_core::telemetry::{Metric, MetricId, MetricType, MetricsError, MetricsResult};

/// Entry point for registering and reading metrics.
///
/// Registration returns a handle bound to the metric's id; handles are
/// `Clone` and share the registry's backend.
#[derive(Debug, Clone)]
pub struct MetricsRegistry {
    backend: Arc<dyn MetricsBackend>,
}

impl MetricsRegistry {
    /// Creates a registry over a fresh [`InMemoryBackend`].
    pub fn new() -> Self {
        Self::with_backend(Arc::new(InMemoryBackend::new()))
    }

    /// Creates a registry over a custom backend.
    pub fn with_backend(backend: Arc<dyn MetricsBackend>) -> Self {
        Self { backend }
    }

    /// Registers a counter starting at zero.
    ///
    /// Registering an id twice resets it.
    pub fn register_counter(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> MetricsResult<CounterHandle> {
        let id = MetricId::new(namespace, name);
        self.backend
            .put_metric(Metric::counter(id.clone(), description))?;
        log::trace!("Registered counter '{id}'");
        Ok(CounterHandle {
            id,
            backend: self.backend.clone(),
        })
    }

    /// Registers a gauge starting at zero.
    pub fn register_gauge(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        unit: impl Into<String>,
    ) -> MetricsResult<GaugeHandle> {
        let id = MetricId::new(namespace, name);
        self.backend
            .put_metric(Metric::gauge(id.clone(), description, unit))?;
        log::trace!("Registered gauge '{id}'");
        Ok(GaugeHandle {
            id,
            backend: self.backend.clone(),
        })
    }

    /// Reads a metric.
    pub fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric> {
        self.backend.get_metric(id)
    }

    /// Every registered metric, sorted by id for stable output.
    pub fn snapshot(&self) -> Vec<Metric> {
        let mut metrics = self.backend.list_all_metrics();
        metrics.sort_by_key(|m| m.id.to_string());
        metrics
    }

    /// Removes every metric. Existing handles start failing with
    /// [`MetricsError::MetricNotFound`].
    pub fn clear_all(&self) -> MetricsResult<()> {
        self.backend.clear_all()
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Update handle for a counter.
#[derive(Debug, Clone)]
pub struct CounterHandle {
    id: MetricId,
    backend: Arc<dyn MetricsBackend>,
}

impl CounterHandle {
    /// Adds one and returns the new value.
    pub fn increment(&self) -> MetricsResult<u64> {
        self.increment_by(1)
    }

    /// Adds `amount` and returns the new value.
    pub fn increment_by(&self, amount: u64) -> MetricsResult<u64> {
        self.backend.increment_counter(&self.id, amount)
    }

    /// The current value.
    pub fn get(&self) -> MetricsResult<u64> {
        let value = self.backend.get_metric(&self.id)?.value;
        value.as_counter().ok_or(MetricsError::TypeMismatch {
            expected: MetricType::Counter,
            found: value.metric_type(),
        })
    }

    /// The metric id.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}

/// Update handle for a gauge.
#[derive(Debug, Clone)]
pub struct GaugeHandle {
    id: MetricId,
    backend: Arc<dyn MetricsBackend>,
}

impl GaugeHandle {
    /// Overwrites the value.
    pub fn set(&self, value: f64) -> MetricsResult<()> {
        self.backend.set_gauge(&self.id, value)
    }

    /// Adds `delta` and returns the new value.
    pub fn add(&self, delta: f64) -> MetricsResult<f64> {
        let updated = self.get()? + delta;
        self.set(updated)?;
        Ok(updated)
    }

    /// The current value.
    pub fn get(&self) -> MetricsResult<f64> {
        let value = self.backend.get_metric(&self.id)?.value;
        value.as_gauge().ok_or(MetricsError::TypeMismatch {
            expected: MetricType::Gauge,
            found: value.metric_type(),
        })
    }

    /// The metric id.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}
