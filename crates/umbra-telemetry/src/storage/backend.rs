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

use std::fmt::Debug;
use umbra_core::telemetry::{Metric, MetricId, MetricType, MetricValue, MetricsError, MetricsResult};

/// Storage for metric values.
///
/// Backends only need the four primitive operations; counter and gauge
/// updates are provided on top of them.
pub trait MetricsBackend: Send + Sync + Debug + 'static {
    /// Stores or replaces a metric.
    fn put_metric(&self, metric: Metric) -> MetricsResult<()>;

    /// Retrieves a metric by id.
    fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric>;

    /// Every stored metric.
    fn list_all_metrics(&self) -> Vec<Metric>;

    /// Removes every metric.
    fn clear_all(&self) -> MetricsResult<()>;

    /// Adds `delta` to a counter and returns the new value.
    fn increment_counter(&self, id: &MetricId, delta: u64) -> MetricsResult<u64> {
        let mut metric = self.get_metric(id)?;
        match metric.value {
            MetricValue::Counter(value) => {
                let updated = value.saturating_add(delta);
                metric.value = MetricValue::Counter(updated);
                self.put_metric(metric)?;
                Ok(updated)
            }
            other => Err(MetricsError::TypeMismatch {
                expected: MetricType::Counter,
                found: other.metric_type(),
            }),
        }
    }

    /// Overwrites a gauge.
    fn set_gauge(&self, id: &MetricId, value: f64) -> MetricsResult<()> {
        let mut metric = self.get_metric(id)?;
        match metric.value {
            MetricValue::Gauge(_) => {
                metric.value = MetricValue::Gauge(value);
                self.put_metric(metric)
            }
            other => Err(MetricsError::TypeMismatch {
                expected: MetricType::Gauge,
                found: other.metric_type(),
            }),
        }
    }
}
