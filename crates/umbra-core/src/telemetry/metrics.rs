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

//! Abstract definitions for pipeline metrics.
//!
//! The pipeline reports two kinds of values: monotonically increasing
//! counters (atlas allocations, lights dropped past a capacity limit) and
//! gauges sampled once per frame (lights holding an atlas tile).

use std::fmt;

/// Identifies a metric as `namespace:name`, optionally refined by labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricId {
    /// The subsystem reporting the metric, e.g. `"shadows"`.
    pub namespace: String,
    /// The metric name within the namespace.
    pub name: String,
    /// Key-value labels, kept sorted by key.
    pub labels: Vec<(String, String)>,
}

impl MetricId {
    /// Creates an unlabelled id.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            labels: Vec::new(),
        }
    }

    /// Returns the id with one more label.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.push((key.into(), value.into()));
        self.labels.sort_by(|a, b| a.0.cmp(&b.0));
        self
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)?;
        if !self.labels.is_empty() {
            let labels: Vec<String> = self.labels.iter().map(|(k, v)| format!("{k}={v}")).collect();
            write!(f, "[{}]", labels.join(","))?;
        }
        Ok(())
    }
}

/// The kind of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    /// Only ever increases.
    Counter,
    /// Goes up and down.
    Gauge,
}

/// The current value of a metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    /// A counter value.
    Counter(u64),
    /// A gauge value.
    Gauge(f64),
}

impl MetricValue {
    /// The kind of metric holding this value.
    pub fn metric_type(&self) -> MetricType {
        match self {
            MetricValue::Counter(_) => MetricType::Counter,
            MetricValue::Gauge(_) => MetricType::Gauge,
        }
    }

    /// The counter value, if this is a counter.
    pub fn as_counter(&self) -> Option<u64> {
        match self {
            MetricValue::Counter(v) => Some(*v),
            MetricValue::Gauge(_) => None,
        }
    }

    /// The gauge value, if this is a gauge.
    pub fn as_gauge(&self) -> Option<f64> {
        match self {
            MetricValue::Gauge(v) => Some(*v),
            MetricValue::Counter(_) => None,
        }
    }
}

/// A registered metric: its id, description, unit, and current value.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    /// Identifier.
    pub id: MetricId,
    /// Human-readable description.
    pub description: String,
    /// Unit of measurement.
    pub unit: String,
    /// Current value.
    pub value: MetricValue,
}

impl Metric {
    /// A counter starting at zero.
    pub fn counter(id: MetricId, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            unit: "count".to_string(),
            value: MetricValue::Counter(0),
        }
    }

    /// A gauge starting at zero.
    pub fn gauge(id: MetricId, description: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            unit: unit.into(),
            value: MetricValue::Gauge(0.0),
        }
    }
}

/// Result alias for metric operations.
pub type MetricsResult<T> = Result<T, MetricsError>;

/// An error raised by a metrics backend.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricsError {
    /// No metric is registered under the id.
    MetricNotFound(MetricId),
    /// The operation does not apply to the metric's kind.
    TypeMismatch {
        /// The kind the operation needs.
        expected: MetricType,
        /// The kind registered.
        found: MetricType,
    },
    /// The storage layer failed.
    StorageError(String),
}

impl fmt::Display for MetricsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricsError::MetricNotFound(id) => write!(f, "Metric not found: {id}"),
            MetricsError::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {expected:?}, found {found:?}")
            }
            MetricsError::StorageError(msg) => write!(f, "Storage error: {msg}"),
        }
    }
}

impl std::error::Error for MetricsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_id_display() {
        assert_eq!(
            MetricId::new("shadows", "atlas_allocations").to_string(),
            "shadows:atlas_allocations"
        );
        let id = MetricId::new("shadows", "lights_truncated")
            .with_label("pass", "directional")
            .with_label("camera", "main");
        assert_eq!(id.to_string(), "shadows:lights_truncated[camera=main,pass=directional]");
    }

    #[test]
    fn test_metric_value_accessors() {
        let counter = MetricValue::Counter(3);
        assert_eq!(counter.metric_type(), MetricType::Counter);
        assert_eq!(counter.as_counter(), Some(3));
        assert_eq!(counter.as_gauge(), None);

        let gauge = Metric::gauge(MetricId::new("shadows", "shadowed_lights"), "lights", "lights");
        assert_eq!(gauge.value.as_gauge(), Some(0.0));
    }
}
