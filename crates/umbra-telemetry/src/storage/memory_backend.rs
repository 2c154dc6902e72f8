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

use crate::storage::backend::MetricsBackend;
use std::collections::HashMap;
use std::sync::RwLock;
use umbra_core::telemetry::{Metric, MetricId, MetricsError, MetricsResult};

/// In-process metrics storage behind a `RwLock<HashMap>`.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    storage: RwLock<HashMap<MetricId, Metric>>,
}

impl InMemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Metrics whose id is in `namespace`.
    pub fn metrics_in_namespace(&self, namespace: &str) -> Vec<Metric> {
        self.list_all_metrics()
            .into_iter()
            .filter(|m| m.id.namespace == namespace)
            .collect()
    }
}

fn lock_error() -> MetricsError {
    MetricsError::StorageError("metrics storage lock poisoned".to_string())
}

impl MetricsBackend for InMemoryBackend {
    fn put_metric(&self, metric: Metric) -> MetricsResult<()> {
        let mut storage = self.storage.write().map_err(|_| lock_error())?;
        storage.insert(metric.id.clone(), metric);
        Ok(())
    }

    fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric> {
        let storage = self.storage.read().map_err(|_| lock_error())?;
        storage
            .get(id)
            .cloned()
            .ok_or_else(|| MetricsError::MetricNotFound(id.clone()))
    }

    fn list_all_metrics(&self) -> Vec<Metric> {
        match self.storage.read() {
            Ok(storage) => storage.values().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    fn clear_all(&self) -> MetricsResult<()> {
        self.storage.write().map_err(|_| lock_error())?.clear();
        Ok(())
    }
}
