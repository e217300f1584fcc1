// Copyright 2025 JiangLong.
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

use super::{Collection, DocumentStore, Entity, Filter};
use crate::domain::entity::{Network, Pod, Storage, Volume};
use crate::shared::error::{Result, VortexError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;

/// Seed file layout for [`MemoryStore`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSeed {
    pub pods: Vec<Pod>,
    pub networks: Vec<Network>,
    pub volumes: Vec<Volume>,
    pub storages: Vec<Storage>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: StoreSeed) -> Result<Self> {
        let mut collections: HashMap<Collection, Vec<Value>> = HashMap::new();
        collections.insert(Collection::Pods, to_documents(&seed.pods)?);
        collections.insert(Collection::Networks, to_documents(&seed.networks)?);
        collections.insert(Collection::Volumes, to_documents(&seed.volumes)?);
        collections.insert(Collection::Storages, to_documents(&seed.storages)?);

        Ok(Self {
            collections: RwLock::new(collections),
        })
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            VortexError::ConfigError(format!(
                "Failed to read store file {}: {}",
                path.display(),
                e
            ))
        })?;
        let seed: StoreSeed = serde_yaml::from_str(&content)?;
        tracing::debug!(
            pods = seed.pods.len(),
            networks = seed.networks.len(),
            volumes = seed.volumes.len(),
            storages = seed.storages.len(),
            "Loaded store seed from {}",
            path.display()
        );
        Self::from_seed(seed)
    }

    /// Insert or replace the record with the same name
    pub async fn upsert<T: Entity>(&self, entity: &T) -> Result<()> {
        let document = serde_json::to_value(entity)?;
        let filter = Filter::by_name(entity.name());
        let mut collections = self.collections.write().await;
        let documents = collections.entry(T::COLLECTION).or_default();
        documents.retain(|existing| !filter.matches(existing));
        documents.push(document);
        Ok(())
    }

    pub async fn remove(&self, collection: Collection, name: &str) -> usize {
        let filter = Filter::by_name(name);
        let mut collections = self.collections.write().await;
        match collections.get_mut(&collection) {
            Some(documents) => {
                let before = documents.len();
                documents.retain(|existing| !filter.matches(existing));
                before - documents.len()
            }
            None => 0,
        }
    }
}

fn to_documents<T: Serialize>(records: &[T]) -> Result<Vec<Value>> {
    records
        .iter()
        .map(|record| serde_json::to_value(record).map_err(VortexError::from))
        .collect()
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|documents| documents.iter().find(|doc| filter.matches(doc)))
            .cloned())
    }

    async fn find_all(&self, collection: Collection, filter: &Filter) -> Result<Vec<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|doc| filter.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|documents| documents.iter().filter(|doc| filter.matches(doc)).count() as u64)
            .unwrap_or(0))
    }
}
