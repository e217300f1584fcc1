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

//! Document store contract
//!
//! Records are exchanged as JSON documents so that any backend with
//! `findOne`/`count` style primitives can sit behind [`DocumentStore`].
//! Typed access goes through [`Entity`].

pub mod memory;

pub use self::memory::{MemoryStore, StoreSeed};

use crate::domain::entity::{Network, Pod, Storage, Volume};
use crate::infrastructure::constants::{
    COLLECTION_NETWORKS, COLLECTION_PODS, COLLECTION_STORAGES, COLLECTION_VOLUMES,
};
use crate::shared::error::{Result, VortexError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Pods,
    Networks,
    Volumes,
    Storages,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Pods => COLLECTION_PODS,
            Collection::Networks => COLLECTION_NETWORKS,
            Collection::Volumes => COLLECTION_VOLUMES,
            Collection::Storages => COLLECTION_STORAGES,
        }
    }
}

/// Equality filter on a dotted field path.
///
/// Path segments descend into arrays element-wise, so `volumes.name`
/// matches a pod whose volume list contains an entry with that name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    field: String,
    value: String,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self::eq("name", name)
    }

    pub fn matches(&self, document: &Value) -> bool {
        let path: Vec<&str> = self.field.split('.').collect();
        path_matches(document, &path, &self.value)
    }
}

fn path_matches(value: &Value, path: &[&str], expected: &str) -> bool {
    match value {
        Value::Array(items) => items
            .iter()
            .any(|item| path_matches(item, path, expected)),
        _ => match path.split_first() {
            None => value.as_str() == Some(expected),
            Some((head, rest)) => value
                .get(*head)
                .is_some_and(|child| path_matches(child, rest, expected)),
        },
    }
}

#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Value>>;

    async fn find_all(&self, collection: Collection, filter: &Filter) -> Result<Vec<Value>>;

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64>;
}

/// A record type stored in its own collection, keyed by a unique name.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;
    const KIND: &'static str;

    fn name(&self) -> &str;
}

impl Entity for Pod {
    const COLLECTION: Collection = Collection::Pods;
    const KIND: &'static str = "pod";

    fn name(&self) -> &str {
        &self.name
    }
}

impl Entity for Network {
    const COLLECTION: Collection = Collection::Networks;
    const KIND: &'static str = "network";

    fn name(&self) -> &str {
        &self.name
    }
}

impl Entity for Volume {
    const COLLECTION: Collection = Collection::Volumes;
    const KIND: &'static str = "volume";

    fn name(&self) -> &str {
        &self.name
    }
}

impl Entity for Storage {
    const COLLECTION: Collection = Collection::Storages;
    const KIND: &'static str = "storage";

    fn name(&self) -> &str {
        &self.name
    }
}

/// Load the entity with the given name, failing with `ReferenceNotFound`
/// when it is absent.
pub async fn resolve<T: Entity>(store: &dyn DocumentStore, name: &str) -> Result<T> {
    let document = store
        .find_one(T::COLLECTION, &Filter::by_name(name))
        .await
        .map_err(|e| VortexError::upstream(format!("Get the {} object {}", T::KIND, name), e))?
        .ok_or_else(|| VortexError::reference_not_found(T::KIND, name))?;

    decode(document, name)
}

pub async fn find_all<T: Entity>(store: &dyn DocumentStore, filter: &Filter) -> Result<Vec<T>> {
    store
        .find_all(T::COLLECTION, filter)
        .await?
        .into_iter()
        .map(|document| {
            let name = document
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            decode(document, &name)
        })
        .collect()
}

/// A stored record that does not match its schema is a store-side fault.
fn decode<T: Entity>(document: Value, name: &str) -> Result<T> {
    serde_json::from_value(document).map_err(|e| {
        VortexError::upstream(
            format!("Decode the {} record {}", T::COLLECTION.as_str(), name),
            e,
        )
    })
}
