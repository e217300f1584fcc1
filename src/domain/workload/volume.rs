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

use crate::domain::entity::{Storage, Volume};
use crate::domain::store::{resolve, DocumentStore};
use crate::domain::workload::guard::ReferenceGuard;
use crate::infrastructure::kubernetes::client::VortexKubeClient;
use crate::infrastructure::kubernetes::resources::volume::ClaimBuilder;
use crate::shared::error::VortexError;
use k8s_openapi::api::core::v1::PersistentVolumeClaim;
use std::sync::Arc;

/// Claim lifecycle for Volume records. Claims live in a single namespace.
pub struct VolumeDescriptor {
    store: Arc<dyn DocumentStore>,
    client: Arc<dyn VortexKubeClient>,
    namespace: String,
}

impl VolumeDescriptor {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        client: Arc<dyn VortexKubeClient>,
        namespace: String,
    ) -> Self {
        Self {
            store,
            client,
            namespace,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub async fn create_volume(&self, volume: &Volume) -> Result<PersistentVolumeClaim, VortexError> {
        let storage: Storage = resolve(self.store.as_ref(), &volume.storage_name).await?;
        let pvc = ClaimBuilder::build(volume, &storage.storage_class_name)?;

        self.client.create_pvc(&pvc, &self.namespace).await?;

        tracing::info!(
            volume = %volume.name,
            claim = %volume.claim_name(),
            storage_class = %storage.storage_class_name,
            "Persistent volume claim created"
        );
        Ok(pvc)
    }

    /// Remove the claim once no active pod mounts the volume.
    pub async fn delete_volume(&self, volume: &Volume) -> Result<(), VortexError> {
        ReferenceGuard::new(self.store.clone())
            .check_volume_unused(volume, self.client.as_ref(), &self.namespace)
            .await?;

        self.client
            .delete_pvc(&volume.claim_name(), &self.namespace)
            .await?;

        tracing::info!(volume = %volume.name, claim = %volume.claim_name(), "Persistent volume claim deleted");
        Ok(())
    }
}
