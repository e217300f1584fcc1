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

//! Referential integrity checks
//!
//! Both checks are snapshot reads against the store. They do not lock the
//! referenced records, so a concurrent delete between check and use is not
//! detected here.

use crate::domain::entity::{Network, Pod, Volume};
use crate::domain::store::{find_all, DocumentStore, Entity, Filter};
use crate::infrastructure::constants::{POD_PHASE_FAILED, POD_PHASE_SUCCEEDED};
use crate::infrastructure::kubernetes::client::VortexKubeClient;
use crate::shared::error::{Result, VortexError};
use std::sync::Arc;

pub struct ReferenceGuard {
    store: Arc<dyn DocumentStore>,
}

impl ReferenceGuard {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Every volume and network the pod references must exist.
    pub async fn check_pod_parameter(&self, pod: &Pod) -> Result<()> {
        for volume in &pod.volumes {
            self.ensure_exists::<Volume>(&volume.name).await?;
        }

        for network in &pod.networks {
            self.ensure_exists::<Network>(&network.name).await?;
        }

        Ok(())
    }

    async fn ensure_exists<T: Entity>(&self, name: &str) -> Result<()> {
        let count = self
            .store
            .count(T::COLLECTION, &Filter::by_name(name))
            .await
            .map_err(|e| VortexError::upstream(format!("Check the {} name {}", T::KIND, name), e))?;

        if count == 0 {
            return Err(VortexError::reference_not_found(T::KIND, name));
        }

        Ok(())
    }

    /// Fail with `DependencyConflict` while any non-terminal pod mounts the volume.
    ///
    /// Pods that no longer exist in the cluster are treated as terminal.
    pub async fn check_volume_unused(
        &self,
        volume: &Volume,
        client: &dyn VortexKubeClient,
        default_namespace: &str,
    ) -> Result<()> {
        let pods: Vec<Pod> =
            find_all(self.store.as_ref(), &Filter::eq("volumes.name", &volume.name))
                .await
                .map_err(|e| {
                    VortexError::upstream(format!("List the pods using volume {}", volume.name), e)
                })?;

        let mut used_by = Vec::new();
        for pod in pods {
            let namespace = if pod.namespace.is_empty() {
                default_namespace
            } else {
                pod.namespace.as_str()
            };

            let active = match client.get_pod(&pod.name, namespace).await? {
                None => false,
                Some(live) => !live
                    .status
                    .and_then(|status| status.phase)
                    .is_some_and(|phase| is_terminal_phase(&phase)),
            };

            if active {
                used_by.push(pod.name);
            }
        }

        if !used_by.is_empty() {
            tracing::info!(
                volume = %volume.name,
                pods = ?used_by,
                "Volume is still mounted by active pods"
            );
            return Err(VortexError::dependency_conflict(&volume.name, used_by));
        }

        Ok(())
    }
}

pub fn is_terminal_phase(phase: &str) -> bool {
    phase == POD_PHASE_SUCCEEDED || phase == POD_PHASE_FAILED
}
