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

use crate::domain::config::VortexConfig;
use crate::domain::entity::Pod;
use crate::domain::store::DocumentStore;
use crate::domain::workload::guard::ReferenceGuard;
use crate::infrastructure::kubernetes::client::{VortexKubeClient, VortexKubeClientImpl};
use crate::infrastructure::kubernetes::resources::pod::{PodManifestBuilder, SynthesizedPod};
use crate::shared::error::VortexError;
use std::sync::Arc;

pub struct PodDescriptor {
    store: Arc<dyn DocumentStore>,
    client: Arc<dyn VortexKubeClient>,
    config: VortexConfig,
}

impl PodDescriptor {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        client: Arc<dyn VortexKubeClient>,
        config: VortexConfig,
    ) -> Self {
        Self {
            store,
            client,
            config,
        }
    }

    pub async fn new_with_config(
        store: Arc<dyn DocumentStore>,
        config: VortexConfig,
    ) -> Result<Self, VortexError> {
        let client =
            VortexKubeClientImpl::new_with_config(config.kubeconfig.clone(), config.context.clone())
                .await?;
        Ok(Self::new(store, Arc::new(client), config))
    }

    pub async fn check_pod_parameter(&self, pod: &Pod) -> Result<(), VortexError> {
        ReferenceGuard::new(self.store.clone())
            .check_pod_parameter(pod)
            .await
    }

    /// Synthesize the manifest without submitting it
    pub async fn render_pod(&self, pod: &Pod) -> Result<SynthesizedPod, VortexError> {
        let mut declaration = pod.clone();
        PodManifestBuilder::new(self.store.as_ref(), &self.config)
            .build(&mut declaration)
            .await
    }

    pub async fn create_pod(&self, pod: &Pod) -> Result<SynthesizedPod, VortexError> {
        let synthesized = self.render_pod(pod).await?;

        self.client
            .create_pod(&synthesized.manifest, &synthesized.namespace)
            .await?;

        tracing::info!(
            pod = %pod.name,
            namespace = %synthesized.namespace,
            network_type = %pod.network_type,
            "Pod submitted"
        );
        Ok(synthesized)
    }

    /// Validate references, then synthesize and submit.
    pub async fn admit_pod(&self, pod: &Pod) -> Result<SynthesizedPod, VortexError> {
        self.check_pod_parameter(pod).await?;
        self.create_pod(pod).await
    }

    pub async fn delete_pod(&self, pod: &Pod) -> Result<(), VortexError> {
        let namespace = if pod.namespace.is_empty() {
            self.config.namespace.as_str()
        } else {
            pod.namespace.as_str()
        };

        self.client.delete_pod(&pod.name, namespace).await?;
        tracing::info!(pod = %pod.name, namespace = %namespace, "Pod deleted");
        Ok(())
    }
}
