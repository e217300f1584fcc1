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

use crate::shared::error::VortexError;
use k8s_openapi::api::core::v1::{PersistentVolumeClaim, Pod};
use kube::{Api, Client};

#[async_trait::async_trait]
pub trait VortexKubeClient: Send + Sync {
    async fn create_pod(&self, pod: &Pod, namespace: &str) -> Result<(), VortexError>;

    async fn delete_pod(&self, name: &str, namespace: &str) -> Result<(), VortexError>;

    /// Returns `None` when the pod does not exist in the cluster
    async fn get_pod(&self, name: &str, namespace: &str) -> Result<Option<Pod>, VortexError>;

    async fn create_pvc(
        &self,
        pvc: &PersistentVolumeClaim,
        namespace: &str,
    ) -> Result<(), VortexError>;

    async fn delete_pvc(&self, name: &str, namespace: &str) -> Result<(), VortexError>;
}

pub struct VortexKubeClientImpl {
    client: Client,
}

impl VortexKubeClientImpl {
    /// Client for the given kubeconfig and context, falling back to the
    /// default kubeconfig resolution and its current context
    pub async fn new_with_config(
        kubeconfig_path: Option<String>,
        context: Option<String>,
    ) -> Result<Self, VortexError> {
        use kube::config::{KubeConfigOptions, Kubeconfig};

        let kubeconfig = if let Some(path) = kubeconfig_path {
            Kubeconfig::read_from(path)
                .map_err(|e| VortexError::upstream("Failed to load kubeconfig", e))?
        } else {
            Kubeconfig::read().map_err(|e| VortexError::upstream("Failed to load kubeconfig", e))?
        };

        let config_options = KubeConfigOptions {
            context,
            cluster: None,
            user: None,
        };

        let config = kube::Config::from_custom_kubeconfig(kubeconfig, &config_options)
            .await
            .map_err(|e| VortexError::upstream("Failed to create Kubernetes config", e))?;

        let client = Client::try_from(config)
            .map_err(|e| VortexError::upstream("Failed to create Kubernetes client", e))?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl VortexKubeClient for VortexKubeClientImpl {
    async fn create_pod(&self, pod: &Pod, namespace: &str) -> Result<(), VortexError> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let pp = kube::api::PostParams::default();

        api.create(&pp, pod)
            .await
            .map_err(|e| VortexError::upstream(format!("Failed to create pod in {}", namespace), e))?;
        Ok(())
    }

    async fn delete_pod(&self, name: &str, namespace: &str) -> Result<(), VortexError> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let dp = kube::api::DeleteParams::default();

        api.delete(name, &dp).await.map_err(|e| {
            VortexError::upstream(format!("Failed to delete pod {}/{}", namespace, name), e)
        })?;
        Ok(())
    }

    async fn get_pod(&self, name: &str, namespace: &str) -> Result<Option<Pod>, VortexError> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        match api.get(name).await {
            Ok(pod) => Ok(Some(pod)),
            Err(kube::Error::Api(ae)) if ae.code == 404 => Ok(None),
            Err(e) => Err(VortexError::upstream(
                format!("Failed to get pod {}/{}", namespace, name),
                e,
            )),
        }
    }

    async fn create_pvc(
        &self,
        pvc: &PersistentVolumeClaim,
        namespace: &str,
    ) -> Result<(), VortexError> {
        let api: Api<PersistentVolumeClaim> = Api::namespaced(self.client.clone(), namespace);
        let pp = kube::api::PostParams::default();

        api.create(&pp, pvc).await.map_err(|e| {
            VortexError::upstream(
                format!("Failed to create persistent volume claim in {}", namespace),
                e,
            )
        })?;
        Ok(())
    }

    async fn delete_pvc(&self, name: &str, namespace: &str) -> Result<(), VortexError> {
        let api: Api<PersistentVolumeClaim> = Api::namespaced(self.client.clone(), namespace);
        let dp = kube::api::DeleteParams::default();

        api.delete(name, &dp).await.map_err(|e| {
            VortexError::upstream(
                format!("Failed to delete persistent volume claim {}/{}", namespace, name),
                e,
            )
        })?;
        Ok(())
    }
}
