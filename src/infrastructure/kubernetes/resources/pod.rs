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

//! Pod manifest synthesis
//!
//! Combines volume wiring, the network-mode specific pieces (host network,
//! attachment sidecars and node affinity), the security context and the
//! environment into a single `Pod`. Synthesis either yields a complete
//! manifest or an error; nothing is submitted from here.

use crate::domain::config::vortex::{is_valid_k8s_name, is_valid_k8s_subdomain};
use crate::domain::config::VortexConfig;
use crate::domain::entity::{NetworkType, Pod as PodDeclaration};
use crate::domain::store::DocumentStore;
use crate::infrastructure::kubernetes::resources::builders::{
    EnvironmentBuilder, SecurityContextBuilder,
};
use crate::infrastructure::kubernetes::resources::network::NetworkAttachmentPlanner;
use crate::infrastructure::kubernetes::resources::node_set::{
    build_node_affinity, NodeSetResolver,
};
use crate::infrastructure::kubernetes::resources::volume::{
    control_socket_volume, VolumeResolver,
};
use crate::shared::error::{Result, VortexError};
use k8s_openapi::api::core::v1::{Container, LocalObjectReference, Pod, PodSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// A manifest ready for submission
#[derive(Debug, Clone)]
pub struct SynthesizedPod {
    pub namespace: String,
    pub manifest: Pod,
    /// Nodes the pod is restricted to; empty when unconstrained
    pub node_names: Vec<String>,
}

pub struct PodManifestBuilder<'a> {
    store: &'a dyn DocumentStore,
    config: &'a VortexConfig,
}

impl<'a> PodManifestBuilder<'a> {
    pub fn new(store: &'a dyn DocumentStore, config: &'a VortexConfig) -> Self {
        Self { store, config }
    }

    /// Namespace the pod lands in
    pub fn namespace_for(&self, pod: &PodDeclaration) -> String {
        if pod.namespace.is_empty() {
            self.config.namespace.clone()
        } else {
            pod.namespace.clone()
        }
    }

    pub async fn build(&self, pod: &mut PodDeclaration) -> Result<SynthesizedPod> {
        let namespace = self.namespace_for(pod);
        validate_declaration(pod, &namespace)?;

        let mut resolved = VolumeResolver::new(self.store).resolve(&pod.volumes).await?;

        let mut host_network = false;
        let mut init_containers = Vec::new();
        let node_names = match &pod.network_type {
            NetworkType::HostNetwork => {
                host_network = true;
                NodeSetResolver::constrain(&pod.node_affinity, &[])
            }
            NetworkType::CustomNetwork => {
                let planner = NetworkAttachmentPlanner::new(self.store, &self.config.sidecar);
                let plan = planner.plan(&mut pod.networks).await?;
                init_containers = plan.init_containers;
                NodeSetResolver::constrain(&pod.node_affinity, &plan.node_names)
            }
            NetworkType::ClusterNetwork => NodeSetResolver::constrain(&pod.node_affinity, &[]),
            NetworkType::Unrecognized(other) => {
                return Err(VortexError::UnsupportedNetworkType(other.clone()));
            }
        };

        resolved
            .volumes
            .push(control_socket_volume(&self.config.sidecar));

        let security_context = SecurityContextBuilder::build(pod.capability);
        let env_vars = EnvironmentBuilder::new()
            .with_custom_vars(&pod.env_vars)
            .build();

        let containers = pod
            .containers
            .iter()
            .map(|container| Container {
                name: container.name.clone(),
                image: Some(container.image.clone()),
                command: non_empty(container.command.clone()),
                volume_mounts: non_empty(resolved.mounts.clone()),
                security_context: Some(security_context.clone()),
                env: non_empty(env_vars.clone()),
                ..Default::default()
            })
            .collect();

        let manifest = Pod {
            metadata: ObjectMeta {
                name: Some(pod.name.clone()),
                namespace: Some(namespace.clone()),
                labels: if pod.labels.is_empty() {
                    None
                } else {
                    Some(pod.labels.clone())
                },
                ..Default::default()
            },
            spec: Some(PodSpec {
                init_containers: non_empty(init_containers),
                containers,
                volumes: Some(resolved.volumes),
                affinity: build_node_affinity(&node_names),
                restart_policy: if pod.restart_policy.is_empty() {
                    None
                } else {
                    Some(pod.restart_policy.clone())
                },
                host_network: Some(host_network),
                image_pull_secrets: Some(vec![LocalObjectReference {
                    name: self.config.image_pull_secret.clone(),
                }]),
                ..Default::default()
            }),
            ..Default::default()
        };

        Ok(SynthesizedPod {
            namespace,
            manifest,
            node_names,
        })
    }
}

fn validate_declaration(pod: &PodDeclaration, namespace: &str) -> Result<()> {
    if !is_valid_k8s_subdomain(&pod.name) {
        return Err(VortexError::InvalidResource(format!(
            "Invalid pod name: '{}'",
            pod.name
        )));
    }

    if !is_valid_k8s_name(namespace) {
        return Err(VortexError::InvalidResource(format!(
            "Invalid namespace: '{}'",
            namespace
        )));
    }

    if pod.containers.is_empty() {
        return Err(VortexError::InvalidResource(format!(
            "Pod '{}' declares no containers",
            pod.name
        )));
    }

    Ok(())
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}
