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

use crate::domain::config::SidecarConfig;
use crate::domain::entity::{PodVolume, Volume};
use crate::domain::store::{resolve, DocumentStore};
use crate::infrastructure::constants::{
    RESOURCE_STORAGE, VOLUME_NAME_CONTROL_SOCKET, VOLUME_NAME_PREFIX,
};
use crate::shared::error::{Result, VortexError};
use k8s_openapi::api::core::v1::{
    HostPathVolumeSource, PersistentVolumeClaim, PersistentVolumeClaimSpec,
    PersistentVolumeClaimVolumeSource, VolumeMount, VolumeResourceRequirements,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedVolumes {
    pub volumes: Vec<k8s_openapi::api::core::v1::Volume>,
    pub mounts: Vec<VolumeMount>,
}

pub struct VolumeResolver<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> VolumeResolver<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Bind each referenced volume to its claim and mount it at the declared path.
    ///
    /// Pod-local entry names are positional (`volume-<index>`), so reordering
    /// the list renames the entries of unchanged volumes.
    pub async fn resolve(&self, references: &[PodVolume]) -> Result<ResolvedVolumes> {
        let mut resolved = ResolvedVolumes::default();

        for (index, reference) in references.iter().enumerate() {
            let volume: Volume = resolve(self.store, &reference.name).await?;
            let entry_name = format!("{}{}", VOLUME_NAME_PREFIX, index);

            resolved.volumes.push(k8s_openapi::api::core::v1::Volume {
                name: entry_name.clone(),
                persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
                    claim_name: volume.claim_name(),
                    ..Default::default()
                }),
                ..Default::default()
            });

            resolved.mounts.push(VolumeMount {
                name: entry_name,
                mount_path: reference.mount_path.clone(),
                ..Default::default()
            });
        }

        Ok(resolved)
    }
}

/// Host-path volume carrying the network agent's control socket
pub fn control_socket_volume(sidecar: &SidecarConfig) -> k8s_openapi::api::core::v1::Volume {
    k8s_openapi::api::core::v1::Volume {
        name: VOLUME_NAME_CONTROL_SOCKET.to_string(),
        host_path: Some(HostPathVolumeSource {
            path: sidecar.socket_host_path.clone(),
            type_: None,
        }),
        ..Default::default()
    }
}

pub struct ClaimBuilder;

impl ClaimBuilder {
    /// Claim requesting the volume's capacity under both limits and requests
    pub fn build(volume: &Volume, storage_class_name: &str) -> Result<PersistentVolumeClaim> {
        let capacity = parse_quantity(&volume.capacity)?;

        let mut resources = BTreeMap::new();
        resources.insert(RESOURCE_STORAGE.to_string(), capacity);

        Ok(PersistentVolumeClaim {
            metadata: ObjectMeta {
                name: Some(volume.claim_name()),
                ..Default::default()
            },
            spec: Some(PersistentVolumeClaimSpec {
                access_modes: Some(vec![volume.access_mode.clone()]),
                resources: Some(VolumeResourceRequirements {
                    limits: Some(resources.clone()),
                    requests: Some(resources),
                }),
                storage_class_name: Some(storage_class_name.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        })
    }
}

/// Validate a capacity string against the Kubernetes quantity grammar
pub fn parse_quantity(value: &str) -> Result<Quantity> {
    static QUANTITY: OnceLock<Regex> = OnceLock::new();
    let re = QUANTITY.get_or_init(|| {
        Regex::new(r"^[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+|Ki|Mi|Gi|Ti|Pi|Ei|[numkMGTPE])?$")
            .expect("quantity pattern")
    });

    let trimmed = value.trim();
    if !re.is_match(trimmed) {
        return Err(VortexError::InvalidResource(format!(
            "Invalid capacity quantity: '{}'",
            value
        )));
    }

    Ok(Quantity(trimmed.to_string()))
}
