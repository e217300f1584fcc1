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

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A declared workload: application containers plus the volumes and
/// virtual networks it must be wired to.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pod {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub containers: Vec<PodContainer>,
    #[serde(default)]
    pub volumes: Vec<PodVolume>,
    #[serde(default)]
    pub networks: Vec<PodNetwork>,
    pub network_type: NetworkType,
    #[serde(default)]
    pub node_affinity: Vec<String>,
    #[serde(default)]
    pub capability: bool,
    #[serde(default)]
    pub restart_policy: String,
    #[serde(default)]
    pub env_vars: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PodContainer {
    pub name: String,
    pub image: String,
    #[serde(default)]
    pub command: Vec<String>,
}

/// Reference to a Volume record plus where to mount it
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PodVolume {
    pub name: String,
    pub mount_path: String,
}

/// One virtual NIC to plumb into the pod.
///
/// `bridge_name` is not declared by the user; it is copied from the
/// referenced Network record during planning.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PodNetwork {
    pub name: String,
    pub if_name: String,
    pub ip_address: String,
    pub netmask: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_tag: Option<i32>,
    #[serde(default)]
    pub routes_gw: Vec<PodRouteGw>,
    #[serde(default)]
    pub routes_intf: Vec<PodRouteIntf>,
    #[serde(default)]
    pub bridge_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PodRouteGw {
    pub dst_cidr: String,
    pub gateway: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PodRouteIntf {
    pub dst_cidr: String,
}

/// How the pod is attached to the network.
///
/// Unknown values are kept verbatim in `Unrecognized` so synthesis can
/// reject them with the original text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NetworkType {
    HostNetwork,
    CustomNetwork,
    #[default]
    ClusterNetwork,
    Unrecognized(String),
}

impl NetworkType {
    pub fn as_str(&self) -> &str {
        match self {
            NetworkType::HostNetwork => "host",
            NetworkType::CustomNetwork => "custom",
            NetworkType::ClusterNetwork => "cluster",
            NetworkType::Unrecognized(other) => other.as_str(),
        }
    }
}

impl From<String> for NetworkType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "host" => NetworkType::HostNetwork,
            "custom" => NetworkType::CustomNetwork,
            "cluster" => NetworkType::ClusterNetwork,
            _ => NetworkType::Unrecognized(value),
        }
    }
}

impl From<NetworkType> for String {
    fn from(value: NetworkType) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for NetworkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
